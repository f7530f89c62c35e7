//! Subscription registry.
//!
//! Every notification category owns a [`Channel`]: an ordered observer list
//! that can be changed at any time, including from inside one of its own
//! callbacks. [`Channels`] groups them into the registration surface handed
//! to listeners.
//!
//! # Dispatch rules
//! - Callbacks run in subscription order.
//! - The list is snapshotted before a pass. Callbacks subscribed during the
//!   pass first run on the next notification.
//! - A callback unsubscribed during a pass does not run later in that pass,
//!   and never again afterwards.
//! - A panicking callback is logged and skipped; the rest of the pass runs.
//!
//! Channels are `Rc`-based and therefore `!Send`. Registration and polling
//! happen on the host's update thread.

use crate::device::DeviceClass;
use crate::event::{Axis2, Category, KeyCode, MouseButton, Notification};
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Identifies one subscription. Returned by [`Channel::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    category: Category,
    id: u64,
}

impl ListenerHandle {
    /// Category of the channel that issued this handle.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }
}

struct Slot<P: ?Sized> {
    id: u64,
    callback: Rc<RefCell<dyn FnMut(&P)>>,
}

struct Registry<P: ?Sized> {
    next_id: u64,
    slots: Vec<Slot<P>>,
}

impl<P: ?Sized> Registry<P> {
    fn contains(&self, id: u64) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }
}

/// Observer list for one notification category with payload `P`.
///
/// Cloning is cheap and yields another handle to the same list, so a listener
/// can keep a clone around to unsubscribe itself later.
pub struct Channel<P: ?Sized + 'static> {
    category: Category,
    registry: Rc<RefCell<Registry<P>>>,
}

impl<P: ?Sized + 'static> Clone for Channel<P> {
    fn clone(&self) -> Self {
        Self {
            category: self.category,
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<P: ?Sized + 'static> fmt::Debug for Channel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("category", &self.category)
            .field("listeners", &self.len())
            .finish()
    }
}

impl<P: ?Sized + 'static> Channel<P> {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Registers a callback. The same closure logic may be registered twice;
    /// each registration gets its own handle.
    pub fn subscribe<F>(&self, callback: F) -> ListenerHandle
    where
        F: FnMut(&P) + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        let callback: Rc<RefCell<dyn FnMut(&P)>> = Rc::new(RefCell::new(callback));
        reg.slots.push(Slot { id, callback });
        ListenerHandle {
            category: self.category,
            id,
        }
    }

    /// Removes a subscription. Returns `false` (and does nothing) when the
    /// handle is unknown or belongs to another channel.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        if handle.category != self.category {
            return false;
        }
        let mut reg = self.registry.borrow_mut();
        let before = reg.slots.len();
        reg.slots.retain(|s| s.id != handle.id);
        reg.slots.len() != before
    }

    pub fn is_subscribed(&self, handle: ListenerHandle) -> bool {
        handle.category == self.category && self.registry.borrow().contains(handle.id)
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every live subscriber with `payload`. Returns how many ran to completion.
    pub fn dispatch(&self, payload: &P) -> usize {
        let snapshot: Vec<(u64, Rc<RefCell<dyn FnMut(&P)>>)> = self
            .registry
            .borrow()
            .slots
            .iter()
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            let Ok(mut f) = callback.try_borrow_mut() else {
                tracing::warn!(
                    category = ?self.category,
                    listener = id,
                    "listener re-entered its own dispatch; skipped"
                );
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| (&mut *f)(payload))) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::warn!(
                    category = ?self.category,
                    listener = id,
                    "listener panicked; remaining listeners still notified"
                ),
            }
        }
        delivered
    }
}

/// Trait-object listener on the catch-all bus.
pub trait InputListener {
    fn on_notification(&mut self, notification: &Notification);
}

/// Selects which notifications an [`InputListener`] receives.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    Category(Category),
    Device(DeviceClass),
    ButtonsOnly,
    MovesOnly,
    Custom(fn(&Notification) -> bool),
}

impl EventFilter {
    pub fn matches(&self, n: &Notification) -> bool {
        match *self {
            EventFilter::All => true,
            EventFilter::Category(c) => n.category() == c,
            EventFilter::Device(class) => device_class_of(n) == class,
            EventFilter::ButtonsOnly => n.is_button(),
            EventFilter::MovesOnly => n.is_move(),
            EventFilter::Custom(f) => f(n),
        }
    }
}

fn device_class_of(n: &Notification) -> DeviceClass {
    match n {
        Notification::KeyDown(_) | Notification::KeyUp(_) | Notification::KeyHeld(_) => {
            DeviceClass::Keyboard
        }
        Notification::MouseButtonDown(_)
        | Notification::MouseButtonUp(_)
        | Notification::MouseMove(_) => DeviceClass::Mouse,
        Notification::GamepadButtonDown(_)
        | Notification::GamepadButtonUp(_)
        | Notification::GamepadButtonHeld(_)
        | Notification::GamepadMove(_) => DeviceClass::Gamepad,
        Notification::VrButtonDown(_) | Notification::VrButtonUp(_) | Notification::VrMove(_) => {
            DeviceClass::Xr
        }
    }
}

/// The registration surface: one subscribe/unsubscribe pair per category.
#[derive(Clone, Debug)]
pub struct Channels {
    pub key_down: Channel<KeyCode>,
    pub key_up: Channel<KeyCode>,
    pub key_held: Channel<KeyCode>,

    pub mouse_button_down: Channel<MouseButton>,
    pub mouse_button_up: Channel<MouseButton>,
    pub mouse_move: Channel<Axis2>,

    pub gamepad_button_down: Channel<str>,
    pub gamepad_button_up: Channel<str>,
    pub gamepad_button_held: Channel<str>,
    pub gamepad_move: Channel<Axis2>,

    pub vr_button_down: Channel<str>,
    pub vr_button_up: Channel<str>,
    pub vr_move: Channel<Axis2>,

    /// Catch-all bus: receives every notification after its typed channel.
    pub any: Channel<Notification>,
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    pub fn new() -> Self {
        Self {
            key_down: Channel::new(Category::KeyDown),
            key_up: Channel::new(Category::KeyUp),
            key_held: Channel::new(Category::KeyHeld),
            mouse_button_down: Channel::new(Category::MouseButtonDown),
            mouse_button_up: Channel::new(Category::MouseButtonUp),
            mouse_move: Channel::new(Category::MouseMove),
            gamepad_button_down: Channel::new(Category::GamepadButtonDown),
            gamepad_button_up: Channel::new(Category::GamepadButtonUp),
            gamepad_button_held: Channel::new(Category::GamepadButtonHeld),
            gamepad_move: Channel::new(Category::GamepadMove),
            vr_button_down: Channel::new(Category::VrButtonDown),
            vr_button_up: Channel::new(Category::VrButtonUp),
            vr_move: Channel::new(Category::VrMove),
            any: Channel::new(Category::Any),
        }
    }

    /// Removes a subscription from whichever channel issued `handle`.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        match handle.category {
            Category::KeyDown => self.key_down.unsubscribe(handle),
            Category::KeyUp => self.key_up.unsubscribe(handle),
            Category::KeyHeld => self.key_held.unsubscribe(handle),
            Category::MouseButtonDown => self.mouse_button_down.unsubscribe(handle),
            Category::MouseButtonUp => self.mouse_button_up.unsubscribe(handle),
            Category::MouseMove => self.mouse_move.unsubscribe(handle),
            Category::GamepadButtonDown => self.gamepad_button_down.unsubscribe(handle),
            Category::GamepadButtonUp => self.gamepad_button_up.unsubscribe(handle),
            Category::GamepadButtonHeld => self.gamepad_button_held.unsubscribe(handle),
            Category::GamepadMove => self.gamepad_move.unsubscribe(handle),
            Category::VrButtonDown => self.vr_button_down.unsubscribe(handle),
            Category::VrButtonUp => self.vr_button_up.unsubscribe(handle),
            Category::VrMove => self.vr_move.unsubscribe(handle),
            Category::Any => self.any.unsubscribe(handle),
        }
    }

    /// Registers a trait-object listener on the catch-all bus.
    pub fn add_listener(
        &self,
        mut listener: impl InputListener + 'static,
        filter: EventFilter,
    ) -> ListenerHandle {
        self.any.subscribe(move |n: &Notification| {
            if filter.matches(n) {
                listener.on_notification(n);
            }
        })
    }

    /// Delivers `n` to its typed channel, then to the catch-all bus.
    pub(crate) fn publish(&self, n: &Notification) {
        match n {
            Notification::KeyDown(k) => self.key_down.dispatch(k),
            Notification::KeyUp(k) => self.key_up.dispatch(k),
            Notification::KeyHeld(k) => self.key_held.dispatch(k),
            Notification::MouseButtonDown(b) => self.mouse_button_down.dispatch(b),
            Notification::MouseButtonUp(b) => self.mouse_button_up.dispatch(b),
            Notification::MouseMove(v) => self.mouse_move.dispatch(v),
            Notification::GamepadButtonDown(a) => self.gamepad_button_down.dispatch(a.as_str()),
            Notification::GamepadButtonUp(a) => self.gamepad_button_up.dispatch(a.as_str()),
            Notification::GamepadButtonHeld(a) => self.gamepad_button_held.dispatch(a.as_str()),
            Notification::GamepadMove(v) => self.gamepad_move.dispatch(v),
            Notification::VrButtonDown(n) => self.vr_button_down.dispatch(n.as_str()),
            Notification::VrButtonUp(n) => self.vr_button_up.dispatch(n.as_str()),
            Notification::VrMove(v) => self.vr_move.dispatch(v),
        };
        self.any.dispatch(n);
    }
}
