//! Logging listener.
//!
//! [`InputLogger`] is the reference consumer: it subscribes to every
//! category when enabled, logs each notification through `tracing`, and
//! removes all its subscriptions when disabled.

use crate::event::{Axis2, KeyCode, MouseButton};
use crate::eventbus::{Channels, ListenerHandle};
use std::cell::Cell;
use std::rc::Rc;

/// Logs every notification it receives at `info` level.
#[derive(Debug, Default)]
pub struct InputLogger {
    handles: Vec<ListenerHandle>,
    received: Rc<Cell<u64>>,
}

impl InputLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all keyboard, mouse and gamepad categories, and to the
    /// VR ones when `xr_enabled`. Does nothing if already attached.
    pub fn attach(&mut self, channels: &Channels, xr_enabled: bool) {
        if self.is_attached() {
            return;
        }

        let r = &self.received;
        self.handles = vec![
            channels.key_down.subscribe(log_key(r, "Key down")),
            channels.key_up.subscribe(log_key(r, "Key up")),
            channels.key_held.subscribe(log_key(r, "Key held")),
            channels.mouse_button_down.subscribe(log_button(r, "Mouse button down")),
            channels.mouse_button_up.subscribe(log_button(r, "Mouse button up")),
            channels.mouse_move.subscribe(log_axis(r, "Mouse move")),
            channels.gamepad_button_down.subscribe(log_name(r, "Gamepad button down")),
            channels.gamepad_button_up.subscribe(log_name(r, "Gamepad button up")),
            channels.gamepad_button_held.subscribe(log_name(r, "Gamepad button held")),
            channels.gamepad_move.subscribe(log_axis(r, "Gamepad move")),
        ];

        if xr_enabled {
            self.handles.extend([
                channels.vr_button_down.subscribe(log_name(r, "VR button down")),
                channels.vr_button_up.subscribe(log_name(r, "VR button up")),
                channels.vr_move.subscribe(log_axis(r, "VR move")),
            ]);
        }
    }

    /// Removes every subscription made by [`attach`](Self::attach).
    pub fn detach(&mut self, channels: &Channels) {
        for handle in self.handles.drain(..) {
            channels.unsubscribe(handle);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Number of active subscriptions.
    pub fn subscriptions(&self) -> usize {
        self.handles.len()
    }

    /// Total notifications logged so far.
    pub fn received(&self) -> u64 {
        self.received.get()
    }
}

fn log_key(received: &Rc<Cell<u64>>, label: &'static str) -> impl FnMut(&KeyCode) + 'static {
    let received = Rc::clone(received);
    move |key: &KeyCode| {
        received.set(received.get() + 1);
        tracing::info!("{label}: {key}");
    }
}

fn log_button(received: &Rc<Cell<u64>>, label: &'static str) -> impl FnMut(&MouseButton) + 'static {
    let received = Rc::clone(received);
    move |button: &MouseButton| {
        received.set(received.get() + 1);
        tracing::info!("{label}: {button}");
    }
}

fn log_axis(received: &Rc<Cell<u64>>, label: &'static str) -> impl FnMut(&Axis2) + 'static {
    let received = Rc::clone(received);
    move |v: &Axis2| {
        received.set(received.get() + 1);
        tracing::info!("{label}: {v}");
    }
}

fn log_name(received: &Rc<Cell<u64>>, label: &'static str) -> impl FnMut(&str) + 'static {
    let received = Rc::clone(received);
    move |name: &str| {
        received.set(received.get() + 1);
        tracing::info!("{label}: {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Notification;

    #[test]
    fn attach_covers_every_category() {
        let channels = Channels::new();
        let mut logger = InputLogger::new();

        logger.attach(&channels, false);
        assert_eq!(logger.subscriptions(), 10);
        assert!(channels.vr_move.is_empty());

        // Second attach is a no-op.
        logger.attach(&channels, true);
        assert_eq!(logger.subscriptions(), 10);

        logger.detach(&channels);
        assert!(!logger.is_attached());
        assert!(channels.key_down.is_empty());

        logger.attach(&channels, true);
        assert_eq!(logger.subscriptions(), 13);
        assert_eq!(channels.vr_button_up.len(), 1);
    }

    #[test]
    fn counts_only_while_attached() {
        let channels = Channels::new();
        let mut logger = InputLogger::new();
        logger.attach(&channels, false);

        channels.publish(&Notification::KeyDown(KeyCode::Q));
        channels.publish(&Notification::GamepadButtonHeld("Fire2".into()));
        assert_eq!(logger.received(), 2);

        logger.detach(&channels);
        channels.publish(&Notification::KeyDown(KeyCode::Q));
        assert_eq!(logger.received(), 2);
    }
}
