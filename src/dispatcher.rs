//! Per-frame input dispatch.
//!
//! [`InputDispatcher`] is polled once per host tick. Each [`poll_frame`]
//! walks the device classes in a fixed order and publishes what the
//! Device Query Interface reports:
//!
//! 1. keyboard: every [`KeyCode::ALL`] key, down / up / held
//! 2. mouse: left, right, middle down / up, then pointer movement
//! 3. gamepad: the four [`GAMEPAD_ACTIONS`] down / up / held, then the stick
//! 4. XR (only when enabled): per connected device, button presses then `primary2DAxis`
//!
//! A device class that fails to read is skipped for that frame. Nothing in a
//! poll returns an error or unwinds into the host.
//!
//! XR buttons only ever produce [`Notification::VrButtonDown`], once per frame
//! while the feature reads `true`. The `vr_button_up` channel exists for
//! symmetry but is never fed.
//!
//! [`poll_frame`]: InputDispatcher::poll_frame

use crate::config::{DispatcherConfig, XrSupport};
use crate::device::{DeviceQuery, NullXr, XrAxis, XrButton, XrDeviceState, XrQuery};
use crate::error::DeviceError;
use crate::event::{
    Axis2, KeyCode, MouseButton, Notification, GAMEPAD_ACTIONS, HORIZONTAL_AXIS, VERTICAL_AXIS,
};
use crate::eventbus::{Channels, ListenerHandle};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Polls injected device backends and fans out notifications.
pub struct InputDispatcher<Q: DeviceQuery, X: XrQuery = NullXr> {
    devices: Q,
    xr: X,
    xr_enabled: bool,
    config: DispatcherConfig,
    channels: Channels,
    frames: u64,
}

impl<Q: DeviceQuery> InputDispatcher<Q, NullXr> {
    /// Dispatcher without XR support.
    pub fn new(devices: Q, config: DispatcherConfig) -> Self {
        Self::with_xr(devices, NullXr, config)
    }
}

impl<Q: DeviceQuery, X: XrQuery> InputDispatcher<Q, X> {
    /// Dispatcher with an XR backend.
    ///
    /// XR is enabled when `config.xr` is [`XrSupport::Auto`] and the backend
    /// reports itself available. The answer is fixed for the dispatcher's lifetime.
    pub fn with_xr(devices: Q, xr: X, config: DispatcherConfig) -> Self {
        let xr_enabled = match config.xr {
            XrSupport::Auto => xr.is_available(),
            XrSupport::Off => false,
        };
        tracing::debug!(xr_enabled, verbose = config.verbose, "input dispatcher active");
        Self {
            devices,
            xr,
            xr_enabled,
            config,
            channels: Channels::new(),
            frames: 0,
        }
    }

    /// Whether XR devices are polled.
    #[inline]
    pub fn xr_enabled(&self) -> bool {
        self.xr_enabled
    }

    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Turns the per-notification diagnostic line on or off.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Registration surface. Clone it to hand to listeners.
    #[inline]
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Removes a subscription made on any of this dispatcher's channels.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        self.channels.unsubscribe(handle)
    }

    /// Number of completed [`poll_frame`](Self::poll_frame) calls.
    #[inline]
    pub fn frames_polled(&self) -> u64 {
        self.frames
    }

    pub fn devices(&self) -> &Q {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut Q {
        &mut self.devices
    }

    pub fn xr(&self) -> &X {
        &self.xr
    }

    pub fn xr_mut(&mut self) -> &mut X {
        &mut self.xr
    }

    /// Polls every device class once and publishes the results.
    pub fn poll_frame(&mut self) {
        self.devices.begin_frame();

        self.poll_keyboard();
        self.poll_mouse();
        self.poll_gamepad();
        if self.xr_enabled {
            self.poll_xr();
        }

        self.frames += 1;
    }

    fn poll_keyboard(&self) {
        let keys = match self.devices.keyboard() {
            Ok(keys) => keys,
            Err(e) => return self.skip(e),
        };
        for key in KeyCode::ALL {
            if keys.pressed(key) {
                self.emit(Notification::KeyDown(*key));
            }
            if keys.released(key) {
                self.emit(Notification::KeyUp(*key));
            }
            if keys.held(key) {
                self.emit(Notification::KeyHeld(*key));
            }
        }
    }

    fn poll_mouse(&self) {
        let buttons = match self.devices.mouse_buttons() {
            Ok(buttons) => buttons,
            Err(e) => return self.skip(e),
        };
        for button in MouseButton::ALL {
            if buttons.pressed(&button) {
                self.emit(Notification::MouseButtonDown(button));
            }
            if buttons.released(&button) {
                self.emit(Notification::MouseButtonUp(button));
            }
        }

        match self.devices.mouse_delta() {
            Ok(delta) if !delta.is_zero() => self.emit(Notification::MouseMove(delta)),
            Ok(_) => {}
            Err(e) => self.skip(e),
        }
    }

    fn poll_gamepad(&self) {
        let actions = match self.devices.gamepad_buttons() {
            Ok(actions) => actions,
            Err(e) => return self.skip(e),
        };
        for action in GAMEPAD_ACTIONS {
            if actions.pressed(action) {
                self.emit(Notification::GamepadButtonDown(action.to_string()));
            }
            if actions.released(action) {
                self.emit(Notification::GamepadButtonUp(action.to_string()));
            }
            if actions.held(action) {
                self.emit(Notification::GamepadButtonHeld(action.to_string()));
            }
        }

        let stick = self
            .devices
            .gamepad_axis(HORIZONTAL_AXIS)
            .and_then(|x| Ok(Axis2::new(x, self.devices.gamepad_axis(VERTICAL_AXIS)?)));
        match stick {
            Ok(stick) if !stick.is_zero() => self.emit(Notification::GamepadMove(stick)),
            Ok(_) => {}
            Err(e) => self.skip(e),
        }
    }

    fn poll_xr(&mut self) {
        let devices = match self.xr.connected_devices() {
            Ok(devices) => devices,
            Err(e) => return self.skip(e),
        };
        for device in &devices {
            self.poll_xr_device(device);
        }
    }

    fn poll_xr_device(&self, device: &XrDeviceState) {
        for feature in XrButton::ALL {
            if device.button(feature) == Some(true) {
                let feature = feature.feature_name();
                self.emit_described(
                    &Notification::VrButtonDown(format!("{} {feature}", device.name)),
                    format_args!("VR {feature} pressed down on {}", device.name),
                );
            }
        }
        let feature = XrAxis::Primary2D;
        if let Some(axis) = device.axis(feature) {
            if !axis.is_zero() {
                self.emit_described(
                    &Notification::VrMove(axis),
                    format_args!(
                        "VR {} moved on {}: {axis}",
                        feature.feature_name(),
                        device.name
                    ),
                );
            }
        }
    }

    fn skip(&self, error: DeviceError) {
        tracing::debug!(class = ?error.class(), %error, "device class skipped this frame");
    }

    fn emit(&self, notification: Notification) {
        self.emit_described(&notification, format_args!("{notification}"));
    }

    /// Writes `line` as the diagnostic line when verbose, then publishes.
    fn emit_described(&self, notification: &Notification, line: fmt::Arguments<'_>) {
        if self.config.verbose {
            // Diagnostic faults are discarded.
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                tracing::info!(target: "inputcast::diag", "{}", line);
            }));
        }
        self.channels.publish(notification);
    }
}

/// Host-side holder for the single live dispatcher.
///
/// The first installed dispatcher becomes active; later ones are dropped.
pub struct DispatcherSlot<Q: DeviceQuery, X: XrQuery = NullXr> {
    active: Option<InputDispatcher<Q, X>>,
}

impl<Q: DeviceQuery, X: XrQuery> Default for DispatcherSlot<Q, X> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<Q: DeviceQuery, X: XrQuery> DispatcherSlot<Q, X> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `dispatcher` if the slot is empty. Returns `false` and drops
    /// `dispatcher` when one is already active.
    pub fn install(&mut self, dispatcher: InputDispatcher<Q, X>) -> bool {
        if self.active.is_some() {
            tracing::debug!("input dispatcher already active; discarding duplicate");
            return false;
        }
        self.active = Some(dispatcher);
        true
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn get(&self) -> Option<&InputDispatcher<Q, X>> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut InputDispatcher<Q, X>> {
        self.active.as_mut()
    }

    /// Polls the active dispatcher, if any.
    pub fn poll_frame(&mut self) {
        if let Some(dispatcher) = self.active.as_mut() {
            dispatcher.poll_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{VirtualInput, VirtualXr};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Collects the message of every `inputcast::diag` event, or panics on one.
    #[derive(Clone, Default)]
    struct DiagSink {
        lines: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl<S: Subscriber> Layer<S> for DiagSink {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() != "inputcast::diag" {
                return;
            }
            if self.fail {
                panic!("diagnostic sink failed");
            }
            let mut message = Message::default();
            event.record(&mut message);
            self.lines.lock().unwrap().push(message.0);
        }
    }

    #[derive(Default)]
    struct Message(String);

    impl Visit for Message {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    /// Runs `f` with `sink` as the thread's subscriber and returns the captured lines.
    fn capture_diag(sink: DiagSink, f: impl FnOnce()) -> Vec<String> {
        let subscriber = tracing_subscriber::registry().with(sink.clone());
        tracing::subscriber::with_default(subscriber, f);
        let lines = sink.lines.lock().unwrap().clone();
        lines
    }

    fn record(d: &InputDispatcher<VirtualInput, VirtualXr>) -> Rc<RefCell<Vec<Notification>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        d.channels().any.subscribe(move |n: &Notification| l.borrow_mut().push(n.clone()));
        log
    }

    #[test]
    fn xr_flag_follows_probe_and_config() {
        let on = InputDispatcher::with_xr(VirtualInput::new(), VirtualXr::new(true), DispatcherConfig::default());
        assert!(on.xr_enabled());

        let absent = InputDispatcher::with_xr(VirtualInput::new(), VirtualXr::new(false), DispatcherConfig::default());
        assert!(!absent.xr_enabled());

        let off = InputDispatcher::with_xr(
            VirtualInput::new(),
            VirtualXr::new(true),
            DispatcherConfig::default().with_xr(XrSupport::Off),
        );
        assert!(!off.xr_enabled());

        assert!(!InputDispatcher::new(VirtualInput::new(), DispatcherConfig::default()).xr_enabled());
    }

    #[test]
    fn keyboard_order_is_stable() {
        let mut d = InputDispatcher::with_xr(VirtualInput::new(), VirtualXr::new(false), DispatcherConfig::default());
        let log = record(&d);
        d.devices_mut().press_key(KeyCode::Space);
        d.devices_mut().press_key(KeyCode::A);
        d.poll_frame();
        assert_eq!(
            *log.borrow(),
            [
                Notification::KeyDown(KeyCode::Space),
                Notification::KeyHeld(KeyCode::Space),
                Notification::KeyDown(KeyCode::A),
                Notification::KeyHeld(KeyCode::A),
            ]
        );
    }

    #[test]
    fn unavailable_class_does_not_stop_others() {
        let mut d = InputDispatcher::with_xr(VirtualInput::new(), VirtualXr::new(false), DispatcherConfig::default());
        let log = record(&d);
        d.devices_mut().set_unavailable(crate::DeviceClass::Keyboard, true);
        d.devices_mut().press_key(KeyCode::A);
        d.devices_mut().press_mouse(MouseButton::Left);
        d.poll_frame();
        assert_eq!(*log.borrow(), [Notification::MouseButtonDown(MouseButton::Left)]);
        assert_eq!(d.frames_polled(), 1);
    }

    #[test]
    fn xr_runtime_failure_is_silent() {
        let mut d = InputDispatcher::with_xr(VirtualInput::new(), VirtualXr::new(true), DispatcherConfig::default());
        let log = record(&d);
        d.xr_mut().set_button("Right Hand", XrButton::Trigger, true);
        d.xr_mut().set_failing(true);
        d.poll_frame();
        assert!(log.borrow().is_empty());

        d.xr_mut().set_failing(false);
        d.poll_frame();
        assert_eq!(
            *log.borrow(),
            [Notification::VrButtonDown("Right Hand triggerButton".into())]
        );
    }

    #[test]
    fn verbose_mode_still_delivers() {
        let mut d = InputDispatcher::with_xr(
            VirtualInput::new(),
            VirtualXr::new(false),
            DispatcherConfig::default().with_verbose(true),
        );
        let log = record(&d);
        d.devices_mut().move_mouse(Axis2::new(3.0, 0.0));
        d.poll_frame();
        assert_eq!(*log.borrow(), [Notification::MouseMove(Axis2::new(3.0, 0.0))]);

        d.set_verbose(false);
        assert!(!d.config().verbose);
    }

    #[test]
    fn verbose_writes_one_diag_line_per_notification() {
        let mut d = InputDispatcher::with_xr(
            VirtualInput::new(),
            VirtualXr::new(false),
            DispatcherConfig::default().with_verbose(true),
        );
        let log = record(&d);

        let lines = capture_diag(DiagSink::default(), || {
            d.devices_mut().press_key(KeyCode::Space);
            d.devices_mut().move_mouse(Axis2::new(1.0, 0.0));
            d.poll_frame();

            d.set_verbose(false);
            d.poll_frame();
        });

        assert_eq!(
            lines,
            ["Space key pressed down", "Space key held down", "Mouse moved: (1, 0)"]
        );
        // The quiet frame still delivered its held key.
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn xr_diag_lines_name_the_device() {
        let mut d = InputDispatcher::with_xr(
            VirtualInput::new(),
            VirtualXr::new(true),
            DispatcherConfig::default().with_verbose(true),
        );
        let log = record(&d);
        d.xr_mut().set_button("Left Hand", XrButton::Primary, true);
        d.xr_mut().set_axis("Left Hand", XrAxis::Primary2D, Axis2::new(0.0, 1.0));

        let lines = capture_diag(DiagSink::default(), || d.poll_frame());

        assert_eq!(
            lines,
            [
                "VR primaryButton pressed down on Left Hand",
                "VR primary2DAxis moved on Left Hand: (0, 1)",
            ]
        );
        assert_eq!(
            *log.borrow(),
            [
                Notification::VrButtonDown("Left Hand primaryButton".into()),
                Notification::VrMove(Axis2::new(0.0, 1.0)),
            ]
        );
    }

    #[test]
    fn failing_diag_sink_does_not_stop_delivery() {
        let mut d = InputDispatcher::with_xr(
            VirtualInput::new(),
            VirtualXr::new(false),
            DispatcherConfig::default().with_verbose(true),
        );
        let log = record(&d);
        let sink = DiagSink {
            fail: true,
            ..DiagSink::default()
        };

        let lines = capture_diag(sink, || {
            d.devices_mut().press_mouse(MouseButton::Right);
            d.poll_frame();
        });

        assert!(lines.is_empty());
        assert_eq!(*log.borrow(), [Notification::MouseButtonDown(MouseButton::Right)]);
        assert_eq!(d.frames_polled(), 1);
    }

    #[test]
    fn slot_keeps_first_dispatcher() {
        let mut slot: DispatcherSlot<VirtualInput> = DispatcherSlot::new();
        assert!(!slot.is_active());
        slot.poll_frame();

        let first = InputDispatcher::new(VirtualInput::new(), DispatcherConfig::default());
        let second = InputDispatcher::new(VirtualInput::new(), DispatcherConfig::default().with_verbose(true));
        assert!(slot.install(first));
        assert!(!slot.install(second));
        assert!(slot.is_active());
        assert!(!slot.get().map(|d| d.config().verbose).unwrap_or(true));

        slot.poll_frame();
        assert_eq!(slot.get_mut().map(|d| d.frames_polled()), Some(1));
    }
}
