//! Scriptable in-memory backends.
//!
//! [`VirtualInput`] and [`VirtualXr`] hold level state that the caller sets
//! between frames. They are what tests, demos and headless hosts plug into the
//! dispatcher in place of real hardware.
//!
//! ```
//! use inputcast::backends::virtual_input::VirtualInput;
//! use inputcast::{DispatcherConfig, InputDispatcher, KeyCode};
//!
//! let mut dispatcher = InputDispatcher::new(VirtualInput::new(), DispatcherConfig::default());
//! dispatcher.channels().key_down.subscribe(|key| println!("down: {key}"));
//!
//! dispatcher.devices_mut().press_key(KeyCode::Space);
//! dispatcher.poll_frame(); // prints "down: Space"
//! ```

use super::edges::ButtonEdges;
use crate::device::{ButtonQuery, DeviceClass, DeviceQuery, XrAxis, XrButton, XrDeviceState, XrQuery};
use crate::error::DeviceError;
use crate::event::{Axis2, KeyCode, MouseButton};
use std::collections::{HashMap, HashSet};

/// Keyboard, mouse and gamepad driven by explicit calls.
///
/// Buttons are level state: a pressed key stays down until released. Mouse
/// movement accumulates until the next frame consumes it.
#[derive(Clone, Debug, Default)]
pub struct VirtualInput {
    keys_down: HashSet<KeyCode>,
    mouse_down: HashSet<MouseButton>,
    actions_down: HashSet<String>,
    pending_delta: Axis2,
    axes: HashMap<String, f32>,
    unavailable: HashSet<DeviceClass>,

    keyboard: ButtonEdges<KeyCode>,
    mouse: ButtonEdges<MouseButton>,
    actions: ButtonEdges<String>,
    frame_delta: Axis2,
}

impl VirtualInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        self.mouse_down.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_down.remove(&button);
    }

    /// Adds to the pointer movement reported by the next frame.
    pub fn move_mouse(&mut self, delta: Axis2) {
        self.pending_delta.x += delta.x;
        self.pending_delta.y += delta.y;
    }

    pub fn press_action(&mut self, action: &str) {
        self.actions_down.insert(action.to_string());
    }

    pub fn release_action(&mut self, action: &str) {
        self.actions_down.remove(action);
    }

    /// Sets a named gamepad axis; it keeps its value until set again.
    pub fn set_axis(&mut self, name: &str, value: f32) {
        self.axes.insert(name.to_string(), value);
    }

    /// Makes every read of `class` fail with [`DeviceError::Unavailable`].
    pub fn set_unavailable(&mut self, class: DeviceClass, unavailable: bool) {
        if unavailable {
            self.unavailable.insert(class);
        } else {
            self.unavailable.remove(&class);
        }
    }

    fn check(&self, class: DeviceClass) -> Result<(), DeviceError> {
        if self.unavailable.contains(&class) {
            Err(DeviceError::unavailable(class))
        } else {
            Ok(())
        }
    }
}

impl DeviceQuery for VirtualInput {
    fn begin_frame(&mut self) {
        self.keyboard.latch(self.keys_down.iter().copied());
        self.mouse.latch(self.mouse_down.iter().copied());
        self.actions.latch(self.actions_down.iter().cloned());
        self.frame_delta = std::mem::take(&mut self.pending_delta);
    }

    fn keyboard(&self) -> Result<&dyn ButtonQuery<KeyCode>, DeviceError> {
        self.check(DeviceClass::Keyboard)?;
        Ok(&self.keyboard)
    }

    fn mouse_buttons(&self) -> Result<&dyn ButtonQuery<MouseButton>, DeviceError> {
        self.check(DeviceClass::Mouse)?;
        Ok(&self.mouse)
    }

    fn mouse_delta(&self) -> Result<Axis2, DeviceError> {
        self.check(DeviceClass::Mouse)?;
        Ok(self.frame_delta)
    }

    fn gamepad_buttons(&self) -> Result<&dyn ButtonQuery<str>, DeviceError> {
        self.check(DeviceClass::Gamepad)?;
        Ok(&self.actions)
    }

    fn gamepad_axis(&self, name: &str) -> Result<f32, DeviceError> {
        self.check(DeviceClass::Gamepad)?;
        Ok(self.axes.get(name).copied().unwrap_or(0.0))
    }
}

/// XR runtime driven by explicit calls.
#[derive(Clone, Debug)]
pub struct VirtualXr {
    available: bool,
    failing: bool,
    devices: Vec<XrDeviceState>,
}

impl Default for VirtualXr {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VirtualXr {
    /// `available` is what the capability probe will answer.
    pub fn new(available: bool) -> Self {
        Self {
            available,
            failing: false,
            devices: Vec::new(),
        }
    }

    /// Connects a device with no readable features.
    pub fn connect(&mut self, name: &str) {
        if self.device(name).is_none() {
            self.devices.push(XrDeviceState::new(name));
        }
    }

    pub fn disconnect(&mut self, name: &str) {
        self.devices.retain(|d| d.name != name);
    }

    /// Sets a button feature, connecting the device if needed.
    pub fn set_button(&mut self, device: &str, feature: XrButton, value: bool) {
        self.device_entry(device).buttons.insert(feature, value);
    }

    /// Sets an axis feature, connecting the device if needed.
    pub fn set_axis(&mut self, device: &str, feature: XrAxis, value: Axis2) {
        self.device_entry(device).axes.insert(feature, value);
    }

    /// Makes device enumeration fail, as when the runtime goes away mid-session.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    fn device(&self, name: &str) -> Option<&XrDeviceState> {
        self.devices.iter().find(|d| d.name == name)
    }

    fn device_entry(&mut self, name: &str) -> &mut XrDeviceState {
        let idx = match self.devices.iter().position(|d| d.name == name) {
            Some(idx) => idx,
            None => {
                self.devices.push(XrDeviceState::new(name));
                self.devices.len() - 1
            }
        };
        &mut self.devices[idx]
    }
}

impl XrQuery for VirtualXr {
    fn is_available(&self) -> bool {
        self.available
    }

    fn connected_devices(&mut self) -> Result<Vec<XrDeviceState>, DeviceError> {
        if self.failing {
            return Err(DeviceError::backend(DeviceClass::Xr, "runtime lost"));
        }
        Ok(self.devices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_delta_is_consumed_per_frame() {
        let mut input = VirtualInput::new();
        input.move_mouse(Axis2::new(1.0, 0.0));
        input.move_mouse(Axis2::new(2.0, -1.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Ok(Axis2::new(3.0, -1.0)));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Ok(Axis2::ZERO));
    }

    #[test]
    fn axes_persist_until_changed() {
        let mut input = VirtualInput::new();
        input.set_axis("Horizontal", 0.5);
        input.begin_frame();
        input.begin_frame();
        assert_eq!(input.gamepad_axis("Horizontal"), Ok(0.5));
        assert_eq!(input.gamepad_axis("Vertical"), Ok(0.0));
    }

    #[test]
    fn unavailable_class_fails_reads() {
        let mut input = VirtualInput::new();
        input.set_unavailable(DeviceClass::Gamepad, true);
        input.begin_frame();
        assert!(input.gamepad_buttons().is_err());
        assert_eq!(
            input.gamepad_axis("Horizontal"),
            Err(DeviceError::unavailable(DeviceClass::Gamepad))
        );
        assert!(input.keyboard().is_ok());

        input.set_unavailable(DeviceClass::Gamepad, false);
        assert!(input.gamepad_buttons().is_ok());
    }

    #[test]
    fn key_edges_follow_level_changes() {
        let mut input = VirtualInput::new();
        input.press_key(KeyCode::W);
        input.begin_frame();
        assert!(input.keyboard().unwrap().pressed(&KeyCode::W));

        input.release_key(KeyCode::W);
        input.begin_frame();
        let kb = input.keyboard().unwrap();
        assert!(kb.released(&KeyCode::W));
        assert!(!kb.held(&KeyCode::W));
    }

    #[test]
    fn xr_devices_are_created_on_demand() {
        let mut xr = VirtualXr::default();
        xr.set_button("Left Hand", XrButton::Trigger, true);
        xr.connect("Left Hand");
        xr.connect("Right Hand");
        let devices = xr.connected_devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].button(XrButton::Trigger), Some(true));

        xr.disconnect("Left Hand");
        xr.set_failing(true);
        assert!(xr.connected_devices().is_err());
        xr.set_failing(false);
        assert_eq!(xr.connected_devices().unwrap().len(), 1);
    }
}
