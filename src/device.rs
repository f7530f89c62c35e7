//! Device Query Interface.
//!
//! The dispatcher never talks to hardware. It reads everything through
//! [`DeviceQuery`] (keyboard, mouse, gamepad) and [`XrQuery`] (optional XR
//! controllers), which the host injects.
//!
//! Edge semantics live in the implementation: "pressed" means pressed during
//! the frame latched by the last [`DeviceQuery::begin_frame`] call. The
//! dispatcher keeps no history of its own.

use crate::error::DeviceError;
use crate::event::{Axis2, KeyCode, MouseButton};
use std::collections::HashMap;

/// Device class polled as a unit. A read failure skips the whole class for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
    Gamepad,
    Xr,
}

/// Per-frame button state keyed by identifier.
pub trait ButtonQuery<K: ?Sized> {
    /// Went down this frame.
    fn pressed(&self, id: &K) -> bool;
    /// Went up this frame.
    fn released(&self, id: &K) -> bool;
    /// Is down this frame (including the frame it was pressed).
    fn held(&self, id: &K) -> bool;
}

/// Keyboard, mouse and gamepad state for the current frame.
pub trait DeviceQuery {
    /// Latch the state for a new frame. Called once at the start of every poll.
    fn begin_frame(&mut self);

    fn keyboard(&self) -> Result<&dyn ButtonQuery<KeyCode>, DeviceError>;

    fn mouse_buttons(&self) -> Result<&dyn ButtonQuery<MouseButton>, DeviceError>;

    /// Pointer movement since the previous frame.
    fn mouse_delta(&self) -> Result<Axis2, DeviceError>;

    /// Named gamepad actions (see [`GAMEPAD_ACTIONS`](crate::event::GAMEPAD_ACTIONS)).
    fn gamepad_buttons(&self) -> Result<&dyn ButtonQuery<str>, DeviceError>;

    /// Named continuous gamepad axis.
    fn gamepad_axis(&self, name: &str) -> Result<f32, DeviceError>;
}

impl<T: DeviceQuery + ?Sized> DeviceQuery for Box<T> {
    fn begin_frame(&mut self) {
        (**self).begin_frame()
    }

    fn keyboard(&self) -> Result<&dyn ButtonQuery<KeyCode>, DeviceError> {
        (**self).keyboard()
    }

    fn mouse_buttons(&self) -> Result<&dyn ButtonQuery<MouseButton>, DeviceError> {
        (**self).mouse_buttons()
    }

    fn mouse_delta(&self) -> Result<Axis2, DeviceError> {
        (**self).mouse_delta()
    }

    fn gamepad_buttons(&self) -> Result<&dyn ButtonQuery<str>, DeviceError> {
        (**self).gamepad_buttons()
    }

    fn gamepad_axis(&self, name: &str) -> Result<f32, DeviceError> {
        (**self).gamepad_axis(name)
    }
}

/// Boolean XR controller feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XrButton {
    Primary,
    Secondary,
    Trigger,
    Grip,
}

impl XrButton {
    /// Polling order.
    pub const ALL: [XrButton; 4] = [
        XrButton::Primary,
        XrButton::Secondary,
        XrButton::Trigger,
        XrButton::Grip,
    ];

    /// Feature name used in notification payloads.
    pub fn feature_name(self) -> &'static str {
        match self {
            XrButton::Primary => "primaryButton",
            XrButton::Secondary => "secondaryButton",
            XrButton::Trigger => "triggerButton",
            XrButton::Grip => "gripButton",
        }
    }
}

/// Two-dimensional XR controller feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XrAxis {
    Primary2D,
}

impl XrAxis {
    pub fn feature_name(self) -> &'static str {
        match self {
            XrAxis::Primary2D => "primary2DAxis",
        }
    }
}

/// Snapshot of one connected XR device for the current frame.
///
/// A feature missing from the maps could not be read and is skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XrDeviceState {
    pub name: String,
    pub buttons: HashMap<XrButton, bool>,
    pub axes: HashMap<XrAxis, Axis2>,
}

impl XrDeviceState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn button(&self, feature: XrButton) -> Option<bool> {
        self.buttons.get(&feature).copied()
    }

    #[inline]
    pub fn axis(&self, feature: XrAxis) -> Option<Axis2> {
        self.axes.get(&feature).copied()
    }
}

/// Optional XR extension of the Device Query Interface.
pub trait XrQuery {
    /// Capability probe. Asked once, when the dispatcher is built.
    fn is_available(&self) -> bool;

    fn connected_devices(&mut self) -> Result<Vec<XrDeviceState>, DeviceError>;
}

impl<T: XrQuery + ?Sized> XrQuery for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn connected_devices(&mut self) -> Result<Vec<XrDeviceState>, DeviceError> {
        (**self).connected_devices()
    }
}

/// XR stand-in for hosts without an XR runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullXr;

impl XrQuery for NullXr {
    fn is_available(&self) -> bool {
        false
    }

    fn connected_devices(&mut self) -> Result<Vec<XrDeviceState>, DeviceError> {
        Err(DeviceError::unavailable(DeviceClass::Xr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xr_feature_names() {
        let names: Vec<_> = XrButton::ALL.iter().map(|b| b.feature_name()).collect();
        assert_eq!(
            names,
            ["primaryButton", "secondaryButton", "triggerButton", "gripButton"]
        );
        assert_eq!(XrAxis::Primary2D.feature_name(), "primary2DAxis");
    }

    #[test]
    fn missing_features_read_as_none() {
        let mut state = XrDeviceState::new("Left Hand");
        state.buttons.insert(XrButton::Grip, true);
        assert_eq!(state.button(XrButton::Grip), Some(true));
        assert_eq!(state.button(XrButton::Trigger), None);
        assert_eq!(state.axis(XrAxis::Primary2D), None);
    }

    #[test]
    fn null_xr_is_never_available() {
        let mut xr = NullXr;
        assert!(!xr.is_available());
        assert_eq!(
            xr.connected_devices(),
            Err(DeviceError::unavailable(DeviceClass::Xr))
        );
    }
}
