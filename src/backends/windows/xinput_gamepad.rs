#![cfg(target_os = "windows")]

//! XInput gamepad as the named action/axis namespace.
//!
//! # Action mapping
//! | action  | XInput button |
//! |---------|---------------|
//! | `Fire1` | A             |
//! | `Fire2` | B             |
//! | `Fire3` | X             |
//! | `Jump`  | Y             |
//!
//! # Axes
//! - `Horizontal`: left stick X, right = `+1`
//! - `Vertical`: left stick Y, up = `+1`
//!
//! Both go through a radial dead zone of [`XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE`]
//! and are rescaled so the edge of the dead zone maps to `0`. Any other axis
//! name reads as `0.0`.
//!
//! A disconnected slot reports [`DeviceError::Unavailable`] for the whole class.

use crate::backends::edges::ButtonEdges;
use crate::device::{ButtonQuery, DeviceClass};
use crate::error::DeviceError;
use crate::event::{Axis2, HORIZONTAL_AXIS, VERTICAL_AXIS};

use windows_sys::Win32::UI::Input::XboxController::*;

const ACTION_MAP: [(u16, &str); 4] = [
    (XINPUT_GAMEPAD_A, "Fire1"),
    (XINPUT_GAMEPAD_B, "Fire2"),
    (XINPUT_GAMEPAD_X, "Fire3"),
    (XINPUT_GAMEPAD_Y, "Jump"),
];

/// Normalize a signed thumbstick axis into `[-1, 1]`.
#[inline]
fn normalize_thumb(v: i16) -> f32 {
    if v >= 0 {
        (v as f32) / 32767.0
    } else {
        (v as f32) / 32768.0
    }
}

/// Zero out a stick inside `dead` (normalized radius) and rescale the rest.
fn radial_dead_zone(x: f32, y: f32, dead: f32) -> Axis2 {
    let mag = (x * x + y * y).sqrt();
    if mag <= dead {
        return Axis2::ZERO;
    }
    let scaled = ((mag - dead) / (1.0 - dead)).min(1.0);
    Axis2::new(x / mag * scaled, y / mag * scaled)
}

pub(crate) struct XInputGamepad {
    slot: u32,
    connected: bool,
    actions: ButtonEdges<&'static str>,
    stick: Axis2,
}

impl XInputGamepad {
    pub(crate) fn new(slot: u32) -> Self {
        Self {
            slot,
            connected: false,
            actions: ButtonEdges::default(),
            stick: Axis2::ZERO,
        }
    }

    pub(crate) fn sample(&mut self) {
        // FFI struct: must be manually zeroed
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };

        // NOTE: XInputGetState returns 0 on success.
        let res = unsafe { XInputGetState(self.slot, &mut state) };
        if res != 0 {
            if self.connected {
                tracing::debug!(slot = self.slot, "XInput pad disconnected");
                self.connected = false;
            }
            self.actions.reset();
            self.stick = Axis2::ZERO;
            return;
        }
        if !self.connected {
            tracing::debug!(slot = self.slot, "XInput pad connected");
            self.connected = true;
        }

        let gp = state.Gamepad;
        let buttons: u16 = gp.wButtons;
        self.actions.latch(
            ACTION_MAP
                .iter()
                .filter(|(mask, _)| buttons & mask != 0)
                .map(|&(_, action)| action),
        );

        let dead = XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE as f32 / 32767.0;
        self.stick = radial_dead_zone(
            normalize_thumb(gp.sThumbLX),
            normalize_thumb(gp.sThumbLY),
            dead,
        );
    }

    fn check(&self) -> Result<(), DeviceError> {
        if self.connected {
            Ok(())
        } else {
            Err(DeviceError::unavailable(DeviceClass::Gamepad))
        }
    }

    pub(crate) fn actions(&self) -> Result<&dyn ButtonQuery<str>, DeviceError> {
        self.check()?;
        Ok(&self.actions)
    }

    pub(crate) fn axis(&self, name: &str) -> Result<f32, DeviceError> {
        self.check()?;
        Ok(match name {
            HORIZONTAL_AXIS => self.stick.x,
            VERTICAL_AXIS => self.stick.y,
            _ => 0.0,
        })
    }
}
