#![cfg(target_os = "windows")]

//! Windows native backend.
//!
//! [`NativeInput`] implements [`DeviceQuery`] on top of plain Win32 calls:
//! - **Keyboard / mouse buttons** via `GetAsyncKeyState`, sampled once per frame
//! - **Pointer delta** via `GetCursorPos` (screen pixels, Y up positive)
//! - **Gamepad** via `XInputGetState` on a single slot
//!
//! Everything is sampled in [`DeviceQuery::begin_frame`]; reads afterwards
//! only look at the latched state. Press/release edges are derived by
//! comparing with the previous frame (see [`ButtonEdges`](super::edges::ButtonEdges)).
//!
//! `GetAsyncKeyState` reads the global key state. Hosts that only want input
//! while their window has focus must gate polling themselves.

pub mod keyboard_mouse;
pub mod xinput_gamepad;

use crate::device::{ButtonQuery, DeviceQuery};
use crate::error::DeviceError;
use crate::event::{Axis2, KeyCode, MouseButton};
use keyboard_mouse::KeyboardMouse;
use xinput_gamepad::XInputGamepad;

/// Keyboard, mouse and XInput pad of the local machine.
pub struct NativeInput {
    keyboard_mouse: KeyboardMouse,
    gamepad: XInputGamepad,
}

impl NativeInput {
    /// Polls the pad in XInput slot 0.
    pub fn new() -> Self {
        Self::with_gamepad_slot(0)
    }

    /// Polls the pad in the given XInput slot (`0..4`).
    pub fn with_gamepad_slot(slot: u32) -> Self {
        Self {
            keyboard_mouse: KeyboardMouse::new(),
            gamepad: XInputGamepad::new(slot),
        }
    }
}

impl Default for NativeInput {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceQuery for NativeInput {
    fn begin_frame(&mut self) {
        self.keyboard_mouse.sample();
        self.gamepad.sample();
    }

    fn keyboard(&self) -> Result<&dyn ButtonQuery<KeyCode>, DeviceError> {
        Ok(self.keyboard_mouse.keys())
    }

    fn mouse_buttons(&self) -> Result<&dyn ButtonQuery<MouseButton>, DeviceError> {
        Ok(self.keyboard_mouse.buttons())
    }

    fn mouse_delta(&self) -> Result<Axis2, DeviceError> {
        self.keyboard_mouse.delta()
    }

    fn gamepad_buttons(&self) -> Result<&dyn ButtonQuery<str>, DeviceError> {
        self.gamepad.actions()
    }

    fn gamepad_axis(&self, name: &str) -> Result<f32, DeviceError> {
        self.gamepad.axis(name)
    }
}
