#![cfg(target_os = "windows")]

//! Keyboard and mouse sampling through `GetAsyncKeyState` / `GetCursorPos`.
//!
//! ## Conventions
//! - A key counts as down when the high bit of `GetAsyncKeyState` is set.
//! - Pointer deltas are **raw screen pixels**, with Y flipped so that moving
//!   up is positive. The first sampled frame always reports `(0, 0)`.

use crate::backends::edges::ButtonEdges;
use crate::device::DeviceClass;
use crate::error::DeviceError;
use crate::event::{Axis2, KeyCode, MouseButton};

use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::*;
use windows_sys::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// Win32 virtual-key code for a [`KeyCode`].
pub(crate) fn virtual_key(key: KeyCode) -> u16 {
    use KeyCode::*;
    match key {
        Backspace => VK_BACK,
        Tab => VK_TAB,
        Return => VK_RETURN,
        Escape => VK_ESCAPE,
        Space => VK_SPACE,
        Alpha0 => b'0' as u16,
        Alpha1 => b'1' as u16,
        Alpha2 => b'2' as u16,
        Alpha3 => b'3' as u16,
        Alpha4 => b'4' as u16,
        Alpha5 => b'5' as u16,
        Alpha6 => b'6' as u16,
        Alpha7 => b'7' as u16,
        Alpha8 => b'8' as u16,
        Alpha9 => b'9' as u16,
        A => b'A' as u16,
        B => b'B' as u16,
        C => b'C' as u16,
        D => b'D' as u16,
        E => b'E' as u16,
        F => b'F' as u16,
        G => b'G' as u16,
        H => b'H' as u16,
        I => b'I' as u16,
        J => b'J' as u16,
        K => b'K' as u16,
        L => b'L' as u16,
        M => b'M' as u16,
        N => b'N' as u16,
        O => b'O' as u16,
        P => b'P' as u16,
        Q => b'Q' as u16,
        R => b'R' as u16,
        S => b'S' as u16,
        T => b'T' as u16,
        U => b'U' as u16,
        V => b'V' as u16,
        W => b'W' as u16,
        X => b'X' as u16,
        Y => b'Y' as u16,
        Z => b'Z' as u16,
        Delete => VK_DELETE,
        UpArrow => VK_UP,
        DownArrow => VK_DOWN,
        RightArrow => VK_RIGHT,
        LeftArrow => VK_LEFT,
        Insert => VK_INSERT,
        Home => VK_HOME,
        End => VK_END,
        PageUp => VK_PRIOR,
        PageDown => VK_NEXT,
        F1 => VK_F1,
        F2 => VK_F2,
        F3 => VK_F3,
        F4 => VK_F4,
        F5 => VK_F5,
        F6 => VK_F6,
        F7 => VK_F7,
        F8 => VK_F8,
        F9 => VK_F9,
        F10 => VK_F10,
        F11 => VK_F11,
        F12 => VK_F12,
        RightShift => VK_RSHIFT,
        LeftShift => VK_LSHIFT,
        RightControl => VK_RCONTROL,
        LeftControl => VK_LCONTROL,
        RightAlt => VK_RMENU,
        LeftAlt => VK_LMENU,
    }
}

fn mouse_virtual_key(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => VK_LBUTTON,
        MouseButton::Right => VK_RBUTTON,
        MouseButton::Middle => VK_MBUTTON,
    }
}

#[inline]
fn is_down(vk: u16) -> bool {
    // High bit set = currently down.
    let state = unsafe { GetAsyncKeyState(vk as i32) };
    (state as u16) & 0x8000 != 0
}

pub(crate) struct KeyboardMouse {
    keys: ButtonEdges<KeyCode>,
    buttons: ButtonEdges<MouseButton>,
    last_cursor: Option<POINT>,
    delta: Result<Axis2, DeviceError>,
}

impl KeyboardMouse {
    pub(crate) fn new() -> Self {
        Self {
            keys: ButtonEdges::default(),
            buttons: ButtonEdges::default(),
            last_cursor: None,
            delta: Ok(Axis2::ZERO),
        }
    }

    pub(crate) fn sample(&mut self) {
        self.keys.latch(
            KeyCode::ALL
                .iter()
                .copied()
                .filter(|&k| is_down(virtual_key(k))),
        );
        self.buttons.latch(
            MouseButton::ALL
                .into_iter()
                .filter(|&b| is_down(mouse_virtual_key(b))),
        );

        let mut pt = POINT { x: 0, y: 0 };
        // NOTE: GetCursorPos returns 0 on failure (e.g. secure desktop active).
        if unsafe { GetCursorPos(&mut pt) } == 0 {
            self.last_cursor = None;
            self.delta = Err(DeviceError::backend(DeviceClass::Mouse, "GetCursorPos failed"));
            return;
        }
        self.delta = Ok(match self.last_cursor {
            Some(prev) => Axis2::new((pt.x - prev.x) as f32, (prev.y - pt.y) as f32),
            None => Axis2::ZERO,
        });
        self.last_cursor = Some(pt);
    }

    pub(crate) fn keys(&self) -> &ButtonEdges<KeyCode> {
        &self.keys
    }

    pub(crate) fn buttons(&self) -> &ButtonEdges<MouseButton> {
        &self.buttons
    }

    pub(crate) fn delta(&self) -> Result<Axis2, DeviceError> {
        self.delta.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn virtual_keys_are_unique() {
        let codes: HashSet<u16> = KeyCode::ALL.iter().map(|&k| virtual_key(k)).collect();
        assert_eq!(codes.len(), KeyCode::ALL.len());
    }

    #[test]
    fn letters_and_digits_use_ascii() {
        assert_eq!(virtual_key(KeyCode::A), 0x41);
        assert_eq!(virtual_key(KeyCode::Alpha0), 0x30);
    }
}
