//! Input identifiers and notifications.
//!
//! inputcast republishes what the device layer reports as small typed
//! [`Notification`]s, one per edge or movement per frame.
//!
//! ## Value conventions
//! - **Keys / mouse buttons / gamepad actions:** press, release and held are
//!   reported exactly as the backend answers them. No debouncing happens here.
//! - **Axes:** [`Axis2`] components are roughly `[-1.0, 1.0]` for sticks.
//!   Mouse deltas keep whatever units the backend reports (pixels for the
//!   Windows backend).
//! - **Zero movement:** an axis reading of exactly `(0, 0)` never produces a
//!   move notification.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! key_codes {
    ($($key:ident => $name:literal),+ $(,)?) => {
        /// A physical keyboard key.
        ///
        /// [`KeyCode::ALL`] lists every key in declaration order. The dispatcher
        /// walks the keyboard in that order each frame, so listeners see
        /// simultaneous presses in a stable order for a given build.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum KeyCode {
            $($key),+
        }

        impl KeyCode {
            /// Every key, in polling order.
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$key),+];

            /// Display token used in diagnostics (`"Space"`, `"A"`, `"LeftShift"`).
            pub fn name(&self) -> &'static str {
                match self {
                    $(KeyCode::$key => $name),+
                }
            }
        }
    };
}

key_codes! {
    Backspace => "Backspace",
    Tab => "Tab",
    Return => "Return",
    Escape => "Escape",
    Space => "Space",
    Alpha0 => "Alpha0",
    Alpha1 => "Alpha1",
    Alpha2 => "Alpha2",
    Alpha3 => "Alpha3",
    Alpha4 => "Alpha4",
    Alpha5 => "Alpha5",
    Alpha6 => "Alpha6",
    Alpha7 => "Alpha7",
    Alpha8 => "Alpha8",
    Alpha9 => "Alpha9",
    A => "A",
    B => "B",
    C => "C",
    D => "D",
    E => "E",
    F => "F",
    G => "G",
    H => "H",
    I => "I",
    J => "J",
    K => "K",
    L => "L",
    M => "M",
    N => "N",
    O => "O",
    P => "P",
    Q => "Q",
    R => "R",
    S => "S",
    T => "T",
    U => "U",
    V => "V",
    W => "W",
    X => "X",
    Y => "Y",
    Z => "Z",
    Delete => "Delete",
    UpArrow => "UpArrow",
    DownArrow => "DownArrow",
    RightArrow => "RightArrow",
    LeftArrow => "LeftArrow",
    Insert => "Insert",
    Home => "Home",
    End => "End",
    PageUp => "PageUp",
    PageDown => "PageDown",
    F1 => "F1",
    F2 => "F2",
    F3 => "F3",
    F4 => "F4",
    F5 => "F5",
    F6 => "F6",
    F7 => "F7",
    F8 => "F8",
    F9 => "F9",
    F10 => "F10",
    F11 => "F11",
    F12 => "F12",
    RightShift => "RightShift",
    LeftShift => "LeftShift",
    RightControl => "RightControl",
    LeftControl => "LeftControl",
    RightAlt => "RightAlt",
    LeftAlt => "LeftAlt",
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three polled mouse buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Polling order: left, right, middle.
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    /// Conventional button index (`0` left, `1` right, `2` middle).
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }

    /// Inverse of [`MouseButton::index`].
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Two-component axis sample. Produced fresh every frame, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis2 {
    pub x: f32,
    pub y: f32,
}

impl Axis2 {
    pub const ZERO: Axis2 = Axis2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `true` only when both components are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl fmt::Display for Axis2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Gamepad actions polled every frame.
///
/// The set is fixed. Other pad buttons are never reported, even when the
/// backend exposes them.
pub const GAMEPAD_ACTIONS: [&str; 4] = ["Jump", "Fire1", "Fire2", "Fire3"];

/// Named gamepad axis read into [`Axis2::x`].
pub const HORIZONTAL_AXIS: &str = "Horizontal";

/// Named gamepad axis read into [`Axis2::y`].
pub const VERTICAL_AXIS: &str = "Vertical";

/// Notification category. Each one has its own subscriber list.
///
/// [`Category::Any`] is the catch-all listener bus; no notification reports it
/// as its own category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    KeyDown,
    KeyUp,
    KeyHeld,
    MouseButtonDown,
    MouseButtonUp,
    MouseMove,
    GamepadButtonDown,
    GamepadButtonUp,
    GamepadButtonHeld,
    GamepadMove,
    VrButtonDown,
    VrButtonUp,
    VrMove,
    Any,
}

/// A single published input change.
///
/// Serializes with serde's externally tagged layout, e.g. `{"KeyDown":"Space"}`,
/// so a session can be recorded as JSON lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    KeyHeld(KeyCode),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    MouseMove(Axis2),
    GamepadButtonDown(String),
    GamepadButtonUp(String),
    GamepadButtonHeld(String),
    GamepadMove(Axis2),
    /// Payload is `"<device name> <feature name>"`.
    VrButtonDown(String),
    /// Never emitted by the dispatcher; XR buttons only report presses.
    VrButtonUp(String),
    VrMove(Axis2),
}

impl Notification {
    pub fn category(&self) -> Category {
        match self {
            Notification::KeyDown(_) => Category::KeyDown,
            Notification::KeyUp(_) => Category::KeyUp,
            Notification::KeyHeld(_) => Category::KeyHeld,
            Notification::MouseButtonDown(_) => Category::MouseButtonDown,
            Notification::MouseButtonUp(_) => Category::MouseButtonUp,
            Notification::MouseMove(_) => Category::MouseMove,
            Notification::GamepadButtonDown(_) => Category::GamepadButtonDown,
            Notification::GamepadButtonUp(_) => Category::GamepadButtonUp,
            Notification::GamepadButtonHeld(_) => Category::GamepadButtonHeld,
            Notification::GamepadMove(_) => Category::GamepadMove,
            Notification::VrButtonDown(_) => Category::VrButtonDown,
            Notification::VrButtonUp(_) => Category::VrButtonUp,
            Notification::VrMove(_) => Category::VrMove,
        }
    }

    /// `true` for press, release and held notifications.
    pub fn is_button(&self) -> bool {
        !self.is_move()
    }

    /// `true` for mouse, gamepad and XR movement.
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            Notification::MouseMove(_) | Notification::GamepadMove(_) | Notification::VrMove(_)
        )
    }
}

/// Diagnostic line written for each notification in verbose mode.
impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::KeyDown(k) => write!(f, "{k} key pressed down"),
            Notification::KeyUp(k) => write!(f, "{k} key released"),
            Notification::KeyHeld(k) => write!(f, "{k} key held down"),
            Notification::MouseButtonDown(b) => write!(f, "Mouse button {b} pressed down"),
            Notification::MouseButtonUp(b) => write!(f, "Mouse button {b} released"),
            Notification::MouseMove(v) => write!(f, "Mouse moved: {v}"),
            Notification::GamepadButtonDown(a) => write!(f, "Gamepad button {a} pressed down"),
            Notification::GamepadButtonUp(a) => write!(f, "Gamepad button {a} released"),
            Notification::GamepadButtonHeld(a) => write!(f, "Gamepad button {a} held down"),
            Notification::GamepadMove(v) => write!(f, "Gamepad movement: {v}"),
            Notification::VrButtonDown(n) => match n.rsplit_once(' ') {
                Some((device, feature)) => write!(f, "VR {feature} pressed down on {device}"),
                None => write!(f, "VR {n} pressed down"),
            },
            Notification::VrButtonUp(n) => match n.rsplit_once(' ') {
                Some((device, feature)) => write!(f, "VR {feature} released on {device}"),
                None => write!(f, "VR {n} released"),
            },
            Notification::VrMove(v) => write!(f, "VR primary2DAxis moved: {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_is_declaration_order() {
        assert_eq!(KeyCode::ALL.first(), Some(&KeyCode::Backspace));
        assert_eq!(KeyCode::ALL.last(), Some(&KeyCode::LeftAlt));
        let mut sorted = KeyCode::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, KeyCode::ALL);
    }

    #[test]
    fn mouse_indices() {
        assert_eq!(MouseButton::Middle.index(), 2);
        assert_eq!(MouseButton::from_index(1), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_index(3), None);
    }

    #[test]
    fn zero_axis_is_exact() {
        assert!(Axis2::ZERO.is_zero());
        assert!(!Axis2::new(0.0, -0.0001).is_zero());
        assert!(Axis2::new(-0.0, 0.0).is_zero());
    }

    #[test]
    fn diagnostic_lines() {
        assert_eq!(Notification::KeyDown(KeyCode::Space).to_string(), "Space key pressed down");
        assert_eq!(
            Notification::MouseButtonUp(MouseButton::Right).to_string(),
            "Mouse button 1 released"
        );
        assert_eq!(
            Notification::GamepadMove(Axis2::new(0.5, 0.0)).to_string(),
            "Gamepad movement: (0.5, 0)"
        );
    }

    #[test]
    fn xr_lines_name_feature_then_device() {
        assert_eq!(
            Notification::VrButtonDown("Left Hand primaryButton".into()).to_string(),
            "VR primaryButton pressed down on Left Hand"
        );
        assert_eq!(
            Notification::VrButtonDown("Headset".into()).to_string(),
            "VR Headset pressed down"
        );
        assert_eq!(
            Notification::VrMove(Axis2::new(0.0, 1.0)).to_string(),
            "VR primary2DAxis moved: (0, 1)"
        );
    }

    #[test]
    fn notifications_record_as_json() {
        let session = [
            Notification::KeyDown(KeyCode::Space),
            Notification::MouseMove(Axis2::new(4.0, -1.0)),
            Notification::GamepadButtonHeld("Jump".into()),
        ];
        let lines: Vec<String> = session
            .iter()
            .map(|n| serde_json::to_string(n).unwrap())
            .collect();
        assert_eq!(
            lines,
            [
                r#"{"KeyDown":"Space"}"#,
                r#"{"MouseMove":{"x":4.0,"y":-1.0}}"#,
                r#"{"GamepadButtonHeld":"Jump"}"#,
            ]
        );

        let replayed: Vec<Notification> = lines
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replayed, session);
    }

    #[test]
    fn categories_match_variants() {
        assert_eq!(Notification::VrMove(Axis2::ZERO).category(), Category::VrMove);
        assert!(Notification::VrMove(Axis2::ZERO).is_move());
        assert!(Notification::GamepadButtonHeld("Jump".into()).is_button());
    }
}
