//! inputcast: per-frame input polling with edge-triggered notifications.
//!
//! A host calls [`InputDispatcher::poll_frame`] once per tick. The dispatcher
//! reads keyboard, mouse, gamepad and (optionally) XR state through the
//! injected [`DeviceQuery`] / [`XrQuery`] backends and republishes what it
//! finds on typed [`Channels`]: down, up, held and move notifications.
//!
//! ```
//! use inputcast::backends::VirtualInput;
//! use inputcast::{DispatcherConfig, InputDispatcher};
//!
//! let mut dispatcher = InputDispatcher::new(VirtualInput::new(), DispatcherConfig::default());
//! dispatcher
//!     .channels()
//!     .gamepad_button_down
//!     .subscribe(|action: &str| println!("{action} pressed"));
//!
//! dispatcher.devices_mut().press_action("Jump");
//! dispatcher.poll_frame(); // "Jump pressed"
//! ```

pub mod backends;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod logger;

pub use config::*;
pub use device::*;
pub use dispatcher::*;
pub use error::{ConfigError, DeviceError};
pub use event::*;
pub use eventbus::*;
pub use filtered_listener::FilteredListener;
pub use logger::InputLogger;
