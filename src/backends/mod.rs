//! Device Query backends for `inputcast`.
//!
//! Implementations of [`DeviceQuery`](crate::device::DeviceQuery) and
//! [`XrQuery`](crate::device::XrQuery).
//!
//! # Feature flags
//! - **`native`** enables the Windows backend (default). On other targets it
//!   compiles to nothing and [`native_query`] returns `None`.
//!
//! The virtual backends are always available.

use crate::device::DeviceQuery;

pub mod edges;
pub mod virtual_input;

#[cfg(all(feature = "native", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "native", target_os = "windows"))))]
pub mod windows;

pub use edges::ButtonEdges;
pub use virtual_input::{VirtualInput, VirtualXr};

/// The local machine's input, when a native backend exists for this target.
pub fn native_query() -> Option<Box<dyn DeviceQuery>> {
    #[cfg(all(feature = "native", target_os = "windows"))]
    let query: Option<Box<dyn DeviceQuery>> = Some(Box::new(windows::NativeInput::new()));

    #[cfg(not(all(feature = "native", target_os = "windows")))]
    let query: Option<Box<dyn DeviceQuery>> = None;

    query
}

#[cfg(test)]
mod tests {
    #[test]
    fn native_backend_matches_target() {
        let query = super::native_query();
        assert_eq!(
            query.is_some(),
            cfg!(all(feature = "native", target_os = "windows"))
        );
    }
}
