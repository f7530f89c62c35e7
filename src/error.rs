//! Error types.
//!
//! Polling itself never fails: a [`DeviceError`] only tells the dispatcher to
//! skip one device class for the current frame. Configuration loading is the
//! only public operation that hands an error back to the caller.

use crate::device::DeviceClass;
use std::path::PathBuf;
use thiserror::Error;

/// Why a device class could not be read this frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The class is absent (no pad connected, no XR runtime, ...).
    #[error("{class:?} input is unavailable")]
    Unavailable { class: DeviceClass },

    /// The backend tried and failed.
    #[error("{class:?} backend error: {message}")]
    Backend { class: DeviceClass, message: String },
}

impl DeviceError {
    pub fn unavailable(class: DeviceClass) -> Self {
        Self::Unavailable { class }
    }

    pub fn backend(class: DeviceClass, message: impl Into<String>) -> Self {
        Self::Backend {
            class,
            message: message.into(),
        }
    }

    pub fn class(&self) -> DeviceClass {
        match self {
            Self::Unavailable { class } | Self::Backend { class, .. } => *class,
        }
    }
}

/// Failure to read a [`DispatcherConfig`](crate::config::DispatcherConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
