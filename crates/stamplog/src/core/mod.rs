//! Core types shared by every part of the logger.
//!
//! ### [`error`] - Error handling
//! The [`LogError`] enum and the [`LogResult`] alias returned by settings,
//! builder and install operations.
//!
//! ### [`result`] - Result extensions
//! Context helpers for turning `io::Error`s into [`LogError`]s.

pub mod error;
pub mod result;

pub use error::{LogError, LogResult};
pub use result::LogIoResultExt;
