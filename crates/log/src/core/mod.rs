//! Core types shared by every part of the router.
//!
//! ## Core Components
//!
//! ### [`error`] - Error handling
//! Fatal errors ([`LogError`]) and non-fatal conditions ([`RoutingWarning`]).
//!
//! ### [`result`] - Result types
//! The [`LogResult`] alias and an extension trait that tags IO failures with
//! the destination or directory they came from.

pub mod error;
pub mod result;

pub use error::{LogError, LogResult, RoutingWarning};
pub use result::IoResultExt;
