//! Error Handling Module
//!
//! This module provides the error type shared by every stage of a call:
//! - Core error types (`ApiError`, `ErrorCategory`)
//! - Type conversions from transport and serialization errors
//!
//! # Example
//!
//! ```rust,ignore
//! use apirunner::error::{ApiError, ErrorCategory};
//!
//! let error = ApiError::http(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert_eq!(error.status_code(), Some(404));
//! ```

mod conversions;
pub mod types;

pub use types::*;
