//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - Header management
//! - HTTP interceptors
//! - Query-string encoding

pub mod headers;
pub mod interceptor;
pub mod query;

// Re-export main types
pub use headers::*;
pub use interceptor::*;
pub use query::*;
