//! Execution primitives shared by runners: HTTP plumbing and the busy
//! indicator boundary.

pub mod busy;
pub mod http;
