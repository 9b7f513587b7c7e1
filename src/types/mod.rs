//! Plain data types shared by the runner, the factory and the hooks.

pub mod http;
pub mod ui;

pub use http::{Method, PreparedRequest, ResponseBody};
pub use ui::{PopupButton, PopupConfig, PopupSpec, UiConfig};
