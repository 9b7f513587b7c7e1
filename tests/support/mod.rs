//! Shared fixtures for integration tests.

#![allow(dead_code)]

use apirunner::{BaseConfig, BaseConfigBuilder, BusyIndicator};
use std::sync::{Arc, Mutex};

/// Records every show/hide call in order.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingIndicator {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl BusyIndicator for RecordingIndicator {
    fn show(&self) {
        self.events.lock().unwrap().push("show");
    }

    fn hide(&self) {
        self.events.lock().unwrap().push("hide");
    }
}

/// Builder pointed at a mock server, with a recording busy indicator.
pub fn family(server_uri: &str) -> (BaseConfigBuilder, Arc<RecordingIndicator>) {
    let indicator = Arc::new(RecordingIndicator::default());
    let builder = BaseConfig::builder()
        .base_url(format!("{server_uri}/api"))
        .busy_indicator_arc(indicator.clone());
    (builder, indicator)
}
