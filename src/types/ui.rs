//! UI side-effect configuration.
//!
//! Every field is optional so that partial configurations can be layered on
//! top of each other with a shallow override: a field present in the later
//! configuration replaces the earlier one, an absent field keeps it.

use serde::{Deserialize, Serialize};

/// A button rendered on a popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupButton {
    pub text: String,
}

/// Display preferences for one popup kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<PopupButton>>,
}

impl PopupSpec {
    /// A spec that only states whether the popup is shown.
    pub fn shown(is_show: bool) -> Self {
        Self {
            is_show: Some(is_show),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = Some(text.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.custom_title = Some(title.into());
        self
    }

    pub fn with_button(mut self, text: impl Into<String>) -> Self {
        self.buttons
            .get_or_insert_with(Vec::new)
            .push(PopupButton { text: text.into() });
        self
    }
}

/// Success and error popup preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_success: Option<PopupSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_error: Option<PopupSpec>,
}

impl PopupConfig {
    pub fn success(spec: PopupSpec) -> Self {
        Self {
            popup_success: Some(spec),
            popup_error: None,
        }
    }

    pub fn error(spec: PopupSpec) -> Self {
        Self {
            popup_success: None,
            popup_error: Some(spec),
        }
    }

    /// Shallow merge: each popup kind present in `other` replaces ours whole.
    pub fn merge(&mut self, other: PopupConfig) {
        if let Some(success) = other.popup_success {
            self.popup_success = Some(success);
        }
        if let Some(error) = other.popup_error {
            self.popup_error = Some(error);
        }
    }

    /// Whether the success popup should be displayed.
    pub fn shows_success(&self) -> bool {
        self.popup_success
            .as_ref()
            .and_then(|p| p.is_show)
            .unwrap_or(false)
    }

    /// Whether the error popup should be displayed.
    pub fn shows_error(&self) -> bool {
        self.popup_error
            .as_ref()
            .and_then(|p| p.is_show)
            .unwrap_or(false)
    }
}

/// Desired UI side effects of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Whether the busy indicator is toggled around the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<bool>,
    /// Advisory message associated with the busy state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_config: Option<PopupConfig>,
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = Some(message.into());
        self
    }

    pub fn with_popup_config(mut self, popup_config: PopupConfig) -> Self {
        self.popup_config = Some(popup_config);
        self
    }

    /// Shallow merge: fields present in `other` replace ours.
    ///
    /// `popup_config` is replaced whole, not merged per popup kind; use
    /// [`PopupConfig::merge`] for that.
    pub fn merge(&mut self, other: UiConfig) {
        if let Some(loading) = other.loading {
            self.loading = Some(loading);
        }
        if let Some(message) = other.loading_message {
            self.loading_message = Some(message);
        }
        if let Some(popup) = other.popup_config {
            self.popup_config = Some(popup);
        }
    }

    /// Fill absent fields from `defaults`; fields already set are kept.
    pub fn or_defaults(self, defaults: UiConfig) -> Self {
        let mut merged = defaults;
        merged.merge(self);
        merged
    }

    /// Whether the busy indicator is toggled. Unset means off.
    pub fn is_loading(&self) -> bool {
        self.loading.unwrap_or(false)
    }

    pub fn loading_message(&self) -> &str {
        self.loading_message.as_deref().unwrap_or("")
    }

    pub fn popup(&self) -> PopupConfig {
        self.popup_config.clone().unwrap_or_default()
    }
}
