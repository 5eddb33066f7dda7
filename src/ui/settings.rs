use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::model::generation_config::DEFAULT_MODEL;

pub const API_BASE_URL_ENV: &str = "NARRATIVE_API_BASE_URL";

pub const UI_SCALE_MIN: f32 = 0.75;
pub const UI_SCALE_MAX: f32 = 2.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub api_base_url: String,
    pub default_model: String,
    pub council_enabled: bool,
    pub export_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub ui_scale: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            default_model: DEFAULT_MODEL.into(),
            council_enabled: true,
            export_dir: PathBuf::from("exports"),
            request_timeout_secs: 120,
            ui_scale: 1.0,
        }
    }
}

impl AppSettings {
    /// Apply an environment override of the backend URL, if one is set.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    /// Pull a hand-edited `ui_scale` back into the range the slider offers.
    pub fn with_valid_ui_scale(mut self) -> Self {
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(UI_SCALE_MIN, UI_SCALE_MAX)
        } else {
            Self::default().ui_scale
        };
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
