use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MODEL: &str = "google/gemma-3-27b-it:free";

/// Models offered before the backend has been asked for its list.
pub const MODEL_PRESETS: &[(&str, &str)] = &[
    ("google/gemma-3-27b-it:free", "Gemma 3 27B (Free)"),
    ("meta-llama/llama-3.2-3b-instruct:free", "Llama 3.2 3B (Free)"),
    ("mistralai/mistral-7b-instruct:free", "Mistral 7B (Free)"),
    (
        "google/gemini-2.0-flash-lite-preview-09-2025:free",
        "Gemini 2.0 Flash Lite (Free)",
    ),
];

/// Parameters of a generation request, kept so later turns can reuse them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Backend credential; empty means "use the backend's own key"
    pub api_key: String,
    pub model: String,
    pub act_name: String,
    pub world_description: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            act_name: "The Dice Game Protocol".into(),
            world_description: "Kurukshetra 3000: A cyber-mythological world where the \
                Pandava Alliance and Kaurava Syndicate vie for control of the \
                Hastinapura Network."
                .into(),
        }
    }
}

impl GenerationConfig {
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &if self.credential().is_some() { "<redacted>" } else { "<none>" })
            .field("model", &self.model)
            .field("act_name", &self.act_name)
            .field("world_description", &self.world_description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_absent() {
        let config = GenerationConfig {
            api_key: "   ".into(),
            ..Default::default()
        };
        assert_eq!(config.credential(), None);
    }

    #[test]
    fn debug_never_prints_the_key() {
        let config = GenerationConfig {
            api_key: "sk-or-v1-secret".into(),
            ..Default::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
