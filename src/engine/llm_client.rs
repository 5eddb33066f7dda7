use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::council::DebateTranscript;

/// Errors raised while talking to the narrative backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub act_name: String,
    pub world_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    story: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebateRequest {
    pub world_context: String,
    pub topic: String,
}

#[derive(Deserialize)]
struct ModelsResponse {
    models: Vec<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// The remote collaborator that writes the story and runs the council.
pub trait NarrativeBackend {
    /// Produce one free-text story document.
    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError>;

    fn debate(&self, request: &DebateRequest) -> Result<DebateTranscript, BackendError>;

    fn list_models(&self) -> Result<Vec<String>, BackendError>;

    fn health(&self) -> Result<String, BackendError>;
}

/// Blocking HTTP client for the generation API.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success response into [`BackendError::Api`], preferring the
/// backend's `detail` message over the raw body.
fn check_status(response: Response) -> Result<Response, BackendError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or(body);

    Err(BackendError::Api { status, message })
}

impl NarrativeBackend for HttpBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        log::info!(
            "Requesting act '{}' from {} (model {})",
            request.act_name,
            self.base_url,
            request.model
        );

        let resp = self
            .client
            .post(self.url("/generate"))
            .json(request)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: GenerateResponse = check_status(resp)?
            .json()
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(body.story)
    }

    fn debate(&self, request: &DebateRequest) -> Result<DebateTranscript, BackendError> {
        let resp = self
            .client
            .post(self.url("/council/debate"))
            .json(request)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        check_status(resp)?
            .json()
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let resp = self
            .client
            .get(self.url("/models"))
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: ModelsResponse = check_status(resp)?
            .json()
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(body.models)
    }

    fn health(&self) -> Result<String, BackendError> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: HealthResponse = check_status(resp)?
            .json()
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(format!("Connected to {} ({})", self.base_url, body.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optionals_are_not_sent() {
        let request = GenerateRequest {
            api_key: None,
            model: "m".into(),
            act_name: "Act".into(),
            world_description: "World".into(),
            previous_context: None,
            choice: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("api_key"));
        assert!(!object.contains_key("choice"));
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/generate"), "http://localhost:8000/generate");
    }

    #[test]
    fn transcript_decodes_from_backend_shape() {
        let body = r#"{
            "debate": [
                {"speaker": "Krishna-AI", "content": "Balance first."},
                {"speaker": "Duryodhana-Net", "content": "Control first."}
            ],
            "consensus": "Proceed with caution."
        }"#;

        let transcript: DebateTranscript = serde_json::from_str(body).unwrap();
        assert_eq!(transcript.debate.len(), 2);
        assert_eq!(transcript.debate[1].speaker, "Duryodhana-Net");
        assert_eq!(transcript.consensus, "Proceed with caution.");
    }
}
