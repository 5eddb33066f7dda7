#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use narrative_branches::engine::llm_client::{
    BackendError, DebateRequest, GenerateRequest, NarrativeBackend,
};
use narrative_branches::model::council::{DebateStep, DebateTranscript};

/// Requests seen by a [`ScriptedBackend`], shared so tests can inspect them
/// after the backend has moved onto an engine thread.
#[derive(Default)]
pub struct CallLog {
    pub generate: Vec<GenerateRequest>,
    pub debate: Vec<DebateRequest>,
}

/// In-memory backend replaying canned responses in order.
pub struct ScriptedBackend {
    stories: Mutex<VecDeque<Result<String, String>>>,
    consensus: Option<String>,
    pub log: Arc<Mutex<CallLog>>,
}

impl ScriptedBackend {
    pub fn new(stories: Vec<Result<&str, &str>>) -> Self {
        Self {
            stories: Mutex::new(
                stories
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            consensus: Some("Proceed with caution.".to_string()),
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Make every debate call fail.
    pub fn without_council(mut self) -> Self {
        self.consensus = None;
        self
    }
}

impl NarrativeBackend for ScriptedBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        self.log.lock().unwrap().generate.push(request.clone());
        match self.stories.lock().unwrap().pop_front() {
            Some(Ok(story)) => Ok(story),
            Some(Err(message)) => Err(BackendError::Api { status: 500, message }),
            None => Err(BackendError::Network("script exhausted".into())),
        }
    }

    fn debate(&self, request: &DebateRequest) -> Result<DebateTranscript, BackendError> {
        self.log.lock().unwrap().debate.push(request.clone());
        match &self.consensus {
            Some(consensus) => Ok(DebateTranscript {
                debate: vec![
                    DebateStep {
                        speaker: "Krishna-AI".into(),
                        content: "Dharma must hold.".into(),
                    },
                    DebateStep {
                        speaker: "Duryodhana-Net".into(),
                        content: "Control is order.".into(),
                    },
                ],
                consensus: consensus.clone(),
            }),
            None => Err(BackendError::Network("council offline".into())),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, BackendError> {
        Ok(vec!["mistralai/mistral-7b-instruct:free".into()])
    }

    fn health(&self) -> Result<String, BackendError> {
        Ok("ok".into())
    }
}

pub const OPENING: &str = r#"The dice clatter across the network floor.

```json
{
    "image_prompt": "A neon dice hall",
    "dharma": 10,
    "karma": 2,
    "inventory": ["Data-Astra"],
    "choices": ["Accept the wager", "Walk away"]
}
```"#;

pub const WAGER: &str = r#"The Syndicate grins.
```json
{"dharma": -25, "karma": -5, "choices": ["Raise", "Fold"]}
```"#;

pub const WALK_AWAY: &str = r#"You leave the hall.
```json
{"dharma": 15, "inventory": ["Royal Signet"], "choices": []}
```"#;
