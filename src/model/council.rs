use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateStep {
    pub speaker: String,
    pub content: String,
}

/// Advisory council output: the exchange in order, then the agreed stance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateTranscript {
    pub debate: Vec<DebateStep>,
    pub consensus: String,
}
