use crate::engine::turn::{TurnPhase, TurnProgress};
use crate::model::council::DebateTranscript;
use crate::model::generation_config::GenerationConfig;
use crate::model::session_state::SessionState;
use crate::model::story_node::NodeId;

pub enum EngineCommand {
    StartStory {
        config: GenerationConfig,
        council: bool,
    },
    ChooseBranch {
        choice: String,
        council: bool,
    },
    SelectNode(NodeId),
    RefreshModels,
    CheckHealth,
}

#[derive(Debug)]
pub enum EngineResponse {
    PhaseChanged(TurnPhase),
    CouncilConvened(Option<DebateTranscript>),

    /// New snapshot after a turn or a node selection
    SessionUpdated(SessionState),
    TurnFailed(String),

    ModelsListed(Result<Vec<String>, String>),
    HealthChecked(Result<String, String>),
}

impl From<TurnProgress> for EngineResponse {
    fn from(progress: TurnProgress) -> Self {
        match progress {
            TurnProgress::Phase(phase) => EngineResponse::PhaseChanged(phase),
            TurnProgress::Council(transcript) => EngineResponse::CouncilConvened(transcript),
        }
    }
}
