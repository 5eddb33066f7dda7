use thiserror::Error;

use crate::engine::llm_client::{BackendError, DebateRequest, NarrativeBackend};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::response_parser::parse_story_content;
use crate::model::council::DebateTranscript;
use crate::model::generation_config::GenerationConfig;
use crate::model::session_state::{apply_action, SessionAction, SessionError, SessionState};
use crate::model::story_node::NodeId;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Failed to generate story: {0}")]
    Generation(#[source] BackendError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Council,
    Generation,
}

/// Progress reported while a turn is running.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnProgress {
    Phase(TurnPhase),
    /// `None` when the council could not be reached
    Council(Option<DebateTranscript>),
}

/// Owns the session snapshot and runs turns against a backend.
///
/// A turn is the optional council debate followed by the generation call.
/// The snapshot only changes once the generation call has succeeded.
pub struct StorySession<B> {
    backend: B,
    state: SessionState,
}

impl<B: NarrativeBackend> StorySession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate the opening act; on success the previous story is discarded.
    pub fn start_story(
        &mut self,
        config: GenerationConfig,
        council: bool,
        progress: &mut dyn FnMut(TurnProgress),
    ) -> Result<(), TurnError> {
        let consensus = if council {
            self.convene(PromptBuilder::opening_debate(&config), progress)
        } else {
            None
        };

        progress(TurnProgress::Phase(TurnPhase::Generation));
        let request = PromptBuilder::opening_act(&config, consensus.as_deref());
        let story = self.backend.generate(&request).map_err(TurnError::Generation)?;

        let next = apply_action(
            &self.state,
            SessionAction::StoryStarted {
                config,
                node_id: NodeId::new(),
                document: parse_story_content(&story),
            },
        )?;

        log::info!("Started story with root {:?}", next.active_leaf);
        self.state = next;
        Ok(())
    }

    /// Generate the act that follows `choice`, branching from the active leaf.
    pub fn choose_branch(
        &mut self,
        choice: &str,
        council: bool,
        progress: &mut dyn FnMut(TurnProgress),
    ) -> Result<(), TurnError> {
        let Some(config) = self.state.config.clone().filter(|_| self.state.has_started()) else {
            return Err(SessionError::NoActiveStory.into());
        };
        let story_so_far = self.state.story_text();

        let consensus = if council {
            self.convene(
                PromptBuilder::branch_debate(&config, &story_so_far, choice),
                progress,
            )
        } else {
            None
        };

        progress(TurnProgress::Phase(TurnPhase::Generation));
        let request = PromptBuilder::next_act(&config, &story_so_far, choice, consensus.as_deref());
        let story = self.backend.generate(&request).map_err(TurnError::Generation)?;

        let next = apply_action(
            &self.state,
            SessionAction::BranchChosen {
                choice: choice.to_string(),
                node_id: NodeId::new(),
                document: parse_story_content(&story),
            },
        )?;

        log::info!(
            "Branched on '{}' ({} nodes in forest)",
            choice,
            next.forest.len()
        );
        self.state = next;
        Ok(())
    }

    pub fn select_node(&mut self, id: NodeId) -> Result<(), SessionError> {
        self.state = apply_action(&self.state, SessionAction::LeafSelected(id))?;
        Ok(())
    }

    /// Run the advisory debate. Failure is not fatal to the turn.
    fn convene(
        &self,
        request: DebateRequest,
        progress: &mut dyn FnMut(TurnProgress),
    ) -> Option<String> {
        progress(TurnProgress::Phase(TurnPhase::Council));

        match self.backend.debate(&request) {
            Ok(transcript) => {
                let consensus = transcript.consensus.trim().to_string();
                progress(TurnProgress::Council(Some(transcript)));
                (!consensus.is_empty()).then_some(consensus)
            }
            Err(e) => {
                log::warn!("Council debate failed: {e}");
                progress(TurnProgress::Council(None));
                None
            }
        }
    }
}
