use crate::engine::llm_client::{DebateRequest, GenerateRequest};
use crate::model::generation_config::GenerationConfig;
use crate::model::text::{head_chars, tail_chars};

const DEBATE_CONTEXT_HEAD: usize = 500;
const BRANCH_CONTEXT_TAIL: usize = 1000;

/// Builds the request bodies sent to the backend.
/// Only formats text: no networking, no state.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Council request for the opening act.
    pub fn opening_debate(config: &GenerationConfig) -> DebateRequest {
        Self::debate(config, "Initial Situation", &config.act_name)
    }

    /// Council request for a branch, seeded with the tail of the story so far.
    pub fn branch_debate(config: &GenerationConfig, story_so_far: &str, choice: &str) -> DebateRequest {
        Self::debate(
            config,
            tail_chars(story_so_far, BRANCH_CONTEXT_TAIL),
            &format!("User chose: {choice}"),
        )
    }

    fn debate(config: &GenerationConfig, context: &str, topic: &str) -> DebateRequest {
        DebateRequest {
            world_context: config.world_description.clone(),
            topic: format!(
                "Current Context: {}... \n\nDecision/Topic: {}",
                head_chars(context, DEBATE_CONTEXT_HEAD),
                topic
            ),
        }
    }

    pub fn opening_act(config: &GenerationConfig, consensus: Option<&str>) -> GenerateRequest {
        GenerateRequest {
            previous_context: consensus.map(|c| format!("[COUNCIL CONSENSUS]: {c}")),
            choice: None,
            ..Self::base(config)
        }
    }

    pub fn next_act(
        config: &GenerationConfig,
        story_so_far: &str,
        choice: &str,
        consensus: Option<&str>,
    ) -> GenerateRequest {
        let mut context = story_so_far.to_string();
        if let Some(c) = consensus {
            context.push_str("\n\n[COUNCIL CONSENSUS]: ");
            context.push_str(c);
        }

        GenerateRequest {
            previous_context: Some(context),
            choice: Some(choice.to_string()),
            ..Self::base(config)
        }
    }

    fn base(config: &GenerationConfig) -> GenerateRequest {
        GenerateRequest {
            api_key: config.credential().map(str::to_string),
            model: config.model.clone(),
            act_name: config.act_name.clone(),
            world_description: config.world_description.clone(),
            previous_context: None,
            choice: None,
        }
    }
}
