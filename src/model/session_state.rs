use thiserror::Error;

use crate::model::generation_config::GenerationConfig;
use crate::model::narrative_stats::NarrativeStats;
use crate::model::parsed_document::ParsedDocument;
use crate::model::story_forest::{StoryForest, TreeError};
use crate::model::story_node::{NodeId, StoryNode, TimelineNode};
use crate::model::text::head_chars;

const CHOICE_TITLE_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no story has been started yet")]
    NoActiveStory,

    #[error("node {0} is not part of this story")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A completed state transition, fed to [`apply_action`].
#[derive(Debug, Clone)]
pub enum SessionAction {
    StoryStarted {
        config: GenerationConfig,
        node_id: NodeId,
        document: ParsedDocument,
    },
    BranchChosen {
        choice: String,
        node_id: NodeId,
        document: ParsedDocument,
    },
    LeafSelected(NodeId),
}

/// Everything the front-end knows about the running story.
/// Snapshots are never mutated; transitions build a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub forest: StoryForest,
    pub stats: NarrativeStats,
    pub active_leaf: Option<NodeId>,
    pub config: Option<GenerationConfig>,
}

impl SessionState {
    pub fn has_started(&self) -> bool {
        self.active_leaf.is_some()
    }

    pub fn current_node(&self) -> Option<&StoryNode> {
        self.forest.get(self.active_leaf?)
    }

    /// The active branch as one displayable document.
    pub fn story_text(&self) -> String {
        self.active_leaf
            .and_then(|leaf| self.forest.linearize(leaf))
            .unwrap_or_default()
    }

    pub fn current_choices(&self) -> &[String] {
        self.current_node()
            .map(|n| n.choices.as_slice())
            .unwrap_or(&[])
    }

    pub fn current_image_prompt(&self) -> Option<&str> {
        self.current_node()?.image_prompt.as_deref()
    }

    pub fn timeline(&self) -> Vec<TimelineNode> {
        self.forest.mark_current_leaf(self.active_leaf)
    }
}

/// Produce the snapshot that follows `state` once `action` has happened.
///
/// The input snapshot is left untouched whether or not the action applies.
pub fn apply_action(
    state: &SessionState,
    action: SessionAction,
) -> Result<SessionState, SessionError> {
    match action {
        SessionAction::StoryStarted {
            config,
            node_id,
            document,
        } => {
            let stats = NarrativeStats::default().apply(&document);
            let title = format!("Act 1: {}", config.act_name);
            let root = build_node(node_id, title, document.narrative_text.clone(), document);

            Ok(SessionState {
                forest: StoryForest::with_root(root),
                stats,
                active_leaf: Some(node_id),
                config: Some(config),
            })
        }

        SessionAction::BranchChosen {
            choice,
            node_id,
            document,
        } => {
            let Some(parent) = state.active_leaf else {
                return Err(SessionError::NoActiveStory);
            };
            if state.config.is_none() {
                return Err(SessionError::NoActiveStory);
            }

            let stats = state.stats.apply(&document);
            let title = format!("Choice: {}...", head_chars(&choice, CHOICE_TITLE_CHARS));
            let description = format!(
                "> **DECISION:** {choice}\n\n---\n\n{}",
                document.narrative_text
            );
            let node = build_node(node_id, title, description, document);

            let mut forest = state.forest.clone();
            forest.append_child(parent, node)?;

            Ok(SessionState {
                forest,
                stats,
                active_leaf: Some(node_id),
                config: state.config.clone(),
            })
        }

        SessionAction::LeafSelected(id) => {
            if !state.forest.contains(id) {
                return Err(SessionError::UnknownNode(id));
            }
            Ok(SessionState {
                active_leaf: Some(id),
                ..state.clone()
            })
        }
    }
}

fn build_node(id: NodeId, title: String, description: String, document: ParsedDocument) -> StoryNode {
    StoryNode {
        choices: document.choices,
        image_prompt: document.image_prompt,
        alignment_delta: document.alignment_delta,
        karma_delta: document.karma_delta,
        ..StoryNode::new(id, title, description)
    }
}
