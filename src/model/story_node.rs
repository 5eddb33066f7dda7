use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, unique identifier of a node in the story forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of narrative, stored in the forest arena.
///
/// Children are referenced by id in creation order. Once a node is in the
/// forest the only thing that ever changes is its `children` list growing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryNode {
    pub id: NodeId,
    pub title: String,
    pub description: String,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    /// Branch options offered at the end of this node
    pub choices: Vec<String>,
    pub image_prompt: Option<String>,

    /// Stat deltas reported by the document that produced this node
    pub alignment_delta: Option<i64>,
    pub karma_delta: Option<i64>,
}

impl StoryNode {
    pub fn new(id: NodeId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            parent: None,
            children: Vec::new(),
            choices: Vec::new(),
            image_prompt: None,
            alignment_delta: None,
            karma_delta: None,
        }
    }
}

/// Display-only projection of a node with its subtree resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineNode {
    pub id: NodeId,
    pub title: String,
    pub is_current: bool,
    pub alignment_delta: Option<i64>,
    pub karma_delta: Option<i64>,
    pub children: Vec<TimelineNode>,
}
