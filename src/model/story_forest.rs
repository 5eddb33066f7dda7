use std::collections::HashMap;

use thiserror::Error;

use crate::model::story_node::{NodeId, StoryNode, TimelineNode};

/// Separator placed between node descriptions when a branch is linearized.
pub const STORY_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("parent node {0} does not exist")]
    ParentNotFound(NodeId),

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
}

/// Arena of story nodes keyed by id, plus the ordered list of roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryForest {
    nodes: HashMap<NodeId, StoryNode>,
    roots: Vec<NodeId>,
}

impl StoryForest {
    /// A fresh forest holding exactly `root`.
    pub fn with_root(mut root: StoryNode) -> Self {
        root.parent = None;
        root.children.clear();

        let id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(id, root);

        Self {
            nodes,
            roots: vec![id],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&StoryNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Attach `node` as the last child of `parent_id`.
    ///
    /// On error the forest is left exactly as it was.
    pub fn append_child(&mut self, parent_id: NodeId, mut node: StoryNode) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateNode(node.id));
        }
        let Some(parent) = self.nodes.get_mut(&parent_id) else {
            return Err(TreeError::ParentNotFound(parent_id));
        };

        parent.children.push(node.id);
        node.parent = Some(parent_id);
        node.children.clear();
        self.nodes.insert(node.id, node);

        Ok(())
    }

    /// Nodes from the containing root down to `target`, inclusive.
    pub fn resolve_path_to_root(&self, target: NodeId) -> Option<Vec<&StoryNode>> {
        let mut path = Vec::new();
        let mut cursor = Some(target);

        while let Some(id) = cursor {
            let node = self.nodes.get(&id)?;
            path.push(node);
            cursor = node.parent;
        }

        path.reverse();
        Some(path)
    }

    /// Descriptions along the root-to-`target` path joined into one document.
    pub fn linearize(&self, target: NodeId) -> Option<String> {
        let path = self.resolve_path_to_root(target)?;
        Some(
            path.iter()
                .map(|n| n.description.as_str())
                .collect::<Vec<_>>()
                .join(STORY_SEPARATOR),
        )
    }

    /// Nested copy of the forest with `is_current` set only on `leaf`.
    pub fn mark_current_leaf(&self, leaf: Option<NodeId>) -> Vec<TimelineNode> {
        self.roots
            .iter()
            .filter_map(|id| self.timeline_node(*id, leaf))
            .collect()
    }

    fn timeline_node(&self, id: NodeId, leaf: Option<NodeId>) -> Option<TimelineNode> {
        let node = self.nodes.get(&id)?;
        Some(TimelineNode {
            id,
            title: node.title.clone(),
            is_current: leaf == Some(id),
            alignment_delta: node.alignment_delta,
            karma_delta: node.karma_delta,
            children: node
                .children
                .iter()
                .filter_map(|child| self.timeline_node(*child, leaf))
                .collect(),
        })
    }
}
