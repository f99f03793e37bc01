use std::collections::HashMap;

use crate::error::{DialogueError, DialogueResult};
use crate::scene::DialogueNode;

/// Read-only lookup of dialogue nodes by id.
///
/// Built once from authored nodes; the authored order is kept for listing
/// and export.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    scenes: HashMap<String, DialogueNode>,
    order: Vec<String>,
}

impl SceneStore {
    /// Build a store, rejecting duplicate ids.
    pub fn from_nodes(nodes: impl IntoIterator<Item = DialogueNode>) -> DialogueResult<Self> {
        let mut store = Self::default();
        for node in nodes {
            if store.scenes.contains_key(&node.id) {
                return Err(DialogueError::DuplicateScene(node.id));
            }
            store.order.push(node.id.clone());
            store.scenes.insert(node.id.clone(), node);
        }
        Ok(store)
    }

    /// Look up a scene. `None` is the "scene not found" result.
    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.scenes.get(id)
    }

    /// Check if a scene exists.
    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store has no scenes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Scene ids in authored order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Scenes in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &DialogueNode> {
        self.order.iter().filter_map(|id| self.scenes.get(id))
    }
}
