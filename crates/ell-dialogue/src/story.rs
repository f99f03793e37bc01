//! Story bundles: scenes plus the seeds for a new game.

use std::collections::BTreeMap;
use std::path::Path;

use ell_core::{InfluenceBounds, Memory, PlayerState};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DialogueError, DialogueResult};
use crate::scene::DialogueNode;
use crate::store::SceneStore;
use crate::validate::{ValidationIssue, validate_story};

/// A memory as authored in the story's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySeed {
    /// Title shown in the memory list.
    pub title: String,
    /// Text revealed once unlocked.
    #[serde(default)]
    pub content: String,
}

/// Story content as authored, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFile {
    /// Story title.
    pub title: String,
    /// Id of the first scene.
    pub start: String,
    /// Memory catalog; every memory starts locked.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub memories: BTreeMap<String, MemorySeed>,
    /// Starting faction influence.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub factions: BTreeMap<String, i32>,
    /// All scenes.
    #[serde(default)]
    pub scenes: Vec<DialogueNode>,
}

impl StoryFile {
    /// Create an empty story.
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            memories: BTreeMap::new(),
            factions: BTreeMap::new(),
            scenes: Vec::new(),
        }
    }

    /// Add a memory to the catalog.
    pub fn with_memory(
        mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.memories.insert(
            id.into(),
            MemorySeed {
                title: title.into(),
                content: content.into(),
            },
        );
        self
    }

    /// Set a starting faction value.
    pub fn with_faction(mut self, name: impl Into<String>, influence: i32) -> Self {
        self.factions.insert(name.into(), influence);
        self
    }

    /// Add a scene.
    pub fn with_scene(mut self, node: DialogueNode) -> Self {
        self.scenes.push(node);
        self
    }

    /// Parse story JSON without validating it.
    pub fn from_json(json: &str) -> DialogueResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a story file without validating it.
    pub fn read(path: &Path) -> DialogueResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DialogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> DialogueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated story, ready to play.
#[derive(Debug, Clone)]
pub struct Story {
    title: String,
    start: String,
    memories: BTreeMap<String, MemorySeed>,
    factions: BTreeMap<String, i32>,
    scenes: SceneStore,
}

impl Story {
    /// Validate authored content and build the scene store.
    ///
    /// Any error-severity issue rejects the story; warnings are logged.
    pub fn new(file: StoryFile) -> DialogueResult<Self> {
        let (errors, warnings): (Vec<ValidationIssue>, Vec<ValidationIssue>) =
            validate_story(&file).into_iter().partition(ValidationIssue::is_error);
        for issue in &warnings {
            warn!(title = %file.title, "{issue}");
        }
        if !errors.is_empty() {
            return Err(DialogueError::InvalidStory(errors));
        }

        let scenes = SceneStore::from_nodes(file.scenes)?;
        debug!(title = %file.title, scenes = scenes.len(), "story loaded");
        Ok(Self {
            title: file.title,
            start: file.start,
            memories: file.memories,
            factions: file.factions,
            scenes,
        })
    }

    /// Parse and validate story JSON.
    pub fn from_json(json: &str) -> DialogueResult<Self> {
        Self::new(StoryFile::from_json(json)?)
    }

    /// Read, parse and validate a story file.
    pub fn load(path: &Path) -> DialogueResult<Self> {
        Self::new(StoryFile::read(path)?)
    }

    /// Story title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Id of the first scene.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The scene store.
    pub fn scenes(&self) -> &SceneStore {
        &self.scenes
    }

    /// Look up a scene.
    pub fn scene(&self, id: &str) -> Option<&DialogueNode> {
        self.scenes.get(id)
    }

    /// Memory catalog.
    pub fn memories(&self) -> &BTreeMap<String, MemorySeed> {
        &self.memories
    }

    /// Starting faction influence.
    pub fn factions(&self) -> &BTreeMap<String, i32> {
        &self.factions
    }

    /// Fresh player state seeded with the memory catalog and factions.
    ///
    /// Starting influence is clamped into `bounds` when given, so a new
    /// player never starts outside the range the engine enforces.
    pub fn new_player(
        &self,
        player_name: impl Into<String>,
        bounds: Option<InfluenceBounds>,
    ) -> PlayerState {
        let mut state = PlayerState::new(player_name);
        for (id, seed) in &self.memories {
            state.add_memory(id.as_str(), Memory::new(&seed.title, &seed.content));
        }
        for (faction, &value) in &self.factions {
            let value = match bounds {
                Some(bounds) if !bounds.contains(value) => {
                    let clamped = bounds.clamp(value);
                    warn!(faction = %faction, value, clamped, "starting influence out of bounds");
                    clamped
                }
                _ => value,
            };
            state.faction_influence.insert(faction.clone(), value);
        }
        state
    }

    /// Convert back to the authored form.
    pub fn to_file(&self) -> StoryFile {
        StoryFile {
            title: self.title.clone(),
            start: self.start.clone(),
            memories: self.memories.clone(),
            factions: self.factions.clone(),
            scenes: self.scenes.iter().cloned().collect(),
        }
    }
}
