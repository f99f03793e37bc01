use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};
use crate::influence::InfluenceBounds;
use crate::memory::Memory;

/// The player's progress through the story.
///
/// Ordered collections keep snapshots deterministic, so a saved state
/// compares equal to the state it was saved from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    /// Name the player entered at the start of the game.
    pub player_name: String,
    /// Languages the player has learned.
    pub known_languages: BTreeSet<String>,
    /// Language comprehension flags (may be set without a full language).
    pub language_flags: BTreeMap<String, bool>,
    /// Memory catalog, keyed by memory id.
    pub memories: BTreeMap<String, Memory>,
    /// Append-only log of consequences, keyed by an author-chosen key.
    pub consequence_map: BTreeMap<String, Vec<String>>,
    /// Faction influence scalars.
    pub faction_influence: BTreeMap<String, i32>,
    /// Scene the player is currently in.
    pub current_scene: Option<String>,
    /// Scenes the player has left at least once.
    pub completed_scenes: BTreeSet<String>,
}

impl PlayerState {
    /// Create a fresh state for a new game.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    /// Add a memory to the catalog (builder style).
    pub fn with_memory(mut self, id: impl Into<String>, memory: Memory) -> Self {
        self.add_memory(id, memory);
        self
    }

    /// Set a starting faction value (builder style).
    pub fn with_influence(mut self, faction: impl Into<String>, value: i32) -> Self {
        self.faction_influence.insert(faction.into(), value);
        self
    }

    // -----------------------------------------------------------------------
    // Languages
    // -----------------------------------------------------------------------

    /// Check if the player understands a language.
    pub fn knows_language(&self, key: &str) -> bool {
        self.known_languages.contains(key) || self.language_flags.get(key).copied().unwrap_or(false)
    }

    /// Learn a language. Returns `true` if it was not known before.
    pub fn learn_language(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        self.language_flags.insert(key.clone(), true);
        self.known_languages.insert(key)
    }

    // -----------------------------------------------------------------------
    // Memories
    // -----------------------------------------------------------------------

    /// Register a memory in the catalog.
    ///
    /// An existing entry is left untouched so a catalog refresh can never
    /// re-lock a memory the player already recovered.
    pub fn add_memory(&mut self, id: impl Into<String>, memory: Memory) {
        self.memories.entry(id.into()).or_insert(memory);
    }

    /// Look up a memory.
    pub fn memory(&self, id: &str) -> Option<&Memory> {
        self.memories.get(id)
    }

    /// Check if a memory exists and is unlocked.
    pub fn memory_unlocked(&self, id: &str) -> bool {
        self.memories.get(id).is_some_and(Memory::is_unlocked)
    }

    /// Unlock a memory. Returns `true` if it was locked before.
    pub fn unlock_memory(&mut self, id: &str) -> StateResult<bool> {
        self.memories
            .get_mut(id)
            .map(Memory::unlock)
            .ok_or_else(|| StateError::MemoryNotFound(id.to_string()))
    }

    /// Iterate over unlocked memories.
    pub fn unlocked_memories(&self) -> impl Iterator<Item = (&String, &Memory)> {
        self.memories.iter().filter(|(_, m)| m.is_unlocked())
    }

    // -----------------------------------------------------------------------
    // Consequences
    // -----------------------------------------------------------------------

    /// Append a consequence under a key.
    pub fn add_consequence(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.consequence_map
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// All consequences recorded under a key, oldest first.
    pub fn consequences(&self, key: &str) -> &[String] {
        self.consequence_map
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if any consequence was recorded under a key.
    pub fn has_consequence(&self, key: &str) -> bool {
        !self.consequences(key).is_empty()
    }

    /// Check if a specific consequence was recorded under a key.
    pub fn consequence_includes(&self, key: &str, value: &str) -> bool {
        self.consequences(key).iter().any(|v| v == value)
    }

    // -----------------------------------------------------------------------
    // Faction influence
    // -----------------------------------------------------------------------

    /// Current influence with a faction. Unknown factions read as 0.
    pub fn influence(&self, faction: &str) -> i32 {
        self.faction_influence.get(faction).copied().unwrap_or(0)
    }

    /// Add a signed delta to a faction's influence.
    ///
    /// When `bounds` is given the result is clamped into them. Returns the
    /// `(old, new)` pair.
    pub fn adjust_influence(
        &mut self,
        faction: impl Into<String>,
        delta: i32,
        bounds: Option<InfluenceBounds>,
    ) -> (i32, i32) {
        let slot = self.faction_influence.entry(faction.into()).or_insert(0);
        let old = *slot;
        let raw = old.saturating_add(delta);
        *slot = bounds.map_or(raw, |b| b.clamp(raw));
        (old, *slot)
    }

    // -----------------------------------------------------------------------
    // Scene progress
    // -----------------------------------------------------------------------

    /// Record the scene the player is now in.
    pub fn enter_scene(&mut self, id: impl Into<String>) {
        self.current_scene = Some(id.into());
    }

    /// Mark a scene as completed. Returns `true` the first time.
    pub fn complete_scene(&mut self, id: impl Into<String>) -> bool {
        self.completed_scenes.insert(id.into())
    }

    /// Check if a scene has been completed.
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed_scenes.contains(id)
    }
}
