use serde::{Deserialize, Serialize};

/// A memory fragment the player can recover during the story.
///
/// Memories start locked and can only ever be unlocked; there is no way to
/// lock one again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// Whether the memory is still hidden from the player.
    pub locked: bool,
    /// Short title shown in the memory list.
    pub title: String,
    /// Full text revealed once unlocked.
    #[serde(default)]
    pub content: String,
}

impl Memory {
    /// Create a new locked memory.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            locked: true,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Unlock the memory. Returns `true` if it was locked before.
    pub fn unlock(&mut self) -> bool {
        let was_locked = self.locked;
        self.locked = false;
        was_locked
    }

    /// Whether the memory has been unlocked.
    pub fn is_unlocked(&self) -> bool {
        !self.locked
    }
}
