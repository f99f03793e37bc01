//! Best-effort saving and loading of player state.

use ell_core::PlayerState;
use tracing::{debug, info, warn};

use crate::error::SaveResult;
use crate::snapshot::Snapshot;
use crate::storage::Storage;

/// Key used when none is configured.
pub const DEFAULT_SAVE_KEY: &str = "ellidra-save";

/// Saves snapshots of the player state under one key.
///
/// [`save`](Self::save) and [`load`](Self::load) never fail: problems are
/// logged and the game carries on with what it has. Use
/// [`try_save`](Self::try_save) and [`try_load`](Self::try_load) to see the
/// error instead.
#[derive(Debug, Clone)]
pub struct SaveManager<S> {
    storage: S,
    key: String,
}

impl<S: Storage> SaveManager<S> {
    /// Manage saves in `storage` under [`DEFAULT_SAVE_KEY`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_SAVE_KEY.to_string(),
        }
    }

    /// Use a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The key saves are written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write a snapshot of `state`.
    pub fn try_save(&mut self, state: &PlayerState) -> SaveResult<Snapshot> {
        let snapshot = Snapshot::new(state.clone());
        self.storage.set(&self.key, &snapshot.to_json()?)?;
        debug!(key = %self.key, scene = ?state.current_scene, "saved");
        Ok(snapshot)
    }

    /// Write a snapshot of `state`, logging any failure. Returns whether the
    /// save succeeded.
    pub fn save(&mut self, state: &PlayerState) -> bool {
        match self.try_save(state) {
            Ok(_) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to save game");
                false
            }
        }
    }

    /// Read the stored snapshot. `Ok(None)` means there is no save.
    pub fn try_load(&self) -> SaveResult<Option<Snapshot>> {
        match self.storage.get(&self.key)? {
            Some(json) => Ok(Some(Snapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Read the stored state. Missing, unreadable and outdated saves all
    /// yield `None`; the reason is logged.
    pub fn load(&self) -> Option<PlayerState> {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                info!(key = %self.key, timestamp = snapshot.timestamp, "loaded save");
                Some(snapshot.state)
            }
            Ok(None) => {
                debug!(key = %self.key, "no save found");
                None
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring unusable save");
                None
            }
        }
    }

    /// Delete the save. Returns whether one existed.
    pub fn clear(&mut self) -> SaveResult<bool> {
        let removed = self.storage.remove(&self.key)?;
        if removed {
            info!(key = %self.key, "save cleared");
        }
        Ok(removed)
    }
}
