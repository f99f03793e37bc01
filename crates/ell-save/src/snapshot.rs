//! The versioned save format.

use chrono::Utc;
use ell_core::PlayerState;
use serde::{Deserialize, Serialize};

use crate::error::{SaveError, SaveResult};

/// Version written into every snapshot. Other versions are rejected.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A player state with its format version and save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Save time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// The saved state.
    pub state: PlayerState,
}

impl Snapshot {
    /// Capture a state at the current time.
    pub fn new(state: PlayerState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: Utc::now().timestamp_millis(),
            state,
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> SaveResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode JSON, rejecting snapshots of another version.
    pub fn from_json(json: &str) -> SaveResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SaveError::VersionMismatch {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        let mut state = PlayerState::new("Aren");
        state.learn_language("english");
        let json = Snapshot::new(state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["timestamp"].as_i64().unwrap() > 0);
        assert_eq!(value["state"]["playerName"], "Aren");
        assert_eq!(value["state"]["knownLanguages"][0], "english");
    }

    #[test]
    fn rejects_other_versions() {
        let json = r#"{"version": 2, "timestamp": 0, "state": {}}"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SaveError::VersionMismatch {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SaveError::Serialization(_))
        ));
    }

    #[test]
    fn missing_state_fields_default() {
        let json = r#"{"version": 1, "timestamp": 5, "state": {"playerName": "Aren"}}"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.timestamp, 5);
        assert_eq!(snapshot.state.player_name, "Aren");
        assert!(snapshot.state.memories.is_empty());
    }
}
