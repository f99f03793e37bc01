//! Effects that modify player state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mutation applied when a scene is entered or a choice is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Learn a language.
    LearnLanguage {
        /// Language key.
        key: String,
    },
    /// Unlock a memory from the catalog.
    UnlockMemory {
        /// Memory id.
        key: String,
    },
    /// Shift a faction's influence by a signed delta.
    FactionInfluence {
        /// Faction name.
        key: String,
        /// Delta to add.
        value: i32,
    },
    /// Append to the consequence log.
    AddConsequence {
        /// Log key, usually the originating scene or choice id.
        key: String,
        /// Value appended under the key.
        value: String,
    },
    /// Game-specific mutation handled by a registered
    /// [`CustomRule`](crate::CustomRule).
    Custom {
        /// Rule key.
        key: String,
        /// Free-form payload for the rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

impl Effect {
    /// Shorthand for a language effect.
    pub fn learn_language(key: impl Into<String>) -> Self {
        Self::LearnLanguage { key: key.into() }
    }

    /// Shorthand for a memory effect.
    pub fn unlock_memory(key: impl Into<String>) -> Self {
        Self::UnlockMemory { key: key.into() }
    }

    /// Shorthand for an influence effect.
    pub fn faction_influence(key: impl Into<String>, delta: i32) -> Self {
        Self::FactionInfluence {
            key: key.into(),
            value: delta,
        }
    }

    /// Shorthand for a consequence effect.
    pub fn add_consequence(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AddConsequence {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The key this effect refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::LearnLanguage { key }
            | Self::UnlockMemory { key }
            | Self::FactionInfluence { key, .. }
            | Self::AddConsequence { key, .. }
            | Self::Custom { key, .. } => key,
        }
    }
}

/// A change that an effect actually made.
///
/// Effects that leave the state untouched (learning a known language,
/// unlocking an unlocked memory) produce no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedEffect {
    /// A new language was learned.
    LanguageLearned(String),
    /// A memory was unlocked.
    MemoryUnlocked(String),
    /// A faction's influence moved.
    InfluenceChanged {
        /// Faction name.
        faction: String,
        /// Value before.
        from: i32,
        /// Value after.
        to: i32,
    },
    /// A consequence was recorded.
    ConsequenceAdded {
        /// Log key.
        key: String,
        /// Recorded value.
        value: String,
    },
    /// A custom rule changed the state.
    Custom(String),
}

impl fmt::Display for AppliedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LanguageLearned(lang) => write!(f, "You now understand {lang}."),
            Self::MemoryUnlocked(id) => write!(f, "A memory returns: {id}."),
            Self::InfluenceChanged { faction, from, to } => {
                let direction = if to >= from { "rises" } else { "falls" };
                write!(f, "Your standing with {faction} {direction} ({from} -> {to}).")
            }
            Self::ConsequenceAdded { key, value } => write!(f, "Remembered: {key} / {value}."),
            Self::Custom(key) => write!(f, "Something changed ({key})."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json() {
        let effect: Effect =
            serde_json::from_str(r#"{"type":"faction_influence","key":"wardens","value":-10}"#)
                .unwrap();
        assert_eq!(effect, Effect::faction_influence("wardens", -10));
        assert_eq!(effect.key(), "wardens");

        let json = serde_json::to_string(&Effect::add_consequence("kael", "fled")).unwrap();
        assert_eq!(json, r#"{"type":"add_consequence","key":"kael","value":"fled"}"#);
    }

    #[test]
    fn custom_payload_optional() {
        let effect: Effect = serde_json::from_str(r#"{"type":"custom","key":"weather"}"#).unwrap();
        assert_eq!(
            effect,
            Effect::Custom {
                key: "weather".to_string(),
                value: None
            }
        );
    }

    #[test]
    fn applied_effect_display() {
        let up = AppliedEffect::InfluenceChanged {
            faction: "wardens".to_string(),
            from: 50,
            to: 60,
        };
        assert_eq!(up.to_string(), "Your standing with wardens rises (50 -> 60).");

        let learned = AppliedEffect::LanguageLearned("english".to_string());
        assert_eq!(learned.to_string(), "You now understand english.");
    }
}
