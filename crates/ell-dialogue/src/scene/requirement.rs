//! Requirement evaluation for choices.

use ell_core::PlayerState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a consequence requirement tests the recorded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOperator {
    /// The list contains the value.
    Includes,
    /// The list does not contain the value.
    Excludes,
}

/// How an influence requirement compares the faction scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Current value is greater than or equal.
    AtLeast,
    /// Current value is less than or equal.
    AtMost,
    /// Current value is exactly equal.
    Equals,
}

impl Comparison {
    /// Apply the comparison.
    pub fn holds(self, current: i32, target: i32) -> bool {
        match self {
            Self::AtLeast => current >= target,
            Self::AtMost => current <= target,
            Self::Equals => current == target,
        }
    }
}

/// A predicate over player state that gates a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// The player understands a language.
    Language {
        /// Language key.
        key: String,
    },
    /// A memory exists and is unlocked.
    Memory {
        /// Memory id.
        key: String,
    },
    /// Something was recorded in the consequence log.
    ///
    /// Without an operator the list under `key` just has to be non-empty.
    Consequence {
        /// Consequence key.
        key: String,
        /// List test to apply.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<ListOperator>,
        /// Value the operator tests for.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Faction influence compared against a threshold.
    Influence {
        /// Faction name.
        key: String,
        /// Comparison to apply.
        operator: Comparison,
        /// Threshold.
        value: i32,
    },
    /// Game-specific check resolved by a registered
    /// [`CustomRule`](crate::CustomRule).
    Custom {
        /// Rule key.
        key: String,
        /// Free-form payload for the rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

impl Requirement {
    /// Shorthand for a language requirement.
    pub fn language(key: impl Into<String>) -> Self {
        Self::Language { key: key.into() }
    }

    /// Shorthand for a memory requirement.
    pub fn memory(key: impl Into<String>) -> Self {
        Self::Memory { key: key.into() }
    }

    /// Shorthand for a "consequence list is non-empty" requirement.
    pub fn consequence(key: impl Into<String>) -> Self {
        Self::Consequence {
            key: key.into(),
            operator: None,
            value: None,
        }
    }

    /// Shorthand for a "consequence list contains value" requirement.
    pub fn consequence_includes(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Consequence {
            key: key.into(),
            operator: Some(ListOperator::Includes),
            value: Some(value.into()),
        }
    }

    /// Shorthand for an influence threshold.
    pub fn influence(key: impl Into<String>, operator: Comparison, value: i32) -> Self {
        Self::Influence {
            key: key.into(),
            operator,
            value,
        }
    }

    /// The key this requirement refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Language { key }
            | Self::Memory { key }
            | Self::Consequence { key, .. }
            | Self::Influence { key, .. }
            | Self::Custom { key, .. } => key,
        }
    }

    /// Evaluate a built-in requirement.
    ///
    /// Returns `None` for [`Requirement::Custom`], which only the engine can
    /// resolve.
    pub fn evaluate(&self, state: &PlayerState) -> Option<bool> {
        let result = match self {
            Self::Language { key } => state.knows_language(key),
            Self::Memory { key } => state.memory_unlocked(key),
            Self::Consequence {
                key,
                operator,
                value,
            } => match (operator, value) {
                (Some(ListOperator::Includes), Some(v)) => state.consequence_includes(key, v),
                (Some(ListOperator::Excludes), Some(v)) => !state.consequence_includes(key, v),
                _ => state.has_consequence(key),
            },
            Self::Influence {
                key,
                operator,
                value,
            } => operator.holds(state.influence(key), *value),
            Self::Custom { .. } => return None,
        };
        Some(result)
    }
}
