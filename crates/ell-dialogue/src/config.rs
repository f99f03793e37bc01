//! Configuration for the dialogue engine.

use ell_core::InfluenceBounds;
use serde::{Deserialize, Serialize};

/// What to do with a custom requirement or effect that no registered rule
/// handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomPolicy {
    /// Requirement passes, effect is skipped. A warning is logged.
    FailOpen,
    /// Requirement fails, effect is an error.
    #[default]
    FailClosed,
}

/// Configuration for a [`DialogueEngine`](crate::DialogueEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Policy for unhandled custom kinds.
    pub custom_policy: CustomPolicy,
    /// Range faction influence is clamped into.
    pub influence_bounds: InfluenceBounds,
    /// Whether influence changes are clamped at all.
    pub clamp_influence: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            custom_policy: CustomPolicy::default(),
            influence_bounds: InfluenceBounds::default(),
            clamp_influence: true,
        }
    }
}

impl EngineConfig {
    /// Set the custom policy.
    pub fn with_custom_policy(mut self, policy: CustomPolicy) -> Self {
        self.custom_policy = policy;
        self
    }

    /// Set the influence bounds.
    pub fn with_influence_bounds(mut self, bounds: InfluenceBounds) -> Self {
        self.influence_bounds = bounds;
        self
    }

    /// Let faction influence leave the bounds.
    pub fn without_clamping(mut self) -> Self {
        self.clamp_influence = false;
        self
    }

    /// Bounds to clamp with, if clamping is on.
    pub fn clamp_bounds(&self) -> Option<InfluenceBounds> {
        self.clamp_influence.then_some(self.influence_bounds)
    }
}
