//! Dialogue and scene graph engine for Ellidra.
//!
//! A [`Story`] is a validated bundle of [`DialogueNode`]s. The
//! [`DialogueEngine`] evaluates choice requirements, applies effects to a
//! [`PlayerState`](ell_core::PlayerState) and resolves which scene comes
//! next. A [`DialogueSession`] ties the two together behind a single
//! reducer-style entry point, [`DialogueSession::dispatch`].

/// Configuration for the dialogue engine.
pub mod config;
/// Extension hook for custom requirements and effects.
pub mod custom;
/// Requirement checks, effect application and next-scene resolution.
pub mod engine;
/// Error types for the dialogue engine.
pub mod error;
/// Seen scenes and selected choices.
pub mod history;
/// The built-in "Echoes of Ellidra" prologue.
pub mod prologue;
/// Scene, choice, requirement and effect types.
pub mod scene;
/// Dialogue session: the single entry point for state changes.
pub mod session;
/// Scene lookup.
pub mod store;
/// Validated story bundles.
pub mod story;
/// Content checks.
pub mod validate;

pub use config::{CustomPolicy, EngineConfig};
pub use custom::CustomRule;
pub use engine::{ChoiceView, DialogueEngine};
pub use error::{DialogueError, DialogueResult};
pub use history::ChoiceHistory;
pub use scene::{
    AppliedEffect, Choice, Comparison, DialogueNode, Effect, ListOperator, Requirement, SceneText,
};
pub use session::{Action, DialogueSession, Outcome, Transition};
pub use store::SceneStore;
pub use story::{MemorySeed, Story, StoryFile};
pub use validate::{Severity, ValidationIssue, validate_scene, validate_story};
