//! Error types for the dialogue engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationIssue;

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors that can occur while loading or playing a story.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// Story file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Story content is not valid JSON for the content format.
    #[error("invalid story content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Story content failed validation.
    #[error("story failed validation with {} error(s); first: {}", .0.len(), first_issue(.0))]
    InvalidStory(Vec<ValidationIssue>),

    /// Two scenes share the same id.
    #[error("duplicate scene id: \"{0}\"")]
    DuplicateScene(String),

    /// Scene not found in the store.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// Choice id does not exist on the current scene.
    #[error("no choice \"{choice}\" in scene \"{scene}\"")]
    ChoiceNotFound {
        /// Current scene id.
        scene: String,
        /// Requested choice id.
        choice: String,
    },

    /// Choice exists but its requirements are not met.
    #[error("choice \"{0}\" is not available yet")]
    ChoiceLocked(String),

    /// The scene has no automatic continuation; a choice must be made.
    #[error("scene \"{0}\" requires a choice")]
    ChoiceRequired(String),

    /// No scene is active; the session has not started or has finished.
    #[error("no active scene")]
    NoActiveScene,

    /// A custom requirement or effect had no registered handler.
    #[error("no handler for custom {kind} \"{key}\"")]
    UnhandledCustom {
        /// Either `requirement` or `effect`.
        kind: &'static str,
        /// Custom key.
        key: String,
    },

    /// Player state error.
    #[error(transparent)]
    State(#[from] ell_core::StateError),
}

fn first_issue(issues: &[ValidationIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
