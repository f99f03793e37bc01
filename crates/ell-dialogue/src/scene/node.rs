//! Dialogue nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::Choice;
use super::effect::Effect;

/// The text of a scene: either one line or a sequence of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneText {
    /// A single block of text.
    Line(String),
    /// Several pages shown one after another.
    Pages(Vec<String>),
}

impl Default for SceneText {
    fn default() -> Self {
        Self::Line(String::new())
    }
}

impl SceneText {
    /// The pages of this text. A single line is one page.
    pub fn pages(&self) -> &[String] {
        match self {
            Self::Line(line) => std::slice::from_ref(line),
            Self::Pages(pages) => pages,
        }
    }

    /// Whether there is no visible text at all.
    pub fn is_blank(&self) -> bool {
        self.pages().iter().all(|p| p.trim().is_empty())
    }
}

impl fmt::Display for SceneText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pages().join("\n\n"))
    }
}

impl From<&str> for SceneText {
    fn from(s: &str) -> Self {
        Self::Line(s.to_string())
    }
}

impl From<String> for SceneText {
    fn from(s: String) -> Self {
        Self::Line(s)
    }
}

impl From<Vec<String>> for SceneText {
    fn from(pages: Vec<String>) -> Self {
        Self::Pages(pages)
    }
}

impl<const N: usize> From<[&str; N]> for SceneText {
    fn from(pages: [&str; N]) -> Self {
        Self::Pages(pages.iter().map(|p| p.to_string()).collect())
    }
}

/// One unit of dialogue: a speaker, some text, and the ways out of it.
///
/// Missing fields deserialize to empty values so that validation can report
/// them instead of failing at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueNode {
    /// Unique identifier within a story.
    #[serde(default)]
    pub id: String,
    /// Who speaks this node.
    #[serde(default)]
    pub speaker: String,
    /// The text to display.
    #[serde(default)]
    pub text: SceneText,
    /// Choices offered to the player.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Scene to continue to when no choice overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<String>,
    /// Effects applied when the node is entered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl DialogueNode {
    /// Create a node with the given id, speaker and text.
    pub fn new(
        id: impl Into<String>,
        speaker: impl Into<String>,
        text: impl Into<SceneText>,
    ) -> Self {
        Self {
            id: id.into(),
            speaker: speaker.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the automatic continuation.
    pub fn with_auto_advance(mut self, scene_id: impl Into<String>) -> Self {
        self.auto_advance = Some(scene_id.into());
        self
    }

    /// Add an on-enter effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Look up a choice by id.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Scene ids this node can lead to, in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.choices
            .iter()
            .filter_map(|c| c.next_scene.as_deref())
            .chain(self.auto_advance.as_deref())
    }
}
