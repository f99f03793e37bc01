//! Player choices.

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use super::requirement::Requirement;

/// A player-selectable option on a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Identifier, unique within its scene.
    #[serde(default)]
    pub id: String,
    /// The text shown to the player.
    #[serde(default)]
    pub text: String,
    /// Scene to branch to. Takes precedence over the scene's auto-advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scene: Option<String>,
    /// All of these must hold for the choice to be selectable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    /// Effects applied when the choice is selected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl Choice {
    /// Create a choice with the given id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the branch target.
    pub fn with_next_scene(mut self, scene_id: impl Into<String>) -> Self {
        self.next_scene = Some(scene_id.into());
        self
    }

    /// Add a requirement.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_builder() {
        let choice = Choice::new("touch_glyph", "Touch the glyph")
            .with_requirement(Requirement::language("english"))
            .with_effect(Effect::UnlockMemory {
                key: "glyph_memory".to_string(),
            })
            .with_next_scene("figure_response_glyph");

        assert_eq!(choice.id, "touch_glyph");
        assert_eq!(choice.next_scene.as_deref(), Some("figure_response_glyph"));
        assert_eq!(choice.requirements.len(), 1);
        assert_eq!(choice.effects.len(), 1);
    }

    #[test]
    fn deserialize_camel_case() {
        let choice: Choice = serde_json::from_str(
            r#"{
                "id": "touch_glyph",
                "text": "Touch the glyph",
                "nextScene": "figure_response_glyph",
                "requirements": [{"type": "language", "key": "english"}]
            }"#,
        )
        .unwrap();
        assert_eq!(choice.next_scene.as_deref(), Some("figure_response_glyph"));
        assert_eq!(choice.requirements, vec![Requirement::language("english")]);
        assert!(choice.effects.is_empty());
    }
}
