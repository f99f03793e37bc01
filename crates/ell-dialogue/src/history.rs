//! What the player has seen and picked during the current session.

use std::collections::HashMap;

/// Scene visits and the choices taken, in the order they happened.
///
/// Unlike [`PlayerState`](ell_core::PlayerState) this is not part of the
/// save snapshot; it only lives as long as the session.
#[derive(Debug, Clone, Default)]
pub struct ChoiceHistory {
    visits: HashMap<String, u32>,
    picks: Vec<(String, String)>,
}

impl ChoiceHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a visit to a scene.
    pub fn record_visit(&mut self, scene_id: impl Into<String>) {
        *self.visits.entry(scene_id.into()).or_default() += 1;
    }

    /// How often a scene was entered or resumed.
    pub fn visits(&self, scene_id: &str) -> u32 {
        self.visits.get(scene_id).copied().unwrap_or(0)
    }

    /// Whether a scene was visited at all.
    pub fn has_seen(&self, scene_id: &str) -> bool {
        self.visits(scene_id) > 0
    }

    /// Log a selected choice.
    pub fn record_choice(&mut self, scene_id: impl Into<String>, choice_id: impl Into<String>) {
        self.picks.push((scene_id.into(), choice_id.into()));
    }

    /// Whether a choice was ever picked on a scene.
    pub fn has_selected_choice(&self, scene_id: &str, choice_id: &str) -> bool {
        self.picks
            .iter()
            .any(|(scene, choice)| scene == scene_id && choice == choice_id)
    }

    /// Choices picked on a scene, oldest first. Repeats are kept.
    pub fn choices_in<'a>(&'a self, scene_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.picks
            .iter()
            .filter(move |(scene, _)| scene == scene_id)
            .map(|(_, choice)| choice.as_str())
    }

    /// Every pick as `(scene, choice)`, oldest first.
    pub fn picks(&self) -> &[(String, String)] {
        &self.picks
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.visits.clear();
        self.picks.clear();
    }
}
