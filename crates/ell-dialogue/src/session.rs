//! Dialogue session management.
//!
//! `DialogueSession` owns the story, the engine and the player state. All
//! state changes go through [`DialogueSession::dispatch`]; the accessors only
//! hand out shared references.

use ell_core::PlayerState;
use tracing::{debug, warn};

use crate::engine::{ChoiceView, DialogueEngine};
use crate::error::{DialogueError, DialogueResult};
use crate::history::ChoiceHistory;
use crate::scene::{AppliedEffect, DialogueNode};
use crate::story::Story;

/// A request to change the session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Enter the start scene, or resume the saved scene if there is one.
    Start,
    /// Follow the current scene's auto-advance.
    Continue,
    /// Select a choice on the current scene by id.
    Choose(String),
    /// Discard progress and start over with a fresh player.
    NewGame {
        /// Name for the new player.
        player_name: String,
    },
    /// Replace the player state, e.g. from a save snapshot.
    Restore(PlayerState),
}

/// Where the session ended up after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A scene is now active.
    Entered(String),
    /// No next scene: the dialogue sequence is over.
    Complete,
    /// The next scene id does not exist in the story.
    SceneNotFound(String),
    /// State was replaced; dispatch [`Action::Start`] to continue.
    Reset,
}

/// The result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Where the session ended up.
    pub outcome: Outcome,
    /// Changes made by effects along the way.
    pub applied: Vec<AppliedEffect>,
}

impl Transition {
    fn new(outcome: Outcome, applied: Vec<AppliedEffect>) -> Self {
        Self { outcome, applied }
    }
}

/// An interactive dialogue session.
#[derive(Debug)]
pub struct DialogueSession {
    story: Story,
    engine: DialogueEngine,
    state: PlayerState,
    history: ChoiceHistory,
}

impl DialogueSession {
    /// Create a session with a fresh player.
    pub fn new(story: Story, engine: DialogueEngine, player_name: impl Into<String>) -> Self {
        let state = story.new_player(player_name, engine.config().clamp_bounds());
        Self::with_state(story, engine, state)
    }

    /// Create a session from an existing player state.
    pub fn with_state(story: Story, engine: DialogueEngine, state: PlayerState) -> Self {
        Self {
            story,
            engine,
            state,
            history: ChoiceHistory::new(),
        }
    }

    /// The story being played.
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// The engine.
    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    /// The player state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// The choice history.
    pub fn history(&self) -> &ChoiceHistory {
        &self.history
    }

    /// The active scene, if any.
    pub fn current_scene(&self) -> Option<&DialogueNode> {
        self.state
            .current_scene
            .as_deref()
            .and_then(|id| self.story.scene(id))
    }

    /// Choices of the active scene with their availability.
    pub fn choices(&self) -> Vec<ChoiceView<'_>> {
        self.current_scene()
            .map(|node| self.engine.choice_views(node, &self.state))
            .unwrap_or_default()
    }

    /// Whether the active scene can be left with [`Action::Continue`].
    pub fn can_continue(&self) -> bool {
        self.current_scene()
            .is_some_and(|node| node.auto_advance.is_some() || node.choices.is_empty())
    }

    /// Apply an action.
    ///
    /// A failed action leaves the session exactly as it was: effects,
    /// completed scenes and history from the attempt are rolled back.
    pub fn dispatch(&mut self, action: Action) -> DialogueResult<Transition> {
        debug!(action = ?action, "dispatch");
        let state = self.state.clone();
        let history = self.history.clone();

        let result = self.reduce(action);
        if let Err(e) = &result {
            debug!(error = %e, "dispatch failed, rolling back");
            self.state = state;
            self.history = history;
        }
        result
    }

    fn reduce(&mut self, action: Action) -> DialogueResult<Transition> {
        match action {
            Action::Start => self.start(),
            Action::Continue => self.continue_scene(),
            Action::Choose(choice_id) => self.choose(&choice_id),
            Action::NewGame { player_name } => {
                self.state = self
                    .story
                    .new_player(player_name, self.engine.config().clamp_bounds());
                self.history.clear();
                Ok(Transition::new(Outcome::Reset, Vec::new()))
            }
            Action::Restore(state) => {
                self.state = state;
                self.history.clear();
                Ok(Transition::new(Outcome::Reset, Vec::new()))
            }
        }
    }

    fn start(&mut self) -> DialogueResult<Transition> {
        if let Some(id) = self.state.current_scene.clone() {
            // Resuming: the scene's effects already ran when it was entered.
            if self.story.scenes().contains(&id) {
                self.history.record_visit(id.as_str());
                return Ok(Transition::new(Outcome::Entered(id), Vec::new()));
            }
            warn!(scene = %id, "saved scene not found");
            self.state.current_scene = None;
            return Ok(Transition::new(Outcome::SceneNotFound(id), Vec::new()));
        }

        let start = self.story.start().to_string();
        let mut applied = Vec::new();
        let outcome = self.enter(&start, &mut applied)?;
        Ok(Transition::new(outcome, applied))
    }

    fn continue_scene(&mut self) -> DialogueResult<Transition> {
        let node = active_node(&self.story, &self.state)?;
        let scene_id = node.id.clone();
        let next = self.engine.resolve_next(None, node);
        if next.is_none() && !node.choices.is_empty() {
            return Err(DialogueError::ChoiceRequired(scene_id));
        }

        self.state.complete_scene(scene_id);
        let mut applied = Vec::new();
        let outcome = self.advance_to(next, &mut applied)?;
        Ok(Transition::new(outcome, applied))
    }

    fn choose(&mut self, choice_id: &str) -> DialogueResult<Transition> {
        let node = active_node(&self.story, &self.state)?;
        let scene_id = node.id.clone();
        let choice = node
            .choice(choice_id)
            .ok_or_else(|| DialogueError::ChoiceNotFound {
                scene: scene_id.clone(),
                choice: choice_id.to_string(),
            })?;
        if !self.engine.can_use_choice(choice, &self.state) {
            return Err(DialogueError::ChoiceLocked(choice_id.to_string()));
        }

        let next = self.engine.resolve_next(Some(choice), node);
        let mut applied = self.engine.apply_effects(&choice.effects, &mut self.state)?;

        self.history.record_choice(scene_id.as_str(), choice_id);
        self.state.complete_scene(scene_id);
        let outcome = self.advance_to(next, &mut applied)?;
        Ok(Transition::new(outcome, applied))
    }

    fn advance_to(
        &mut self,
        next: Option<String>,
        applied: &mut Vec<AppliedEffect>,
    ) -> DialogueResult<Outcome> {
        match next {
            Some(id) => self.enter(&id, applied),
            None => {
                debug!("dialogue sequence complete");
                self.state.current_scene = None;
                Ok(Outcome::Complete)
            }
        }
    }

    fn enter(&mut self, id: &str, applied: &mut Vec<AppliedEffect>) -> DialogueResult<Outcome> {
        let Some(node) = self.story.scene(id) else {
            warn!(scene = %id, "scene not found");
            self.state.current_scene = None;
            return Ok(Outcome::SceneNotFound(id.to_string()));
        };

        applied.extend(self.engine.apply_effects(&node.effects, &mut self.state)?);
        self.state.enter_scene(id);
        self.history.record_visit(id);
        debug!(scene = %id, "entered scene");
        Ok(Outcome::Entered(id.to_string()))
    }
}

/// The node the state points at. Borrows only the story so the caller can
/// still mutate the state.
fn active_node<'a>(story: &'a Story, state: &PlayerState) -> DialogueResult<&'a DialogueNode> {
    let id = state
        .current_scene
        .as_deref()
        .ok_or(DialogueError::NoActiveScene)?;
    story
        .scene(id)
        .ok_or_else(|| DialogueError::SceneNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomPolicy, EngineConfig};
    use crate::scene::{Choice, Effect, Requirement};
    use crate::story::StoryFile;

    fn story() -> Story {
        Story::new(
            StoryFile::new("Test", "gate")
                .with_memory("key", "The Key", "Cold iron.")
                .with_faction("wardens", 50)
                .with_scene(
                    DialogueNode::new("gate", "Narrator", "A gate.")
                        .with_effect(Effect::add_consequence("visited", "gate"))
                        .with_auto_advance("guard"),
                )
                .with_scene(
                    DialogueNode::new("guard", "Guard", "Halt.")
                        .with_choice(
                            Choice::new("show_key", "Show the key")
                                .with_requirement(Requirement::memory("key"))
                                .with_next_scene("inside"),
                        )
                        .with_choice(
                            Choice::new("search", "Search your pockets")
                                .with_effect(Effect::unlock_memory("key"))
                                .with_effect(Effect::faction_influence("wardens", 5)),
                        )
                        .with_choice(Choice::new("leave", "Leave")),
                )
                .with_scene(DialogueNode::new("inside", "Narrator", "You are in.")),
        )
        .unwrap()
    }

    fn session() -> DialogueSession {
        DialogueSession::new(story(), DialogueEngine::new(EngineConfig::default()), "Aren")
    }

    #[test]
    fn start_enters_start_scene() {
        let mut s = session();
        let t = s.dispatch(Action::Start).unwrap();
        assert_eq!(t.outcome, Outcome::Entered("gate".to_string()));
        assert_eq!(
            t.applied,
            vec![AppliedEffect::ConsequenceAdded {
                key: "visited".to_string(),
                value: "gate".to_string()
            }]
        );
        assert_eq!(s.current_scene().map(|n| n.id.as_str()), Some("gate"));
        assert!(s.history().has_seen("gate"));
    }

    #[test]
    fn continue_follows_auto_advance() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        let t = s.dispatch(Action::Continue).unwrap();
        assert_eq!(t.outcome, Outcome::Entered("guard".to_string()));
        assert!(s.state().is_completed("gate"));
    }

    #[test]
    fn continue_requires_choice_without_auto_advance() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        s.dispatch(Action::Continue).unwrap();
        assert!(!s.can_continue());
        let err = s.dispatch(Action::Continue).unwrap_err();
        assert!(matches!(err, DialogueError::ChoiceRequired(id) if id == "guard"));
    }

    #[test]
    fn locked_choice_then_unlocked() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        s.dispatch(Action::Continue).unwrap();

        let available: Vec<bool> = s.choices().iter().map(|v| v.available).collect();
        assert_eq!(available, [false, true, true]);

        let err = s.dispatch(Action::Choose("show_key".into())).unwrap_err();
        assert!(matches!(err, DialogueError::ChoiceLocked(_)));

        // Choice without a target and a scene without auto-advance ends the sequence
        let t = s.dispatch(Action::Choose("search".into())).unwrap();
        assert_eq!(t.outcome, Outcome::Complete);
        assert_eq!(t.applied.len(), 2);
        assert!(s.state().memory_unlocked("key"));
        assert_eq!(s.state().influence("wardens"), 55);
        assert!(s.current_scene().is_none());
        assert!(s.history().has_selected_choice("guard", "search"));
    }

    #[test]
    fn unknown_choice() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        let err = s.dispatch(Action::Choose("fly".into())).unwrap_err();
        assert!(matches!(err, DialogueError::ChoiceNotFound { .. }));
    }

    #[test]
    fn actions_before_start() {
        let mut s = session();
        assert!(matches!(
            s.dispatch(Action::Continue).unwrap_err(),
            DialogueError::NoActiveScene
        ));
        assert!(s.choices().is_empty());
    }

    #[test]
    fn complete_at_dead_end() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        s.dispatch(Action::Continue).unwrap();
        let mut state = s.state().clone();
        state.unlock_memory("key").unwrap();
        s.dispatch(Action::Restore(state)).unwrap();
        s.dispatch(Action::Start).unwrap();

        let t = s.dispatch(Action::Choose("show_key".into())).unwrap();
        assert_eq!(t.outcome, Outcome::Entered("inside".to_string()));
        assert!(s.can_continue());
        let t = s.dispatch(Action::Continue).unwrap();
        assert_eq!(t.outcome, Outcome::Complete);
    }

    #[test]
    fn restore_resumes_without_reapplying_effects() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        let saved = s.state().clone();

        s.dispatch(Action::Restore(saved)).unwrap();
        let t = s.dispatch(Action::Start).unwrap();
        assert_eq!(t.outcome, Outcome::Entered("gate".to_string()));
        assert!(t.applied.is_empty());
        assert_eq!(s.state().consequences("visited").len(), 1);
    }

    #[test]
    fn restore_with_missing_scene() {
        let mut s = session();
        let mut state = s.state().clone();
        state.enter_scene("nowhere");
        s.dispatch(Action::Restore(state)).unwrap();

        let t = s.dispatch(Action::Start).unwrap();
        assert_eq!(t.outcome, Outcome::SceneNotFound("nowhere".to_string()));
        assert!(s.current_scene().is_none());
    }

    #[test]
    fn new_game_discards_progress() {
        let mut s = session();
        s.dispatch(Action::Start).unwrap();
        let t = s
            .dispatch(Action::NewGame {
                player_name: "Mira".to_string(),
            })
            .unwrap();
        assert_eq!(t.outcome, Outcome::Reset);
        assert_eq!(s.state().player_name, "Mira");
        assert!(s.state().current_scene.is_none());
        assert!(!s.history().has_seen("gate"));
        assert_eq!(s.state().influence("wardens"), 50);
    }

    fn weather() -> Effect {
        Effect::Custom {
            key: "weather".to_string(),
            value: None,
        }
    }

    fn strict_session(file: StoryFile) -> DialogueSession {
        let config = EngineConfig::default().with_custom_policy(CustomPolicy::FailClosed);
        let engine = DialogueEngine::new(config);
        DialogueSession::new(Story::new(file).unwrap(), engine, "Aren")
    }

    fn crossroads() -> StoryFile {
        StoryFile::new("Test", "a")
            .with_faction("wardens", 50)
            .with_scene(
                DialogueNode::new("a", "Narrator", "A fork.").with_choice(
                    Choice::new("go", "Go on")
                        .with_effect(Effect::faction_influence("wardens", 10))
                        .with_effect(Effect::add_consequence("went", "a"))
                        .with_next_scene("b"),
                ),
            )
    }

    #[test]
    fn failed_entry_effect_rolls_back_choice() {
        let mut s = strict_session(
            crossroads()
                .with_scene(DialogueNode::new("b", "Narrator", "Rain.").with_effect(weather())),
        );
        s.dispatch(Action::Start).unwrap();
        let before = s.state().clone();

        for _ in 0..2 {
            let err = s.dispatch(Action::Choose("go".into())).unwrap_err();
            assert!(matches!(
                err,
                DialogueError::UnhandledCustom { kind: "effect", ref key } if key == "weather"
            ));
            assert_eq!(s.state(), &before);
            assert_eq!(s.current_scene().map(|n| n.id.as_str()), Some("a"));
            assert_eq!(s.state().influence("wardens"), 50);
            assert!(s.state().consequences("went").is_empty());
            assert!(!s.state().is_completed("a"));
            assert!(!s.history().has_selected_choice("a", "go"));
            assert!(!s.history().has_seen("b"));
        }
    }

    #[test]
    fn failed_choice_effect_changes_nothing() {
        let mut file = crossroads().with_scene(DialogueNode::new("b", "Narrator", "Rain."));
        file.scenes[0].choices[0].effects.push(weather());
        let mut s = strict_session(file);
        s.dispatch(Action::Start).unwrap();
        let before = s.state().clone();

        let err = s.dispatch(Action::Choose("go".into())).unwrap_err();
        assert!(matches!(err, DialogueError::UnhandledCustom { .. }));
        assert_eq!(s.state(), &before);
        assert!(s.history().picks().is_empty());
    }

    #[test]
    fn failed_start_leaves_session_unstarted() {
        let mut s = strict_session(
            StoryFile::new("Test", "a")
                .with_scene(DialogueNode::new("a", "Narrator", "Rain.").with_effect(weather())),
        );
        let err = s.dispatch(Action::Start).unwrap_err();
        assert!(matches!(err, DialogueError::UnhandledCustom { .. }));
        assert!(s.state().current_scene.is_none());
        assert!(!s.history().has_seen("a"));
    }

    #[test]
    fn starting_influence_respects_bounds() {
        let file = StoryFile::new("Test", "a")
            .with_faction("wardens", 500)
            .with_scene(DialogueNode::new("a", "Narrator", "Hello."));
        let mut s = strict_session(file);
        assert_eq!(s.state().influence("wardens"), 100);

        s.dispatch(Action::NewGame {
            player_name: "Mira".to_string(),
        })
        .unwrap();
        assert_eq!(s.state().influence("wardens"), 100);
    }
}
