//! Requirement checks, effect application and next-scene resolution.

use ell_core::PlayerState;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{CustomPolicy, EngineConfig};
use crate::custom::CustomRule;
use crate::error::{DialogueError, DialogueResult};
use crate::scene::{AppliedEffect, Choice, DialogueNode, Effect, Requirement};

/// A choice together with whether the player can currently select it.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceView<'a> {
    /// The choice.
    pub choice: &'a Choice,
    /// Whether all requirements hold.
    pub available: bool,
}

/// Stateless rules of the scene graph.
///
/// The engine never owns player state; every operation takes the state it
/// reads or writes. Custom requirement and effect kinds are delegated to
/// registered [`CustomRule`]s.
#[derive(Debug, Default)]
pub struct DialogueEngine {
    config: EngineConfig,
    rules: Vec<Box<dyn CustomRule>>,
}

impl DialogueEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    /// Register a custom rule (builder style).
    pub fn with_rule(mut self, rule: impl CustomRule + 'static) -> Self {
        self.register_rule(rule);
        self
    }

    /// Register a custom rule.
    pub fn register_rule(&mut self, rule: impl CustomRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Requirements
    // -----------------------------------------------------------------------

    /// Whether every requirement of the choice holds.
    pub fn can_use_choice(&self, choice: &Choice, state: &PlayerState) -> bool {
        choice
            .requirements
            .iter()
            .all(|req| self.check_requirement(req, state))
    }

    /// Evaluate a single requirement.
    pub fn check_requirement(&self, requirement: &Requirement, state: &PlayerState) -> bool {
        if let Some(result) = requirement.evaluate(state) {
            return result;
        }
        let Requirement::Custom { key, value } = requirement else {
            return false;
        };

        let handled = self
            .rules_for(key)
            .find_map(|rule| rule.check(value.as_ref(), state));
        match (handled, self.config.custom_policy) {
            (Some(result), _) => result,
            (None, CustomPolicy::FailOpen) => {
                warn!(key = %key, "no rule for custom requirement, allowing choice");
                true
            }
            (None, CustomPolicy::FailClosed) => {
                warn!(key = %key, "no rule for custom requirement, blocking choice");
                false
            }
        }
    }

    /// All choices of a node with their availability, in declaration order.
    pub fn choice_views<'a>(
        &self,
        node: &'a DialogueNode,
        state: &PlayerState,
    ) -> Vec<ChoiceView<'a>> {
        node.choices
            .iter()
            .map(|choice| ChoiceView {
                choice,
                available: self.can_use_choice(choice, state),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    /// Apply effects in order and report the changes they made.
    ///
    /// Either every effect is applied or, on error, none is: the effects run
    /// against a copy that replaces `state` only on success.
    pub fn apply_effects(
        &self,
        effects: &[Effect],
        state: &mut PlayerState,
    ) -> DialogueResult<Vec<AppliedEffect>> {
        if effects.is_empty() {
            return Ok(Vec::new());
        }

        let mut next = state.clone();
        let mut applied = Vec::new();
        for effect in effects {
            if let Some(change) = self.apply_effect(effect, &mut next)? {
                debug!(change = ?change, "effect applied");
                applied.push(change);
            }
        }
        *state = next;
        Ok(applied)
    }

    /// Apply a single effect. Returns the change, or `None` for a no-op.
    pub fn apply_effect(
        &self,
        effect: &Effect,
        state: &mut PlayerState,
    ) -> DialogueResult<Option<AppliedEffect>> {
        let change = match effect {
            Effect::LearnLanguage { key } => state
                .learn_language(key.as_str())
                .then(|| AppliedEffect::LanguageLearned(key.clone())),
            Effect::UnlockMemory { key } => match state.unlock_memory(key) {
                Ok(true) => Some(AppliedEffect::MemoryUnlocked(key.clone())),
                Ok(false) => None,
                Err(e) => {
                    warn!(error = %e, "unlock_memory skipped");
                    None
                }
            },
            Effect::FactionInfluence { key, value } => {
                let (from, to) =
                    state.adjust_influence(key.as_str(), *value, self.config.clamp_bounds());
                (from != to).then(|| AppliedEffect::InfluenceChanged {
                    faction: key.clone(),
                    from,
                    to,
                })
            }
            Effect::AddConsequence { key, value } => {
                state.add_consequence(key.as_str(), value.as_str());
                Some(AppliedEffect::ConsequenceAdded {
                    key: key.clone(),
                    value: value.clone(),
                })
            }
            Effect::Custom { key, value } => self.apply_custom(key, value.as_ref(), state)?,
        };
        Ok(change)
    }

    fn apply_custom(
        &self,
        key: &str,
        value: Option<&Value>,
        state: &mut PlayerState,
    ) -> DialogueResult<Option<AppliedEffect>> {
        for rule in self.rules_for(key) {
            if let Some(changed) = rule.apply(value, state) {
                return Ok(changed.then(|| AppliedEffect::Custom(key.to_string())));
            }
        }
        match self.config.custom_policy {
            CustomPolicy::FailOpen => {
                warn!(key = %key, "no rule for custom effect, ignoring");
                Ok(None)
            }
            CustomPolicy::FailClosed => Err(DialogueError::UnhandledCustom {
                kind: "effect",
                key: key.to_string(),
            }),
        }
    }

    fn rules_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a dyn CustomRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.key() == key)
            .map(|rule| -> &'a dyn CustomRule { rule.as_ref() })
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Resolve the scene that follows `current`.
    ///
    /// An explicit `choice.next_scene` wins, then the node's auto-advance.
    /// `None` means the dialogue sequence is complete.
    pub fn resolve_next(&self, choice: Option<&Choice>, current: &DialogueNode) -> Option<String> {
        choice
            .and_then(|c| c.next_scene.clone())
            .or_else(|| current.auto_advance.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ell_core::Memory;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct NightRule;

    impl CustomRule for NightRule {
        fn key(&self) -> &str {
            "night"
        }

        fn check(&self, _value: Option<&Value>, state: &PlayerState) -> Option<bool> {
            Some(state.has_consequence("nightfall"))
        }

        fn apply(&self, _value: Option<&Value>, state: &mut PlayerState) -> Option<bool> {
            state.add_consequence("nightfall", "dusk");
            Some(true)
        }
    }

    fn glyph_choice() -> Choice {
        Choice::new("touch_glyph", "Touch the glyph")
            .with_requirement(Requirement::language("english"))
            .with_next_scene("figure_response_glyph")
    }

    fn custom(key: &str) -> Requirement {
        Requirement::Custom {
            key: key.to_string(),
            value: None,
        }
    }

    #[test]
    fn language_gate_opens_after_learning() {
        let engine = DialogueEngine::default();
        let mut state = PlayerState::new("Aren");
        let choice = glyph_choice();

        assert!(!engine.can_use_choice(&choice, &state));

        engine
            .apply_effects(&[Effect::learn_language("english")], &mut state)
            .unwrap();
        assert!(engine.can_use_choice(&choice, &state));
    }

    #[test]
    fn choice_without_requirements_is_available() {
        let engine = DialogueEngine::default();
        let choice = Choice::new("wait", "Wait");
        assert!(engine.can_use_choice(&choice, &PlayerState::new("Aren")));
    }

    #[test]
    fn custom_requirement_policies() {
        let state = PlayerState::new("Aren");
        let choice = Choice::new("stargaze", "Look up").with_requirement(custom("eclipse"));

        let closed = DialogueEngine::default();
        assert!(!closed.can_use_choice(&choice, &state));

        let open =
            DialogueEngine::new(EngineConfig::default().with_custom_policy(CustomPolicy::FailOpen));
        assert!(open.can_use_choice(&choice, &state));
    }

    #[test]
    fn custom_rule_decides() {
        let engine = DialogueEngine::default().with_rule(NightRule);
        let mut state = PlayerState::new("Aren");
        let req = custom("night");

        assert!(!engine.check_requirement(&req, &state));

        let applied = engine
            .apply_effects(
                &[Effect::Custom {
                    key: "night".to_string(),
                    value: None,
                }],
                &mut state,
            )
            .unwrap();
        assert_eq!(applied, vec![AppliedEffect::Custom("night".to_string())]);
        assert!(engine.check_requirement(&req, &state));
    }

    #[test]
    fn unhandled_custom_effect() {
        let effect = Effect::Custom {
            key: "weather".to_string(),
            value: None,
        };
        let mut state = PlayerState::new("Aren");

        let closed = DialogueEngine::default();
        let err = closed
            .apply_effects(&[Effect::learn_language("english"), effect.clone()], &mut state)
            .unwrap_err();
        assert!(matches!(err, DialogueError::UnhandledCustom { kind: "effect", .. }));
        // Nothing from the failed batch was applied
        assert!(!state.knows_language("english"));

        let open =
            DialogueEngine::new(EngineConfig::default().with_custom_policy(CustomPolicy::FailOpen));
        let applied = open
            .apply_effects(&[Effect::learn_language("english"), effect], &mut state)
            .unwrap();
        assert_eq!(applied.len(), 1);
        assert!(state.knows_language("english"));
    }

    #[test]
    fn learn_language_reports_once() {
        let engine = DialogueEngine::default();
        let mut state = PlayerState::new("Aren");
        let effects = [Effect::learn_language("english")];

        assert_eq!(engine.apply_effects(&effects, &mut state).unwrap().len(), 1);
        assert!(engine.apply_effects(&effects, &mut state).unwrap().is_empty());
        assert_eq!(state.known_languages.len(), 1);
    }

    #[test]
    fn unlock_memory_effects() {
        let engine = DialogueEngine::default();
        let mut state =
            PlayerState::new("Aren").with_memory("shore", Memory::new("The Shore", "Salt."));

        let applied = engine
            .apply_effects(
                &[
                    Effect::unlock_memory("shore"),
                    Effect::unlock_memory("shore"),
                    Effect::unlock_memory("missing"),
                ],
                &mut state,
            )
            .unwrap();
        assert_eq!(applied, vec![AppliedEffect::MemoryUnlocked("shore".to_string())]);
        assert!(state.memory_unlocked("shore"));
        assert!(state.memory("missing").is_none());
    }

    #[test]
    fn influence_clamped_by_default() {
        let engine = DialogueEngine::default();
        let mut state = PlayerState::new("Aren").with_influence("wardens", 95);

        let applied = engine
            .apply_effects(&[Effect::faction_influence("wardens", 20)], &mut state)
            .unwrap();
        assert_eq!(
            applied,
            vec![AppliedEffect::InfluenceChanged {
                faction: "wardens".to_string(),
                from: 95,
                to: 100
            }]
        );

        // Already at the cap: no change reported
        let applied = engine
            .apply_effects(&[Effect::faction_influence("wardens", 5)], &mut state)
            .unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn influence_unclamped() {
        let engine = DialogueEngine::new(EngineConfig::default().without_clamping());
        let mut state = PlayerState::new("Aren").with_influence("wardens", 95);
        engine
            .apply_effects(&[Effect::faction_influence("wardens", 20)], &mut state)
            .unwrap();
        assert_eq!(state.influence("wardens"), 115);
    }

    #[test]
    fn consequences_are_appended() {
        let engine = DialogueEngine::default();
        let mut state = PlayerState::new("Aren");
        let effect = Effect::add_consequence("kael_greeting", "backed_away");

        engine.apply_effects(&[effect.clone(), effect], &mut state).unwrap();
        assert_eq!(state.consequences("kael_greeting").len(), 2);
    }

    #[test]
    fn resolve_next_precedence() {
        let engine = DialogueEngine::default();
        let node = DialogueNode::new("kael_greeting", "Kael", "...").with_auto_advance("fallback");

        let explicit = glyph_choice();
        assert_eq!(
            engine.resolve_next(Some(&explicit), &node).as_deref(),
            Some("figure_response_glyph")
        );

        let implicit = Choice::new("wait", "Wait");
        assert_eq!(
            engine.resolve_next(Some(&implicit), &node).as_deref(),
            Some("fallback")
        );
        assert_eq!(engine.resolve_next(None, &node).as_deref(), Some("fallback"));

        let end = DialogueNode::new("end", "Narrator", "Fin.");
        assert_eq!(engine.resolve_next(None, &end), None);
        assert_eq!(engine.resolve_next(Some(&implicit), &end), None);
    }

    #[test]
    fn choice_views_mark_availability() {
        let engine = DialogueEngine::default();
        let node = DialogueNode::new("kael_greeting", "Kael", "...")
            .with_choice(glyph_choice())
            .with_choice(Choice::new("listen", "Listen"));

        let views = engine.choice_views(&node, &PlayerState::new("Aren"));
        assert_eq!(views.len(), 2);
        assert!(!views[0].available);
        assert!(views[1].available);
    }

    proptest! {
        #[test]
        fn next_scene_wins_over_auto_advance(next in "[a-z_]{1,12}", auto in proptest::option::of("[a-z_]{1,12}")) {
            let engine = DialogueEngine::default();
            let mut node = DialogueNode::new("here", "Narrator", "...");
            node.auto_advance = auto;
            let choice = Choice::new("go", "Go").with_next_scene(next.clone());
            prop_assert_eq!(engine.resolve_next(Some(&choice), &node), Some(next));
        }

        #[test]
        fn unlock_is_monotonic(ops in proptest::collection::vec(any::<bool>(), 1..24)) {
            let engine = DialogueEngine::default();
            let mut state = PlayerState::new("Aren").with_memory("shore", Memory::new("The Shore", "Salt."));
            let mut seen_unlocked = false;
            for unlock in ops {
                let effect = if unlock {
                    Effect::unlock_memory("shore")
                } else {
                    Effect::learn_language("english")
                };
                engine.apply_effects(&[effect], &mut state).unwrap();
                if seen_unlocked {
                    prop_assert!(state.memory_unlocked("shore"));
                }
                seen_unlocked |= state.memory_unlocked("shore");
            }
        }
    }
}
