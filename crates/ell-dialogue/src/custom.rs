use ell_core::PlayerState;
use serde_json::Value;

/// Handler for `custom` requirements and effects with a given key.
///
/// Rules are consulted in registration order; the first rule whose
/// [`key`](CustomRule::key) matches and that returns `Some` decides. A rule
/// that only gates choices leaves [`apply`](CustomRule::apply) at its
/// default, and vice versa.
pub trait CustomRule: std::fmt::Debug {
    /// Key this rule handles.
    fn key(&self) -> &str;

    /// Evaluate a custom requirement. `None` means not handled.
    fn check(&self, _value: Option<&Value>, _state: &PlayerState) -> Option<bool> {
        None
    }

    /// Apply a custom effect. Returns whether the state changed, or `None`
    /// if not handled.
    fn apply(&self, _value: Option<&Value>, _state: &mut PlayerState) -> Option<bool> {
        None
    }
}
