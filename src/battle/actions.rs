//! Action descriptors supplied by the turn resolver

use serde::{Deserialize, Serialize};

/// One visible step a unit is asked to perform during its turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitAction {
    /// Step by a grid delta; the result is clamped at zero on both axes
    Move { dx: i32, dy: i32 },
    /// Show a speech line above the unit
    Say { text: String },
}

impl UnitAction {
    pub fn move_by(dx: i32, dy: i32) -> Self {
        UnitAction::Move { dx, dy }
    }

    pub fn say(text: impl Into<String>) -> Self {
        UnitAction::Say { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_actions() {
        let actions: Vec<UnitAction> = serde_json::from_str(
            r#"[{"kind": "move", "dx": 1, "dy": -2}, {"kind": "say", "text": "hi"}]"#,
        )
        .unwrap();

        assert_eq!(actions, vec![UnitAction::move_by(1, -2), UnitAction::say("hi")]);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let parsed: Result<UnitAction, _> = serde_json::from_str(r#"{"kind": "fly"}"#);
        assert!(parsed.is_err());
    }
}
