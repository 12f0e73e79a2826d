//! Animation state machine for unit sprites.
//!
//! `Idle` is the resting state. Entering any other state replaces the clip
//! that was playing; nothing is queued.

use std::fmt;

use crate::battle::side::{suffix_for, Side};

/// Logical animation states for units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Slash,
    Shoot,
    Thrust,
    Spellcast,
}

impl AnimationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Walk => "walk",
            AnimationState::Slash => "slash",
            AnimationState::Shoot => "shoot",
            AnimationState::Thrust => "thrust",
            AnimationState::Spellcast => "spellcast",
        }
    }

    /// Whether the state is a timed action that must settle back to idle.
    pub fn is_transient(&self) -> bool {
        !matches!(self, AnimationState::Idle)
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compose the clip name `{unit_type}_{action}_{suffix}`.
pub fn clip_name(unit_type: &str, state: AnimationState, suffix: Side) -> String {
    format!("{}_{}_{}", unit_type, state.as_str(), suffix.as_str())
}

/// A clip the render adapter should play right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    pub state: AnimationState,
    pub clip: String,
}

/// Tracks the active animation of one unit.
#[derive(Clone, Debug)]
pub struct AnimationController {
    unit_type: String,
    suffix: Side,
    current: AnimationState,
}

impl AnimationController {
    /// Create a controller in idle state for a unit of `unit_type` on `side`.
    pub fn new(unit_type: impl Into<String>, side: Side) -> Self {
        Self {
            unit_type: unit_type.into(),
            suffix: suffix_for(side),
            current: AnimationState::Idle,
        }
    }

    pub fn current(&self) -> AnimationState {
        self.current
    }

    pub fn suffix(&self) -> Side {
        self.suffix
    }

    /// Enter `state`, superseding the active one.
    ///
    /// Always produces a request, even for the state already active, so the
    /// clip restarts from its first frame.
    pub fn play(&mut self, state: AnimationState) -> AnimationRequest {
        self.current = state;
        AnimationRequest {
            state,
            clip: clip_name(&self.unit_type, state, self.suffix),
        }
    }

    /// Exit rule for transient states: settle back to idle.
    pub fn settle(&mut self) -> AnimationRequest {
        self.play(AnimationState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_name_composition() {
        assert_eq!(
            clip_name("knight", AnimationState::Walk, Side::Right),
            "knight_walk_right"
        );
        assert_eq!(
            clip_name("archer", AnimationState::Spellcast, Side::Left),
            "archer_spellcast_left"
        );
    }

    #[test]
    fn test_controller_starts_idle() {
        let controller = AnimationController::new("knight", Side::Left);
        assert_eq!(controller.current(), AnimationState::Idle);
        assert_eq!(controller.suffix(), Side::Right);
    }

    #[test]
    fn test_new_state_supersedes_current() {
        let mut controller = AnimationController::new("knight", Side::Right);

        let walk = controller.play(AnimationState::Walk);
        assert_eq!(walk.clip, "knight_walk_left");

        let slash = controller.play(AnimationState::Slash);
        assert_eq!(controller.current(), AnimationState::Slash);
        assert_eq!(slash.clip, "knight_slash_left");
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let mut controller = AnimationController::new("knight", Side::Left);
        controller.play(AnimationState::Walk);

        let request = controller.settle();
        assert_eq!(request.state, AnimationState::Idle);
        assert_eq!(request.clip, "knight_idle_right");
        assert!(!controller.current().is_transient());
    }
}
