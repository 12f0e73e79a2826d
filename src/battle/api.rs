//! Capability handle given to turn-resolution code
//!
//! A `BattleApi` can only ask its unit to perform whitelisted actions. It has
//! no access to position, animation or text state.

use crate::battle::actions::UnitAction;
use crate::battle::sequencer::{Completion, Sequencer};

/// Whitelisted actions of one unit.
#[derive(Clone)]
pub struct BattleApi {
    sequencer: Sequencer,
}

impl BattleApi {
    pub(crate) fn new(sequencer: Sequencer) -> Self {
        Self { sequencer }
    }

    /// Step by a grid delta. See [`Sequencer::move_by`].
    pub fn move_by(&self, dx: i32, dy: i32) -> Completion {
        self.sequencer.move_by(dx, dy)
    }

    /// Show a speech line. See [`Sequencer::speak`].
    pub fn speak(&self, text: impl Into<String>) -> Completion {
        self.sequencer.speak(text)
    }

    /// Dispatch a descriptor to the matching action.
    pub fn perform(&self, action: &UnitAction) -> Completion {
        match action {
            UnitAction::Move { dx, dy } => self.move_by(*dx, *dy),
            UnitAction::Say { text } => self.speak(text.as_str()),
        }
    }
}
