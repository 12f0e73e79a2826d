//! Position and health state of a single battle unit
//!
//! Owned exclusively by the unit; only the sequencer writes the position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::battle::actions::UnitAction;

/// Grid position; both axes are floored at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Apply a delta, clamping the resulting coordinate at zero.
    ///
    /// Large negative deltas land on the boundary instead of being rejected.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add_signed(dx),
            y: self.y.saturating_add_signed(dy),
        }
    }
}

/// Mutable per-unit battle state
#[derive(Debug, Clone)]
pub struct UnitState {
    pub position: GridPosition,
    pub health: f32,
    pub has_turn: bool,
    actions: Arc<[UnitAction]>,
}

impl UnitState {
    pub fn new(position: GridPosition, health: f32) -> Self {
        Self {
            position,
            health,
            has_turn: true,
            actions: Arc::from(Vec::new()),
        }
    }

    /// Replace the pending actions wholesale with a private copy.
    pub fn set_actions(&mut self, actions: &[UnitAction]) {
        self.actions = Arc::from(actions);
    }

    /// Immutable snapshot of the pending actions
    pub fn actions(&self) -> Arc<[UnitAction]> {
        Arc::clone(&self.actions)
    }

    pub fn clear_actions(&mut self) {
        self.actions = Arc::from(Vec::new());
    }
}
