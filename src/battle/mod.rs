//! Battle units - timed, awaitable actions driven by a turn resolver
//!
//! The turn resolver only ever sees a `BattleApi`. Each action mutates the
//! unit, instructs its render adapter, and settles on a timer.
//!
//! Layering (leaf first):
//! - `side`: orientation policy (clip suffix, overlay anchors)
//! - `units`: position, health and pending actions
//! - `sequencer`: `move_by` / `speak` and their completion signals
//! - `api`: capability handle over the sequencer
//! - `unit`: spawning, state access, teardown

pub mod actions;
pub mod api;
pub mod hex;
pub mod roster;
pub mod sequencer;
pub mod side;
pub mod unit;
pub mod units;

// Re-exports for convenient access
pub use actions::UnitAction;
pub use api::BattleApi;
pub use hex::{HexGeometry, HexLayout};
pub use roster::{CharacterLookup, CharacterRoster, CharacterTemplate};
pub use sequencer::{render_anchor, Completion, Sequencer, UnitDrawables};
pub use side::{anchor_for, suffix_for, OverlayAnchor, Side};
pub use unit::{BattleUnit, SceneContext, UnitSpec};
pub use units::{GridPosition, UnitState};
