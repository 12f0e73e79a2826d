//! Battle sides and the orientation rules derived from them
//!
//! Units face their opponents, so animation clips use the suffix of the
//! *other* side, while overlays hug the unit's near edge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::UnitError;

/// Which half of the battle field a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Side {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(UnitError::InvalidSide(s.to_string())),
        }
    }
}

/// Animation clip suffix for a unit on `side`: always the opposite side.
pub fn suffix_for(side: Side) -> Side {
    side.opposite()
}

/// Placement of an overlay label relative to the unit's anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayAnchor {
    /// Signed horizontal offset from the unit's center
    pub offset_x: f32,
    /// Horizontal text origin (0.0 = left edge, 1.0 = right edge)
    pub origin_x: f32,
}

/// Overlay anchor for a unit on `side` with the given offset magnitude.
///
/// Left units push labels right and anchor them on their left edge;
/// right units mirror that.
pub fn anchor_for(side: Side, magnitude: f32) -> OverlayAnchor {
    let magnitude = magnitude.abs();
    match side {
        Side::Left => OverlayAnchor {
            offset_x: magnitude,
            origin_x: 0.0,
        },
        Side::Right => OverlayAnchor {
            offset_x: -magnitude,
            origin_x: 1.0,
        },
    }
}
