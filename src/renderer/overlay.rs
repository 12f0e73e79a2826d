//! Layout of the drawables that make up a unit on screen.

use glam::Vec2;
use serde::Serialize;

use crate::battle::side::{anchor_for, Side};
use crate::core::config::UnitConfig;
use crate::renderer::{BarSpec, SpriteSpec, TextSpec};

/// Body sprite offset from the group anchor
pub const SPRITE_OFFSET: Vec2 = Vec2::new(0.0, -20.0);
/// Vertical offset of the speech label (its bottom edge)
pub const SPEECH_OFFSET_Y: f32 = -32.0;
/// Vertical offset of the id label (its middle)
pub const ID_LABEL_OFFSET_Y: f32 = 4.0;
pub const HEALTH_BAR_WIDTH: f32 = 40.0;
pub const HEALTH_BAR_HEIGHT: f32 = 2.0;
pub const HEALTH_BAR_OFFSET_Y: f32 = 12.0;
pub const HEALTH_FILL: u32 = 0x00ff00;
pub const HEALTH_STROKE: u32 = 0x11cc14;

/// Text appearance handed to the adapter as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: String,
    pub color: String,
    pub background: String,
    /// left, top, right, bottom
    pub padding: [f32; 4],
}

impl TextStyle {
    pub fn id_label() -> Self {
        Self {
            font: "9px monospace".into(),
            color: "#11cc14".into(),
            background: "#42176c".into(),
            padding: [2.0, 1.0, 2.0, 0.0],
        }
    }

    pub fn speech() -> Self {
        Self {
            font: "9px monospace".into(),
            color: "#111111".into(),
            background: "#faffac".into(),
            padding: [2.0, 1.0, 2.0, 0.0],
        }
    }
}

/// Everything the unit creates through the adapter at spawn time.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub sprite: SpriteSpec,
    pub speech: TextSpec,
    pub id_label: TextSpec,
    pub health_bar: BarSpec,
}

impl OverlayLayout {
    pub fn for_side(side: Side, texture: &str, id: &str, config: &UnitConfig) -> Self {
        let anchor = anchor_for(side, config.label_offset_x);

        Self {
            sprite: SpriteSpec {
                texture: texture.to_string(),
                offset: SPRITE_OFFSET,
            },
            speech: TextSpec {
                content: String::new(),
                offset: Vec2::new(anchor.offset_x, SPEECH_OFFSET_Y),
                origin: Vec2::new(anchor.origin_x, 1.0),
                style: TextStyle::speech(),
                visible: false,
            },
            id_label: TextSpec {
                content: id.to_string(),
                offset: Vec2::new(anchor.offset_x, ID_LABEL_OFFSET_Y),
                origin: Vec2::new(anchor.origin_x, 0.5),
                style: TextStyle::id_label(),
                visible: true,
            },
            health_bar: BarSpec {
                offset: Vec2::new(-HEALTH_BAR_WIDTH / 2.0, HEALTH_BAR_OFFSET_Y),
                width: HEALTH_BAR_WIDTH,
                height: HEALTH_BAR_HEIGHT,
                fill_color: HEALTH_FILL,
                stroke_color: HEALTH_STROKE,
            },
        }
    }
}
