//! Hex grid geometry for placing units on screen
//!
//! Grid coordinates are offset coordinates (column `x`, row `y`) with odd rows
//! shifted half a hex to the right.

use glam::Vec2;

/// Default hex width in pixels
pub const HEX_WIDTH: f32 = 64.0;

/// Default vertical distance between hex rows in pixels (3/4 of the height)
pub const HEX_ROW_HEIGHT: f32 = 48.0;

/// Maps grid coordinates to pixel coordinates of a hex's bounding box.
pub trait HexGeometry: Send + Sync {
    /// Left edge of the hex at `(x, y)`
    fn hex_left(&self, x: u32, y: u32) -> f32;

    /// Top edge of the hex at `(x, y)`
    fn hex_top(&self, x: u32, y: u32) -> f32;

    fn hex_origin(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(self.hex_left(x, y), self.hex_top(x, y))
    }
}

/// Odd-row offset hex layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub hex_width: f32,
    pub row_height: f32,
    /// Pixel position of hex (0, 0)
    pub origin: Vec2,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self {
            hex_width: HEX_WIDTH,
            row_height: HEX_ROW_HEIGHT,
            origin: Vec2::ZERO,
        }
    }
}

impl HexLayout {
    pub fn new(hex_width: f32, row_height: f32, origin: Vec2) -> Self {
        Self {
            hex_width,
            row_height,
            origin,
        }
    }
}

impl HexGeometry for HexLayout {
    fn hex_left(&self, x: u32, y: u32) -> f32 {
        let shift = if y % 2 == 1 { self.hex_width / 2.0 } else { 0.0 };
        self.origin.x + x as f32 * self.hex_width + shift
    }

    fn hex_top(&self, _x: u32, y: u32) -> f32 {
        self.origin.y + y as f32 * self.row_height
    }
}
