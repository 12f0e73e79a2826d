//! Render adapter boundary for battle units.
//!
//! Units never draw themselves; they issue instructions to a `RenderAdapter`
//! owned by their scene. The adapter resolves clip names and styles and is
//! expected to swallow content errors (unknown clips, missing textures).

pub mod animation;
pub mod overlay;
pub mod recording;

use glam::Vec2;
use serde::Serialize;

pub use animation::{clip_name, AnimationController, AnimationRequest, AnimationState};
pub use overlay::{OverlayLayout, TextStyle};
pub use recording::{RecordingRenderer, RenderCommand, RenderLog};

/// Opaque handle to something the adapter has drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DrawableHandle(pub u32);

/// A sprite positioned relative to its parent group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteSpec {
    pub texture: String,
    pub offset: Vec2,
}

/// An anchored text label relative to its parent group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpec {
    pub content: String,
    pub offset: Vec2,
    /// Normalized anchor inside the text box (0..1 on each axis)
    pub origin: Vec2,
    pub style: TextStyle,
    pub visible: bool,
}

/// A filled, stroked rectangle such as a health bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSpec {
    /// Top-left corner relative to the parent group
    pub offset: Vec2,
    pub width: f32,
    pub height: f32,
    pub fill_color: u32,
    pub stroke_color: u32,
}

/// Drawing surface a unit sends its visual instructions to.
pub trait RenderAdapter: Send {
    /// Create an empty group at a screen position
    fn create_group(&mut self, at: Vec2) -> DrawableHandle;

    fn create_sprite(&mut self, spec: &SpriteSpec) -> DrawableHandle;

    fn create_text(&mut self, spec: &TextSpec) -> DrawableHandle;

    fn create_bar(&mut self, spec: &BarSpec) -> DrawableHandle;

    /// Attach `child` to `group`; children move with their group
    fn add_child(&mut self, group: DrawableHandle, child: DrawableHandle);

    fn reposition(&mut self, group: DrawableHandle, at: Vec2);

    /// Play a named clip from frame 0 without looping, replacing whatever
    /// the sprite was playing.
    fn play_clip(&mut self, sprite: DrawableHandle, clip: &str);

    fn set_text(&mut self, text: DrawableHandle, content: &str);

    fn set_visible(&mut self, handle: DrawableHandle, visible: bool);
}
