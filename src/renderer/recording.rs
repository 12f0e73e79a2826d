//! Headless render adapter that records every instruction.
//!
//! Used by the battle runner to print a transcript and by tests to observe
//! what a unit drew and when.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::{AHashMap, AHashSet};
use glam::Vec2;
use serde::Serialize;

use crate::renderer::{BarSpec, DrawableHandle, RenderAdapter, SpriteSpec, TextSpec};

/// One instruction received by the adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    CreateGroup { handle: DrawableHandle, at: Vec2 },
    CreateSprite { handle: DrawableHandle, spec: SpriteSpec },
    CreateText { handle: DrawableHandle, spec: TextSpec },
    CreateBar { handle: DrawableHandle, spec: BarSpec },
    AddChild { group: DrawableHandle, child: DrawableHandle },
    Reposition { group: DrawableHandle, at: Vec2 },
    PlayClip { sprite: DrawableHandle, clip: String },
    SetText { text: DrawableHandle, content: String },
    SetVisible { handle: DrawableHandle, visible: bool },
}

/// Last known state of a drawable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawableState {
    pub position: Option<Vec2>,
    pub text: Option<String>,
    pub visible: bool,
    pub clip: Option<String>,
    pub children: Vec<DrawableHandle>,
}

#[derive(Debug, Default)]
struct LogInner {
    next_handle: u32,
    commands: Vec<RenderCommand>,
    drawables: AHashMap<DrawableHandle, DrawableState>,
}

/// Shared view of everything a `RecordingRenderer` received.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    inner: Arc<Mutex<LogInner>>,
}

impl RenderLog {
    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        self.lock().commands.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().commands.is_empty()
    }

    pub fn drawable(&self, handle: DrawableHandle) -> Option<DrawableState> {
        self.lock().drawables.get(&handle).cloned()
    }

    /// Clips played so far, in order.
    pub fn clips(&self) -> Vec<String> {
        self.lock()
            .commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::PlayClip { clip, .. } => Some(clip.clone()),
                _ => None,
            })
            .collect()
    }

    /// Positions passed to `reposition`, in order.
    pub fn repositions(&self) -> Vec<Vec2> {
        self.lock()
            .commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Reposition { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }

    fn allocate(&self) -> DrawableHandle {
        let mut inner = self.lock();
        inner.next_handle += 1;
        DrawableHandle(inner.next_handle)
    }

    fn record(&self, command: RenderCommand) {
        let mut inner = self.lock();
        apply(&mut inner.drawables, &command);
        inner.commands.push(command);
    }
}

fn apply(drawables: &mut AHashMap<DrawableHandle, DrawableState>, command: &RenderCommand) {
    match command {
        RenderCommand::CreateGroup { handle, at } => {
            drawables.insert(
                *handle,
                DrawableState {
                    position: Some(*at),
                    visible: true,
                    ..Default::default()
                },
            );
        }
        RenderCommand::CreateSprite { handle, spec } => {
            drawables.insert(
                *handle,
                DrawableState {
                    position: Some(spec.offset),
                    visible: true,
                    ..Default::default()
                },
            );
        }
        RenderCommand::CreateText { handle, spec } => {
            drawables.insert(
                *handle,
                DrawableState {
                    position: Some(spec.offset),
                    text: Some(spec.content.clone()),
                    visible: spec.visible,
                    ..Default::default()
                },
            );
        }
        RenderCommand::CreateBar { handle, spec } => {
            drawables.insert(
                *handle,
                DrawableState {
                    position: Some(spec.offset),
                    visible: true,
                    ..Default::default()
                },
            );
        }
        RenderCommand::AddChild { group, child } => {
            if let Some(state) = drawables.get_mut(group) {
                state.children.push(*child);
            }
        }
        RenderCommand::Reposition { group, at } => {
            if let Some(state) = drawables.get_mut(group) {
                state.position = Some(*at);
            }
        }
        RenderCommand::PlayClip { sprite, clip } => {
            if let Some(state) = drawables.get_mut(sprite) {
                state.clip = Some(clip.clone());
            }
        }
        RenderCommand::SetText { text, content } => {
            if let Some(state) = drawables.get_mut(text) {
                state.text = Some(content.clone());
            }
        }
        RenderCommand::SetVisible { handle, visible } => {
            if let Some(state) = drawables.get_mut(handle) {
                state.visible = *visible;
            }
        }
    }
}

/// Render adapter writing into a `RenderLog`.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    log: RenderLog,
    /// Clips the adapter can draw; `None` accepts every name
    known_clips: Option<AHashSet<String>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer sharing an existing log, so several units can write one transcript.
    pub fn with_log(log: RenderLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    /// Only accept the given clip names; others are ignored with a warning.
    pub fn with_known_clips<I, S>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_clips = Some(clips.into_iter().map(Into::into).collect());
        self
    }

    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }

    fn allocate(&mut self) -> DrawableHandle {
        self.log.allocate()
    }
}

impl RenderAdapter for RecordingRenderer {
    fn create_group(&mut self, at: Vec2) -> DrawableHandle {
        let handle = self.allocate();
        self.log.record(RenderCommand::CreateGroup { handle, at });
        handle
    }

    fn create_sprite(&mut self, spec: &SpriteSpec) -> DrawableHandle {
        let handle = self.allocate();
        self.log.record(RenderCommand::CreateSprite {
            handle,
            spec: spec.clone(),
        });
        handle
    }

    fn create_text(&mut self, spec: &TextSpec) -> DrawableHandle {
        let handle = self.allocate();
        self.log.record(RenderCommand::CreateText {
            handle,
            spec: spec.clone(),
        });
        handle
    }

    fn create_bar(&mut self, spec: &BarSpec) -> DrawableHandle {
        let handle = self.allocate();
        self.log.record(RenderCommand::CreateBar {
            handle,
            spec: spec.clone(),
        });
        handle
    }

    fn add_child(&mut self, group: DrawableHandle, child: DrawableHandle) {
        self.log.record(RenderCommand::AddChild { group, child });
    }

    fn reposition(&mut self, group: DrawableHandle, at: Vec2) {
        self.log.record(RenderCommand::Reposition { group, at });
    }

    fn play_clip(&mut self, sprite: DrawableHandle, clip: &str) {
        if let Some(known) = &self.known_clips {
            if !known.contains(clip) {
                tracing::warn!(clip, "Unknown animation clip, ignoring");
                return;
            }
        }
        self.log.record(RenderCommand::PlayClip {
            sprite,
            clip: clip.to_string(),
        });
    }

    fn set_text(&mut self, text: DrawableHandle, content: &str) {
        self.log.record(RenderCommand::SetText {
            text,
            content: content.to_string(),
        });
    }

    fn set_visible(&mut self, handle: DrawableHandle, visible: bool) {
        self.log.record(RenderCommand::SetVisible { handle, visible });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::TextStyle;

    #[test]
    fn test_records_and_tracks_state() {
        let mut renderer = RecordingRenderer::new();
        let log = renderer.log();

        let group = renderer.create_group(Vec2::new(1.0, 2.0));
        let text = renderer.create_text(&TextSpec {
            content: String::new(),
            offset: Vec2::ZERO,
            origin: Vec2::ZERO,
            style: TextStyle::speech(),
            visible: false,
        });
        renderer.add_child(group, text);
        renderer.set_text(text, "hello");
        renderer.set_visible(text, true);
        renderer.reposition(group, Vec2::new(5.0, 6.0));

        assert_eq!(log.len(), 6);
        let text_state = log.drawable(text).unwrap();
        assert_eq!(text_state.text.as_deref(), Some("hello"));
        assert!(text_state.visible);
        assert_eq!(log.drawable(group).unwrap().children, vec![text]);
        assert_eq!(log.repositions(), vec![Vec2::new(5.0, 6.0)]);
    }

    #[test]
    fn test_unknown_clip_is_ignored() {
        let mut renderer = RecordingRenderer::new().with_known_clips(["knight_idle_right"]);
        let log = renderer.log();
        let sprite = renderer.create_sprite(&SpriteSpec {
            texture: "knight".into(),
            offset: Vec2::ZERO,
        });

        renderer.play_clip(sprite, "knight_fly_right");
        renderer.play_clip(sprite, "knight_idle_right");

        assert_eq!(log.clips(), vec!["knight_idle_right".to_string()]);
        assert_eq!(
            log.drawable(sprite).unwrap().clip.as_deref(),
            Some("knight_idle_right")
        );
    }

    #[test]
    fn test_shared_log_across_renderers() {
        let log = RenderLog::default();
        let mut a = RecordingRenderer::with_log(log.clone());
        let mut b = RecordingRenderer::with_log(log.clone());

        let first = a.create_group(Vec2::ZERO);
        let second = b.create_group(Vec2::ONE);

        assert_ne!(first, second);
        assert_eq!(log.len(), 2);
        assert_eq!(log.drawable(second).unwrap().position, Some(Vec2::ONE));
    }
}
