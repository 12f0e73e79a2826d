//! Battle unit: construction, state access and lifecycle
//!
//! A unit is spawned once per participant with a fixed side, type and start
//! position, then mutated only through its actions until the battle ends.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::battle::actions::UnitAction;
use crate::battle::api::BattleApi;
use crate::battle::hex::HexGeometry;
use crate::battle::roster::{CharacterLookup, CharacterTemplate};
use crate::battle::sequencer::{render_anchor, Sequencer, UnitCore, UnitDrawables};
use crate::battle::side::Side;
use crate::battle::units::{GridPosition, UnitState};
use crate::core::config::UnitConfig;
use crate::core::error::Result;
use crate::core::types::UnitId;
use crate::renderer::{AnimationController, AnimationState, OverlayLayout, RenderAdapter};

/// Everything needed to place one participant on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: UnitId,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub side: Side,
    pub x: u32,
    pub y: u32,
}

impl UnitSpec {
    pub fn new(id: impl Into<String>, unit_type: impl Into<String>, side: Side, x: u32, y: u32) -> Self {
        Self {
            id: UnitId::new(id),
            unit_type: unit_type.into(),
            side,
            x,
            y,
        }
    }
}

/// Collaborators shared by every unit of one battle scene
#[derive(Clone)]
pub struct SceneContext {
    pub characters: Arc<dyn CharacterLookup>,
    pub geometry: Arc<dyn HexGeometry>,
    pub config: Arc<UnitConfig>,
}

impl SceneContext {
    pub fn new(characters: Arc<dyn CharacterLookup>, geometry: Arc<dyn HexGeometry>) -> Self {
        Self {
            characters,
            geometry,
            config: Arc::new(UnitConfig::default()),
        }
    }

    pub fn with_config(mut self, config: UnitConfig) -> Self {
        self.config = Arc::new(config);
        self
    }
}

/// A combatant on the battle field
pub struct BattleUnit {
    id: UnitId,
    side: Side,
    unit_type: String,
    template: CharacterTemplate,
    sequencer: Sequencer,
    api: BattleApi,
}

impl BattleUnit {
    /// Resolve the unit's template, draw it at its start position and play idle.
    ///
    /// Fails with `UnknownCharacter` for an unknown type, or `NoRuntime` when
    /// called outside a tokio runtime. Nothing is drawn on failure.
    pub fn spawn(spec: UnitSpec, scene: &SceneContext, mut renderer: Box<dyn RenderAdapter>) -> Result<Self> {
        let template = scene.characters.resolve(&spec.unit_type)?;
        let runtime = Sequencer::current_runtime()?;
        let config = Arc::clone(&scene.config);

        let position = GridPosition::new(spec.x, spec.y);
        let offset = Vec2::new(config.render_offset_x, config.render_offset_y);
        let anchor = render_anchor(scene.geometry.as_ref(), position, offset);
        let layout = OverlayLayout::for_side(spec.side, template.texture_key(), spec.id.as_str(), &config);
        let drawables = draw_unit(&mut *renderer, &layout, anchor);

        let mut core = UnitCore::new(
            UnitState::new(position, config.default_health),
            AnimationController::new(spec.unit_type.clone(), spec.side),
            renderer,
            Arc::clone(&scene.geometry),
            drawables,
            &config,
        );
        core.play(AnimationState::Idle);

        let sequencer = Sequencer::new(spec.id.clone(), core, config, runtime);
        let api = BattleApi::new(sequencer.clone());

        tracing::debug!(unit = %spec.id, unit_type = %spec.unit_type, side = %spec.side, x = spec.x, y = spec.y, "Unit spawned");

        Ok(Self {
            id: spec.id,
            side: spec.side,
            unit_type: spec.unit_type,
            template,
            sequencer,
            api,
        })
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn unit_type(&self) -> &str {
        &self.unit_type
    }

    pub fn template(&self) -> &CharacterTemplate {
        &self.template
    }

    /// Capability handle for turn-resolution code
    pub fn api(&self) -> &BattleApi {
        &self.api
    }

    pub fn position(&self) -> GridPosition {
        self.sequencer.with_core(|core| core.state.position)
    }

    pub fn health(&self) -> f32 {
        self.sequencer.with_core(|core| core.state.health)
    }

    pub fn has_turn(&self) -> bool {
        self.sequencer.with_core(|core| core.state.has_turn)
    }

    pub fn set_has_turn(&self, has_turn: bool) {
        self.sequencer.with_core(|core| core.state.has_turn = has_turn);
    }

    /// Replace pending actions with a private copy of `actions`.
    pub fn set_actions(&self, actions: &[UnitAction]) {
        self.sequencer.with_core(|core| core.state.set_actions(actions));
    }

    /// Snapshot of the pending actions
    pub fn actions(&self) -> Arc<[UnitAction]> {
        self.sequencer.with_core(|core| core.state.actions())
    }

    pub fn animation(&self) -> AnimationState {
        self.sequencer.with_core(|core| core.animation())
    }

    /// Speech text currently on screen, if any
    pub fn speech(&self) -> Option<String> {
        self.sequencer.with_core(|core| core.speech().map(str::to_string))
    }

    pub fn render_anchor(&self) -> Vec2 {
        self.sequencer.with_core(|core| core.render_anchor())
    }

    pub fn drawables(&self) -> UnitDrawables {
        self.sequencer.with_core(|core| core.drawables())
    }

    pub fn pending_timers(&self) -> usize {
        self.sequencer.pending_timers()
    }

    /// Play the queued actions one after another, then give up the turn.
    ///
    /// Each action's completion is awaited before the next one starts.
    /// Returns how many actions ran.
    pub async fn run_queued_actions(&self) -> Result<usize> {
        let actions = self.actions();
        for action in actions.iter() {
            self.api.perform(action).await?;
        }
        self.sequencer.with_core(|core| {
            core.state.clear_actions();
            core.state.has_turn = false;
        });
        tracing::debug!(unit = %self.id, count = actions.len(), "Turn finished");
        Ok(actions.len())
    }

    /// Abort pending timers; later actions on any handle become no-ops that
    /// resolve as cancelled.
    pub fn teardown(&self) {
        self.sequencer.teardown();
    }
}

impl Drop for BattleUnit {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn draw_unit(renderer: &mut dyn RenderAdapter, layout: &OverlayLayout, anchor: Vec2) -> UnitDrawables {
    let group = renderer.create_group(anchor);
    let sprite = renderer.create_sprite(&layout.sprite);
    let speech = renderer.create_text(&layout.speech);
    let id_label = renderer.create_text(&layout.id_label);
    let health_bar = renderer.create_bar(&layout.health_bar);

    for child in [sprite, speech, id_label, health_bar] {
        renderer.add_child(group, child);
    }

    UnitDrawables {
        group,
        sprite,
        speech,
        id_label,
        health_bar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hex::HexLayout;
    use crate::battle::roster::CharacterRoster;
    use crate::core::error::UnitError;
    use crate::renderer::{RecordingRenderer, RenderCommand};

    fn scene() -> SceneContext {
        let roster = CharacterRoster::new().with(CharacterTemplate::new("knight", "Knight"));
        SceneContext::new(Arc::new(roster), Arc::new(HexLayout::default()))
    }

    #[tokio::test]
    async fn test_spawn_draws_and_idles() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();

        let unit = BattleUnit::spawn(
            UnitSpec::new("k1", "knight", Side::Left, 2, 3),
            &scene(),
            Box::new(renderer),
        )
        .unwrap();

        assert_eq!(unit.position(), GridPosition::new(2, 3));
        assert_eq!(unit.health(), 100.0);
        assert!(unit.has_turn());
        assert_eq!(unit.animation(), AnimationState::Idle);
        assert_eq!(unit.speech(), None);
        assert_eq!(log.clips(), vec!["knight_idle_right".to_string()]);

        let drawables = unit.drawables();
        let group = log.drawable(drawables.group).unwrap();
        assert_eq!(
            group.children,
            vec![drawables.sprite, drawables.speech, drawables.id_label, drawables.health_bar]
        );
        // hex (2, 3): odd row shift 32, left 160, top 144; plus (-32, +8)
        assert_eq!(group.position, Some(Vec2::new(128.0, 152.0)));
        assert!(!log.drawable(drawables.speech).unwrap().visible);
        assert_eq!(log.drawable(drawables.id_label).unwrap().text.as_deref(), Some("k1"));
    }

    #[tokio::test]
    async fn test_spawn_unknown_type_draws_nothing() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();

        let result = BattleUnit::spawn(
            UnitSpec::new("d1", "dragon", Side::Right, 0, 0),
            &scene(),
            Box::new(renderer),
        );

        assert!(matches!(result, Err(UnitError::UnknownCharacter(key)) if key == "dragon"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let result = BattleUnit::spawn(
            UnitSpec::new("k1", "knight", Side::Left, 0, 0),
            &scene(),
            Box::new(RecordingRenderer::new()),
        );
        assert!(matches!(result, Err(UnitError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_sprite_uses_template_texture() {
        let mut template = CharacterTemplate::new("archer", "Archer");
        template.sprite_sheet = Some("archer_v2".into());
        let scene = SceneContext::new(
            Arc::new(CharacterRoster::new().with(template)),
            Arc::new(HexLayout::default()),
        );
        let renderer = RecordingRenderer::new();
        let log = renderer.log();

        let unit = BattleUnit::spawn(
            UnitSpec::new("a1", "archer", Side::Right, 0, 0),
            &scene,
            Box::new(renderer),
        )
        .unwrap();

        let sprite_texture = log.commands().into_iter().find_map(|command| match command {
            RenderCommand::CreateSprite { spec, .. } => Some(spec.texture),
            _ => None,
        });
        assert_eq!(sprite_texture.as_deref(), Some("archer_v2"));
        assert_eq!(unit.template().name, "Archer");
        assert_eq!(log.clips(), vec!["archer_idle_left".to_string()]);
    }

    #[test]
    fn test_spec_from_json() {
        let spec: UnitSpec = serde_json::from_str(
            r#"{"id": "k1", "type": "knight", "side": "right", "x": 4, "y": 1}"#,
        )
        .unwrap();
        assert_eq!(spec, UnitSpec::new("k1", "knight", Side::Right, 4, 1));
    }
}
