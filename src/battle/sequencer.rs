//! Timed action sequencing for a single unit
//!
//! Every action applies its visible effects synchronously, then returns a
//! [`Completion`] that settles once its timer fires. Timers run as tasks on
//! the tokio runtime the unit was spawned on and never block the caller.
//!
//! Timing for one call:
//! - `move_by`: reposition + walk now, idle and resolve after `walk_delay`
//! - `speak`: text visible now, resolve after `speak_ack_delay`, hide after
//!   `speak_hide_delay` (the two speech timers are independent)

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use glam::Vec2;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::battle::hex::HexGeometry;
use crate::battle::units::{GridPosition, UnitState};
use crate::core::config::{SpeakHidePolicy, UnitConfig};
use crate::core::error::{Result, UnitError};
use crate::core::types::UnitId;
use crate::renderer::{AnimationController, AnimationState, DrawableHandle, RenderAdapter};

/// One-shot signal that a timed action has finished.
///
/// Resolves `Ok(())` exactly once when the action's timer fires, or
/// `Err(UnitError::Cancelled)` if the unit was torn down first.
#[must_use = "a completion does nothing unless awaited"]
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

impl Completion {
    fn pair() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|settled| settled.map_err(|_| UnitError::Cancelled))
    }
}

/// Handles of everything drawn for a unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitDrawables {
    pub group: DrawableHandle,
    pub sprite: DrawableHandle,
    pub speech: DrawableHandle,
    pub id_label: DrawableHandle,
    pub health_bar: DrawableHandle,
}

/// Unit state shared between the caller and pending timers.
pub(crate) struct UnitCore {
    pub(crate) state: UnitState,
    animation: AnimationController,
    renderer: Box<dyn RenderAdapter>,
    geometry: Arc<dyn HexGeometry>,
    drawables: UnitDrawables,
    render_offset: Vec2,
    speech: Option<String>,
    speech_generation: u64,
    torn_down: bool,
}

impl UnitCore {
    pub(crate) fn new(
        state: UnitState,
        animation: AnimationController,
        renderer: Box<dyn RenderAdapter>,
        geometry: Arc<dyn HexGeometry>,
        drawables: UnitDrawables,
        config: &UnitConfig,
    ) -> Self {
        Self {
            state,
            animation,
            renderer,
            geometry,
            drawables,
            render_offset: Vec2::new(config.render_offset_x, config.render_offset_y),
            speech: None,
            speech_generation: 0,
            torn_down: false,
        }
    }

    pub(crate) fn animation(&self) -> AnimationState {
        self.animation.current()
    }

    pub(crate) fn speech(&self) -> Option<&str> {
        self.speech.as_deref()
    }

    pub(crate) fn drawables(&self) -> UnitDrawables {
        self.drawables
    }

    /// Screen anchor of the unit's group at its current grid position.
    pub(crate) fn render_anchor(&self) -> Vec2 {
        render_anchor(self.geometry.as_ref(), self.state.position, self.render_offset)
    }

    pub(crate) fn play(&mut self, state: AnimationState) {
        let request = self.animation.play(state);
        tracing::trace!(clip = %request.clip, "Playing clip");
        self.renderer.play_clip(self.drawables.sprite, &request.clip);
    }

    /// Exit rule of a transient animation: back to idle.
    fn settle(&mut self) {
        let request = self.animation.settle();
        self.renderer.play_clip(self.drawables.sprite, &request.clip);
    }

    fn relocate(&mut self, position: GridPosition) {
        self.state.position = position;
        let anchor = self.render_anchor();
        self.renderer.reposition(self.drawables.group, anchor);
    }

    fn show_speech(&mut self, text: &str) -> u64 {
        self.renderer.set_text(self.drawables.speech, text);
        self.renderer.set_visible(self.drawables.speech, true);
        self.speech = Some(text.to_string());
        self.speech_generation += 1;
        self.speech_generation
    }

    fn hide_speech(&mut self) {
        self.renderer.set_visible(self.drawables.speech, false);
        self.speech = None;
    }
}

/// Render anchor for a grid position: hex origin plus the fixed offset.
pub fn render_anchor(geometry: &dyn HexGeometry, position: GridPosition, offset: Vec2) -> Vec2 {
    geometry.hex_origin(position.x, position.y) + offset
}

fn lock_core(core: &Mutex<UnitCore>) -> MutexGuard<'_, UnitCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pending timer tasks of one unit.
#[derive(Debug, Clone, Default)]
struct TimerSet {
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl TimerSet {
    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    fn pending(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Abort every pending timer, returning how many were still running.
    fn abort_all(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = tasks.iter().filter(|t| !t.is_finished()).count();
        for task in tasks.drain(..) {
            task.abort();
        }
        pending
    }
}

/// Drives the timed actions of one unit.
#[derive(Clone)]
pub struct Sequencer {
    id: UnitId,
    core: Arc<Mutex<UnitCore>>,
    config: Arc<UnitConfig>,
    timers: TimerSet,
    runtime: Handle,
}

impl Sequencer {
    /// Runtime of the calling context, which will run the unit's timers.
    pub(crate) fn current_runtime() -> Result<Handle> {
        Handle::try_current().map_err(|_| UnitError::NoRuntime)
    }

    pub(crate) fn new(id: UnitId, core: UnitCore, config: Arc<UnitConfig>, runtime: Handle) -> Self {
        Self {
            id,
            core: Arc::new(Mutex::new(core)),
            config,
            timers: TimerSet::default(),
            runtime,
        }
    }

    pub(crate) fn with_core<R>(&self, f: impl FnOnce(&mut UnitCore) -> R) -> R {
        f(&mut lock_core(&self.core))
    }

    /// Step by `(dx, dy)`, clamping the new position at zero.
    ///
    /// The unit is repositioned and starts walking before this returns. The
    /// completion resolves after the walk delay, once the unit is idle again.
    pub fn move_by(&self, dx: i32, dy: i32) -> Completion {
        let (done, completion) = Completion::pair();

        {
            let mut core = lock_core(&self.core);
            if core.torn_down {
                return completion;
            }
            let target = core.state.position.offset(dx, dy);
            core.relocate(target);
            core.play(AnimationState::Walk);
            tracing::debug!(unit = %self.id, dx, dy, x = target.x, y = target.y, "Unit moving");
        }

        let deadline = Instant::now() + self.config.walk_delay();
        let core = Arc::clone(&self.core);
        let id = self.id.clone();
        self.spawn_timer(async move {
            sleep_until(deadline).await;
            {
                let mut unit = lock_core(&core);
                // Teardown may have won the lock while this timer waited on it.
                if unit.torn_down {
                    return;
                }
                unit.settle();
            }
            tracing::debug!(unit = %id, "Move complete");
            let _ = done.send(());
        });

        completion
    }

    /// Show `text` above the unit.
    ///
    /// The text is visible before this returns. The completion resolves after
    /// the short acknowledgement delay; the text hides on its own timer. Under
    /// [`SpeakHidePolicy::Independent`] an older hide timer may hide newer text.
    pub fn speak(&self, text: impl Into<String>) -> Completion {
        let text = text.into();
        let (done, completion) = Completion::pair();

        let generation = {
            let mut core = lock_core(&self.core);
            if core.torn_down {
                return completion;
            }
            let generation = core.show_speech(&text);
            tracing::debug!(unit = %self.id, text = %text, "Unit speaking");
            generation
        };

        let now = Instant::now();
        let ack_at = now + self.config.speak_ack_delay();
        let hide_at = now + self.config.speak_hide_delay();

        let core = Arc::clone(&self.core);
        self.spawn_timer(async move {
            sleep_until(ack_at).await;
            if lock_core(&core).torn_down {
                return;
            }
            let _ = done.send(());
        });

        let core = Arc::clone(&self.core);
        let policy = self.config.hide_policy;
        let id = self.id.clone();
        self.spawn_timer(async move {
            sleep_until(hide_at).await;
            let mut unit = lock_core(&core);
            if unit.torn_down {
                return;
            }
            let stale = unit.speech_generation != generation;
            if policy == SpeakHidePolicy::Supersede && stale {
                tracing::debug!(unit = %id, generation, "Skipping stale speech hide");
                return;
            }
            unit.hide_speech();
            tracing::debug!(unit = %id, generation, stale, "Speech hidden");
        });

        completion
    }

    /// Number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Abort pending timers and refuse further actions.
    ///
    /// Outstanding completions resolve with [`UnitError::Cancelled`].
    pub(crate) fn teardown(&self) {
        lock_core(&self.core).torn_down = true;
        let aborted = self.timers.abort_all();
        if aborted > 0 {
            tracing::warn!(unit = %self.id, aborted, "Aborted pending unit timers");
        }
    }

    fn spawn_timer<F>(&self, timer: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = self.runtime.spawn(timer);
        self.timers.track(task);
    }
}
