//! Stage: the single controller owning quiz progress, its persistence, and the scene.

use std::{sync::Arc, time::Duration};

use crate::{
    assets::{loader::Backoff, source::FrameSource},
    foundation::error::{EmbraceError, EmbraceResult},
    scene::{
        choreographer::{Action, Choreographer, SceneEvent, SceneState, TrackSlot},
        config::SceneConfig,
        layout::Actor,
    },
    session::{
        progress::{AnswerOutcome, Progress, SceneKind},
        store::ProgressStore,
    },
    track::frame_track::LoadState,
};

/// Notifications surfaced by [`Stage::advance`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageEvent {
    /// Passed through from the scene.
    Scene(SceneEvent),
    /// Assets are ready to show. `forced` when the fallback deadline won over the loads.
    AssetsReady {
        /// True when the fallback deadline won over the loads.
        forced: bool,
    },
    /// The persisted scene moved on.
    SceneAdvanced {
        /// The scene now persisted.
        scene: SceneKind,
    },
}

/// Serializable summary of the stage for hosts and diagnostics.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StageSnapshot {
    /// Quiz progress.
    pub progress: Progress,
    /// Shared scene action.
    pub action: Action,
    /// Male center in percent of the scene width.
    pub male_percent: f64,
    /// Female center in percent of the scene width.
    pub female_percent: f64,
    /// Overlay state.
    pub scene: SceneState,
    /// Load state per track.
    pub tracks: Vec<(TrackSlot, LoadState)>,
    /// Whether assets were declared ready.
    pub ready: bool,
}

/// Drives one greeting session: answers go in, scene events come out, progress is persisted.
pub struct Stage {
    progress: Progress,
    store: ProgressStore,
    scene: Choreographer,
    opened_at: Duration,
    locked_until: Option<Duration>,
    ready: bool,
}

impl Stage {
    /// Resume persisted progress and mount the scene at its closeness.
    #[tracing::instrument(skip(config, store), fields(path = %store.path().display()))]
    pub fn open(config: SceneConfig, store: ProgressStore, now: Duration) -> EmbraceResult<Self> {
        let progress = store.load();
        let mut scene = Choreographer::new(config)?;
        scene.resume_at(progress.closeness, progress.is_hugging(), now);
        tracing::debug!(
            step = progress.step,
            closeness = progress.closeness,
            scene = ?progress.scene,
            "stage opened"
        );
        Ok(Self {
            progress,
            store,
            scene,
            opened_at: now,
            locked_until: None,
            ready: false,
        })
    }

    /// Current quiz progress.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Where progress is persisted.
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// The scene being driven.
    pub fn scene(&self) -> &Choreographer {
        &self.scene
    }

    /// Load every track on a worker thread; results land during [`Stage::advance`].
    pub fn start_loading(
        &mut self,
        source: Arc<dyn FrameSource>,
        backoff: Arc<dyn Backoff>,
    ) -> EmbraceResult<()> {
        self.scene.start_loading(source, backoff)
    }

    /// Load every track on the calling thread.
    pub fn load_blocking(
        &mut self,
        source: Arc<dyn FrameSource>,
        backoff: Arc<dyn Backoff>,
    ) -> EmbraceResult<()> {
        self.scene.load_blocking(source, backoff)
    }

    /// Every track settled, or the fallback deadline passed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Answers are refused while the previous answer's lockout runs.
    pub fn is_locked(&self, now: Duration) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Answer the current question, persist, and move the scene to the new closeness.
    ///
    /// Fails while the previous answer's lockout runs or once every question is answered.
    #[tracing::instrument(skip(self))]
    pub fn answer(&mut self, positive: bool, now: Duration) -> EmbraceResult<AnswerOutcome> {
        if let Some(until) = self.locked_until.filter(|until| now < *until) {
            return Err(EmbraceError::validation(format!(
                "answer locked for another {} ms",
                (until - now).as_millis()
            )));
        }

        let outcome = self.progress.answer(positive)?;
        let timing = &self.scene.config().timing;
        let lockout = if outcome.closeness_changed {
            timing.answer_lockout_walk_ms
        } else {
            timing.answer_lockout_ms
        };
        self.locked_until = Some(now + Duration::from_millis(lockout));

        self.persist();
        self.scene
            .set_inputs(self.progress.closeness, self.progress.is_hugging(), now);
        Ok(outcome)
    }

    /// Forward a pointer press to the scene. See [`Choreographer::pointer`].
    pub fn pointer(
        &mut self,
        x_fraction: f64,
        scene_width_px: f64,
        viewport_width_px: f64,
        now: Duration,
    ) -> Option<Actor> {
        self.scene
            .pointer(x_fraction, scene_width_px, viewport_width_px, now)
    }

    /// Advance the scene to `now` and translate its events; completes hug → heart and forces
    /// readiness once the fallback deadline passes.
    pub fn advance(&mut self, now: Duration) -> Vec<StageEvent> {
        self.scene.advance(now);
        let mut out = Vec::new();
        for event in self.scene.drain_events() {
            match event {
                SceneEvent::Ready => {
                    if !self.ready {
                        self.ready = true;
                        out.push(StageEvent::AssetsReady { forced: false });
                    }
                }
                SceneEvent::HugSequenceComplete => {
                    out.push(StageEvent::Scene(SceneEvent::HugSequenceComplete));
                    if self.progress.finish_hug() {
                        self.persist();
                        self.scene
                            .set_inputs(self.progress.closeness, self.progress.is_hugging(), now);
                        out.push(StageEvent::SceneAdvanced {
                            scene: self.progress.scene,
                        });
                    }
                }
                other => out.push(StageEvent::Scene(other)),
            }
        }

        let fallback = Duration::from_millis(self.scene.config().timing.ready_fallback_ms);
        if !self.ready && now >= self.opened_at + fallback {
            tracing::warn!("assets not settled before the fallback deadline");
            self.ready = true;
            out.push(StageEvent::AssetsReady { forced: true });
        }
        out
    }

    /// Forget all progress and start over. Tracks must be loaded again.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self, now: Duration) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear persisted progress");
        }
        self.progress = Progress::default();
        self.scene.reset(now);
        self.locked_until = None;
        self.opened_at = now;
        self.ready = false;
    }

    /// Stop the scene; later calls leave it untouched.
    pub fn teardown(&mut self) {
        self.scene.teardown();
    }

    /// Serializable view of the whole stage.
    pub fn snapshot(&self) -> StageSnapshot {
        let (male_percent, female_percent) = self.scene.positions();
        StageSnapshot {
            progress: self.progress.clone(),
            action: self.scene.action(),
            male_percent,
            female_percent,
            scene: self.scene.scene_state().clone(),
            tracks: TrackSlot::ALL
                .iter()
                .map(|slot| (*slot, self.scene.track(*slot).load_state()))
                .collect(),
            ready: self.ready,
        }
    }

    // Best effort: a failed write never stops the session.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.progress) {
            tracing::warn!(error = %e, "could not persist progress");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/stage.rs"]
mod tests;
