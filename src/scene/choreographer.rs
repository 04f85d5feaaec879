//! Scene Choreographer: owns both actors and sequences idle → walk → hug/idle.
//!
//! The choreographer is driven entirely from one thread. Hosts push inputs with
//! [`Choreographer::set_inputs`] and [`Choreographer::pointer`], call [`Choreographer::advance`]
//! once per display frame, and drain [`SceneEvent`]s afterwards. Track loads may run on a worker
//! thread; their results are only applied during `advance`.

use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, TryRecvError},
    },
    time::Duration,
};

use anyhow::Context;
use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::{
    animation::{clock::ClockTick, ease::Ease, tween::Tween},
    assets::{
        loader::{Backoff, FrameLoadFailure, FrameSequenceLoader, LoadedFrames},
        source::FrameSource,
    },
    foundation::error::EmbraceResult,
    runtime::timers::{TimerId, TimerQueue},
    scene::{
        config::SceneConfig,
        layout::{Actor, MAX_CLOSENESS, actor_position, hit_test},
        messages::select_message,
    },
    track::{
        frame_track::{FrameTrack, LoadState, TrackOutput},
        spec::FrameSequenceSpec,
    },
};

/// Animation action shared by both actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Both actors stand and loop their idle tracks.
    Idle,
    /// Both actors move toward their closeness positions.
    Walk,
    /// The shared hug track replaces both actors.
    Hug,
}

/// The six mounted tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSlot {
    /// Male idle loop.
    MaleIdle,
    /// Male walk loop.
    MaleWalk,
    /// Female idle loop.
    FemaleIdle,
    /// Female walk loop.
    FemaleWalk,
    /// Shared hug one-shot.
    Hug,
    /// Heart overlay one-shot.
    Heart,
}

impl TrackSlot {
    /// Every slot, in mount order.
    pub const ALL: [Self; 6] = [
        Self::MaleIdle,
        Self::MaleWalk,
        Self::FemaleIdle,
        Self::FemaleWalk,
        Self::Hug,
        Self::Heart,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn spec(self, cfg: &SceneConfig) -> &FrameSequenceSpec {
        let t = &cfg.tracks;
        match self {
            Self::MaleIdle => &t.male_idle,
            Self::MaleWalk => &t.male_walk,
            Self::FemaleIdle => &t.female_idle,
            Self::FemaleWalk => &t.female_walk,
            Self::Hug => &t.hug,
            Self::Heart => &t.heart,
        }
    }
}

/// Speech bubble above one actor.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Bubble {
    /// Who is speaking.
    pub actor: Actor,
    /// Flavor text.
    pub text: String,
}

/// Overlay state beyond the actors themselves.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneState {
    /// The heart overlay is revealed.
    pub show_heart: bool,
    /// Heart overlay size in percent of the scene (10–100).
    pub heart_scale: f64,
    /// The finale message is revealed.
    pub show_message: bool,
    /// Bubble currently showing, if any.
    pub bubble: Option<Bubble>,
}

/// Notifications for the embedding driver.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SceneEvent {
    /// A track finished loading.
    TrackLoaded {
        /// Which track.
        slot: TrackSlot,
    },
    /// A track lost too many frames and shows its error indicator.
    TrackFailed {
        /// Which track.
        slot: TrackSlot,
    },
    /// Every track reached a terminal load state. Sent once per generation.
    Ready,
    /// The actors started walking.
    WalkStarted {
        /// Closeness they walk toward.
        closeness: u8,
    },
    /// A walk ended.
    Arrived {
        /// Whether the hug started on arrival.
        hugging: bool,
    },
    /// The heart overlay appeared.
    HeartShown,
    /// The finale message appeared.
    MessageShown,
    /// The hug cascade finished; the driver may advance its persisted scene.
    HugSequenceComplete,
    /// A pointer press raised a bubble.
    BubbleShown {
        /// Who is speaking.
        actor: Actor,
        /// Flavor text.
        text: String,
    },
    /// The bubble timed out.
    BubbleCleared,
}

/// Result of loading one track, tagged with the generation that requested it.
#[derive(Debug)]
pub struct LoadReport {
    /// Generation current when the load was requested.
    pub generation: u64,
    /// Track the result belongs to.
    pub slot: TrackSlot,
    /// Loader verdict.
    pub result: Result<LoadedFrames, FrameLoadFailure>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    HeartReveal,
    HugFallback,
    MessageReveal,
    HugSequenceDone,
    BubbleClear,
}

#[derive(Debug, Default)]
struct TimerSlots {
    heart: Option<TimerId>,
    hug_fallback: Option<TimerId>,
    message: Option<TimerId>,
    done: Option<TimerId>,
    bubble: Option<TimerId>,
}

impl TimerSlots {
    fn slot_mut(&mut self, timer: Timer) -> &mut Option<TimerId> {
        match timer {
            Timer::HeartReveal => &mut self.heart,
            Timer::HugFallback => &mut self.hug_fallback,
            Timer::MessageReveal => &mut self.message,
            Timer::HugSequenceDone => &mut self.done,
            Timer::BubbleClear => &mut self.bubble,
        }
    }
}

/// Owns the six tracks and sequences the two actors through idle, walk and hug.
pub struct Choreographer {
    config: SceneConfig,
    generation: u64,
    tracks: Vec<FrameTrack>,

    closeness: u8,
    is_hugging: bool,
    action: Action,
    male: Tween,
    female: Tween,
    walking: bool,

    hug_playing: bool,
    hug_started_at: Option<Duration>,
    hug_finished: bool,
    heart_scale: Tween,
    state: SceneState,

    timers: TimerQueue<Timer>,
    slots: TimerSlots,
    rng: StdRng,
    loads: Option<Receiver<LoadReport>>,
    ready_sent: bool,
    outbox: Vec<SceneEvent>,
    now: Duration,
    torn_down: bool,
}

impl Choreographer {
    /// Validate `config` and mount every track, unloaded, at closeness 0.
    pub fn new(config: SceneConfig) -> EmbraceResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        let mut out = Self {
            tracks: Vec::new(),
            closeness: 0,
            is_hugging: false,
            action: Action::Idle,
            male: Tween::at_rest(0.0),
            female: Tween::at_rest(0.0),
            walking: false,
            hug_playing: false,
            hug_started_at: None,
            hug_finished: false,
            heart_scale: Tween::at_rest(config.timing.heart_scale_from),
            state: SceneState {
                show_heart: false,
                heart_scale: config.timing.heart_scale_from,
                show_message: false,
                bubble: None,
            },
            timers: TimerQueue::new(),
            slots: TimerSlots::default(),
            rng,
            loads: None,
            ready_sent: false,
            outbox: Vec::new(),
            now: Duration::ZERO,
            torn_down: false,
            generation: 0,
            config,
        };
        out.rebuild(Duration::ZERO);
        Ok(out)
    }

    /// Configuration the scene was built with.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Current load generation; bumped by reset and teardown.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current shared action.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Closeness the actors stand at or walk toward.
    pub fn closeness(&self) -> u8 {
        self.closeness
    }

    /// Whether a walk is in progress.
    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Time of the last `advance`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Overlay state.
    pub fn scene_state(&self) -> &SceneState {
        &self.state
    }

    /// The track mounted in `slot`.
    pub fn track(&self, slot: TrackSlot) -> &FrameTrack {
        &self.tracks[slot.index()]
    }

    /// Whether [`Choreographer::teardown`] ran since the last reset.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Current horizontal centers `(male, female)` in percent of the scene width.
    pub fn positions(&self) -> (f64, f64) {
        self.positions_at(self.now)
    }

    fn positions_at(&self, now: Duration) -> (f64, f64) {
        (self.male.value_at(now), self.female.value_at(now))
    }

    /// Number of timers still armed.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// All tracks reached `Loaded` or `Failed`.
    pub fn all_tracks_settled(&self) -> bool {
        self.tracks.iter().all(|t| t.load_state().is_terminal())
    }

    /// Take every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Observe the driver's `closeness` and `is_hugging` signals.
    ///
    /// A changed closeness starts a walk toward the new positions; `is_hugging` is only read
    /// once the walk arrives.
    pub fn set_inputs(&mut self, closeness: u8, is_hugging: bool, now: Duration) {
        if self.torn_down {
            return;
        }
        self.is_hugging = is_hugging;
        if closeness == self.closeness {
            return;
        }
        if closeness < self.closeness {
            tracing::warn!(
                current = self.closeness,
                requested = closeness,
                "closeness only decreases through reset; ignoring"
            );
            return;
        }
        let closeness = if closeness > MAX_CLOSENESS {
            tracing::warn!(requested = closeness, "closeness clamped to {MAX_CLOSENESS}");
            MAX_CLOSENESS
        } else {
            closeness
        };
        if closeness == self.closeness {
            return;
        }

        let now = now.max(self.now);
        self.closeness = closeness;
        self.action = Action::Walk;
        self.walking = true;

        let walk = Duration::from_millis(self.config.timing.walk_ms);
        let layout = &self.config.layout;
        let male_to = actor_position(layout, Actor::Male, closeness);
        let female_to = actor_position(layout, Actor::Female, closeness);
        self.male.retarget(male_to, now, walk, Ease::EASE_IN_OUT);
        self.female.retarget(female_to, now, walk, Ease::EASE_IN_OUT);

        tracing::debug!(closeness, "walk started");
        self.sync_tracks();
        self.outbox.push(SceneEvent::WalkStarted { closeness });
    }

    /// Place both actors at `closeness` without walking, as when a persisted session resumes.
    ///
    /// A session that was hugging resumes as if the walk had just arrived: the hug plays again
    /// and the heart and message follow on their usual delays.
    pub fn resume_at(&mut self, closeness: u8, is_hugging: bool, now: Duration) {
        if self.torn_down {
            return;
        }
        let now = now.max(self.now);
        let closeness = closeness.min(MAX_CLOSENESS);
        let layout = &self.config.layout;
        self.male = Tween::at_rest(actor_position(layout, Actor::Male, closeness));
        self.female = Tween::at_rest(actor_position(layout, Actor::Female, closeness));
        self.closeness = closeness;
        self.is_hugging = is_hugging;
        self.walking = false;
        self.action = Action::Idle;
        self.now = now;
        if is_hugging {
            self.finish_walk(now);
        } else {
            self.sync_tracks();
        }
    }

    /// Hit-test a pointer press at `now`. `x_fraction` is the press position across the scene
    /// (0..1).
    ///
    /// Only answers while both actors idle; a hit shows a bubble for the chosen actor and
    /// replaces any bubble already showing.
    pub fn pointer(
        &mut self,
        x_fraction: f64,
        scene_width_px: f64,
        viewport_width_px: f64,
        now: Duration,
    ) -> Option<Actor> {
        if self.torn_down || self.action != Action::Idle {
            return None;
        }
        let now = now.max(self.now);
        let (male, female) = self.positions_at(now);
        let actor = hit_test(
            &self.config.layout,
            male,
            female,
            x_fraction,
            scene_width_px,
            viewport_width_px,
        )?;

        let seed = self.rng.next_u64();
        let text = select_message(&self.config.messages, actor, seed)?.to_string();

        self.timers.cancel_slot(&mut self.slots.bubble);
        let deadline = now + Duration::from_millis(self.config.timing.bubble_ms);
        self.slots.bubble = Some(self.timers.schedule_at(deadline, Timer::BubbleClear));

        self.state.bubble = Some(Bubble {
            actor,
            text: text.clone(),
        });
        self.outbox.push(SceneEvent::BubbleShown { actor, text });
        Some(actor)
    }

    /// Move the scene to `now`: apply finished loads, complete position transitions, fire due
    /// timers in deadline order, then service every pending track tick.
    pub fn advance(&mut self, now: Duration) {
        if self.torn_down {
            return;
        }
        let now = now.max(self.now);
        self.drain_loads();

        loop {
            let walk_end = self.walk_end().filter(|t| *t <= now);
            let timer_due = self.timers.next_deadline().filter(|t| *t <= now);
            match (walk_end, timer_due) {
                (Some(w), Some(t)) if t < w => self.fire_next_timer(now),
                (Some(w), _) => self.finish_walk(w),
                (None, Some(_)) => self.fire_next_timer(now),
                (None, None) => break,
            }
        }

        self.now = now;
        self.state.heart_scale = self.heart_scale.value_at(now);
        self.tick_tracks(now);
        self.check_ready();
    }

    /// Dispatch loads for every track that has not started loading, on a worker thread.
    pub fn start_loading(
        &mut self,
        source: Arc<dyn FrameSource>,
        backoff: Arc<dyn Backoff>,
    ) -> EmbraceResult<()> {
        let jobs = self.pending_jobs();
        if jobs.is_empty() {
            return Ok(());
        }
        let loader = FrameSequenceLoader::new(source, backoff, self.config.loader.clone())?;
        let generation = self.generation;
        let (tx, rx) = mpsc::channel();

        std::thread::Builder::new()
            .name(format!("embrace-tracks-{generation}"))
            .spawn(move || {
                for (slot, spec) in jobs {
                    let result = loader.load(&spec);
                    let report = LoadReport {
                        generation,
                        slot,
                        result,
                    };
                    if tx.send(report).is_err() {
                        break;
                    }
                }
            })
            .context("spawn track loader thread")?;

        self.mark_loading();
        self.loads = Some(rx);
        Ok(())
    }

    /// Load every pending track on the calling thread and apply the results immediately.
    pub fn load_blocking(
        &mut self,
        source: Arc<dyn FrameSource>,
        backoff: Arc<dyn Backoff>,
    ) -> EmbraceResult<()> {
        let jobs = self.pending_jobs();
        if jobs.is_empty() {
            return Ok(());
        }
        let loader = FrameSequenceLoader::new(source, backoff, self.config.loader.clone())?;
        self.mark_loading();
        for (slot, spec) in jobs {
            let result = loader.load(&spec);
            self.apply_report(LoadReport {
                generation: self.generation,
                slot,
                result,
            });
        }
        self.check_ready();
        Ok(())
    }

    /// Mark pending tracks as loading without dispatching anything; results are expected via
    /// [`Choreographer::deliver`]. Returns the generation reports must carry.
    pub fn begin_external_load(&mut self) -> u64 {
        self.mark_loading();
        self.generation
    }

    /// Apply a load result produced elsewhere. Reports from an older generation are dropped.
    pub fn deliver(&mut self, report: LoadReport) {
        if self.torn_down {
            return;
        }
        self.apply_report(report);
        self.check_ready();
    }

    /// Return to the initial scene. In-flight loads, pending ticks and timers from before the
    /// reset can no longer touch the new state; tracks must be loaded again.
    pub fn reset(&mut self, now: Duration) {
        tracing::debug!(generation = self.generation, "scene reset");
        self.torn_down = false;
        self.rebuild(now);
    }

    /// Cancel every timer and tick and stop listening for loads. Further input is ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        for track in &mut self.tracks {
            track.cancel();
        }
        self.loads = None;
        self.generation += 1;
        self.torn_down = true;
    }

    /// Describe what the render surface should draw right now.
    pub fn frame(&self) -> SceneFrame<'_> {
        let (male_pos, female_pos) = self.positions();
        let walking = self.action == Action::Walk;
        let hugging = self.action == Action::Hug;
        let bubble_for = |actor: Actor| {
            self.state
                .bubble
                .as_ref()
                .filter(|b| b.actor == actor)
                .map(|b| b.text.as_str())
        };
        let actor_frame = |actor: Actor, position_percent: f64, idle: TrackSlot, walk: TrackSlot| {
            ActorFrame {
                actor,
                position_percent,
                visible: !hugging,
                idle: self.track(idle).output(),
                idle_visible: !walking,
                walk: self.track(walk).output(),
                walk_visible: walking,
                bubble: bubble_for(actor),
            }
        };

        SceneFrame {
            action: self.action,
            interactive: self.action == Action::Idle && !self.torn_down,
            male: actor_frame(
                Actor::Male,
                male_pos,
                TrackSlot::MaleIdle,
                TrackSlot::MaleWalk,
            ),
            female: actor_frame(
                Actor::Female,
                female_pos,
                TrackSlot::FemaleIdle,
                TrackSlot::FemaleWalk,
            ),
            hug: OverlayFrame {
                output: self.track(TrackSlot::Hug).output(),
                visible: hugging,
            },
            heart: OverlayFrame {
                output: self.track(TrackSlot::Heart).output(),
                visible: self.state.show_heart,
            },
            heart_scale: self.state.heart_scale,
            message: self
                .state
                .show_message
                .then_some(self.config.messages.finale.as_str()),
        }
    }

    fn rebuild(&mut self, now: Duration) {
        self.timers.cancel_all();
        self.slots = TimerSlots::default();
        self.loads = None;
        self.generation += 1;

        let cfg = &self.config;
        self.tracks = TrackSlot::ALL
            .iter()
            .map(|slot| FrameTrack::new(slot.spec(cfg).clone(), true))
            .collect();

        self.closeness = 0;
        self.is_hugging = false;
        self.action = Action::Idle;
        self.walking = false;
        self.male = Tween::at_rest(actor_position(&cfg.layout, Actor::Male, 0));
        self.female = Tween::at_rest(actor_position(&cfg.layout, Actor::Female, 0));
        self.hug_playing = false;
        self.hug_started_at = None;
        self.hug_finished = false;
        self.heart_scale = Tween::at_rest(cfg.timing.heart_scale_from);
        self.state = SceneState {
            show_heart: false,
            heart_scale: cfg.timing.heart_scale_from,
            show_message: false,
            bubble: None,
        };
        self.ready_sent = false;
        self.outbox.clear();
        self.now = now;
        self.sync_tracks();
    }

    // Idle tracks always run; everything else runs only while its part of the scene is live.
    fn sync_tracks(&mut self) {
        let walking = self.action == Action::Walk;
        let hug_playing = self.hug_playing;
        let show_heart = self.state.show_heart;
        for slot in TrackSlot::ALL {
            let paused = match slot {
                TrackSlot::MaleIdle | TrackSlot::FemaleIdle => false,
                TrackSlot::MaleWalk | TrackSlot::FemaleWalk => !walking,
                TrackSlot::Hug => !hug_playing,
                TrackSlot::Heart => !show_heart,
            };
            self.tracks[slot.index()].set_paused(paused);
        }
    }

    // Both actors share one duration and easing, but the walk only counts as finished once
    // both transitions have ended.
    fn walk_end(&self) -> Option<Duration> {
        self.walking.then(|| self.male.end().max(self.female.end()))
    }

    fn finish_walk(&mut self, at: Duration) {
        self.walking = false;
        if self.is_hugging {
            tracing::debug!("arrived; starting hug");
            self.action = Action::Hug;
            self.hug_playing = true;
            self.hug_started_at = Some(at);

            self.timers.cancel_slot(&mut self.slots.heart);
            let reveal = at + Duration::from_millis(self.config.timing.heart_delay_ms);
            self.slots.heart = Some(self.timers.schedule_at(reveal, Timer::HeartReveal));
            self.arm_hug_fallback_if_failed(at);
        } else {
            tracing::debug!("arrived; back to idle");
            self.action = Action::Idle;
        }
        self.sync_tracks();
        self.outbox.push(SceneEvent::Arrived {
            hugging: self.is_hugging,
        });
    }

    // A failed hug track never reports completion, so stand in with its nominal duration.
    fn arm_hug_fallback_if_failed(&mut self, now: Duration) {
        if !self.hug_playing
            || self.hug_finished
            || self.slots.hug_fallback.is_some()
            || !self.track(TrackSlot::Hug).did_fail()
        {
            return;
        }
        let started = self.hug_started_at.unwrap_or(now);
        let due = (started + self.config.tracks.hug.nominal_duration()).max(now);
        self.slots.hug_fallback = Some(self.timers.schedule_at(due, Timer::HugFallback));
    }

    fn fire_next_timer(&mut self, now: Duration) {
        let Some((id, at, timer)) = self.timers.pop_due(now) else {
            return;
        };
        let slot = self.slots.slot_mut(timer);
        if *slot == Some(id) {
            *slot = None;
        }
        self.on_timer(timer, at);
    }

    fn on_timer(&mut self, timer: Timer, at: Duration) {
        let timing = &self.config.timing;
        match timer {
            Timer::HeartReveal => {
                tracing::debug!("heart revealed");
                self.state.show_heart = true;
                self.heart_scale = Tween::new(
                    timing.heart_scale_from,
                    timing.heart_scale_to,
                    at,
                    Duration::from_millis(timing.heart_grow_ms),
                    Ease::EASE_OUT,
                );
                self.sync_tracks();
                self.outbox.push(SceneEvent::HeartShown);
            }
            Timer::HugFallback => self.on_hug_complete(at),
            Timer::MessageReveal => {
                tracing::debug!("final message shown");
                self.state.show_message = true;
                let due = at + Duration::from_millis(timing.completion_delay_ms);
                self.slots.done = Some(self.timers.schedule_at(due, Timer::HugSequenceDone));
                self.outbox.push(SceneEvent::MessageShown);
            }
            Timer::HugSequenceDone => {
                tracing::debug!("hug sequence complete");
                self.outbox.push(SceneEvent::HugSequenceComplete);
            }
            Timer::BubbleClear => {
                self.state.bubble = None;
                self.outbox.push(SceneEvent::BubbleCleared);
            }
        }
    }

    fn on_hug_complete(&mut self, at: Duration) {
        if self.hug_finished {
            return;
        }
        self.hug_finished = true;
        self.timers.cancel_slot(&mut self.slots.hug_fallback);
        let due = at + Duration::from_millis(self.config.timing.message_delay_ms);
        self.slots.message = Some(self.timers.schedule_at(due, Timer::MessageReveal));
    }

    fn tick_tracks(&mut self, now: Duration) {
        for slot in TrackSlot::ALL {
            let tick = self.tracks[slot.index()].tick(now);
            if slot == TrackSlot::Hug && tick == ClockTick::Completed {
                self.on_hug_complete(now);
            }
        }
    }

    fn pending_jobs(&self) -> Vec<(TrackSlot, FrameSequenceSpec)> {
        TrackSlot::ALL
            .iter()
            .filter(|slot| self.track(**slot).load_state() == LoadState::NotLoaded)
            .map(|slot| (*slot, self.track(*slot).spec().clone()))
            .collect()
    }

    fn mark_loading(&mut self) {
        for track in &mut self.tracks {
            track.begin_loading();
        }
    }

    fn drain_loads(&mut self) {
        let Some(rx) = &self.loads else {
            return;
        };
        let mut reports = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(report) => reports.push(report),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            self.loads = None;
        }
        for report in reports {
            self.apply_report(report);
        }
    }

    fn apply_report(&mut self, report: LoadReport) {
        if report.generation != self.generation {
            tracing::warn!(
                slot = ?report.slot,
                report_generation = report.generation,
                generation = self.generation,
                "dropping stale load report"
            );
            return;
        }
        let track = &mut self.tracks[report.slot.index()];
        if track.load_state() != LoadState::Loading {
            return;
        }
        match track.finish_loading(report.result) {
            LoadState::Loaded => self.outbox.push(SceneEvent::TrackLoaded { slot: report.slot }),
            LoadState::Failed => {
                self.outbox.push(SceneEvent::TrackFailed { slot: report.slot });
                if report.slot == TrackSlot::Hug {
                    self.arm_hug_fallback_if_failed(self.now);
                }
            }
            LoadState::NotLoaded | LoadState::Loading => {}
        }
    }

    fn check_ready(&mut self) {
        if !self.ready_sent && self.all_tracks_settled() {
            self.ready_sent = true;
            self.outbox.push(SceneEvent::Ready);
        }
    }
}

/// One actor as the render surface should draw it.
#[derive(Clone, Copy, Debug)]
pub struct ActorFrame<'a> {
    /// Which actor.
    pub actor: Actor,
    /// Horizontal center in percent of the scene width.
    pub position_percent: f64,
    /// Hidden while the hug track stands in for both actors.
    pub visible: bool,
    /// Idle track output.
    pub idle: TrackOutput<'a>,
    /// Whether the idle layer shows; it stays mounted either way.
    pub idle_visible: bool,
    /// Walk track output.
    pub walk: TrackOutput<'a>,
    /// Whether the walk layer shows.
    pub walk_visible: bool,
    /// Bubble text above this actor.
    pub bubble: Option<&'a str>,
}

/// A full-scene overlay track.
#[derive(Clone, Copy, Debug)]
pub struct OverlayFrame<'a> {
    /// Track output.
    pub output: TrackOutput<'a>,
    /// Whether the overlay shows.
    pub visible: bool,
}

/// Snapshot of the whole render surface.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    /// Shared action.
    pub action: Action,
    /// Pointer input is only honored while this is true.
    pub interactive: bool,
    /// Left-hand actor.
    pub male: ActorFrame<'a>,
    /// Right-hand actor.
    pub female: ActorFrame<'a>,
    /// Hug overlay.
    pub hug: OverlayFrame<'a>,
    /// Heart overlay.
    pub heart: OverlayFrame<'a>,
    /// Heart size in percent of the scene.
    pub heart_scale: f64,
    /// Finale message, once revealed.
    pub message: Option<&'a str>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/choreographer.rs"]
mod tests;
