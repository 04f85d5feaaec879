//! Frame Track: one animation sequence with its own load and playback lifecycle.

use std::time::Duration;

use crate::{
    animation::clock::{ClockTick, FrameClock},
    assets::{
        decode::PreparedFrame,
        loader::{FrameLoadFailure, LoadedFrames},
    },
    foundation::core::FrameIndex,
    track::spec::FrameSequenceSpec,
};

/// Load lifecycle of a track. `Loaded` and `Failed` are terminal for a track instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum LoadState {
    /// No load requested yet.
    NotLoaded,
    /// A load is in flight.
    Loading,
    /// Frames are available.
    Loaded,
    /// Too many frames were lost.
    Failed,
}

impl LoadState {
    /// `Loaded` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// Playback view of a loaded track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    /// Frame currently presented.
    pub current_frame_index: FrameIndex,
    /// A tick is pending.
    pub playing: bool,
    /// A one-shot finished during this activation.
    pub completed: bool,
}

/// What the track contributes to the render surface right now.
#[derive(Clone, Copy, Debug)]
pub enum TrackOutput<'a> {
    /// Not loaded yet: reserve layout space, draw nothing.
    Placeholder,
    /// Load failed: draw the in-place error indicator.
    Error,
    /// Draw this frame. `image` is `None` for a frame that was dropped within tolerance.
    Frame {
        /// Frame to present.
        index: FrameIndex,
        /// Decoded pixels, absent for a dropped frame.
        image: Option<&'a PreparedFrame>,
    },
    /// A one-shot without hold has finished; nothing is drawn.
    Blank,
}

impl TrackOutput<'_> {
    /// Index presented, for [`TrackOutput::Frame`].
    pub fn frame_index(&self) -> Option<FrameIndex> {
        match self {
            Self::Frame { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One mounted frame sequence: its frames, load state and clock.
#[derive(Debug)]
pub struct FrameTrack {
    spec: FrameSequenceSpec,
    load: LoadState,
    frames: Option<LoadedFrames>,
    failure: Option<FrameLoadFailure>,
    paused: bool,
    clock: FrameClock,
}

impl FrameTrack {
    /// A track that has not started loading.
    pub fn new(spec: FrameSequenceSpec, paused: bool) -> Self {
        let clock = FrameClock::new(
            spec.fps(),
            spec.frame_count(),
            spec.is_looping(),
            spec.holds_last_frame(),
        );
        Self {
            spec,
            load: LoadState::NotLoaded,
            frames: None,
            failure: None,
            paused,
            clock,
        }
    }

    /// What this track plays.
    pub fn spec(&self) -> &FrameSequenceSpec {
        &self.spec
    }

    /// Current load state.
    pub fn load_state(&self) -> LoadState {
        self.load
    }

    /// Frames are loaded.
    pub fn is_ready(&self) -> bool {
        self.load == LoadState::Loaded
    }

    /// The load failed.
    pub fn did_fail(&self) -> bool {
        self.load == LoadState::Failed
    }

    /// Why the load failed.
    pub fn failure(&self) -> Option<&FrameLoadFailure> {
        self.failure.as_ref()
    }

    /// Current paused input.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `NotLoaded -> Loading`. Returns `false` if a load was already started for this instance.
    pub fn begin_loading(&mut self) -> bool {
        if self.load != LoadState::NotLoaded {
            return false;
        }
        self.load = LoadState::Loading;
        true
    }

    /// Apply the loader's verdict. Ignored unless the track is `Loading`.
    pub fn finish_loading(&mut self, result: Result<LoadedFrames, FrameLoadFailure>) -> LoadState {
        if self.load != LoadState::Loading {
            return self.load;
        }
        match result {
            Ok(frames) => {
                self.frames = Some(frames);
                self.load = LoadState::Loaded;
            }
            Err(failure) => {
                tracing::warn!(track = self.spec.base_path(), %failure, "track unavailable");
                self.failure = Some(failure);
                self.load = LoadState::Failed;
            }
        }
        self.sync_clock();
        self.load
    }

    /// Drive the paused input; playback restarts from frame 0 on every unpause.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.sync_clock();
    }

    /// Service this track's pending tick request, if any.
    pub fn tick(&mut self, now: Duration) -> ClockTick {
        if self.load != LoadState::Loaded {
            return ClockTick::Idle;
        }
        self.clock.tick(now)
    }

    /// Drop any pending tick. Idempotent.
    pub fn cancel(&mut self) {
        self.clock.cancel();
    }

    /// Whether a tick is outstanding for a loaded track.
    pub fn tick_pending(&self) -> bool {
        self.load == LoadState::Loaded && self.clock.tick_pending()
    }

    /// Playback view, once loaded.
    pub fn playback(&self) -> Option<PlaybackState> {
        if self.load != LoadState::Loaded {
            return None;
        }
        Some(PlaybackState {
            current_frame_index: self.clock.current().unwrap_or(FrameIndex(
                self.spec.frame_count().saturating_sub(1),
            )),
            playing: self.clock.is_running() && self.clock.tick_pending(),
            completed: self.clock.is_completed(),
        })
    }

    /// Pixels currently presented, if any.
    pub fn current_frame(&self) -> Option<&PreparedFrame> {
        match self.output() {
            TrackOutput::Frame { image, .. } => image,
            _ => None,
        }
    }

    /// What to draw for this track.
    pub fn output(&self) -> TrackOutput<'_> {
        match self.load {
            LoadState::NotLoaded | LoadState::Loading => TrackOutput::Placeholder,
            LoadState::Failed => TrackOutput::Error,
            LoadState::Loaded => match self.clock.current() {
                Some(index) => TrackOutput::Frame {
                    index,
                    image: self.frames.as_ref().and_then(|f| f.get(index.0)),
                },
                None => TrackOutput::Blank,
            },
        }
    }

    fn sync_clock(&mut self) {
        self.clock
            .set_running(self.load == LoadState::Loaded && !self.paused);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/frame_track.rs"]
mod tests;
