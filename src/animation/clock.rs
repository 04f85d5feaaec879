//! Frame Clock: maps elapsed wall time onto a discrete frame index.
//!
//! The clock does not own a scheduler. While it is active it holds exactly one pending tick
//! request, which the host satisfies by calling [`FrameClock::tick`] on its next display frame.
//! Pausing drops the pending request, so a stray `tick` afterwards is a no-op.

use std::time::Duration;

use crate::foundation::core::{Fps, FrameIndex};

/// Outcome of servicing one tick request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockTick {
    /// No tick was pending (paused, completed, or never activated).
    Idle,
    /// A frame should be shown; another tick has been requested.
    Frame(FrameIndex),
    /// The one-shot sequence finished on this tick. Reported once per activation.
    Completed,
}

/// Playback clock for one frame sequence, serviced one tick at a time.
#[derive(Clone, Debug)]
pub struct FrameClock {
    fps: Fps,
    frame_count: u32,
    looping: bool,
    hold_last_frame: bool,

    running: bool,
    tick_pending: bool,
    origin: Option<Duration>,
    index: u32,
    completed: bool,
    visible: bool,
}

impl FrameClock {
    /// `frame_count` must be positive; [`crate::FrameSequenceSpec`] validates this upstream.
    pub fn new(fps: Fps, frame_count: u32, looping: bool, hold_last_frame: bool) -> Self {
        Self {
            fps,
            frame_count: frame_count.max(1),
            looping,
            hold_last_frame,
            running: false,
            tick_pending: false,
            origin: None,
            index: 0,
            completed: false,
            visible: true,
        }
    }

    /// Drive the paused input. A paused→playing edge restarts from frame 0 with a fresh origin
    /// and re-arms the completion guard; a playing→paused edge cancels the pending tick.
    pub fn set_running(&mut self, running: bool) {
        if running == self.running {
            return;
        }
        self.running = running;
        if running {
            self.origin = None;
            self.index = 0;
            self.completed = false;
            self.visible = true;
            self.tick_pending = true;
        } else {
            self.cancel();
        }
    }

    /// Drop the pending tick request. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.tick_pending = false;
    }

    /// Whether the paused input currently reads playing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a tick request is outstanding.
    pub fn tick_pending(&self) -> bool {
        self.tick_pending
    }

    /// A one-shot reached its last frame during this activation.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Index to present, or `None` once a one-shot without hold has finished.
    pub fn current(&self) -> Option<FrameIndex> {
        self.visible.then_some(FrameIndex(self.index))
    }

    /// Service the pending tick request at `now`.
    pub fn tick(&mut self, now: Duration) -> ClockTick {
        if !self.tick_pending {
            return ClockTick::Idle;
        }
        let origin = *self.origin.get_or_insert(now);
        let elapsed_frames = self.fps.frames_elapsed(now.saturating_sub(origin));
        let count = u64::from(self.frame_count);

        if self.looping {
            self.index = (elapsed_frames % count) as u32;
            return ClockTick::Frame(FrameIndex(self.index));
        }

        let last = count - 1;
        if elapsed_frames < last {
            self.index = elapsed_frames as u32;
            return ClockTick::Frame(FrameIndex(self.index));
        }

        self.tick_pending = false;
        if self.hold_last_frame {
            self.index = last as u32;
        } else {
            self.visible = false;
        }
        if self.completed {
            return ClockTick::Idle;
        }
        self.completed = true;
        ClockTick::Completed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
