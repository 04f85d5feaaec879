use std::time::Duration;

use crate::{
    assets::source::{frame_path, normalize_rel_path},
    foundation::core::Fps,
    foundation::error::{EmbraceError, EmbraceResult},
};

/// Immutable description of one animation track.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSequenceSpec {
    base_path: String,
    frame_count: u32,
    fps: Fps,
    #[serde(default)]
    looping: bool,
    #[serde(default)]
    hold_last_frame: bool,
}

impl FrameSequenceSpec {
    /// Validated spec; `base_path` is normalized to a clean relative path.
    pub fn new(
        base_path: &str,
        frame_count: u32,
        fps: Fps,
        looping: bool,
        hold_last_frame: bool,
    ) -> EmbraceResult<Self> {
        let spec = Self {
            base_path: normalize_rel_path(base_path)?,
            frame_count,
            fps,
            looping,
            hold_last_frame,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// For compile-time defaults whose path and counts are known to be valid.
    pub(crate) fn builtin(
        base_path: &str,
        frame_count: u32,
        fps: Fps,
        looping: bool,
        hold_last_frame: bool,
    ) -> Self {
        Self {
            base_path: base_path.to_string(),
            frame_count,
            fps,
            looping,
            hold_last_frame,
        }
    }

    /// A sequence that wraps around forever.
    pub fn looping(base_path: &str, frame_count: u32, fps: Fps) -> EmbraceResult<Self> {
        Self::new(base_path, frame_count, fps, true, false)
    }

    /// A sequence that plays once, optionally holding its last frame.
    pub fn one_shot(
        base_path: &str,
        frame_count: u32,
        fps: Fps,
        hold_last_frame: bool,
    ) -> EmbraceResult<Self> {
        Self::new(base_path, frame_count, fps, false, hold_last_frame)
    }

    /// Reject an empty sequence, a bad rate or a bad path.
    pub fn validate(&self) -> EmbraceResult<()> {
        if self.frame_count == 0 {
            return Err(EmbraceError::validation(format!(
                "track '{}' frame_count must be > 0",
                self.base_path
            )));
        }
        self.fps.validate()?;
        if normalize_rel_path(&self.base_path)? != self.base_path {
            return Err(EmbraceError::validation(format!(
                "track base path '{}' is not normalized",
                self.base_path
            )));
        }
        Ok(())
    }

    /// Directory holding the frames, relative to the source root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of frames.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Presentation rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Whether playback wraps around.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a finished one-shot keeps showing its last frame.
    pub fn holds_last_frame(&self) -> bool {
        self.hold_last_frame
    }

    /// Source path of frame `index`.
    pub fn frame_path(&self, index: u32) -> String {
        frame_path(&self.base_path, index)
    }

    /// Time a one-shot play needs to reach its last frame.
    pub fn nominal_duration(&self) -> Duration {
        self.fps
            .time_until_frame(u64::from(self.frame_count.saturating_sub(1)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/spec.rs"]
mod tests;
