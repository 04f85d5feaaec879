//! Frame Sequence Loader: fetches every frame of one track in bounded batches with retry.

use std::{sync::Arc, time::Duration};

use rayon::prelude::*;

use crate::{
    assets::{
        decode::{PreparedFrame, decode_frame},
        source::FrameSource,
    },
    foundation::error::{EmbraceError, EmbraceResult},
    track::spec::FrameSequenceSpec,
};

/// Frames fetched concurrently per batch.
pub const LOAD_BATCH_SIZE: usize = 6;
/// Extra attempts per frame after the first failure.
pub const MAX_FETCH_RETRIES: u32 = 2;
/// Backoff before retry `n` is `n * RETRY_BACKOFF_STEP_MS`.
pub const RETRY_BACKOFF_STEP_MS: u64 = 500;
/// A load succeeds while at most this share of frames failed.
pub const MAX_FAILURE_PERCENT: u32 = 10;

/// Tunables for [`FrameSequenceLoader`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderOpts {
    /// Frames fetched concurrently per batch.
    pub batch_size: usize,
    /// Extra attempts per frame after the first failure.
    pub max_retries: u32,
    /// Backoff before retry `n` is `n * backoff_step_ms`.
    pub backoff_step_ms: u64,
    /// Largest share of frames, in percent, that may fail.
    pub max_failure_percent: u32,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            batch_size: LOAD_BATCH_SIZE,
            max_retries: MAX_FETCH_RETRIES,
            backoff_step_ms: RETRY_BACKOFF_STEP_MS,
            max_failure_percent: MAX_FAILURE_PERCENT,
        }
    }
}

impl LoaderOpts {
    /// Reject a zero batch size or a tolerance above 100 %.
    pub fn validate(&self) -> EmbraceResult<()> {
        if self.batch_size == 0 {
            return Err(EmbraceError::validation("loader batch_size must be >= 1"));
        }
        if self.max_failure_percent > 100 {
            return Err(EmbraceError::validation(
                "loader max_failure_percent must be <= 100",
            ));
        }
        Ok(())
    }

    /// Delay before the `retry`-th retry (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms.saturating_mul(u64::from(retry)))
    }

    /// Inclusive boundary: exactly `max_failure_percent` of the frames failing still succeeds.
    pub fn within_tolerance(&self, failed: u32, total: u32) -> bool {
        u64::from(failed) * 100 <= u64::from(total) * u64::from(self.max_failure_percent)
    }
}

/// Waits between fetch attempts.
pub trait Backoff: Send + Sync {
    /// Wait for `delay` before the next attempt.
    fn wait(&self, delay: Duration);
}

/// Blocks the calling loader worker for the backoff delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepBackoff;

impl Backoff for SleepBackoff {
    fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// A track lost more frames than the tolerance allows.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("frame sequence '{base_path}' lost {failed}/{total} frames")]
pub struct FrameLoadFailure {
    /// Track base path.
    pub base_path: String,
    /// Frames that could not be fetched or decoded.
    pub failed: u32,
    /// Frames in the track.
    pub total: u32,
}

/// Decoded frames of a successfully loaded track, addressable by index.
///
/// Frames that failed within the tolerance are holes (`None`).
#[derive(Clone, Debug)]
pub struct LoadedFrames {
    frames: Vec<Option<PreparedFrame>>,
    failed: u32,
}

impl LoadedFrames {
    /// Wrap frames produced elsewhere; holes count as failed frames.
    pub fn from_frames(frames: Vec<Option<PreparedFrame>>) -> Self {
        let failed = frames.iter().filter(|f| f.is_none()).count() as u32;
        Self { frames, failed }
    }

    /// Frame `index`, or `None` for a hole or an out-of-range index.
    pub fn get(&self, index: u32) -> Option<&PreparedFrame> {
        self.frames.get(index as usize).and_then(Option::as_ref)
    }

    /// Number of frame slots, holes included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frame slots.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of holes.
    pub fn failed_count(&self) -> u32 {
        self.failed
    }
}

/// Loads whole frame sequences from a [`FrameSource`].
pub struct FrameSequenceLoader {
    source: Arc<dyn FrameSource>,
    backoff: Arc<dyn Backoff>,
    opts: LoaderOpts,
    pool: rayon::ThreadPool,
}

impl FrameSequenceLoader {
    /// Build a loader with its own worker pool of `opts.batch_size` threads.
    pub fn new(
        source: Arc<dyn FrameSource>,
        backoff: Arc<dyn Backoff>,
        opts: LoaderOpts,
    ) -> EmbraceResult<Self> {
        opts.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.batch_size)
            .thread_name(|i| format!("embrace-load-{i}"))
            .build()
            .map_err(|e| {
                EmbraceError::validation(format!("failed to build loader thread pool: {e}"))
            })?;
        Ok(Self {
            source,
            backoff,
            opts,
            pool,
        })
    }

    /// Options this loader was built with.
    pub fn opts(&self) -> &LoaderOpts {
        &self.opts
    }

    /// Fetch every frame of `spec`. Batches run one after another; frames within a batch run
    /// concurrently. Nothing is exposed until the whole track has been judged.
    #[tracing::instrument(skip(self, spec), fields(track = spec.base_path()))]
    pub fn load(&self, spec: &FrameSequenceSpec) -> Result<LoadedFrames, FrameLoadFailure> {
        let total = spec.frame_count();
        let mut frames = Vec::with_capacity(total as usize);
        let batch = self.opts.batch_size as u32;

        let mut start = 0u32;
        while start < total {
            let end = start.saturating_add(batch).min(total);
            let fetched: Vec<Option<PreparedFrame>> = self.pool.install(|| {
                (start..end)
                    .into_par_iter()
                    .map(|i| self.fetch_with_retry(&spec.frame_path(i)))
                    .collect()
            });
            frames.extend(fetched);
            start = end;
        }

        let frames = LoadedFrames::from_frames(frames);
        let failed = frames.failed_count();
        if !self.opts.within_tolerance(failed, total) {
            tracing::warn!(failed, total, "frame sequence failed to load");
            return Err(FrameLoadFailure {
                base_path: spec.base_path().to_string(),
                failed,
                total,
            });
        }

        tracing::debug!(failed, total, "frame sequence loaded");
        Ok(frames)
    }

    fn fetch_with_retry(&self, rel_path: &str) -> Option<PreparedFrame> {
        let mut retry = 0u32;
        loop {
            let attempt = self
                .source
                .fetch(rel_path)
                .map_err(EmbraceError::from)
                .and_then(|bytes| decode_frame(&bytes));
            match attempt {
                Ok(frame) => return Some(frame),
                Err(e) if retry < self.opts.max_retries => {
                    retry += 1;
                    tracing::warn!(
                        path = rel_path,
                        retry,
                        error = %e,
                        "frame fetch failed; retrying"
                    );
                    self.backoff.wait(self.opts.backoff_for(retry));
                }
                Err(e) => {
                    tracing::warn!(path = rel_path, error = %e, "frame fetch gave up");
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
