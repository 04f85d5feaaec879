use std::time::Duration;

use crate::foundation::error::{EmbraceError, EmbraceResult};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Zero-based frame number within a sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Presentation rate as a positive rational `num / den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Validated `num / den` frames per second.
    pub fn new(num: u32, den: u32) -> EmbraceResult<Self> {
        if den == 0 {
            return Err(EmbraceError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(EmbraceError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second.
    pub fn whole(fps: u32) -> EmbraceResult<Self> {
        Self::new(fps, 1)
    }

    /// Reject a zero numerator or denominator.
    pub fn validate(self) -> EmbraceResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    /// Rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// `floor(elapsed * fps)`, computed on integer nanoseconds so long runs do not drift.
    pub fn frames_elapsed(self, elapsed: Duration) -> u64 {
        let nanos = elapsed.as_nanos();
        let frames = nanos * u128::from(self.num) / (NANOS_PER_SEC * u128::from(self.den));
        u64::try_from(frames).unwrap_or(u64::MAX)
    }

    /// Smallest duration after which `frames_elapsed` reports at least `frames`.
    pub fn time_until_frame(self, frames: u64) -> Duration {
        let num = u128::from(self.num);
        let nanos = (u128::from(frames) * u128::from(self.den) * NANOS_PER_SEC).div_ceil(num);
        let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
        Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
