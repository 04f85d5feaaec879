use std::time::Duration;

use crate::animation::ease::Ease;

/// Time-based scalar transition, the engine's stand-in for a CSS property transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Value at `start`.
    pub from: f64,
    /// Value from `start + duration` on.
    pub to: f64,
    /// When the transition begins.
    pub start: Duration,
    /// Transition length.
    pub duration: Duration,
    /// Curve applied to progress.
    pub ease: Ease,
}

impl Tween {
    /// A tween that is already at rest on `value`.
    pub fn at_rest(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            duration: Duration::ZERO,
            ease: Ease::Linear,
        }
    }

    /// Transition from `from` to `to` starting at `start`.
    pub fn new(from: f64, to: f64, start: Duration, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            ease,
        }
    }

    /// When the transition reaches `to`.
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Whether `now` is at or past [`Tween::end`].
    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() || now >= self.end() {
            return 1.0;
        }
        let local = now.saturating_sub(self.start);
        local.as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Eased value at `now`.
    pub fn value_at(&self, now: Duration) -> f64 {
        let t = self.ease.apply(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    /// Restart toward `to` from wherever the tween currently is, with a full `duration`.
    pub fn retarget(&mut self, to: f64, now: Duration, duration: Duration, ease: Ease) {
        let from = self.value_at(now);
        *self = Self::new(from, to, now, duration, ease);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
