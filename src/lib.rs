//! Embrace is a frame-sequence animation engine and scene choreographer for an animated,
//! quiz-gated greeting.
//!
//! Time is virtual: hosts own the clock and drive everything through `advance(now)`.
//!
//! - Describe tracks with [`FrameSequenceSpec`] and tune the scene with [`SceneConfig`]
//! - Load frames through a [`FrameSource`] (batched, retried, tolerance-checked)
//! - Drive the two actors with a [`Choreographer`], or let a [`Stage`] tie it to quiz
//!   [`Progress`] and its [`ProgressStore`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Clocks, easing and tweens.
pub mod animation;
/// Frame sources, decoding and the sequence loader.
pub mod assets;
/// Core primitives and the error type.
pub mod foundation;
/// Virtual-time timers.
pub mod runtime;
/// The two-actor scene.
pub mod scene;
/// Quiz progress, its persistence, and the stage tying both to the scene.
pub mod session;
/// Frame tracks.
pub mod track;

pub use crate::animation::clock::{ClockTick, FrameClock};
pub use crate::animation::ease::Ease;
pub use crate::animation::tween::Tween;
pub use crate::assets::decode::PreparedFrame;
pub use crate::assets::loader::{
    Backoff, FrameLoadFailure, FrameSequenceLoader, LoadedFrames, LoaderOpts, SleepBackoff,
};
pub use crate::assets::source::{DirFrameSource, FrameSource};
pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{EmbraceError, EmbraceResult};
pub use crate::runtime::timers::{TimerId, TimerQueue};
pub use crate::scene::choreographer::{
    Action, Choreographer, LoadReport, SceneEvent, SceneFrame, SceneState, TrackSlot,
};
pub use crate::scene::config::SceneConfig;
pub use crate::scene::layout::Actor;
pub use crate::session::progress::{Progress, SceneKind};
pub use crate::session::stage::{Stage, StageEvent, StageSnapshot};
pub use crate::session::store::ProgressStore;
pub use crate::track::frame_track::{FrameTrack, LoadState, PlaybackState, TrackOutput};
pub use crate::track::spec::FrameSequenceSpec;
