use std::{fs::File, io::BufReader, io::Read, path::Path};

use crate::{
    assets::loader::LoaderOpts,
    foundation::core::Fps,
    foundation::error::{EmbraceError, EmbraceResult},
    track::spec::FrameSequenceSpec,
};

const DEFAULT_FRAME_COUNT: u32 = 81;
const DEFAULT_FPS: Fps = Fps { num: 16, den: 1 };

/// Everything tunable about the scene. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Track descriptions.
    pub tracks: SceneTracks,
    /// Choreography delays.
    pub timing: SceneTiming,
    /// Actor placement.
    pub layout: LayoutConfig,
    /// Bubble and finale text.
    pub messages: MessageSets,
    /// Frame loader tunables.
    pub loader: LoaderOpts,
    /// Seed for flavor-text selection.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tracks: SceneTracks::default(),
            timing: SceneTiming::default(),
            layout: LayoutConfig::default(),
            messages: MessageSets::default(),
            loader: LoaderOpts::default(),
            seed: 1,
        }
    }
}

impl SceneConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> EmbraceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EmbraceError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse and validate JSON config from `r`.
    pub fn from_reader(r: impl Read) -> EmbraceResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EmbraceError::serde(format!("parse scene config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check tracks, loop modes, messages, layout and loader options.
    pub fn validate(&self) -> EmbraceResult<()> {
        for spec in self.tracks.all() {
            spec.validate()?;
        }
        for (name, spec) in [
            ("male_idle", &self.tracks.male_idle),
            ("male_walk", &self.tracks.male_walk),
            ("female_idle", &self.tracks.female_idle),
            ("female_walk", &self.tracks.female_walk),
        ] {
            if !spec.is_looping() {
                return Err(EmbraceError::validation(format!(
                    "track '{name}' must loop"
                )));
            }
        }
        for (name, spec) in [("hug", &self.tracks.hug), ("heart", &self.tracks.heart)] {
            if spec.is_looping() {
                return Err(EmbraceError::validation(format!(
                    "track '{name}' must be one-shot"
                )));
            }
        }
        if self.messages.male.is_empty() || self.messages.female.is_empty() {
            return Err(EmbraceError::validation(
                "each actor needs at least one bubble message",
            ));
        }
        if self.layout.actor_width_small_px <= 0.0 || self.layout.actor_width_large_px <= 0.0 {
            return Err(EmbraceError::validation("actor widths must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.layout.base_percent) {
            return Err(EmbraceError::validation(
                "layout base_percent must be within 0..=100",
            ));
        }
        self.loader.validate()
    }
}

/// The six tracks the scene mounts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneTracks {
    /// Male idle loop.
    pub male_idle: FrameSequenceSpec,
    /// Male walk loop.
    pub male_walk: FrameSequenceSpec,
    /// Female idle loop.
    pub female_idle: FrameSequenceSpec,
    /// Female walk loop.
    pub female_walk: FrameSequenceSpec,
    /// Shared hug one-shot.
    pub hug: FrameSequenceSpec,
    /// Heart overlay one-shot.
    pub heart: FrameSequenceSpec,
}

impl Default for SceneTracks {
    fn default() -> Self {
        let looping = |base: &str| {
            FrameSequenceSpec::builtin(base, DEFAULT_FRAME_COUNT, DEFAULT_FPS, true, false)
        };
        let held = |base: &str| {
            FrameSequenceSpec::builtin(base, DEFAULT_FRAME_COUNT, DEFAULT_FPS, false, true)
        };
        Self {
            male_idle: looping("anim/male/idle"),
            male_walk: looping("anim/male/walk"),
            female_idle: looping("anim/female/idle"),
            female_walk: looping("anim/female/walk"),
            hug: held("anim/hug"),
            heart: held("anim/heart"),
        }
    }
}

impl SceneTracks {
    /// Every track, in mount order.
    pub fn all(&self) -> [&FrameSequenceSpec; 6] {
        [
            &self.male_idle,
            &self.male_walk,
            &self.female_idle,
            &self.female_walk,
            &self.hug,
            &self.heart,
        ]
    }
}

/// Choreography delays and durations, in milliseconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneTiming {
    /// Length of one walk between closeness levels.
    pub walk_ms: u64,
    /// Delay from hug start to the heart reveal.
    pub heart_delay_ms: u64,
    /// Heart growth duration.
    pub heart_grow_ms: u64,
    /// Heart size when revealed, in percent.
    pub heart_scale_from: f64,
    /// Heart size after growing, in percent.
    pub heart_scale_to: f64,
    /// Delay from hug completion to the finale message.
    pub message_delay_ms: u64,
    /// Delay from the finale message to sequence completion.
    pub completion_delay_ms: u64,
    /// How long a speech bubble stays up.
    pub bubble_ms: u64,
    /// Answer lockout when the answer moves the actors.
    pub answer_lockout_walk_ms: u64,
    /// Answer lockout otherwise.
    pub answer_lockout_ms: u64,
    /// Readiness is forced after this long even if tracks are still loading.
    pub ready_fallback_ms: u64,
}

impl Default for SceneTiming {
    fn default() -> Self {
        Self {
            walk_ms: 5000,
            heart_delay_ms: 3500,
            heart_grow_ms: 4000,
            heart_scale_from: 10.0,
            heart_scale_to: 100.0,
            message_delay_ms: 500,
            completion_delay_ms: 3000,
            bubble_ms: 2500,
            answer_lockout_walk_ms: 5200,
            answer_lockout_ms: 600,
            ready_fallback_ms: 10_000,
        }
    }
}

/// Horizontal placement, in percent of the scene width, and actor hit boxes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Male position at closeness 0; the female mirrors it.
    pub base_percent: f64,
    /// Distance each actor moves per closeness step.
    pub step_percent: f64,
    /// Actor width below `large_viewport_min_px`.
    pub actor_width_small_px: f64,
    /// Actor width from `large_viewport_min_px` up.
    pub actor_width_large_px: f64,
    /// Viewport width where actors switch to the large size.
    pub large_viewport_min_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_percent: 10.0,
            step_percent: 7.5,
            actor_width_small_px: 140.0,
            actor_width_large_px: 200.0,
            large_viewport_min_px: 640.0,
        }
    }
}

/// Text shown by the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MessageSets {
    /// Bubble lines for the male actor.
    pub male: Vec<String>,
    /// Bubble lines for the female actor.
    pub female: Vec<String>,
    /// Terminal message shown after the hug.
    pub finale: String,
}

impl Default for MessageSets {
    fn default() -> Self {
        let own = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            male: own(&[
                "I love you to bits! 💕",
                "You and me against the world! 😍",
                "Here I come! 🥰",
                "Wait for me! 🤗",
                "You're my favourite! ❤️",
            ]),
            female: own(&[
                "My hero! 💗",
                "Come here already! 🥺",
                "I'd find you anywhere! 💖",
                "Took you long enough! 😊",
                "Forever and always! 💝",
            ]),
            finale: "So glad you exist".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
