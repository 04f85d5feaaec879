use super::*;

#[test]
fn defaults_are_valid_and_match_the_greeting() {
    let cfg = SceneConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.tracks.hug.frame_count(), 81);
    assert_eq!(cfg.tracks.hug.fps(), Fps { num: 16, den: 1 });
    assert!(cfg.tracks.hug.holds_last_frame());
    assert!(cfg.tracks.male_walk.is_looping());
    assert_eq!(cfg.timing.walk_ms, 5000);
    assert_eq!(cfg.timing.heart_delay_ms, 3500);
    assert_eq!(cfg.messages.male.len(), 5);
    assert_eq!(cfg.messages.female.len(), 5);
    assert_eq!(cfg.loader, LoaderOpts::default());
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let json = r#"{ "timing": { "walk_ms": 1000 }, "seed": 7 }"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.timing.walk_ms, 1000);
    assert_eq!(cfg.timing.bubble_ms, 2500);
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.tracks, SceneTracks::default());
}

#[test]
fn looping_hug_is_rejected() {
    let mut cfg = SceneConfig::default();
    cfg.tracks.hug = FrameSequenceSpec::looping("anim/hug", 3, DEFAULT_FPS).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn empty_message_set_is_rejected() {
    let mut cfg = SceneConfig::default();
    cfg.messages.female.clear();
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SceneConfig::from_reader("{ nope".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn config_round_trips_through_json() {
    let cfg = SceneConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SceneConfig::from_reader(json.as_bytes()).unwrap(), cfg);
}
