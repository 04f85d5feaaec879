use std::{collections::HashSet, io::Cursor, thread};

use super::*;
use crate::assets::decode::PreparedFrame;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn frames(count: u32) -> LoadedFrames {
    LoadedFrames::from_frames(
        (0..count)
            .map(|_| {
                Some(PreparedFrame {
                    width: 1,
                    height: 1,
                    rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
                })
            })
            .collect(),
    )
}

fn failure(c: &Choreographer, slot: TrackSlot) -> FrameLoadFailure {
    let total = c.track(slot).spec().frame_count();
    FrameLoadFailure {
        base_path: c.track(slot).spec().base_path().to_string(),
        failed: total,
        total,
    }
}

fn deliver_all(c: &mut Choreographer, failed: &[TrackSlot]) {
    let generation = c.begin_external_load();
    for slot in TrackSlot::ALL {
        let result = if failed.contains(&slot) {
            Err(failure(c, slot))
        } else {
            Ok(frames(c.track(slot).spec().frame_count()))
        };
        c.deliver(LoadReport {
            generation,
            slot,
            result,
        });
    }
}

fn loaded_scene(failed: &[TrackSlot]) -> Choreographer {
    let mut c = Choreographer::new(SceneConfig::default()).unwrap();
    deliver_all(&mut c, failed);
    c.drain_events();
    c
}

// Step the scene in 100ms increments, recording each event with the time it surfaced.
fn run_until(c: &mut Choreographer, from: u64, to: u64) -> Vec<(u64, SceneEvent)> {
    let mut out = Vec::new();
    let mut t = from;
    while t <= to {
        c.advance(ms(t));
        out.extend(c.drain_events().into_iter().map(|e| (t, e)));
        t += 100;
    }
    out
}

fn time_of(events: &[(u64, SceneEvent)], wanted: &SceneEvent) -> Option<u64> {
    events.iter().find(|(_, e)| e == wanted).map(|(t, _)| *t)
}

#[test]
fn starts_idle_at_base_positions() {
    let c = Choreographer::new(SceneConfig::default()).unwrap();
    assert_eq!(c.action(), Action::Idle);
    assert_eq!(c.closeness(), 0);
    assert_eq!(c.positions(), (10.0, 90.0));
    assert!(!c.all_tracks_settled());
    for slot in TrackSlot::ALL {
        assert_eq!(c.track(slot).load_state(), LoadState::NotLoaded);
    }
}

#[test]
fn ready_fires_once_after_every_track_settles() {
    let mut c = Choreographer::new(SceneConfig::default()).unwrap();
    deliver_all(&mut c, &[TrackSlot::Heart]);
    let events = c.drain_events();
    assert!(events.contains(&SceneEvent::TrackFailed {
        slot: TrackSlot::Heart
    }));
    assert!(events.contains(&SceneEvent::TrackLoaded {
        slot: TrackSlot::Hug
    }));
    assert_eq!(events.last(), Some(&SceneEvent::Ready));
    assert_eq!(
        events.iter().filter(|e| **e == SceneEvent::Ready).count(),
        1
    );

    c.advance(ms(100));
    assert!(!c.drain_events().contains(&SceneEvent::Ready));
}

#[test]
fn idle_tracks_run_while_walk_tracks_wait() {
    let c = loaded_scene(&[]);
    assert!(!c.track(TrackSlot::MaleIdle).is_paused());
    assert!(!c.track(TrackSlot::FemaleIdle).is_paused());
    assert!(c.track(TrackSlot::MaleWalk).is_paused());
    assert!(c.track(TrackSlot::Hug).is_paused());
    assert!(c.track(TrackSlot::Heart).is_paused());
}

#[test]
fn closeness_change_walks_then_idles() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(1, false, ms(0));
    assert_eq!(c.action(), Action::Walk);
    assert_eq!(
        c.drain_events(),
        vec![SceneEvent::WalkStarted { closeness: 1 }]
    );
    assert!(!c.track(TrackSlot::MaleWalk).is_paused());

    c.advance(ms(2500));
    let (male, female) = c.positions();
    assert!(male > 10.0 && male < 17.5, "male at {male}");
    assert!(female < 90.0 && female > 82.5, "female at {female}");
    assert_eq!(c.action(), Action::Walk);

    c.advance(ms(5000));
    assert_eq!(c.action(), Action::Idle);
    assert_eq!(c.positions(), (17.5, 82.5));
    assert_eq!(
        c.drain_events(),
        vec![SceneEvent::Arrived { hugging: false }]
    );
    assert!(c.track(TrackSlot::MaleWalk).is_paused());
}

#[test]
fn decreasing_closeness_is_ignored() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(2, false, ms(0));
    c.advance(ms(5000));
    c.drain_events();

    c.set_inputs(1, false, ms(6000));
    assert_eq!(c.closeness(), 2);
    assert_eq!(c.action(), Action::Idle);
    assert!(c.drain_events().is_empty());
}

#[test]
fn closeness_above_max_is_clamped() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(9, false, ms(0));
    assert_eq!(c.closeness(), MAX_CLOSENESS);
}

#[test]
fn new_target_mid_walk_restarts_the_transition() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(1, false, ms(0));
    c.advance(ms(2000));
    c.set_inputs(2, false, ms(2000));

    c.advance(ms(5000));
    assert_eq!(c.action(), Action::Walk);

    c.advance(ms(7000));
    assert_eq!(c.action(), Action::Idle);
    assert_eq!(c.positions(), (25.0, 75.0));
}

#[test]
fn full_closeness_with_hug_runs_the_cascade() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(5, true, ms(0));
    let events = run_until(&mut c, 0, 14_000);

    assert_eq!(c.positions(), (47.5, 52.5));
    assert_eq!(c.action(), Action::Hug);
    assert_eq!(
        time_of(&events, &SceneEvent::Arrived { hugging: true }),
        Some(5000)
    );
    assert_eq!(time_of(&events, &SceneEvent::HeartShown), Some(8500));
    // Hug: 81 frames at 16 fps finish 5 s after it starts; the message follows 500 ms later.
    assert_eq!(time_of(&events, &SceneEvent::MessageShown), Some(10_500));
    assert_eq!(
        time_of(&events, &SceneEvent::HugSequenceComplete),
        Some(13_500)
    );
    assert!(c.scene_state().show_heart);
    assert!(c.scene_state().show_message);
    assert_eq!(c.scene_state().heart_scale, 100.0);
}

#[test]
fn heart_grows_from_small_to_full() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(5, true, ms(0));
    run_until(&mut c, 0, 8500);
    assert_eq!(c.scene_state().heart_scale, 10.0);

    c.advance(ms(10_500));
    let mid = c.scene_state().heart_scale;
    assert!(mid > 10.0 && mid < 100.0, "heart at {mid}");

    c.advance(ms(12_500));
    assert_eq!(c.scene_state().heart_scale, 100.0);
}

#[test]
fn failed_hug_track_still_completes_on_its_nominal_duration() {
    let mut c = loaded_scene(&[TrackSlot::Hug]);
    assert!(c.track(TrackSlot::Hug).did_fail());
    c.set_inputs(5, true, ms(0));
    let events = run_until(&mut c, 0, 14_000);

    assert_eq!(time_of(&events, &SceneEvent::MessageShown), Some(10_500));
    assert_eq!(
        time_of(&events, &SceneEvent::HugSequenceComplete),
        Some(13_500)
    );
}

#[test]
fn pointer_shows_and_clears_a_bubble() {
    let mut c = loaded_scene(&[]);
    c.advance(ms(1000));
    assert_eq!(c.pointer(0.1, 1000.0, 400.0, ms(1000)), Some(Actor::Male));
    let bubble = c.scene_state().bubble.clone().unwrap();
    assert_eq!(bubble.actor, Actor::Male);
    assert!(c.config().messages.male.contains(&bubble.text));
    assert!(matches!(
        c.drain_events().as_slice(),
        [SceneEvent::BubbleShown {
            actor: Actor::Male,
            ..
        }]
    ));

    c.advance(ms(3400));
    assert!(c.scene_state().bubble.is_some());
    c.advance(ms(3500));
    assert!(c.scene_state().bubble.is_none());
    assert_eq!(c.drain_events(), vec![SceneEvent::BubbleCleared]);
}

#[test]
fn press_between_frames_keeps_the_bubble_for_its_full_time() {
    let mut c = loaded_scene(&[]);
    c.advance(ms(1000));
    // The press lands 800ms after the last frame; the bubble lives 2500ms from the press.
    assert_eq!(c.pointer(0.1, 1000.0, 400.0, ms(1800)), Some(Actor::Male));
    c.advance(ms(4200));
    assert!(c.scene_state().bubble.is_some());
    c.advance(ms(4300));
    assert!(c.scene_state().bubble.is_none());
}

#[test]
fn press_before_the_last_frame_counts_from_that_frame() {
    let mut c = loaded_scene(&[]);
    c.advance(ms(1000));
    c.pointer(0.1, 1000.0, 400.0, ms(500));
    c.advance(ms(3400));
    assert!(c.scene_state().bubble.is_some());
    c.advance(ms(3500));
    assert!(c.scene_state().bubble.is_none());
}

#[test]
fn second_press_replaces_the_bubble_and_its_timer() {
    let mut c = loaded_scene(&[]);
    c.pointer(0.1, 1000.0, 400.0, ms(0));
    c.advance(ms(2000));
    assert_eq!(c.pointer(0.9, 1000.0, 400.0, ms(2000)), Some(Actor::Female));

    c.advance(ms(2600));
    let bubble = c.scene_state().bubble.clone().unwrap();
    assert_eq!(bubble.actor, Actor::Female);
    assert_eq!(c.pending_timers(), 1);

    c.advance(ms(4500));
    assert!(c.scene_state().bubble.is_none());
}

#[test]
fn pointer_ignored_while_walking_or_missing() {
    let mut c = loaded_scene(&[]);
    assert_eq!(c.pointer(0.5, 1000.0, 400.0, ms(0)), None);
    c.set_inputs(1, false, ms(0));
    assert_eq!(c.pointer(0.1, 1000.0, 400.0, ms(0)), None);
    assert!(c.scene_state().bubble.is_none());
}

#[test]
fn same_seed_picks_the_same_flavor_text() {
    let pick = || {
        let mut c = loaded_scene(&[]);
        c.pointer(0.1, 1000.0, 400.0, ms(0));
        c.scene_state().bubble.clone().unwrap().text
    };
    assert_eq!(pick(), pick());
}

#[test]
fn frame_follows_the_action() {
    let mut c = loaded_scene(&[]);
    c.advance(ms(0));
    let f = c.frame();
    assert!(f.interactive);
    assert!(f.male.visible && f.male.idle_visible && !f.male.walk_visible);
    assert!(!f.hug.visible && !f.heart.visible);
    assert!(f.male.idle.frame_index().is_some());

    c.set_inputs(5, true, ms(0));
    c.advance(ms(100));
    let f = c.frame();
    assert!(!f.interactive);
    assert!(f.female.walk_visible && !f.female.idle_visible);

    run_until(&mut c, 200, 11_000);
    let f = c.frame();
    assert_eq!(f.action, Action::Hug);
    assert!(!f.male.visible && !f.female.visible);
    assert!(f.hug.visible && f.heart.visible);
    assert_eq!(f.message, Some("So glad you exist"));
}

#[test]
fn stale_reports_are_dropped_after_reset() {
    let mut c = Choreographer::new(SceneConfig::default()).unwrap();
    let old = c.begin_external_load();
    c.reset(ms(0));
    assert_ne!(c.generation(), old);

    c.deliver(LoadReport {
        generation: old,
        slot: TrackSlot::Hug,
        result: Ok(frames(81)),
    });
    assert_eq!(c.track(TrackSlot::Hug).load_state(), LoadState::NotLoaded);
    assert!(c.drain_events().is_empty());
}

#[test]
fn reset_returns_to_the_initial_scene() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(5, true, ms(0));
    run_until(&mut c, 0, 9000);
    assert!(c.scene_state().show_heart);

    c.reset(ms(9000));
    assert_eq!(c.action(), Action::Idle);
    assert_eq!(c.closeness(), 0);
    assert_eq!(c.positions(), (10.0, 90.0));
    assert_eq!(c.pending_timers(), 0);
    assert!(!c.scene_state().show_heart);
    assert_eq!(c.scene_state().heart_scale, 10.0);
    assert_eq!(c.track(TrackSlot::Hug).load_state(), LoadState::NotLoaded);

    let events = run_until(&mut c, 9000, 20_000);
    assert!(events.is_empty(), "{events:?}");
}

#[test]
fn teardown_silences_the_scene() {
    let mut c = loaded_scene(&[]);
    c.set_inputs(5, true, ms(0));
    c.advance(ms(5000));
    c.drain_events();

    c.teardown();
    c.teardown();
    assert!(c.is_torn_down());
    assert_eq!(c.pending_timers(), 0);
    for slot in TrackSlot::ALL {
        assert!(!c.track(slot).tick_pending());
    }
    c.set_inputs(5, true, ms(6000));
    c.advance(ms(20_000));
    assert!(c.drain_events().is_empty());
    assert_eq!(c.pointer(0.5, 1000.0, 400.0, ms(20_000)), None);
}

struct PngSource {
    png: Vec<u8>,
    missing: HashSet<String>,
}

impl FrameSource for PngSource {
    fn fetch(&self, rel_path: &str) -> anyhow::Result<Vec<u8>> {
        if self.missing.contains(rel_path) {
            anyhow::bail!("missing {rel_path}");
        }
        Ok(self.png.clone())
    }
}

struct NoWait;

impl Backoff for NoWait {
    fn wait(&self, _delay: Duration) {}
}

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![200, 10, 10, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn background_load_reports_arrive_during_advance() {
    let mut c = Choreographer::new(SceneConfig::default()).unwrap();
    let missing = (0..81)
        .map(|i| format!("anim/heart/frame_{i:03}.png"))
        .collect();
    let source = Arc::new(PngSource {
        png: tiny_png(),
        missing,
    });
    c.start_loading(source, Arc::new(NoWait)).unwrap();
    assert_eq!(c.track(TrackSlot::Hug).load_state(), LoadState::Loading);

    let mut events = Vec::new();
    for step in 0..2000u64 {
        c.advance(ms(step));
        events.extend(c.drain_events());
        if events.contains(&SceneEvent::Ready) {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(events.contains(&SceneEvent::Ready));
    assert!(c.track(TrackSlot::Hug).is_ready());
    assert!(c.track(TrackSlot::Heart).did_fail());
}

#[test]
fn resume_places_actors_without_walking() {
    let mut c = loaded_scene(&[]);
    c.resume_at(5, false, ms(0));
    assert_eq!(c.action(), Action::Idle);
    assert_eq!(c.positions(), (47.5, 52.5));
    assert!(c.drain_events().is_empty());

    // Same closeness again is not a change, so hugging alone starts nothing.
    c.set_inputs(5, true, ms(0));
    c.advance(ms(6000));
    assert_eq!(c.action(), Action::Idle);
}

#[test]
fn resuming_a_hug_replays_the_cascade() {
    let mut c = loaded_scene(&[]);
    c.resume_at(5, true, ms(0));
    assert_eq!(c.action(), Action::Hug);
    assert!(!c.is_walking());
    assert_eq!(c.positions(), (47.5, 52.5));
    assert_eq!(
        c.drain_events(),
        vec![SceneEvent::Arrived { hugging: true }]
    );

    let events = run_until(&mut c, 0, 9_000);
    assert!(
        !events
            .iter()
            .any(|(_, e)| matches!(e, SceneEvent::WalkStarted { .. }))
    );
    assert_eq!(time_of(&events, &SceneEvent::HeartShown), Some(3_500));
    assert_eq!(time_of(&events, &SceneEvent::MessageShown), Some(5_500));
    assert_eq!(
        time_of(&events, &SceneEvent::HugSequenceComplete),
        Some(8_500)
    );
}

#[test]
fn resuming_a_hug_with_a_failed_track_still_completes() {
    let mut c = loaded_scene(&[TrackSlot::Hug]);
    c.resume_at(5, true, ms(0));
    let events = run_until(&mut c, 0, 9_000);
    assert_eq!(time_of(&events, &SceneEvent::MessageShown), Some(5_500));
    assert_eq!(
        time_of(&events, &SceneEvent::HugSequenceComplete),
        Some(8_500)
    );
}
