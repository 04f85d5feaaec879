/// Frame clocks driving discrete frame indices from virtual time.
pub mod clock;
/// Easing curves.
pub mod ease;
/// Eased scalar transitions.
pub mod tween;
