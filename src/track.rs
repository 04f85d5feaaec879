/// A single frame sequence with load and playback state.
pub mod frame_track;
/// Frame sequence descriptions.
pub mod spec;
