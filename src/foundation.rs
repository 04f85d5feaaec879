/// Frame rate and frame index primitives.
pub mod core;
/// Crate error type.
pub mod error;
