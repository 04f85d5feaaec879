/// The scene state machine.
pub mod choreographer;
/// Scene configuration.
pub mod config;
/// Actor placement and hit-testing.
pub mod layout;
/// Flavor text for speech bubbles.
pub mod messages;
