/// Quiz progress.
pub mod progress;
/// The controller tying progress to the scene.
pub mod stage;
/// Progress persistence.
pub mod store;
