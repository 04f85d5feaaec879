/// Image decoding into prepared frames.
pub mod decode;
/// Batched, retried frame-sequence loading.
pub mod loader;
/// Where frame bytes come from.
pub mod source;
