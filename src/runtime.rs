/// Single-shot timers on virtual time.
pub mod timers;
