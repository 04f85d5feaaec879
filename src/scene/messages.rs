use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::scene::{config::MessageSets, layout::Actor};

/// Deterministic flavor-text pick: the same `(actor, seed)` always yields the same line.
pub fn select_message(sets: &MessageSets, actor: Actor, seed: u64) -> Option<&str> {
    let pool = match actor {
        Actor::Male => &sets.male,
        Actor::Female => &sets.female,
    };
    if pool.is_empty() {
        return None;
    }
    let i = StdRng::seed_from_u64(seed).gen_range(0..pool.len());
    pool.get(i).map(String::as_str)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/messages.rs"]
mod tests;
