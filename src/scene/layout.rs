use crate::scene::config::LayoutConfig;

/// Highest closeness the driver can reach.
pub const MAX_CLOSENESS: u8 = 5;

/// One of the two characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Left-hand actor.
    Male,
    /// Right-hand actor.
    Female,
}

/// Horizontal center of `actor` in percent of the scene width.
///
/// The actors approach symmetrically and stop one step short of touching at full closeness
/// (47.5 % / 52.5 % with the default layout); the hug track covers the gap.
pub fn actor_position(layout: &LayoutConfig, actor: Actor, closeness: u8) -> f64 {
    let offset = layout.base_percent + f64::from(closeness) * layout.step_percent;
    match actor {
        Actor::Male => offset,
        Actor::Female => 100.0 - offset,
    }
}

/// Half an actor's hit box, as a fraction of the scene width.
pub fn hit_half_width(layout: &LayoutConfig, scene_width_px: f64, viewport_width_px: f64) -> f64 {
    let actor_px = if viewport_width_px >= layout.large_viewport_min_px {
        layout.actor_width_large_px
    } else {
        layout.actor_width_small_px
    };
    actor_px / 2.0 / scene_width_px
}

/// Which actor a pointer at `x_fraction` (0 = left edge, 1 = right edge) lands on.
///
/// A pointer inside either hit box is attributed to whichever side of the actors' midpoint it
/// falls on.
pub fn hit_test(
    layout: &LayoutConfig,
    male_percent: f64,
    female_percent: f64,
    x_fraction: f64,
    scene_width_px: f64,
    viewport_width_px: f64,
) -> Option<Actor> {
    if scene_width_px <= 0.0 {
        return None;
    }
    let male = male_percent / 100.0;
    let female = female_percent / 100.0;
    let half = hit_half_width(layout, scene_width_px, viewport_width_px);

    let near_male = (x_fraction - male).abs() < half;
    let near_female = (x_fraction - female).abs() < half;
    if !near_male && !near_female {
        return None;
    }

    let midpoint = (male + female) / 2.0;
    Some(if x_fraction < midpoint {
        Actor::Male
    } else {
        Actor::Female
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;
