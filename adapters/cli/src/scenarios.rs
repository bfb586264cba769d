//! Built-in evacuation scenarios.
//!
//! Each scenario chooses grid dimensions, hall and door geometry, and a
//! default crowd size, then scatters agents through the shared retry loop.
//! Geometry constants derive from the Cartesian footprints the halls are
//! meant to approximate: a 1000-unit-area circle (radius 18) and a
//! 500-unit-area square (side 22.36).

use anyhow::{bail, Result};
use clap::ValueEnum;
use hex_evac_core::Axial;
use hex_evac_world::{World, HEX_SIZE, RADIUS_CORRECTION};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Selectable scenario families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScenarioKind {
    /// Small corridor with a gapped wall and a single exit cell.
    Corridor,
    /// Circular hall, Cartesian radius 18, on a 128x128 grid.
    Circular,
    /// Rectangular hall, Cartesian side 22.36, on a 106x106 grid.
    Square,
}

/// Door layouts for the hall scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExitLayout {
    /// Doors on the 3 o'clock and 9 o'clock walls.
    Opposite,
    /// Doors on the 3 o'clock and 12 o'clock walls.
    Quarter,
}

/// Scenario parameters resolved from the command line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScenarioConfig {
    /// Scenario family to construct.
    pub(crate) kind: ScenarioKind,
    /// Door layout for the hall scenarios.
    pub(crate) exits: ExitLayout,
    /// Crowd size override; each scenario has its own default.
    pub(crate) agents: Option<usize>,
    /// Add interior pillar obstacles near the long doors (circular only).
    pub(crate) pillars: bool,
}

const CORRIDOR_AGENTS: usize = 30;
const HALL_AGENTS: usize = 500;

/// Cartesian radius of the circular hall.
const CIRCLE_RADIUS: f64 = 18.0;
/// Cartesian side length of the square hall.
const SQUARE_SIDE: f64 = 22.36;

/// Builds the configured world and scatters its crowd.
///
/// Returns the world together with the number of agents actually placed;
/// random placement may fall short of the request when the retry budget
/// runs out.
pub(crate) fn build(config: &ScenarioConfig, rng: &mut ChaCha8Rng) -> Result<(World, usize)> {
    if config.pillars && config.kind != ScenarioKind::Circular {
        bail!("pillars are only defined for the circular scenario");
    }

    match config.kind {
        ScenarioKind::Corridor => corridor(config, rng),
        ScenarioKind::Circular => circular(config, rng),
        ScenarioKind::Square => square(config, rng),
    }
}

/// 20x15 corridor: single exit near the right edge, a vertical wall with a
/// two-cell gap in the middle, crowd scattered in the left third.
fn corridor(config: &ScenarioConfig, rng: &mut ChaCha8Rng) -> Result<(World, usize)> {
    let (width, height) = (20, 15);
    let mut world = World::new(width, height);

    let wall_q = width / 2;
    let gap = height / 2;
    for r in 3..height - 3 {
        if r != gap && r != gap + 1 {
            world.add_obstacle(Axial::new(wall_q, r));
        }
    }

    world.set_targets(&[Axial::new(width - 2, height / 2)])?;

    let count = config.agents.unwrap_or(CORRIDOR_AGENTS);
    let placed = scatter(&mut world, count, 1..=width / 3, 1..=height - 2, rng);
    Ok((world, placed))
}

/// Circular hall with five-cell doors and optional pillar obstacles.
fn circular(config: &ScenarioConfig, rng: &mut ChaCha8Rng) -> Result<(World, usize)> {
    let (width, height) = (128, 128);
    let mut world = World::new(width, height);

    // Axial radii recovered from the Cartesian footprint: the hall uses the
    // averaged correction factor, the doors the exact side and long factors.
    let hall_radius = (CIRCLE_RADIUS / (HEX_SIZE * RADIUS_CORRECTION)).round() as i32;
    let side_radius = (CIRCLE_RADIUS / (HEX_SIZE * 1.5)) as i32 + 1;
    let long_radius = (CIRCLE_RADIUS / (HEX_SIZE * 3.0_f64.sqrt())) as i32 + 1;

    world.build_circular_hall(hall_radius);
    match config.exits {
        ExitLayout::Opposite => {
            world.build_side_doors(side_radius, 5)?;
            world.build_side_doors(-side_radius, 5)?;
        }
        ExitLayout::Quarter => {
            world.build_side_doors(side_radius, 5)?;
            world.build_long_doors(long_radius, 5)?;
        }
    }

    if config.pillars {
        let centre_q = width / 2;
        let centre_r = height / 2;
        for visual_r in [
            centre_r + long_radius - 3,
            centre_r + long_radius - 4,
            centre_r - long_radius + 2,
            centre_r - long_radius + 3,
        ] {
            world.add_obstacle(Axial::from_visual(centre_q, visual_r, centre_q));
        }
    }

    let count = config.agents.unwrap_or(HALL_AGENTS);
    let placed = scatter(&mut world, count, 1..=width - 2, 1..=height - 2, rng);
    Ok((world, placed))
}

/// Rectangular hall with three-cell doors.
fn square(config: &ScenarioConfig, rng: &mut ChaCha8Rng) -> Result<(World, usize)> {
    let (width, height) = (106, 106);
    let mut world = World::new(width, height);

    let side_len = (SQUARE_SIDE / (HEX_SIZE * 1.5)) as i32;
    let long_len = (SQUARE_SIDE / (HEX_SIZE * 3.0_f64.sqrt())) as i32;

    world.build_square_hall(side_len, long_len);
    match config.exits {
        ExitLayout::Opposite => {
            world.build_side_doors(side_len / 2, 3)?;
            world.build_side_doors(-(side_len / 2), 3)?;
        }
        ExitLayout::Quarter => {
            world.build_side_doors(side_len / 2, 3)?;
            world.build_long_doors(long_len / 2, 3)?;
        }
    }

    let count = config.agents.unwrap_or(HALL_AGENTS);
    let placed = scatter(&mut world, count, 1..=width - 2, 1..=height - 2, rng);
    Ok((world, placed))
}

/// Random placement retry loop: up to five times the requested count of
/// attempts, then give up silently on the remainder.
fn scatter(
    world: &mut World,
    count: usize,
    q_range: std::ops::RangeInclusive<i32>,
    r_range: std::ops::RangeInclusive<i32>,
    rng: &mut ChaCha8Rng,
) -> usize {
    let mut placed = 0;
    for _ in 0..count * 5 {
        if placed >= count {
            break;
        }
        let q = rng.gen_range(q_range.clone());
        let r = rng.gen_range(r_range.clone());
        if world.add_agent(Axial::new(q, r)).is_some() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_evac_core::UNREACHABLE;
    use hex_evac_world::query;
    use rand::SeedableRng;

    fn config(kind: ScenarioKind, exits: ExitLayout) -> ScenarioConfig {
        ScenarioConfig {
            kind,
            exits,
            agents: Some(25),
            pillars: false,
        }
    }

    #[test]
    fn corridor_scenario_places_its_crowd_in_the_left_third() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (world, placed) =
            build(&config(ScenarioKind::Corridor, ExitLayout::Opposite), &mut rng)
                .expect("corridor builds");

        assert_eq!(placed, 25);
        for snapshot in query::agent_view(&world) {
            assert!(snapshot.cell.q() <= 6);
            assert_ne!(snapshot.distance, UNREACHABLE);
        }
    }

    #[test]
    fn hall_scenarios_build_reachable_interiors() {
        for kind in [ScenarioKind::Circular, ScenarioKind::Square] {
            for exits in [ExitLayout::Opposite, ExitLayout::Quarter] {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let (world, placed) =
                    build(&config(kind, exits), &mut rng).expect("hall builds");
                assert!(placed > 0, "{kind:?}/{exits:?} placed nobody");
                let (width, height) = query::dimensions(&world);
                let centre = Axial::new(width / 2, height / 2);
                let distance = query::field_view(&world)
                    .distance(centre)
                    .expect("centre in bounds");
                assert_ne!(distance, UNREACHABLE, "{kind:?}/{exits:?} sealed");
            }
        }
    }

    #[test]
    fn pillars_are_rejected_outside_the_circular_scenario() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut bad = config(ScenarioKind::Square, ExitLayout::Opposite);
        bad.pillars = true;
        assert!(build(&bad, &mut rng).is_err());
    }

    #[test]
    fn circular_pillars_leave_the_hall_reachable() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut cfg = config(ScenarioKind::Circular, ExitLayout::Quarter);
        cfg.pillars = true;
        let (world, _) = build(&cfg, &mut rng).expect("hall builds");

        let distance = query::field_view(&world)
            .distance(Axial::new(64, 64))
            .expect("centre in bounds");
        assert_ne!(distance, UNREACHABLE);
    }
}
