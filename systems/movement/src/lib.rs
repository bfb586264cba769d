#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement policies for the hex-evac engine.
//!
//! Both policies are pure strategy objects: they read the grid and field
//! views, draw from the explicitly threaded random source, and return at
//! most one neighboring cell. The world applies the move; policies never
//! mutate anything.

use hex_evac_core::{
    neighbors, AgentOrdering, Axial, CellState, FieldView, GridView, MovementPolicy, UNREACHABLE,
};
use rand::distributions::WeightedIndex;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Field-descent policy with a configurable mix of rational and random choice.
///
/// Each call shuffles the agent's open, field-reachable neighbors and
/// short-circuits on the first one strictly closer to a target than the
/// agent's own cell. With probability `rationality` that candidate is taken;
/// otherwise one candidate is drawn uniformly, non-improving ones included.
/// A cell counts as a candidate only when it is `Empty` or `Target` and its
/// field value is finite, so agents sealed into a pocket never wander.
///
/// Pairs with [`AgentOrdering::DistanceRanked`]: contention is resolved by
/// processing closer agents first.
#[derive(Clone, Copy, Debug)]
pub struct RankedPolicy {
    rationality: f64,
}

impl RankedPolicy {
    /// Default probability of taking the best candidate.
    pub const DEFAULT_RATIONALITY: f64 = 0.8;

    /// Creates a policy with the provided rationality, clamped to `[0, 1]`.
    ///
    /// Non-finite inputs fall back to the default.
    #[must_use]
    pub fn new(rationality: f64) -> Self {
        let rationality = if rationality.is_finite() {
            rationality.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_RATIONALITY
        };
        Self { rationality }
    }

    /// Probability of taking the best candidate when one exists.
    #[must_use]
    pub const fn rationality(&self) -> f64 {
        self.rationality
    }
}

impl Default for RankedPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATIONALITY)
    }
}

impl MovementPolicy for RankedPolicy {
    fn ordering(&self) -> AgentOrdering {
        AgentOrdering::DistanceRanked
    }

    fn decide(
        &self,
        origin: Axial,
        grid: GridView<'_>,
        field: FieldView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Axial> {
        let (width, height) = grid.dimensions();
        let current = field.distance(origin)?;

        let mut candidates: Vec<Axial> = neighbors(origin, width, height)
            .filter(|&cell| grid.is_open(cell))
            .filter(|&cell| field.distance(cell).is_some_and(|d| d != UNREACHABLE))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        candidates.shuffle(&mut *rng);
        let best = candidates
            .iter()
            .copied()
            .find(|&cell| field.distance(cell).is_some_and(|d| d < current));

        match best {
            Some(cell) if rng.gen_bool(self.rationality) => Some(cell),
            _ => candidates.choose(&mut *rng).copied(),
        }
    }
}

/// Boltzmann-weighted policy, the earlier engine variant.
///
/// Every `Empty` neighbor with a finite field value gets weight
/// `exp(sensitivity * (d_current - d_neighbor))`; every `Target` neighbor
/// gets the fixed bonus weight `exp(2 * sensitivity)`. One neighbor is
/// sampled proportionally to weight. Pairs with
/// [`AgentOrdering::Shuffled`]: no distance priority, a fresh random agent
/// order every tick.
#[derive(Clone, Copy, Debug)]
pub struct BoltzmannPolicy {
    sensitivity: f64,
}

impl BoltzmannPolicy {
    /// Default field-sensitivity coefficient.
    pub const DEFAULT_SENSITIVITY: f64 = 2.0;

    /// Creates a policy with the provided sensitivity.
    ///
    /// Non-finite or negative inputs fall back to the default.
    #[must_use]
    pub fn new(sensitivity: f64) -> Self {
        let sensitivity = if sensitivity.is_finite() && sensitivity >= 0.0 {
            sensitivity
        } else {
            Self::DEFAULT_SENSITIVITY
        };
        Self { sensitivity }
    }

    /// Field-sensitivity coefficient applied to distance differences.
    #[must_use]
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}

impl Default for BoltzmannPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SENSITIVITY)
    }
}

impl MovementPolicy for BoltzmannPolicy {
    fn ordering(&self) -> AgentOrdering {
        AgentOrdering::Shuffled
    }

    fn decide(
        &self,
        origin: Axial,
        grid: GridView<'_>,
        field: FieldView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Axial> {
        let (width, height) = grid.dimensions();
        let current = field.distance(origin)?;
        if current == UNREACHABLE {
            return None;
        }

        let mut cells = Vec::new();
        let mut weights = Vec::new();
        for cell in neighbors(origin, width, height) {
            match grid.state(cell) {
                Some(CellState::Empty) => {
                    let Some(distance) = field.distance(cell) else {
                        continue;
                    };
                    if distance == UNREACHABLE {
                        continue;
                    }
                    cells.push(cell);
                    weights.push(
                        (self.sensitivity * (f64::from(current) - f64::from(distance))).exp(),
                    );
                }
                Some(CellState::Target) => {
                    cells.push(cell);
                    weights.push((self.sensitivity * 2.0).exp());
                }
                _ => {}
            }
        }

        if cells.is_empty() {
            return None;
        }

        let index = WeightedIndex::new(&weights).ok()?;
        Some(cells[rng.sample(index)])
    }
}
