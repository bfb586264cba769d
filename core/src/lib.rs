#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hex-evac engine.
//!
//! This crate defines the coordinate vocabulary for the skewed axial grid,
//! the cell and agent identity types, the read-only views that movement
//! policies consume, and the [`MovementPolicy`] contract itself. The
//! authoritative world crate owns all mutation; systems and adapters only
//! ever see the types declared here.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Distance sentinel stored for cells that no target can reach.
///
/// Obstacle cells and fully enclosed free cells both hold this value, so
/// callers can distinguish "far away" from "never reachable" by comparing
/// against it.
pub const UNREACHABLE: u16 = u16::MAX;

/// The six axial direction offsets for a flat-top hexagonal grid.
pub const DIRECTIONS: [Axial; 6] = [
    Axial::new(1, 0),
    Axial::new(1, -1),
    Axial::new(0, -1),
    Axial::new(-1, 0),
    Axial::new(-1, 1),
    Axial::new(0, 1),
];

/// Location of a single grid cell expressed in axial `(q, r)` coordinates.
///
/// The grid stores cells in a parallelogram-skewed array; [`Axial::from_visual`]
/// converts from the rectangular "visual" frame callers prefer to reason in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Axial {
    q: i32,
    r: i32,
}

impl Axial {
    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column component of the coordinate.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row component of the coordinate.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Reports whether the coordinate lies inside a `width` by `height` grid.
    ///
    /// The grid has hard edges; there is no wraparound.
    #[must_use]
    pub const fn within(&self, width: i32, height: i32) -> bool {
        self.q >= 0 && self.q < width && self.r >= 0 && self.r < height
    }

    /// Returns the coordinate displaced by the provided axial offsets.
    #[must_use]
    pub const fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q + dq, self.r + dr)
    }

    /// Computes the axial hex-step distance between two coordinates.
    #[must_use]
    pub fn distance(self, other: Axial) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// Projects the coordinate onto the Cartesian plane (flat-top layout).
    ///
    /// `size` is the hex scale factor: `x = size * 1.5 * q`,
    /// `y = size * (sqrt(3)/2 * q + sqrt(3) * r)`.
    #[must_use]
    pub fn to_cartesian(self, size: f64) -> (f64, f64) {
        let sqrt3 = 3.0_f64.sqrt();
        let x = size * 1.5 * f64::from(self.q);
        let y = size * (sqrt3 / 2.0 * f64::from(self.q) + sqrt3 * f64::from(self.r));
        (x, y)
    }

    /// Converts a rectangular "visual" coordinate into a true axial one.
    ///
    /// The stored array is skewed into a parallelogram; hall and door
    /// construction reasons in undistorted rectangular terms and calibrates
    /// through this transform: `r = visual_r - floor((visual_q - centre_q) / 2)`.
    /// Floor division keeps columns left of the centre consistent with those
    /// right of it.
    #[must_use]
    pub fn from_visual(visual_q: i32, visual_r: i32, centre_q: i32) -> Self {
        Self::new(visual_q, visual_r - (visual_q - centre_q).div_euclid(2))
    }

    /// Inverse of [`Axial::from_visual`]: recovers the rectangular coordinate.
    #[must_use]
    pub fn to_visual(self, centre_q: i32) -> (i32, i32) {
        (self.q, self.r + (self.q - centre_q).div_euclid(2))
    }
}

/// Enumerates the in-bounds neighbors of a cell in fixed direction order.
///
/// The distance-field search relies on this order being stable; movement
/// policies that need an unbiased order shuffle the collected neighbors
/// themselves from the run's random source.
#[must_use]
pub fn neighbors(cell: Axial, width: i32, height: i32) -> Neighbors {
    let mut iter = Neighbors::default();
    for direction in DIRECTIONS {
        let candidate = cell.offset(direction.q(), direction.r());
        if candidate.within(width, height) {
            iter.push(candidate);
        }
    }
    iter
}

/// Fixed-capacity iterator over the neighbors of a single cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<Axial>; 6],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: Axial) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = Axial;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// State held by a single grid cell.
///
/// `Occupied` is derived occupancy only; agent identity lives in the world's
/// agent list. `Obstacle` and `Target` are mutually exclusive: door builders
/// convert boundary obstacles into targets rather than stacking both states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Nothing occupies the cell; agents may enter it.
    Empty,
    /// Exactly one live agent stands on the cell.
    Occupied,
    /// Permanent wall; never traversed and never relaxed by the field search.
    Obstacle,
    /// Exit cell; agents stepping here leave the simulation.
    Target,
}

impl CellState {
    /// Reports whether an agent may move into a cell holding this state.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Empty | Self::Target)
    }
}

/// Unique identifier assigned to an agent; never reused within a world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Read-only view into the dense cell-state array.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellState],
    width: i32,
    height: i32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], width: i32, height: i32) -> Self {
        debug_assert_eq!(cells.len(), cell_count(width, height));
        Self {
            cells,
            width,
            height,
        }
    }

    /// State of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn state(&self, cell: Axial) -> Option<CellState> {
        index(self.width, self.height, cell).and_then(|offset| self.cells.get(offset).copied())
    }

    /// Reports whether an agent may move into the provided cell.
    #[must_use]
    pub fn is_open(&self, cell: Axial) -> bool {
        self.state(cell).is_some_and(CellState::is_open)
    }

    /// Dense cell states in row-major `(r, q)` order, for polling renderers.
    #[must_use]
    pub fn cells(&self) -> &'a [CellState] {
        self.cells
    }

    /// Width and height of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

/// Read-only view into the dense distance field.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    distances: &'a [u16],
    width: i32,
    height: i32,
}

impl<'a> FieldView<'a> {
    /// Captures a new view backed by the provided distance slice.
    #[must_use]
    pub fn new(distances: &'a [u16], width: i32, height: i32) -> Self {
        debug_assert_eq!(distances.len(), cell_count(width, height));
        Self {
            distances,
            width,
            height,
        }
    }

    /// Distance to the nearest target, or `None` outside the grid.
    ///
    /// In-bounds cells with no path to any target report [`UNREACHABLE`].
    #[must_use]
    pub fn distance(&self, cell: Axial) -> Option<u16> {
        index(self.width, self.height, cell)
            .and_then(|offset| self.distances.get(offset).copied())
    }

    /// Dense distances in row-major `(r, q)` order.
    #[must_use]
    pub fn cells(&self) -> &'a [u16] {
        self.distances
    }

    /// Width and height of the underlying field.
    #[must_use]
    pub const fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

/// Agent orderings a movement policy may require from the tick engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentOrdering {
    /// Process agents ascending by field value, closest to a target first.
    DistanceRanked,
    /// Process agents in a fresh uniformly random order every tick.
    Shuffled,
}

/// Strategy that chooses one step for an agent each tick.
///
/// Implementations are pure apart from the explicitly threaded random
/// source: the world applies occupancy changes, so `decide` sees the grid
/// exactly as earlier-processed agents left it.
pub trait MovementPolicy {
    /// Ordering the tick engine must apply to the live-agent list.
    fn ordering(&self) -> AgentOrdering;

    /// Chooses the neighbor the agent at `origin` moves to, or `None` to
    /// stay put this tick.
    fn decide(
        &self,
        origin: Axial,
        grid: GridView<'_>,
        field: FieldView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Axial>;
}

/// Row-major index of a cell, or `None` when it lies outside the grid.
fn index(width: i32, height: i32, cell: Axial) -> Option<usize> {
    if !cell.within(width, height) {
        return None;
    }

    let row = usize::try_from(cell.r()).ok()?;
    let column = usize::try_from(cell.q()).ok()?;
    let width = usize::try_from(width).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

/// Number of cells in a `width` by `height` grid, zero for degenerate sizes.
#[must_use]
pub fn cell_count(width: i32, height: i32) -> usize {
    if width <= 0 || height <= 0 {
        return 0;
    }

    usize::try_from(width)
        .ok()
        .and_then(|w| usize::try_from(height).ok().and_then(|h| w.checked_mul(h)))
        .unwrap_or(0)
}
