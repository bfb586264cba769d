#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for the hex-evac simulation.
//!
//! [`World`] owns the dense cell array, the live agent list, the ordered
//! target set, and the distance field derived from them. Every occupancy
//! mutation flows through this crate so the cell array and the agent list
//! can never disagree. Hall and door construction lives in the `halls`
//! module, the per-tick movement engine in `engine`, and read-only access
//! for adapters in [`query`].

mod engine;
mod halls;
mod navigation;

pub use halls::{HEX_SIZE, RADIUS_CORRECTION};

use hex_evac_core::{cell_count, AgentId, Axial, CellState, FieldView, GridView};
use navigation::DistanceField;
use thiserror::Error;

/// Reasons a batch of target cells may be rejected by [`World::set_targets`].
///
/// Validation is atomic: when any cell in the batch is rejected, no cell in
/// the batch is registered.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// The cell lies outside the grid.
    #[error("target cell ({}, {}) lies outside the grid", .cell.q(), .cell.r())]
    OutOfBounds {
        /// Cell that failed the bounds check.
        cell: Axial,
    },
    /// The cell is currently occupied by a live agent.
    #[error("target cell ({}, {}) is occupied by an agent", .cell.q(), .cell.r())]
    Occupied {
        /// Cell that an agent currently stands on.
        cell: Axial,
    },
}

#[derive(Clone, Copy, Debug)]
struct Agent {
    id: AgentId,
    cell: Axial,
}

/// Authoritative evacuation world: cells, agents, targets, distance field.
///
/// Width and height are fixed at construction. Targets accumulate across
/// [`World::set_targets`] calls and every change to the target set or the
/// obstacle layout rebuilds the distance field in full, so the field is
/// never stale no matter the construction order.
#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
    agents: Vec<Agent>,
    targets: Vec<Axial>,
    field: DistanceField,
    next_agent_id: u32,
}

impl World {
    /// Creates an empty world with the provided dimensions.
    ///
    /// Non-positive dimensions yield a degenerate zero-cell world on which
    /// every operation is a harmless no-op.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let cells = vec![CellState::Empty; cell_count(width, height)];
        let mut field = DistanceField::default();
        field.rebuild(width, height, &[], &cells);
        Self {
            width,
            height,
            cells,
            agents: Vec::new(),
            targets: Vec::new(),
            field,
            next_agent_id: 0,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Marks the cell as an obstacle iff it is currently empty.
    ///
    /// Any other state (outside the grid, occupied, already an obstacle, a
    /// target) is a silent no-op, so construction code may re-run safely.
    /// When targets already exist the distance field is rebuilt immediately,
    /// which keeps late obstacle placement consistent with the field.
    pub fn add_obstacle(&mut self, cell: Axial) {
        let Some(offset) = self.index(cell) else {
            return;
        };

        if self.cells[offset] != CellState::Empty {
            return;
        }

        self.cells[offset] = CellState::Obstacle;
        if !self.targets.is_empty() {
            self.rebuild_field();
        }
    }

    /// Places a new agent on the cell iff it is currently empty.
    ///
    /// Returns the freshly allocated identifier, or `None` on any other
    /// cell state so callers can drive random-placement retry loops.
    pub fn add_agent(&mut self, cell: Axial) -> Option<AgentId> {
        let offset = self.index(cell)?;
        if self.cells[offset] != CellState::Empty {
            return None;
        }

        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id += 1;
        self.cells[offset] = CellState::Occupied;
        self.agents.push(Agent { id, cell });
        Some(id)
    }

    /// Removes the agent with the provided identifier, clearing its cell.
    ///
    /// Returns whether an agent was actually removed.
    pub fn remove_agent(&mut self, id: AgentId) -> bool {
        let Some(position) = self.agents.iter().position(|agent| agent.id == id) else {
            return false;
        };

        let agent = self.agents.remove(position);
        if let Some(offset) = self.index(agent.cell) {
            if self.cells[offset] == CellState::Occupied {
                self.cells[offset] = CellState::Empty;
            }
        }
        true
    }

    /// Registers a batch of target cells and rebuilds the distance field.
    ///
    /// Obstacle cells are converted to targets; this is how door builders
    /// carve exit openings through hall walls. Cells that are occupied or
    /// outside the grid reject the entire batch before any mutation. A cell
    /// that is already a target is re-appended without harm. Targets are
    /// append-only: there is no way to retire an exit.
    pub fn set_targets(&mut self, cells: &[Axial]) -> Result<(), TargetError> {
        for &cell in cells {
            match self.state(cell) {
                None => return Err(TargetError::OutOfBounds { cell }),
                Some(CellState::Occupied) => return Err(TargetError::Occupied { cell }),
                Some(_) => {}
            }
        }

        for &cell in cells {
            if let Some(offset) = self.index(cell) {
                self.cells[offset] = CellState::Target;
            }
            self.targets.push(cell);
        }

        self.rebuild_field();
        Ok(())
    }

    fn rebuild_field(&mut self) {
        self.field
            .rebuild(self.width, self.height, &self.targets, &self.cells);
    }

    fn state(&self, cell: Axial) -> Option<CellState> {
        self.index(cell).map(|offset| self.cells[offset])
    }

    fn index(&self, cell: Axial) -> Option<usize> {
        if !cell.within(self.width, self.height) {
            return None;
        }

        let row = usize::try_from(cell.r()).ok()?;
        let column = usize::try_from(cell.q()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn grid_view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.width, self.height)
    }

    fn field_view(&self) -> FieldView<'_> {
        FieldView::new(self.field.cells(), self.width, self.height)
    }
}

/// Query functions that provide read-only access to the world state.
///
/// This is the entire boundary a polling renderer needs: dimensions, cell
/// states for color-mapping, agent positions, and the target list. There
/// are no push notifications.
pub mod query {
    use super::World;
    use hex_evac_core::{AgentId, Axial, FieldView, GridView, UNREACHABLE};
    use serde::{Deserialize, Serialize};

    /// Width and height of the world's grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (i32, i32) {
        (world.width, world.height)
    }

    /// Read-only view of the dense cell-state array.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid_view()
    }

    /// Read-only view of the distance field.
    ///
    /// Before the first [`World::set_targets`] call every cell reads
    /// [`UNREACHABLE`].
    #[must_use]
    pub fn field_view(world: &World) -> FieldView<'_> {
        world.field_view()
    }

    /// Ordered list of registered target cells, duplicates included.
    #[must_use]
    pub fn targets(world: &World) -> &[Axial] {
        &world.targets
    }

    /// Number of live agents still inside the grid.
    #[must_use]
    pub fn agent_count(world: &World) -> usize {
        world.agents.len()
    }

    /// Captures a snapshot of every live agent, sorted by identifier.
    #[must_use]
    pub fn agent_view(world: &World) -> Vec<AgentSnapshot> {
        let field = world.field_view();
        let mut snapshots: Vec<AgentSnapshot> = world
            .agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id,
                cell: agent.cell,
                distance: field.distance(agent.cell).unwrap_or(UNREACHABLE),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a single agent's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AgentSnapshot {
        /// Unique identifier assigned to the agent.
        pub id: AgentId,
        /// Grid cell currently occupied by the agent.
        pub cell: Axial,
        /// Field distance of the agent's cell to the nearest target.
        pub distance: u16,
    }
}
