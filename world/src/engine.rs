//! Per-tick movement engine.
//!
//! The tick is synchronous and sequential: agents are ordered according to
//! the active policy, then each agent decides and moves immediately, so
//! later agents observe the occupancy claims of earlier ones. Agents that
//! step onto a target are marked reached and removed from the live list at
//! the end of the tick.

use hex_evac_core::{AgentId, AgentOrdering, Axial, CellState, MovementPolicy, UNREACHABLE};
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::World;

impl World {
    /// Advances the simulation by one tick under the provided policy.
    ///
    /// Returns the number of agents that reached a target this tick. When
    /// no target has ever been registered the call returns 0 immediately,
    /// moving no agent and consuming no randomness.
    pub fn step<P: MovementPolicy + ?Sized>(
        &mut self,
        policy: &P,
        rng: &mut dyn RngCore,
    ) -> usize {
        if self.targets.is_empty() || self.agents.is_empty() {
            return 0;
        }

        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        match policy.ordering() {
            AgentOrdering::DistanceRanked => {
                let keys: Vec<(u16, AgentId)> = self
                    .agents
                    .iter()
                    .map(|agent| {
                        let distance = self.field.distance(agent.cell).unwrap_or(UNREACHABLE);
                        (distance, agent.id)
                    })
                    .collect();
                order.sort_by_key(|&index| keys[index]);
            }
            AgentOrdering::Shuffled => order.shuffle(&mut *rng),
        }

        let mut reached: Vec<AgentId> = Vec::new();

        for agent_index in order {
            let origin = self.agents[agent_index].cell;
            let decision = policy.decide(origin, self.grid_view(), self.field_view(), rng);
            let Some(destination) = decision else {
                continue;
            };

            match self.state(destination) {
                Some(CellState::Target) => {
                    self.clear_cell(origin);
                    reached.push(self.agents[agent_index].id);
                }
                Some(CellState::Empty) => {
                    self.clear_cell(origin);
                    self.occupy_cell(destination);
                    self.agents[agent_index].cell = destination;
                }
                // The chosen cell closed between decision and application,
                // or the policy returned something unusable. Stay put.
                _ => {}
            }
        }

        let evacuated = reached.len();
        self.agents.retain(|agent| !reached.contains(&agent.id));
        evacuated
    }

    fn clear_cell(&mut self, cell: Axial) {
        if let Some(offset) = self.index(cell) {
            if self.cells[offset] == CellState::Occupied {
                self.cells[offset] = CellState::Empty;
            }
        }
    }

    fn occupy_cell(&mut self, cell: Axial) {
        if let Some(offset) = self.index(cell) {
            if self.cells[offset] == CellState::Empty {
                self.cells[offset] = CellState::Occupied;
            }
        }
    }
}
