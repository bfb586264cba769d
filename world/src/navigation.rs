//! Static distance-field builder used by the world crate.

use std::collections::VecDeque;

use hex_evac_core::{cell_count, neighbors, Axial, CellState, UNREACHABLE};

/// Dense hex-step distance grid seeded from every registered target.
///
/// The field mirrors the world's cell dimensions and stores the result of a
/// multi-source breadth-first search: each free cell holds its exact graph
/// distance to the nearest target, obstacle cells and enclosed free cells
/// hold [`UNREACHABLE`]. The field is rebuilt in full whenever the target
/// set or the obstacle layout changes; it is never patched incrementally.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    width: i32,
    height: i32,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Rebuilds the distances from scratch over the provided cell array.
    ///
    /// Neighbors expand in the fixed direction order, so the resulting field
    /// depends only on the targets and obstacles, never on the run's random
    /// source. Occupied cells are traversable: agents do not cast shadows
    /// into the static field.
    pub(crate) fn rebuild(
        &mut self,
        width: i32,
        height: i32,
        targets: &[Axial],
        cells: &[CellState],
    ) {
        let count = cell_count(width, height);
        self.width = width;
        self.height = height;

        if self.distances.len() != count {
            self.distances = vec![UNREACHABLE; count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        if count == 0 {
            return;
        }

        let mut queue = VecDeque::new();

        for &target in targets {
            let Some(offset) = index(width, height, target) else {
                continue;
            };

            if cells[offset] == CellState::Obstacle {
                continue;
            }

            if self.distances[offset] == 0 {
                continue;
            }

            self.distances[offset] = 0;
            queue.push_back(target);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_offset) = index(width, height, cell) else {
                continue;
            };
            let current = self.distances[current_offset];

            if current >= UNREACHABLE - 1 {
                continue;
            }

            let next = current + 1;

            for neighbor in neighbors(cell, width, height) {
                let Some(neighbor_offset) = index(width, height, neighbor) else {
                    continue;
                };

                if cells[neighbor_offset] == CellState::Obstacle {
                    continue;
                }

                if self.distances[neighbor_offset] != UNREACHABLE {
                    continue;
                }

                self.distances[neighbor_offset] = next;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: Axial) -> Option<u16> {
        index(self.width, self.height, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub(crate) fn cells(&self) -> &[u16] {
        &self.distances
    }
}

fn index(width: i32, height: i32, cell: Axial) -> Option<usize> {
    if !cell.within(width, height) {
        return None;
    }

    let row = usize::try_from(cell.r()).ok()?;
    let column = usize::try_from(cell.q()).ok()?;
    let width = usize::try_from(width).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
