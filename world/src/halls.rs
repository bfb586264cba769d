//! Procedural hall and door construction.
//!
//! Builders reason in the rectangular "visual" frame and calibrate through
//! [`Axial::from_visual`] so the rendered shapes come out undistorted despite
//! the parallelogram skew of the stored array. Hall builders lay obstacles;
//! door builders carve target openings through those obstacles via
//! [`World::set_targets`].

use hex_evac_core::Axial;

use crate::{TargetError, World};

/// Hex scale factor used for all Cartesian projections.
pub const HEX_SIZE: f64 = 0.2;

/// Empirical axial-to-Cartesian radius correction for the flat-top layout.
///
/// One unit of axial radius covers roughly `HEX_SIZE * 1.616` Cartesian
/// units when averaged over all directions, between the side factor `1.5`
/// and the long factor `sqrt(3)`.
pub const RADIUS_CORRECTION: f64 = 1.616;

impl World {
    const fn centre_q(&self) -> i32 {
        self.width() / 2
    }

    const fn centre_r(&self) -> i32 {
        self.height() / 2
    }

    /// Walls off every cell outside a circle of the given axial radius.
    ///
    /// Each cell is projected to the Cartesian plane and compared against
    /// the corrected radius `radius * HEX_SIZE * RADIUS_CORRECTION`, measured
    /// from the projection of the grid's centre cell. The result is an
    /// approximately circular free region surrounded by obstacles.
    pub fn build_circular_hall(&mut self, radius: i32) {
        let centre = Axial::new(self.centre_q(), self.centre_r());
        let (centre_x, centre_y) = centre.to_cartesian(HEX_SIZE);
        let limit = f64::from(radius) * HEX_SIZE * RADIUS_CORRECTION;

        for r in 0..self.height() {
            for q in 0..self.width() {
                let cell = Axial::new(q, r);
                let (x, y) = cell.to_cartesian(HEX_SIZE);
                let distance = ((x - centre_x).powi(2) + (y - centre_y).powi(2)).sqrt();
                if distance > limit {
                    self.add_obstacle(cell);
                }
            }
        }
    }

    /// Walls off every cell outside a centred rectangle.
    ///
    /// `side_len` is the full horizontal extent in columns, `long_len` the
    /// full vertical extent in visual rows. The vertical bound is checked in
    /// the calibrated visual frame, so the rendered shape is rectangular.
    /// The boundary itself (offsets of exactly half the extent) is wall, so
    /// door builders anchored on the half-extent carve through it.
    pub fn build_square_hall(&mut self, side_len: i32, long_len: i32) {
        let centre_q = self.centre_q();
        let centre_r = self.centre_r();
        let half_q = side_len / 2;
        let half_r = long_len / 2;

        for r in 0..self.height() {
            for q in 0..self.width() {
                let cell = Axial::new(q, r);
                let (_, visual_r) = cell.to_visual(centre_q);
                if (q - centre_q).abs() >= half_q || (visual_r - centre_r).abs() >= half_r {
                    self.add_obstacle(cell);
                }
            }
        }
    }

    /// Carves a vertical door run on a side wall.
    ///
    /// The anchor sits at visual `(centre_q + q_offset, centre_r)`; `width`
    /// contiguous constant-column cells centred on the anchor are registered
    /// as one target batch. Negative offsets select the left wall.
    pub fn build_side_doors(&mut self, q_offset: i32, width: i32) -> Result<(), TargetError> {
        let centre_q = self.centre_q();
        let anchor = Axial::from_visual(centre_q + q_offset, self.centre_r(), centre_q);

        let cells: Vec<Axial> = door_run(width)
            .map(|step| anchor.offset(0, step))
            .collect();
        self.set_targets(&cells)
    }

    /// Carves a horizontal door run on a top or bottom wall.
    ///
    /// Anchors sit at visual `(centre_q + k, centre_r + r_offset)` for `k`
    /// centred on zero, each calibrated independently so the run stays
    /// visually horizontal. Negative offsets select the bottom wall.
    pub fn build_long_doors(&mut self, r_offset: i32, width: i32) -> Result<(), TargetError> {
        let centre_q = self.centre_q();
        let visual_r = self.centre_r() + r_offset;

        let cells: Vec<Axial> = door_run(width)
            .map(|step| Axial::from_visual(centre_q + step, visual_r, centre_q))
            .collect();
        self.set_targets(&cells)
    }
}

/// Signed offsets of a door run of the given width, centred on zero.
fn door_run(width: i32) -> impl Iterator<Item = i32> {
    -(width / 2)..=(width - 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;
    use hex_evac_core::{CellState, UNREACHABLE};

    #[test]
    fn door_runs_are_centred_on_zero() {
        let run: Vec<i32> = door_run(5).collect();
        assert_eq!(run, vec![-2, -1, 0, 1, 2]);
        assert_eq!(door_run(3).collect::<Vec<_>>(), vec![-1, 0, 1]);
        assert_eq!(door_run(1).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn circular_hall_keeps_centre_open_and_walls_corners() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);
        let grid = query::grid_view(&world);

        assert_eq!(grid.state(Axial::new(64, 64)), Some(CellState::Empty));
        assert_eq!(grid.state(Axial::new(0, 0)), Some(CellState::Obstacle));
        assert_eq!(grid.state(Axial::new(127, 127)), Some(CellState::Obstacle));
    }

    #[test]
    fn circular_side_wall_sits_just_beyond_the_side_radius() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);
        let grid = query::grid_view(&world);

        // Corrected limit 56 * 0.2 * 1.616 = 18.099: column offset 60
        // projects to 18.0, offset 61 to 18.3.
        let wall = Axial::from_visual(64 + 61, 64, 64);
        let floor = Axial::from_visual(64 + 60, 64, 64);
        assert_eq!(grid.state(wall), Some(CellState::Obstacle));
        assert_eq!(grid.state(floor), Some(CellState::Empty));
    }

    #[test]
    fn side_doors_carve_through_the_circular_wall() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);

        world.build_side_doors(61, 5).expect("doors fit the wall");

        let grid = query::grid_view(&world);
        let field = query::field_view(&world);
        let anchor = Axial::from_visual(64 + 61, 64, 64);
        for step in -2..=2 {
            assert_eq!(grid.state(anchor.offset(0, step)), Some(CellState::Target));
        }
        assert_eq!(field.distance(anchor), Some(0));
        let centre = field.distance(Axial::new(64, 64)).expect("in bounds");
        assert_ne!(centre, UNREACHABLE, "interior must reach the door");
    }

    #[test]
    fn opposite_side_doors_share_one_field() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);

        world.build_side_doors(61, 5).expect("right doors");
        world.build_side_doors(-61, 5).expect("left doors");

        assert_eq!(query::targets(&world).len(), 10);
        let field = query::field_view(&world);
        let left = Axial::from_visual(64 - 61, 64, 64);
        let right = Axial::from_visual(64 + 61, 64, 64);
        assert_eq!(field.distance(left), Some(0));
        assert_eq!(field.distance(right), Some(0));
    }

    #[test]
    fn long_doors_stay_visually_horizontal() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);

        world.build_long_doors(52, 5).expect("top doors");

        let centre_q = 64;
        for target in query::targets(&world) {
            let (_, visual_r) = target.to_visual(centre_q);
            assert_eq!(visual_r, 64 + 52);
        }
    }

    #[test]
    fn long_doors_accept_negative_offsets_for_the_bottom_wall() {
        let mut world = World::new(128, 128);
        world.build_circular_hall(56);

        world.build_long_doors(-53, 3).expect("bottom doors");

        let grid = query::grid_view(&world);
        let anchor = Axial::from_visual(64, 64 - 53, 64);
        assert_eq!(grid.state(anchor), Some(CellState::Target));
    }

    #[test]
    fn square_hall_walls_the_boundary_and_keeps_the_interior_open() {
        let mut world = World::new(106, 106);
        world.build_square_hall(74, 64);
        let grid = query::grid_view(&world);

        assert_eq!(grid.state(Axial::new(53, 53)), Some(CellState::Empty));
        // Half extents 37 and 32: the half-extent offsets are wall, one
        // step inside is floor.
        assert_eq!(
            grid.state(Axial::from_visual(53 + 37, 53, 53)),
            Some(CellState::Obstacle)
        );
        assert_eq!(
            grid.state(Axial::from_visual(53 + 36, 53, 53)),
            Some(CellState::Empty)
        );
        assert_eq!(
            grid.state(Axial::from_visual(53, 53 + 32, 53)),
            Some(CellState::Obstacle)
        );
        assert_eq!(
            grid.state(Axial::from_visual(53, 53 + 31, 53)),
            Some(CellState::Empty)
        );
    }

    #[test]
    fn square_hall_doors_open_the_interior() {
        let mut world = World::new(106, 106);
        world.build_square_hall(74, 64);

        world.build_side_doors(37, 3).expect("right doors");
        world.build_long_doors(32, 3).expect("top doors");

        let field = query::field_view(&world);
        let centre = field.distance(Axial::new(53, 53)).expect("in bounds");
        assert_ne!(centre, UNREACHABLE);
        assert_eq!(query::targets(&world).len(), 6);
    }
}
