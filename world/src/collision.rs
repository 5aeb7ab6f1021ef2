//! Collision classification for candidate snake head positions.

use std::collections::{BTreeSet, VecDeque};

use snake_jezzball_core::{Collision, Coordinate};

use crate::grid::Grid;

/// Classifies the obstacle at `target`, if any.
///
/// Checks run in a fixed order: grid bounds first, then the wall set, then the
/// snake body (tail included). A target that is both outside the grid and in
/// the wall set is therefore always a [`Collision::Boundary`].
#[must_use]
pub fn classify(
    grid: &Grid,
    body: &VecDeque<Coordinate>,
    walls: &BTreeSet<Coordinate>,
    target: Coordinate,
) -> Option<Collision> {
    if !grid.is_in_bounds(target) {
        return Some(Collision::Boundary);
    }

    if walls.contains(&target) {
        return Some(Collision::Wall);
    }

    if body.contains(&target) {
        return Some(Collision::SelfCollision);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(cells: &[(i32, i32)]) -> VecDeque<Coordinate> {
        cells
            .iter()
            .map(|&(column, row)| Coordinate::new(column, row))
            .collect()
    }

    #[test]
    fn free_cell_has_no_collision() {
        let grid = Grid::new(5, 5);
        let body = body_of(&[(1, 1), (2, 1)]);
        assert_eq!(
            classify(&grid, &body, &BTreeSet::new(), Coordinate::new(3, 1)),
            None
        );
    }

    #[test]
    fn boundary_takes_precedence_over_wall() {
        let grid = Grid::new(5, 5);
        let outside = Coordinate::new(5, 2);
        let walls: BTreeSet<_> = [outside].into_iter().collect();
        assert_eq!(
            classify(&grid, &VecDeque::new(), &walls, outside),
            Some(Collision::Boundary)
        );
    }

    #[test]
    fn wall_takes_precedence_over_body() {
        let grid = Grid::new(5, 5);
        let cell = Coordinate::new(2, 2);
        let walls: BTreeSet<_> = [cell].into_iter().collect();
        let body = body_of(&[(2, 2), (2, 3)]);
        assert_eq!(
            classify(&grid, &body, &walls, cell),
            Some(Collision::Wall)
        );
    }

    #[test]
    fn tail_counts_as_body() {
        let grid = Grid::new(5, 5);
        let body = body_of(&[(1, 2), (2, 2), (2, 3)]);
        assert_eq!(
            classify(&grid, &body, &BTreeSet::new(), Coordinate::new(1, 2)),
            Some(Collision::SelfCollision)
        );
    }
}
