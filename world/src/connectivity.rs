//! Breadth-first region discovery over 4-connected grid cells.

use std::collections::{BTreeSet, VecDeque};

use snake_jezzball_core::Coordinate;

/// Collects every cell reachable from `start` without crossing a blocked cell.
///
/// The traversal only visits coordinates inside `columns × rows` and skips any
/// coordinate for which `is_blocked` returns `true`. The result includes
/// `start`, which callers must not pass in blocked. A `start` outside the grid
/// yields an empty set.
pub fn fill<F>(
    start: Coordinate,
    columns: u32,
    rows: u32,
    mut is_blocked: F,
) -> BTreeSet<Coordinate>
where
    F: FnMut(Coordinate) -> bool,
{
    let mut visited = BTreeSet::new();
    if !in_bounds(start, columns, rows) {
        return visited;
    }

    let mut queue = VecDeque::new();
    let _ = visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.neighbors() {
            if !in_bounds(neighbor, columns, rows) {
                continue;
            }

            if visited.contains(&neighbor) || is_blocked(neighbor) {
                continue;
            }

            let _ = visited.insert(neighbor);
            queue.push_back(neighbor);
        }
    }

    visited
}

/// Reports whether the cell sits in the outermost ring of the grid.
#[must_use]
pub fn is_boundary(cell: Coordinate, columns: u32, rows: u32) -> bool {
    let last_column = i64::from(columns) - 1;
    let last_row = i64::from(rows) - 1;
    let column = i64::from(cell.column());
    let row = i64::from(cell.row());
    column == 0 || row == 0 || column == last_column || row == last_row
}

/// Reports whether any cell of the zone lies on the grid boundary.
pub fn touches_boundary<'a, I>(zone: I, columns: u32, rows: u32) -> bool
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    zone.into_iter().any(|cell| is_boundary(*cell, columns, rows))
}

/// Reports whether the zone containing `start` is closed, i.e. never reaches
/// the grid boundary.
pub fn is_zone_closed<F>(start: Coordinate, columns: u32, rows: u32, is_blocked: F) -> bool
where
    F: FnMut(Coordinate) -> bool,
{
    let zone = fill(start, columns, rows, is_blocked);
    !zone.is_empty() && !touches_boundary(&zone, columns, rows)
}

fn in_bounds(cell: Coordinate, columns: u32, rows: u32) -> bool {
    u32::try_from(cell.column()).map_or(false, |column| column < columns)
        && u32::try_from(cell.row()).map_or(false, |row| row < rows)
}
