//! Wall ownership and conquered-zone bookkeeping.

use std::collections::BTreeSet;

use log::debug;
use snake_jezzball_core::{CellState, Coordinate, Event, GridError, PERCENTAGE_EPSILON};

use crate::{connectivity, grid::Grid};

/// Owns the player walls and the cells they enclose.
///
/// The conquered set is derived data: every wall mutation triggers a full
/// rebuild from the wall set, so the two can never disagree. Territory is the
/// only component that writes [`CellState::Wall`] into the grid.
#[derive(Clone, Debug)]
pub struct Territory {
    columns: u32,
    rows: u32,
    walls: BTreeSet<Coordinate>,
    conquered: BTreeSet<Coordinate>,
    newly_conquered: BTreeSet<Coordinate>,
    percentage: f32,
}

impl Territory {
    /// Creates an empty territory covering a `columns × rows` grid.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            walls: BTreeSet::new(),
            conquered: BTreeSet::new(),
            newly_conquered: BTreeSet::new(),
            percentage: 0.0,
        }
    }

    /// Creates an empty territory matching the dimensions of `grid`.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.columns(), grid.rows())
    }

    /// Adds a wall and recomputes the conquered zones.
    ///
    /// Returns `Ok(false)` without side effects when the cell is outside the
    /// grid or already walled.
    pub fn add_wall(
        &mut self,
        grid: &mut Grid,
        cell: Coordinate,
        out_events: &mut Vec<Event>,
    ) -> Result<bool, GridError> {
        if !grid.is_in_bounds(cell) || self.walls.contains(&cell) {
            return Ok(false);
        }

        grid.set_cell_state(cell, CellState::Wall)?;
        let _ = self.walls.insert(cell);
        out_events.push(Event::WallPlaced { cell });
        self.recompute(out_events);
        Ok(true)
    }

    /// Removes a wall and recomputes the conquered zones.
    ///
    /// Returns `Ok(false)` when no wall exists at the cell.
    pub fn remove_wall(
        &mut self,
        grid: &mut Grid,
        cell: Coordinate,
        out_events: &mut Vec<Event>,
    ) -> Result<bool, GridError> {
        if !self.walls.remove(&cell) {
            return Ok(false);
        }

        release_wall_cell(grid, cell)?;
        out_events.push(Event::WallRemoved { cell });
        self.recompute(out_events);
        Ok(true)
    }

    /// Rebuilds the conquered set from the wall set and reports the changes.
    ///
    /// A zone is a maximal 4-connected set of non-wall cells; it is conquered
    /// when none of its cells lies on the grid boundary. Each cell is visited
    /// at most once per rebuild. Emits [`Event::ZoneConquered`] with the cells
    /// that were not conquered before, and
    /// [`Event::TerritoryPercentageChanged`] when the share moved.
    pub fn recompute(&mut self, out_events: &mut Vec<Event>) {
        let previous_count = self.conquered.len();
        let previous_percentage = self.percentage;

        let walls = &self.walls;
        let mut conquered = BTreeSet::new();
        let mut visited = BTreeSet::new();
        for row in 0..self.rows as i32 {
            for column in 0..self.columns as i32 {
                let start = Coordinate::new(column, row);
                if walls.contains(&start) || visited.contains(&start) {
                    continue;
                }

                let zone = connectivity::fill(start, self.columns, self.rows, |cell| {
                    walls.contains(&cell)
                });
                if !connectivity::touches_boundary(&zone, self.columns, self.rows) {
                    conquered.extend(zone.iter().copied());
                }
                visited.extend(zone);
            }
        }

        self.newly_conquered = conquered.difference(&self.conquered).copied().collect();
        self.conquered = conquered;
        self.percentage = self.share_of(self.conquered.len());

        debug!(
            "territory recomputed: {} walls, {} conquered cells ({} new), {:.3}",
            self.walls.len(),
            self.conquered.len(),
            self.newly_conquered.len(),
            self.percentage
        );

        if !self.newly_conquered.is_empty() {
            out_events.push(Event::ZoneConquered {
                cells: self.newly_conquered.iter().copied().collect(),
            });
        }

        if self.conquered.len() != previous_count
            || (self.percentage - previous_percentage).abs() > PERCENTAGE_EPSILON
        {
            out_events.push(Event::TerritoryPercentageChanged {
                percentage: self.percentage,
            });
        }
    }

    /// Removes every wall and conquered cell.
    pub fn clear_all(
        &mut self,
        grid: &mut Grid,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GridError> {
        for cell in std::mem::take(&mut self.walls) {
            release_wall_cell(grid, cell)?;
        }
        self.conquered.clear();
        self.newly_conquered.clear();
        self.percentage = 0.0;
        out_events.push(Event::TerritoryPercentageChanged { percentage: 0.0 });
        Ok(())
    }

    /// Bonus points for the conquered share, rounded to the nearest point.
    #[must_use]
    pub fn calculate_territory_bonus(&self, multiplier: u32) -> u32 {
        (self.percentage * multiplier as f32).round() as u32
    }

    /// Reports whether the conquered share reached `target`.
    #[must_use]
    pub fn is_level_objective_reached(&self, target: f32) -> bool {
        self.percentage >= target
    }

    /// Cells that are neither walled nor conquered.
    #[must_use]
    pub fn free_positions(&self) -> Vec<Coordinate> {
        let mut free = Vec::new();
        for row in 0..self.rows as i32 {
            for column in 0..self.columns as i32 {
                let cell = Coordinate::new(column, row);
                if !self.walls.contains(&cell) && !self.conquered.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        free
    }

    /// Reports whether a wall exists at the cell.
    #[must_use]
    pub fn is_wall_at(&self, cell: Coordinate) -> bool {
        self.walls.contains(&cell)
    }

    /// Reports whether the cell belongs to a conquered zone.
    #[must_use]
    pub fn is_conquered(&self, cell: Coordinate) -> bool {
        self.conquered.contains(&cell)
    }

    /// The wall set.
    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Coordinate> {
        &self.walls
    }

    /// Union of all conquered zones.
    #[must_use]
    pub fn conquered(&self) -> &BTreeSet<Coordinate> {
        &self.conquered
    }

    /// Cells that became conquered during the last recompute.
    #[must_use]
    pub fn last_newly_conquered(&self) -> &BTreeSet<Coordinate> {
        &self.newly_conquered
    }

    /// Number of conquered cells.
    #[must_use]
    pub fn conquered_cell_count(&self) -> usize {
        self.conquered.len()
    }

    /// Conquered cells divided by total cells.
    #[must_use]
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    fn share_of(&self, count: usize) -> f32 {
        let total = u64::from(self.columns) * u64::from(self.rows);
        if total == 0 {
            0.0
        } else {
            count as f32 / total as f32
        }
    }
}

fn release_wall_cell(grid: &mut Grid, cell: Coordinate) -> Result<(), GridError> {
    if grid.cell_state(cell)? == CellState::Wall {
        grid.set_cell_state(cell, CellState::Empty)?;
    }
    Ok(())
}
