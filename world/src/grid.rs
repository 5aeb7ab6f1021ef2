//! Dense cell-state storage backing the playfield.

use snake_jezzball_core::{CellState, Coordinate, GridError};

/// Presentation-only mapping between cells and screen positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    origin_x: f32,
    origin_y: f32,
    cell_length: f32,
}

impl GridLayout {
    /// Creates a layout anchored at the provided origin.
    #[must_use]
    pub const fn new(origin_x: f32, origin_y: f32, cell_length: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_length,
        }
    }

    /// Side length of a cell in presentation units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Top-left corner of the provided cell.
    #[must_use]
    pub fn cell_to_world(&self, cell: Coordinate) -> (f32, f32) {
        (
            self.origin_x + cell.column() as f32 * self.cell_length,
            self.origin_y + cell.row() as f32 * self.cell_length,
        )
    }

    /// Cell containing the provided point. Points left of or above the origin
    /// map to negative coordinates.
    #[must_use]
    pub fn world_to_cell(&self, x: f32, y: f32) -> Coordinate {
        if self.cell_length <= 0.0 {
            return Coordinate::ZERO;
        }
        let column = ((x - self.origin_x) / self.cell_length).floor();
        let row = ((y - self.origin_y) / self.cell_length).floor();
        Coordinate::new(column as i32, row as i32)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Fixed-size grid of [`CellState`] values stored in row-major order.
///
/// Every accessor validates bounds before touching storage. Writes never check
/// semantic legality; the component that owns a cell state sequences its own
/// writes.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
    layout: GridLayout,
}

impl Grid {
    /// Creates an empty grid with the default layout.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self::with_layout(columns, rows, GridLayout::default())
    }

    /// Creates an empty grid with an explicit presentation layout.
    #[must_use]
    pub fn with_layout(columns: u32, rows: u32, layout: GridLayout) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![CellState::Empty; capacity],
            layout,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Presentation layout of the grid.
    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub fn is_in_bounds(&self, cell: Coordinate) -> bool {
        self.index(cell).is_some()
    }

    /// Reports whether the snake may walk onto the cell.
    #[must_use]
    pub fn is_valid_position(&self, cell: Coordinate) -> bool {
        matches!(
            self.cell_state(cell),
            Ok(CellState::Empty | CellState::Collectible)
        )
    }

    /// Reports whether the cell lies in bounds and holds no wall.
    #[must_use]
    pub fn is_accessible(&self, cell: Coordinate) -> bool {
        matches!(self.cell_state(cell), Ok(state) if state != CellState::Wall)
    }

    /// Reads the state of a cell.
    pub fn cell_state(&self, cell: Coordinate) -> Result<CellState, GridError> {
        self.index(cell)
            .map(|index| self.cells[index])
            .ok_or_else(|| self.out_of_range(cell))
    }

    /// Overwrites the state of a cell.
    pub fn set_cell_state(&mut self, cell: Coordinate, state: CellState) -> Result<(), GridError> {
        let index = self.index(cell).ok_or_else(|| self.out_of_range(cell))?;
        self.cells[index] = state;
        Ok(())
    }

    /// Resets every cell to [`CellState::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Iterates all coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Coordinate> {
        let columns = self.columns as i32;
        let rows = self.rows as i32;
        (0..rows).flat_map(move |row| (0..columns).map(move |column| Coordinate::new(column, row)))
    }

    /// Collects every coordinate currently holding `state`.
    #[must_use]
    pub fn positions_of(&self, state: CellState) -> Vec<Coordinate> {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, cell_state)| **cell_state == state)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Counts the cells currently holding `state`.
    #[must_use]
    pub fn count_of(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Collects every empty coordinate.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Coordinate> {
        self.positions_of(CellState::Empty)
    }

    /// Rewrites every `from` cell as `to`, returning how many changed.
    pub fn replace_all(&mut self, from: CellState, to: CellState) -> usize {
        let mut replaced = 0;
        for cell in self.cells.iter_mut().filter(|cell| **cell == from) {
            *cell = to;
            replaced += 1;
        }
        replaced
    }

    fn index(&self, cell: Coordinate) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn out_of_range(&self, cell: Coordinate) -> GridError {
        GridError::OutOfRange {
            coordinate: cell,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_exactly_the_grid() {
        let grid = Grid::new(4, 3);
        assert!(grid.is_in_bounds(Coordinate::new(0, 0)));
        assert!(grid.is_in_bounds(Coordinate::new(3, 2)));
        assert!(!grid.is_in_bounds(Coordinate::new(4, 0)));
        assert!(!grid.is_in_bounds(Coordinate::new(0, 3)));
        assert!(!grid.is_in_bounds(Coordinate::new(-1, 0)));
        assert_eq!(grid.cell_count(), 12);
    }

    #[test]
    fn out_of_range_access_fails_loudly() {
        let mut grid = Grid::new(2, 2);
        let outside = Coordinate::new(2, 0);
        let expected = GridError::OutOfRange {
            coordinate: outside,
            columns: 2,
            rows: 2,
        };
        assert_eq!(grid.cell_state(outside), Err(expected));
        assert_eq!(grid.set_cell_state(outside, CellState::Wall), Err(expected));
    }

    #[test]
    fn valid_positions_accept_empty_and_collectible_only() {
        let mut grid = Grid::new(3, 1);
        grid.set_cell_state(Coordinate::new(1, 0), CellState::Collectible)
            .expect("in bounds");
        grid.set_cell_state(Coordinate::new(2, 0), CellState::Body)
            .expect("in bounds");

        assert!(grid.is_valid_position(Coordinate::new(0, 0)));
        assert!(grid.is_valid_position(Coordinate::new(1, 0)));
        assert!(!grid.is_valid_position(Coordinate::new(2, 0)));
        assert!(!grid.is_valid_position(Coordinate::new(3, 0)));
    }

    #[test]
    fn writes_do_not_check_semantic_legality() {
        let mut grid = Grid::new(2, 2);
        let cell = Coordinate::new(1, 1);
        grid.set_cell_state(cell, CellState::Body).expect("in bounds");
        grid.set_cell_state(cell, CellState::Wall).expect("in bounds");
        assert_eq!(grid.cell_state(cell), Ok(CellState::Wall));
        assert!(!grid.is_accessible(cell));
    }

    #[test]
    fn temporary_walls_convert_and_clear() {
        let mut grid = Grid::new(3, 3);
        for column in 0..3 {
            grid.set_cell_state(Coordinate::new(column, 1), CellState::TemporaryWall)
                .expect("in bounds");
        }

        assert_eq!(grid.replace_all(CellState::TemporaryWall, CellState::Wall), 3);
        assert_eq!(grid.count_of(CellState::Wall), 3);
        assert_eq!(
            grid.positions_of(CellState::Wall),
            vec![
                Coordinate::new(0, 1),
                Coordinate::new(1, 1),
                Coordinate::new(2, 1)
            ]
        );

        grid.clear();
        assert_eq!(grid.empty_positions().len(), 9);
    }

    #[test]
    fn layout_maps_cells_to_points_and_back() {
        let layout = GridLayout::new(10.0, 20.0, 32.0);
        assert_eq!(layout.cell_to_world(Coordinate::new(2, 1)), (74.0, 52.0));
        assert_eq!(layout.world_to_cell(74.0, 52.0), Coordinate::new(2, 1));
        assert_eq!(layout.world_to_cell(105.9, 83.9), Coordinate::new(2, 1));
        assert_eq!(layout.world_to_cell(0.0, 0.0), Coordinate::new(-1, -1));
    }
}
