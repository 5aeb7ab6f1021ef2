//! Timed collectibles placed on free cells.

use std::time::Duration;

use log::debug;
use rand::{seq::SliceRandom, Rng};
use snake_jezzball_core::{AppleKind, CellState, Coordinate, GridError};

use crate::{grid::Grid, snake::Snake, territory::Territory};

/// A collectible waiting on the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Apple {
    position: Coordinate,
    kind: AppleKind,
    lifetime: Duration,
    expiry: Duration,
}

impl Apple {
    /// Places an apple of random kind on a random free cell.
    ///
    /// Candidates are the territory's free positions whose grid state is
    /// still walkable, so apples never land on walls, conquered zones or the
    /// snake. Returns `Ok(None)` when no candidate exists.
    pub fn spawn<R>(
        grid: &mut Grid,
        territory: &Territory,
        expiry: Duration,
        rng: &mut R,
    ) -> Result<Option<Self>, GridError>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<Coordinate> = territory
            .free_positions()
            .into_iter()
            .filter(|cell| grid.is_valid_position(*cell))
            .collect();

        let Some(position) = candidates.choose(rng).copied() else {
            debug!("no free cell left for an apple");
            return Ok(None);
        };
        let kind = AppleKind::ALL
            .choose(rng)
            .copied()
            .unwrap_or(AppleKind::Normal);

        Self::place(grid, position, kind, expiry).map(Some)
    }

    /// Places an apple of the given kind at an explicit cell.
    pub fn place(
        grid: &mut Grid,
        position: Coordinate,
        kind: AppleKind,
        expiry: Duration,
    ) -> Result<Self, GridError> {
        grid.set_cell_state(position, CellState::Collectible)?;
        debug!("{kind:?} apple placed at {position}");
        Ok(Self {
            position,
            kind,
            lifetime: Duration::ZERO,
            expiry,
        })
    }

    /// Clears this apple and draws a new position and kind.
    pub fn respawn<R>(
        self,
        grid: &mut Grid,
        territory: &Territory,
        rng: &mut R,
    ) -> Result<Option<Self>, GridError>
    where
        R: Rng + ?Sized,
    {
        self.clear(grid)?;
        Self::spawn(grid, territory, self.expiry, rng)
    }

    /// Ages the apple by `dt` and reports whether it outlived its expiry.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.lifetime = self.lifetime.saturating_add(dt);
        self.lifetime > self.expiry
    }

    /// Removes the apple marker from the grid, leaving other owners' cells alone.
    pub fn clear(&self, grid: &mut Grid) -> Result<(), GridError> {
        if grid.cell_state(self.position)? == CellState::Collectible {
            grid.set_cell_state(self.position, CellState::Empty)?;
        }
        Ok(())
    }

    /// Applies the kind-specific effect to the snake that ate the apple.
    pub fn apply_effect(&self, snake: &mut Snake) {
        for _ in 0..self.kind.growth() {
            snake.grow();
        }
        if self.kind.grants_invincibility() {
            let _ = snake.make_invincible();
        }
    }

    /// Cell holding the apple.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Kind of apple.
    #[must_use]
    pub const fn kind(&self) -> AppleKind {
        self.kind
    }

    /// Points awarded when eaten.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.kind.points()
    }

    /// Time the apple has spent on the grid.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
