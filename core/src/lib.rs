#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake JezzBall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then appends [`Event`] values to an outbound queue
//! that the driver drains once per tick. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time a stunned snake stays immobile before returning to normal.
pub const STUN_DURATION: Duration = Duration::from_secs(2);

/// Time a snake stays invincible before returning to normal.
pub const INVINCIBILITY_DURATION: Duration = Duration::from_secs(5);

/// Smallest percentage delta reported as a territory change.
pub const PERCENTAGE_EPSILON: f32 = 1e-3;

/// Integer grid address expressed as a column and a row.
///
/// Coordinates double as direction vectors: the unit constants
/// [`Coordinate::UP`], [`Coordinate::DOWN`], [`Coordinate::LEFT`] and
/// [`Coordinate::RIGHT`] are added to a head position to step the snake.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    column: i32,
    row: i32,
}

impl Coordinate {
    /// The null vector.
    pub const ZERO: Self = Self::new(0, 0);
    /// Unit step toward decreasing rows.
    pub const UP: Self = Self::new(0, -1);
    /// Unit step toward increasing rows.
    pub const DOWN: Self = Self::new(0, 1);
    /// Unit step toward decreasing columns.
    pub const LEFT: Self = Self::new(-1, 0);
    /// Unit step toward increasing columns.
    pub const RIGHT: Self = Self::new(1, 0);

    /// The four unit directions in up, down, left, right order.
    pub const DIRECTIONS: [Self; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Reports whether the vector is one of the four unit directions.
    #[must_use]
    pub const fn is_unit_direction(&self) -> bool {
        self.column.abs() + self.row.abs() == 1
    }

    /// The four 4-connected neighbours, in up, down, left, right order.
    #[must_use]
    pub fn neighbors(self) -> [Self; 4] {
        Self::DIRECTIONS.map(|direction| self + direction)
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.column + rhs.column, self.row + rhs.row)
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.column - rhs.column, self.row - rhs.row)
    }
}

impl Neg for Coordinate {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.column, -self.row)
    }
}

impl Mul<i32> for Coordinate {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.column * rhs, self.row * rhs)
    }
}

/// Content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// A snake segment occupies the cell.
    Body,
    /// An apple waits in the cell.
    Collectible,
    /// A permanent wall laid by the player.
    Wall,
    /// A wall still under construction.
    TemporaryWall,
}

/// Movement state of the snake.
///
/// The timed variants carry their own elapsed time so the timer can never
/// drift away from the state it belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnakeState {
    /// Ordinary movement.
    #[default]
    Normal,
    /// Every vacated tail cell becomes a wall.
    WallBuilding,
    /// Movement is suspended until [`STUN_DURATION`] elapses.
    Stunned {
        /// Time spent stunned so far.
        elapsed: Duration,
    },
    /// Collisions are not fatal until [`INVINCIBILITY_DURATION`] elapses.
    Invincible {
        /// Time spent invincible so far.
        elapsed: Duration,
    },
}

impl SnakeState {
    /// Reports whether the state is [`SnakeState::Invincible`].
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        matches!(self, Self::Invincible { .. })
    }

    /// Reports whether the state is [`SnakeState::Stunned`].
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        matches!(self, Self::Stunned { .. })
    }

    /// Reports whether the state accepts player toggles and external effects.
    #[must_use]
    pub const fn is_controllable(&self) -> bool {
        matches!(self, Self::Normal | Self::WallBuilding)
    }
}

/// Variety of apple waiting on the grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AppleKind {
    /// Grows the snake by one segment.
    Normal,
    /// Grows the snake by two segments and grants invincibility.
    Golden,
    /// Awards points without growth.
    Shrink,
}

impl AppleKind {
    /// Every apple kind, in spawn-table order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Golden, Self::Shrink];

    /// Points awarded when the apple is eaten.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Normal => 10,
            Self::Golden => 50,
            Self::Shrink => 5,
        }
    }

    /// Growth credits granted to the snake.
    #[must_use]
    pub const fn growth(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Golden => 2,
            Self::Shrink => 0,
        }
    }

    /// Reports whether eating the apple makes the snake invincible.
    #[must_use]
    pub const fn grants_invincibility(self) -> bool {
        matches!(self, Self::Golden)
    }
}

/// Obstacle hit by a candidate head position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collision {
    /// The target lies outside the grid.
    Boundary,
    /// The target holds a player wall.
    Wall,
    /// The target is part of the snake body.
    SelfCollision,
}

impl Collision {
    /// Human-readable game-over message for the collision.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Boundary => "Collided with the grid boundary!",
            Self::Wall => "Collided with a wall!",
            Self::SelfCollision => "Collided with itself!",
        }
    }
}

/// Terminal result of a round lost to a collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameOver {
    collision: Collision,
}

impl GameOver {
    /// Records a game over caused by the provided collision.
    #[must_use]
    pub const fn new(collision: Collision) -> Self {
        Self { collision }
    }

    /// Collision that ended the round.
    #[must_use]
    pub const fn collision(&self) -> Collision {
        self.collision
    }

    /// Human-readable message describing the collision.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.collision.reason()
    }
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Lifecycle of the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// The snake is alive and the objective is not yet reached.
    #[default]
    Playing,
    /// The snake collided with an obstacle.
    Lost,
    /// The conquered territory reached the target percentage.
    Won,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a new heading for the next discrete step.
    ChangeDirection {
        /// Unit direction vector.
        direction: Coordinate,
    },
    /// Switches the snake into wall-building mode.
    EnterWallMode,
    /// Switches the snake back to normal movement.
    ExitWallMode,
    /// Flips between wall-building and normal movement.
    ToggleWallMode,
    /// Applies an external stun effect to the snake.
    StunSnake,
    /// Discards the current round and starts a fresh one.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a fresh round began.
    RoundStarted,
    /// Confirms that the snake completed a discrete step.
    SnakeMoved {
        /// Cell the head occupies after the step.
        head: Coordinate,
        /// Tail cell released by the step, absent while growing.
        vacated: Option<Coordinate>,
    },
    /// Reports that an invincible snake skipped a step instead of leaving the grid.
    SnakeBlocked {
        /// Obstacle that prevented the step.
        collision: Collision,
    },
    /// Announces that the snake entered a new movement state.
    SnakeStateChanged {
        /// State that became active.
        state: SnakeState,
    },
    /// Confirms that a wall was added to the territory.
    WallPlaced {
        /// Cell converted into a wall.
        cell: Coordinate,
    },
    /// Confirms that a wall was removed from the territory.
    WallRemoved {
        /// Cell restored to empty.
        cell: Coordinate,
    },
    /// Reports cells that became conquered during the last recompute.
    ZoneConquered {
        /// Newly conquered cells in ascending order.
        cells: Vec<Coordinate>,
    },
    /// Reports a change of the conquered share of the grid.
    TerritoryPercentageChanged {
        /// Conquered cells divided by total cells.
        percentage: f32,
    },
    /// Confirms that an apple appeared on the grid.
    AppleSpawned {
        /// Cell holding the apple.
        position: Coordinate,
        /// Kind of apple.
        kind: AppleKind,
    },
    /// Reports that an apple outlived its expiry and was removed.
    AppleExpired {
        /// Cell the apple occupied.
        position: Coordinate,
        /// Kind of apple.
        kind: AppleKind,
    },
    /// Confirms that the snake head reached an apple.
    AppleEaten {
        /// Cell the apple occupied.
        position: Coordinate,
        /// Kind of apple.
        kind: AppleKind,
        /// Points awarded for the apple.
        points: u32,
    },
    /// Reports that the round ended in a collision.
    GameOver {
        /// Obstacle the snake hit.
        collision: Collision,
    },
    /// Reports that the territory objective was reached.
    RoundWon {
        /// Conquered share at the moment of victory.
        percentage: f32,
        /// Bonus points derived from the conquered share.
        territory_bonus: u32,
    },
}

/// Tunables consumed by the simulation.
///
/// Every field has a default, so a configuration file may specify only the
/// values it wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Side length of a cell in presentation units.
    pub cell_length: f32,
    /// Milliseconds between two discrete snake steps.
    pub move_interval_ms: u64,
    /// Number of segments the snake starts with.
    pub initial_snake_length: u32,
    /// Milliseconds an apple survives before respawning elsewhere.
    pub apple_expiry_ms: u64,
    /// Conquered share required to win the round.
    pub target_percentage: f32,
    /// Multiplier converting the conquered share into bonus points.
    pub territory_bonus_multiplier: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            cell_length: 32.0,
            move_interval_ms: 200,
            initial_snake_length: 3,
            apple_expiry_ms: 10_000,
            target_percentage: 0.75,
            territory_bonus_multiplier: 1000,
        }
    }
}

impl GameConfig {
    /// Creates a default configuration with a custom grid size.
    #[must_use]
    pub fn with_grid(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Time between two discrete snake steps.
    #[must_use]
    pub const fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    /// Lifetime of an apple before it respawns.
    #[must_use]
    pub const fn apple_expiry(&self) -> Duration {
        Duration::from_millis(self.apple_expiry_ms)
    }

    /// Cell the snake head occupies at the start of a round.
    #[must_use]
    pub fn start_position(&self) -> Coordinate {
        Coordinate::new((self.columns / 2) as i32, (self.rows / 2) as i32)
    }

    /// Checks that the configuration describes a playable round.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if i32::try_from(self.columns).is_err() || i32::try_from(self.rows).is_err() {
            return Err(ConfigError::GridTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.move_interval_ms == 0 {
            return Err(ConfigError::ZeroMoveInterval);
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroSnakeLength);
        }
        // The body extends leftwards from the centre column.
        if self.initial_snake_length > self.columns / 2 + 1 {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_snake_length,
                columns: self.columns,
            });
        }
        if !(self.target_percentage > 0.0 && self.target_percentage <= 1.0) {
            return Err(ConfigError::TargetOutOfRange(self.target_percentage));
        }
        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no cells.
    #[error("grid must contain at least one cell, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The grid cannot be addressed with signed coordinates.
    #[error("grid of {columns}x{rows} exceeds the addressable range")]
    GridTooLarge {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The snake would never move.
    #[error("move interval must be positive")]
    ZeroMoveInterval,
    /// The snake would have no head.
    #[error("initial snake length must be positive")]
    ZeroSnakeLength,
    /// The starting body would stick out of the grid.
    #[error("initial snake length {length} does not fit a grid {columns} columns wide")]
    SnakeDoesNotFit {
        /// Configured snake length.
        length: u32,
        /// Configured column count.
        columns: u32,
    },
    /// The win condition is unreachable or trivially met.
    #[error("target percentage {0} must lie in (0, 1]")]
    TargetOutOfRange(f32),
}

/// Errors raised by grid accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    #[error("coordinate {coordinate} is outside the {columns}x{rows} grid")]
    OutOfRange {
        /// Offending coordinate.
        coordinate: Coordinate,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
}

/// Errors raised while building or driving the world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// A required collaborator was never wired before use.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    /// The configuration describes an unplayable round.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    /// A grid access escaped the bounds check.
    #[error(transparent)]
    Grid(#[from] GridError),
}
