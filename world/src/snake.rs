//! Snake body, heading and movement state machine.

use std::{
    collections::{BTreeSet, VecDeque},
    time::Duration,
};

use log::{debug, trace};
use snake_jezzball_core::{
    CellState, Collision, Coordinate, GameOver, GridError, SnakeState, INVINCIBILITY_DURATION,
    STUN_DURATION,
};

use crate::{collision, grid::Grid};

/// Result of a single discrete step attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// No step was due, or movement is suspended.
    Idle,
    /// The head advanced by one cell.
    Moved {
        /// Cell the head occupies after the step.
        head: Coordinate,
        /// Tail cell released by the step, absent while a growth credit was consumed.
        vacated: Option<Coordinate>,
        /// Vacated cell to convert into a wall while building walls.
        wall: Option<Coordinate>,
    },
    /// An invincible snake bumped the boundary and stayed in place.
    Blocked(Collision),
    /// The snake hit an obstacle and the round is over.
    Collided(GameOver),
}

/// Outcome of advancing the snake by a frame delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnakeTick {
    /// Discrete step performed during the frame.
    pub step: Step,
    /// Indicates that a timed state expired and the snake returned to normal.
    pub state_reverted: bool,
}

impl SnakeTick {
    const fn idle(state_reverted: bool) -> Self {
        Self {
            step: Step::Idle,
            state_reverted,
        }
    }
}

/// The player-controlled snake.
///
/// The body is stored tail first: the head is the most recently appended
/// element. The snake is the only component that writes [`CellState::Body`]
/// into the grid, and it never overwrites cells owned by walls.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coordinate>,
    direction: Coordinate,
    next_direction: Coordinate,
    state: SnakeState,
    move_interval: Duration,
    move_timer: Duration,
    growth_credits: u32,
    game_over: Option<GameOver>,
}

impl Snake {
    /// Creates a snake heading right whose head sits at `start`.
    ///
    /// The remaining `size - 1` segments extend to the left of the head. A
    /// size of zero is treated as one. The grid is left untouched.
    #[must_use]
    pub fn new(start: Coordinate, size: u32, move_interval: Duration) -> Self {
        let direction = Coordinate::RIGHT;
        Self {
            body: initial_body(start, direction, size),
            direction,
            next_direction: direction,
            state: SnakeState::Normal,
            move_interval,
            move_timer: Duration::ZERO,
            growth_credits: 0,
            game_over: None,
        }
    }

    /// Creates a snake and marks its body on the grid.
    pub fn spawn(
        start: Coordinate,
        size: u32,
        move_interval: Duration,
        grid: &mut Grid,
    ) -> Result<Self, GridError> {
        let snake = Self::new(start, size, move_interval);
        for cell in &snake.body {
            occupy(grid, *cell)?;
        }
        Ok(snake)
    }

    /// Reinitialises body, heading, state and timers for a new round.
    pub fn reset(
        &mut self,
        start: Coordinate,
        size: u32,
        grid: &mut Grid,
    ) -> Result<(), GridError> {
        let previous = std::mem::take(&mut self.body);
        for cell in previous {
            release(grid, &self.body, cell)?;
        }

        *self = Self::spawn(start, size, self.move_interval, grid)?;
        debug!("snake reset at {start} with {} segments", self.body.len());
        Ok(())
    }

    /// Advances timers by `dt` and performs a discrete step when one is due.
    ///
    /// Stunned snakes only accumulate their stun time; the frame that
    /// completes the stun returns the snake to normal without moving.
    pub fn tick(
        &mut self,
        dt: Duration,
        grid: &mut Grid,
        walls: &BTreeSet<Coordinate>,
    ) -> Result<SnakeTick, GridError> {
        if self.game_over.is_some() {
            return Ok(SnakeTick::idle(false));
        }

        let mut state_reverted = false;
        match self.state {
            SnakeState::Stunned { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= STUN_DURATION {
                    self.state = SnakeState::Normal;
                    debug!("stun expired");
                    return Ok(SnakeTick::idle(true));
                }
                self.state = SnakeState::Stunned { elapsed };
                return Ok(SnakeTick::idle(false));
            }
            SnakeState::Invincible { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= INVINCIBILITY_DURATION {
                    self.state = SnakeState::Normal;
                    state_reverted = true;
                    debug!("invincibility expired");
                } else {
                    self.state = SnakeState::Invincible { elapsed };
                }
            }
            SnakeState::Normal | SnakeState::WallBuilding => {}
        }

        self.move_timer = self.move_timer.saturating_add(dt);
        if self.move_timer < self.move_interval {
            return Ok(SnakeTick::idle(state_reverted));
        }
        self.move_timer = Duration::ZERO;

        let step = self.step(grid, walls)?;
        Ok(SnakeTick {
            step,
            state_reverted,
        })
    }

    /// Performs one discrete step in the latched direction.
    ///
    /// Does nothing once the round is over or while stunned. While
    /// invincible, wall and body collisions are passed through and a boundary
    /// collision skips the step so the head never leaves the grid.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        walls: &BTreeSet<Coordinate>,
    ) -> Result<Step, GridError> {
        if self.game_over.is_some() || self.state.is_stunned() {
            return Ok(Step::Idle);
        }

        self.direction = self.next_direction;
        let target = self.head() + self.direction;
        let invincible = self.state.is_invincible();

        match collision::classify(grid, &self.body, walls, target) {
            Some(Collision::Boundary) if invincible => {
                trace!("invincible snake held at boundary facing {target}");
                return Ok(Step::Blocked(Collision::Boundary));
            }
            Some(collision) if !invincible => {
                let game_over = GameOver::new(collision);
                self.game_over = Some(game_over);
                debug!("snake collided at {target}: {game_over}");
                return Ok(Step::Collided(game_over));
            }
            _ => {}
        }

        self.body.push_back(target);
        occupy(grid, target)?;

        let vacated = if self.growth_credits > 0 {
            self.growth_credits -= 1;
            None
        } else {
            match self.body.pop_front() {
                // An overlapping segment still owns the cell.
                Some(tail) if self.body.contains(&tail) => None,
                Some(tail) => {
                    release(grid, &self.body, tail)?;
                    Some(tail)
                }
                None => None,
            }
        };

        let wall = match self.state {
            SnakeState::WallBuilding => vacated,
            _ => None,
        };

        trace!("snake moved to {target}");
        Ok(Step::Moved {
            head: target,
            vacated,
            wall,
        })
    }

    /// Latches a new heading for the next step.
    ///
    /// Rejects the zero vector, non-unit vectors and the reverse of the
    /// current heading.
    pub fn change_direction(&mut self, direction: Coordinate) -> bool {
        if !direction.is_unit_direction() || direction == -self.direction {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Adds one growth credit; the next step keeps its tail.
    pub fn grow(&mut self) {
        self.growth_credits = self.growth_credits.saturating_add(1);
    }

    /// Switches from normal movement to wall building.
    pub fn enter_wall_mode(&mut self) -> bool {
        self.transition_if(SnakeState::Normal, SnakeState::WallBuilding)
    }

    /// Switches from wall building back to normal movement.
    pub fn exit_wall_mode(&mut self) -> bool {
        self.transition_if(SnakeState::WallBuilding, SnakeState::Normal)
    }

    /// Flips between normal movement and wall building.
    pub fn toggle_wall_mode(&mut self) -> bool {
        self.enter_wall_mode() || self.exit_wall_mode()
    }

    /// Suspends movement for [`STUN_DURATION`].
    pub fn stun(&mut self) -> bool {
        if !self.state.is_controllable() || self.game_over.is_some() {
            return false;
        }
        self.state = SnakeState::Stunned {
            elapsed: Duration::ZERO,
        };
        debug!("snake stunned");
        true
    }

    /// Makes collisions non-fatal for [`INVINCIBILITY_DURATION`].
    ///
    /// Refreshes the timer when already invincible.
    pub fn make_invincible(&mut self) -> bool {
        if self.state.is_stunned() || self.game_over.is_some() {
            return false;
        }
        self.state = SnakeState::Invincible {
            elapsed: Duration::ZERO,
        };
        debug!("snake invincible");
        true
    }

    /// Most recently appended segment.
    #[must_use]
    pub fn head(&self) -> Coordinate {
        self.body.back().copied().unwrap_or_default()
    }

    /// Oldest segment.
    #[must_use]
    pub fn tail(&self) -> Coordinate {
        self.body.front().copied().unwrap_or_default()
    }

    /// Segments from tail to head.
    #[must_use]
    pub fn body(&self) -> &VecDeque<Coordinate> {
        &self.body
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Reports whether the body has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Reports whether a segment occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.body.contains(&cell)
    }

    /// Heading used by the last step.
    #[must_use]
    pub const fn direction(&self) -> Coordinate {
        self.direction
    }

    /// Heading latched for the next step.
    #[must_use]
    pub const fn next_direction(&self) -> Coordinate {
        self.next_direction
    }

    /// Current movement state.
    #[must_use]
    pub const fn state(&self) -> SnakeState {
        self.state
    }

    /// Pending growth credits.
    #[must_use]
    pub const fn growth_credits(&self) -> u32 {
        self.growth_credits
    }

    /// Game-over record, if the snake collided.
    #[must_use]
    pub const fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    /// Reports whether the snake collided.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    fn transition_if(&mut self, from: SnakeState, to: SnakeState) -> bool {
        if self.state != from || self.game_over.is_some() {
            return false;
        }
        self.state = to;
        debug!("snake state {from:?} -> {to:?}");
        true
    }
}

fn initial_body(start: Coordinate, direction: Coordinate, size: u32) -> VecDeque<Coordinate> {
    let size = i32::try_from(size.max(1)).unwrap_or(i32::MAX);
    (0..size)
        .rev()
        .map(|offset| start - direction * offset)
        .collect()
}

fn occupy(grid: &mut Grid, cell: Coordinate) -> Result<(), GridError> {
    match grid.cell_state(cell)? {
        CellState::Empty | CellState::Collectible => grid.set_cell_state(cell, CellState::Body),
        _ => Ok(()),
    }
}

fn release(
    grid: &mut Grid,
    body: &VecDeque<Coordinate>,
    cell: Coordinate,
) -> Result<(), GridError> {
    if body.contains(&cell) {
        return Ok(());
    }
    if grid.cell_state(cell)? == CellState::Body {
        grid.set_cell_state(cell, CellState::Empty)?;
    }
    Ok(())
}
