#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake JezzBall.

pub mod apple;
pub mod collision;
pub mod connectivity;
pub mod grid;
pub mod snake;
pub mod territory;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_jezzball_core::{Command, Event, GameConfig, RoundPhase, WorldError};

use crate::{
    apple::Apple,
    grid::{Grid, GridLayout},
    snake::{Snake, Step},
    territory::Territory,
};

/// Represents the authoritative Snake JezzBall world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    grid: Grid,
    territory: Territory,
    snake: Snake,
    apple: Option<Apple>,
    rng: ChaCha8Rng,
    phase: RoundPhase,
    tick_index: u64,
}

impl World {
    /// Creates a world for the provided configuration and random seed.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, WorldError> {
        Self::builder().config(config).seed(seed).build()
    }

    /// Starts assembling a world from its collaborators.
    #[must_use]
    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    fn spawn_apple(&mut self) -> Result<Option<Apple>, WorldError> {
        let apple = Apple::spawn(
            &mut self.grid,
            &self.territory,
            self.config.apple_expiry(),
            &mut self.rng,
        )?;
        Ok(apple)
    }

    fn replace_apple(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        self.apple = self.spawn_apple()?;
        if let Some(apple) = &self.apple {
            out_events.push(Event::AppleSpawned {
                position: apple.position(),
                kind: apple.kind(),
            });
        }
        Ok(())
    }

    fn advance_apple(
        &mut self,
        dt: std::time::Duration,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let Some(apple) = self.apple.as_mut() else {
            return self.replace_apple(out_events);
        };

        if !apple.advance(dt) {
            return Ok(());
        }

        out_events.push(Event::AppleExpired {
            position: apple.position(),
            kind: apple.kind(),
        });
        let expired = *apple;
        expired.clear(&mut self.grid)?;
        self.replace_apple(out_events)
    }

    fn advance_snake(
        &mut self,
        dt: std::time::Duration,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let tick = self
            .snake
            .tick(dt, &mut self.grid, self.territory.walls())?;
        if tick.state_reverted {
            out_events.push(Event::SnakeStateChanged {
                state: self.snake.state(),
            });
        }

        match tick.step {
            Step::Idle => {}
            Step::Blocked(collision) => {
                out_events.push(Event::SnakeBlocked { collision });
            }
            Step::Collided(game_over) => {
                self.phase = RoundPhase::Lost;
                info!(
                    "round lost after {} ticks: {}",
                    self.tick_index,
                    game_over.reason()
                );
                out_events.push(Event::GameOver {
                    collision: game_over.collision(),
                });
            }
            Step::Moved {
                head,
                vacated,
                wall,
            } => {
                out_events.push(Event::SnakeMoved { head, vacated });
                if let Some(cell) = wall {
                    let _ = self.territory.add_wall(&mut self.grid, cell, out_events)?;
                }
                self.eat_apple_at(head, out_events)?;
            }
        }
        Ok(())
    }

    fn eat_apple_at(
        &mut self,
        head: snake_jezzball_core::Coordinate,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let Some(apple) = self.apple else {
            return Ok(());
        };
        if apple.position() != head {
            return Ok(());
        }

        out_events.push(Event::AppleEaten {
            position: head,
            kind: apple.kind(),
            points: apple.points(),
        });

        let before = self.snake.state();
        apple.apply_effect(&mut self.snake);
        if self.snake.state() != before {
            out_events.push(Event::SnakeStateChanged {
                state: self.snake.state(),
            });
        }

        self.apple = apple.respawn(&mut self.grid, &self.territory, &mut self.rng)?;
        if let Some(fresh) = &self.apple {
            out_events.push(Event::AppleSpawned {
                position: fresh.position(),
                kind: fresh.kind(),
            });
        }
        Ok(())
    }

    fn check_objective(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != RoundPhase::Playing
            || !self
                .territory
                .is_level_objective_reached(self.config.target_percentage)
        {
            return;
        }

        let percentage = self.territory.percentage();
        let territory_bonus = self
            .territory
            .calculate_territory_bonus(self.config.territory_bonus_multiplier);
        self.phase = RoundPhase::Won;
        info!("round won at {percentage:.3} with a bonus of {territory_bonus}");
        out_events.push(Event::RoundWon {
            percentage,
            territory_bonus,
        });
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        self.grid.clear();
        out_events.push(Event::RoundStarted);
        self.territory.clear_all(&mut self.grid, out_events)?;
        self.snake.reset(
            self.config.start_position(),
            self.config.initial_snake_length,
            &mut self.grid,
        )?;
        self.apple = None;
        self.replace_apple(out_events)?;
        self.phase = RoundPhase::Playing;
        self.tick_index = 0;
        info!("round restarted");
        Ok(())
    }

    fn push_state_if(&self, changed: bool, out_events: &mut Vec<Event>) {
        if changed {
            out_events.push(Event::SnakeStateChanged {
                state: self.snake.state(),
            });
        }
    }
}

/// Collects the collaborators required to create a [`World`].
#[derive(Debug, Default)]
pub struct WorldBuilder {
    config: Option<GameConfig>,
    seed: Option<u64>,
}

impl WorldBuilder {
    /// Supplies the game configuration.
    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Supplies the seed driving apple placement.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the collaborators and lays out the first round.
    ///
    /// The initial snake and apple are placed without emitting events.
    pub fn build(self) -> Result<World, WorldError> {
        let config = self
            .config
            .ok_or(WorldError::MissingCollaborator("game configuration"))?;
        let seed = self
            .seed
            .ok_or(WorldError::MissingCollaborator("random seed"))?;
        config.validate()?;

        let layout = GridLayout::new(0.0, 0.0, config.cell_length);
        let mut grid = Grid::with_layout(config.columns, config.rows, layout);
        let territory = Territory::for_grid(&grid);
        let snake = Snake::spawn(
            config.start_position(),
            config.initial_snake_length,
            config.move_interval(),
            &mut grid,
        )?;

        let mut world = World {
            config,
            grid,
            territory,
            snake,
            apple: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: RoundPhase::Playing,
            tick_index: 0,
        };
        world.apple = world.spawn_apple()?;
        info!(
            "round started on a {}x{} grid",
            world.config.columns, world.config.rows
        );
        Ok(world)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the round is lost or won every command except [`Command::Restart`] is
/// ignored.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.phase != RoundPhase::Playing && command != Command::Restart {
        return Ok(());
    }

    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.advance_apple(dt, out_events)?;
            world.advance_snake(dt, out_events)?;
            world.check_objective(out_events);
        }
        Command::ChangeDirection { direction } => {
            let _ = world.snake.change_direction(direction);
        }
        Command::EnterWallMode => {
            let changed = world.snake.enter_wall_mode();
            world.push_state_if(changed, out_events);
        }
        Command::ExitWallMode => {
            let changed = world.snake.exit_wall_mode();
            world.push_state_if(changed, out_events);
        }
        Command::ToggleWallMode => {
            let changed = world.snake.toggle_wall_mode();
            world.push_state_if(changed, out_events);
        }
        Command::StunSnake => {
            let changed = world.snake.stun();
            world.push_state_if(changed, out_events);
        }
        Command::Restart => world.restart(out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snake_jezzball_core::{
        AppleKind, CellState, Coordinate, GameConfig, RoundPhase, SnakeState,
    };

    use super::World;
    use crate::{apple::Apple, grid::Grid, snake::Snake, territory::Territory};

    /// Provides read-only access to the cell grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(world: &World) -> &Snake {
        &world.snake
    }

    /// Provides read-only access to walls and conquered zones.
    #[must_use]
    pub fn territory(world: &World) -> &Territory {
        &world.territory
    }

    /// The apple currently on the grid, if any.
    #[must_use]
    pub fn apple(world: &World) -> Option<&Apple> {
        world.apple.as_ref()
    }

    /// Whether the round is running, lost or won.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world.phase
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of ticks processed since the round started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures an owned view of the world for presentation.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        let grid = &world.grid;
        let cells = grid
            .positions()
            .map(|cell| {
                let state = grid.cell_state(cell).unwrap_or_default();
                let conquered = world.territory.is_conquered(cell);
                SnapshotCell { state, conquered }
            })
            .collect();

        WorldSnapshot {
            columns: grid.columns(),
            rows: grid.rows(),
            cells,
            snake_head: world.snake.head(),
            snake_length: world.snake.len(),
            snake_state: world.snake.state(),
            apple: world.apple.map(|apple| (apple.position(), apple.kind())),
            percentage: world.territory.percentage(),
            phase: world.phase,
            tick_index: world.tick_index,
        }
    }

    /// Presentation state of a single cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SnapshotCell {
        /// State stored in the grid.
        pub state: CellState,
        /// Whether the cell belongs to a conquered zone.
        pub conquered: bool,
    }

    /// Owned snapshot of the world at a tick boundary.
    #[derive(Clone, Debug, PartialEq)]
    pub struct WorldSnapshot {
        /// Number of grid columns.
        pub columns: u32,
        /// Number of grid rows.
        pub rows: u32,
        /// Cells in row-major order.
        pub cells: Vec<SnapshotCell>,
        /// Cell holding the snake head.
        pub snake_head: Coordinate,
        /// Number of snake segments.
        pub snake_length: usize,
        /// Movement state of the snake.
        pub snake_state: SnakeState,
        /// Position and kind of the current apple.
        pub apple: Option<(Coordinate, AppleKind)>,
        /// Conquered share of the grid.
        pub percentage: f32,
        /// Round phase.
        pub phase: RoundPhase,
        /// Ticks processed since the round started.
        pub tick_index: u64,
    }

    impl WorldSnapshot {
        /// Cell at the provided coordinate, if it lies inside the grid.
        #[must_use]
        pub fn cell(&self, cell: Coordinate) -> Option<SnapshotCell> {
            let column = u32::try_from(cell.column()).ok()?;
            let row = u32::try_from(cell.row()).ok()?;
            if column >= self.columns || row >= self.rows {
                return None;
            }
            let index = u64::from(row) * u64::from(self.columns) + u64::from(column);
            let index = usize::try_from(index).ok()?;
            self.cells.get(index).copied()
        }
    }
}
