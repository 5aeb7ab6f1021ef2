#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that turns player input into snake commands.

use snake_jezzball_core::{Command, Coordinate, Event};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SteeringInput {
    /// Heading requested on this frame.
    pub direction: Option<Coordinate>,
    /// Indicates whether the player flipped wall-building mode on this frame.
    pub toggle_wall_mode: bool,
    /// Indicates whether the player asked for a new round on this frame.
    pub restart: bool,
}

impl SteeringInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(direction: Option<Coordinate>, toggle_wall_mode: bool, restart: bool) -> Self {
        Self {
            direction,
            toggle_wall_mode,
            restart,
        }
    }
}

/// Steering system that translates input into world commands.
///
/// Movement commands are only emitted while the round is live; a restart is
/// only emitted once the round has ended.
#[derive(Debug, Clone)]
pub struct Steering {
    round_live: bool,
}

impl Default for Steering {
    fn default() -> Self {
        Self::new()
    }
}

impl Steering {
    /// Creates a new steering system for a live round.
    #[must_use]
    pub const fn new() -> Self {
        Self { round_live: true }
    }

    /// Reports whether the system currently forwards movement input.
    #[must_use]
    pub const fn round_live(&self) -> bool {
        self.round_live
    }

    /// Consumes world events and adapter-derived input to emit steering commands.
    pub fn handle(&mut self, events: &[Event], input: SteeringInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameOver { .. } | Event::RoundWon { .. } => self.round_live = false,
                Event::RoundStarted => self.round_live = true,
                _ => {}
            }
        }

        if !self.round_live {
            if input.restart {
                out.push(Command::Restart);
            }
            return;
        }

        if let Some(direction) = input.direction {
            if direction.is_unit_direction() {
                out.push(Command::ChangeDirection { direction });
            }
        }

        if input.toggle_wall_mode {
            out.push(Command::ToggleWallMode);
        }
    }
}
