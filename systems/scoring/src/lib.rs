#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic scoring system that folds world events into a scoreboard.

use std::collections::BTreeMap;

use log::debug;
use snake_jezzball_core::{AppleKind, Collision, Event};

/// How the tracked round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The snake hit an obstacle.
    Lost(Collision),
    /// The territory objective was reached.
    Won,
}

/// Running totals for the current round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scoreboard {
    score: u32,
    apples: BTreeMap<AppleKind, u32>,
    walls_placed: u32,
    cells_conquered_total: usize,
    conquests: u32,
    percentage: f32,
    territory_bonus: u32,
    outcome: Option<RoundOutcome>,
}

impl Scoreboard {
    /// Apple points plus the territory bonus once the round is won.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Apples eaten of the provided kind.
    #[must_use]
    pub fn apples_eaten(&self, kind: AppleKind) -> u32 {
        self.apples.get(&kind).copied().unwrap_or(0)
    }

    /// Apples eaten across all kinds.
    #[must_use]
    pub fn total_apples(&self) -> u32 {
        self.apples.values().sum()
    }

    /// Walls laid during the round.
    #[must_use]
    pub const fn walls_placed(&self) -> u32 {
        self.walls_placed
    }

    /// Sum of the cells reported by every conquest this round.
    ///
    /// Never decreases, even when walls are removed and conquered ground
    /// shrinks. Use [`Scoreboard::percentage`] for the current share.
    #[must_use]
    pub const fn cells_conquered_total(&self) -> usize {
        self.cells_conquered_total
    }

    /// Number of conquest events observed.
    #[must_use]
    pub const fn conquests(&self) -> u32 {
        self.conquests
    }

    /// Latest conquered share of the grid.
    #[must_use]
    pub const fn percentage(&self) -> f32 {
        self.percentage
    }

    /// Bonus awarded for territory when the round was won.
    #[must_use]
    pub const fn territory_bonus(&self) -> u32 {
        self.territory_bonus
    }

    /// Outcome of the round, if it ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }
}

/// Pure scoring system tracking the current round.
#[derive(Debug, Default)]
pub struct Scoring {
    scoreboard: Scoreboard,
}

impl Scoring {
    /// Creates a scoring system with an empty scoreboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scoreboard of the current round.
    #[must_use]
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Consumes world events and updates the scoreboard.
    ///
    /// A [`Event::RoundStarted`] discards everything observed before it.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            let board = &mut self.scoreboard;
            match event {
                Event::RoundStarted => {
                    *board = Scoreboard::default();
                }
                Event::AppleEaten { kind, points, .. } => {
                    board.score = board.score.saturating_add(*points);
                    *board.apples.entry(*kind).or_insert(0) += 1;
                }
                Event::WallPlaced { .. } => {
                    board.walls_placed = board.walls_placed.saturating_add(1);
                }
                Event::ZoneConquered { cells } => {
                    board.conquests = board.conquests.saturating_add(1);
                    board.cells_conquered_total =
                        board.cells_conquered_total.saturating_add(cells.len());
                }
                Event::TerritoryPercentageChanged { percentage } => {
                    board.percentage = *percentage;
                }
                Event::GameOver { collision } => {
                    board.outcome = Some(RoundOutcome::Lost(*collision));
                    debug!("final score {} ({})", board.score, collision.reason());
                }
                Event::RoundWon {
                    percentage,
                    territory_bonus,
                } => {
                    board.percentage = *percentage;
                    board.territory_bonus = *territory_bonus;
                    board.score = board.score.saturating_add(*territory_bonus);
                    board.outcome = Some(RoundOutcome::Won);
                    debug!("final score {} with territory bonus", board.score);
                }
                _ => {}
            }
        }
    }
}
