use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use snake_jezzball_core::{Command, Event, RoundPhase};
use snake_jezzball_system_scoring::Scoring;
use snake_jezzball_system_steering::{Steering, SteeringInput};
use snake_jezzball_world::{apply, query, World};

/// Feeds one steering input per frame through steering, the world and scoring.
///
/// Steering sees the events of the previous frame, so a restart only takes
/// effect on the frame after the round ended. The world is ticked by `frame`
/// whenever the round is live after the steering commands were applied.
pub(crate) fn replay(
    world: &mut World,
    frames: Vec<SteeringInput>,
    frame: Duration,
) -> Result<Scoring> {
    let mut steering = Steering::new();
    let mut scoring = Scoring::new();
    let mut events: Vec<Event> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();

    info!("replaying {} frames of {:?}", frames.len(), frame);
    for input in frames {
        commands.clear();
        steering.handle(&events, input, &mut commands);

        events.clear();
        for command in commands.drain(..) {
            apply(world, command, &mut events).context("command rejected by the world")?;
        }
        if query::phase(world) == RoundPhase::Playing {
            apply(world, Command::Tick { dt: frame }, &mut events)
                .context("tick rejected by the world")?;
        }

        for event in &events {
            log_event(event);
        }
        scoring.handle(&events);
    }

    Ok(scoring)
}

fn log_event(event: &Event) {
    match event {
        Event::TimeAdvanced { .. } | Event::SnakeMoved { .. } => {}
        Event::GameOver { collision } => info!("{}", collision.reason()),
        Event::RoundWon {
            percentage,
            territory_bonus,
        } => info!(
            "territory objective reached at {:.1}% (+{territory_bonus})",
            percentage * 100.0
        ),
        other => debug!("{other:?}"),
    }
}
