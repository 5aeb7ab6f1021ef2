use std::time::Duration;

use snake_jezzball_core::{AppleKind, Collision, Command, Coordinate, Event, GameConfig};
use snake_jezzball_system_scoring::{RoundOutcome, Scoring};
use snake_jezzball_world::{apply, World};

fn step(world: &mut World, command: Command, scoring: &mut Scoring) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events).expect("command applies");
    scoring.handle(&events);
    events
}

#[test]
fn collision_records_a_lost_outcome() {
    let config = GameConfig {
        initial_snake_length: 1,
        ..GameConfig::with_grid(5, 1)
    };
    let mut world = World::new(config, 4).expect("corridor is playable");
    let mut scoring = Scoring::new();

    let _ = step(
        &mut world,
        Command::ChangeDirection {
            direction: Coordinate::UP,
        },
        &mut scoring,
    );
    let _ = step(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(200),
        },
        &mut scoring,
    );

    assert_eq!(
        scoring.scoreboard().outcome(),
        Some(RoundOutcome::Lost(Collision::Boundary))
    );
    assert_eq!(scoring.scoreboard().score(), 0);
}

#[test]
fn restart_resets_the_scoreboard() {
    let mut scoring = Scoring::new();
    scoring.handle(&[
        Event::AppleEaten {
            position: Coordinate::new(3, 3),
            kind: AppleKind::Golden,
            points: 50,
        },
        Event::GameOver {
            collision: Collision::SelfCollision,
        },
    ]);
    assert_eq!(scoring.scoreboard().score(), 50);

    let mut world = World::new(GameConfig::default(), 4).expect("default config");
    let events = step(&mut world, Command::Restart, &mut scoring);

    assert_eq!(events.first(), Some(&Event::RoundStarted));
    assert_eq!(scoring.scoreboard().score(), 0);
    assert_eq!(scoring.scoreboard().outcome(), None);
    assert_eq!(scoring.scoreboard().total_apples(), 0);
}
