use std::time::Duration;

use snake_jezzball_core::{
    CellState, Collision, Command, ConfigError, Coordinate, Event, GameConfig, RoundPhase,
    SnakeState, WorldError,
};
use snake_jezzball_world::{apply, query, World};

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    )
    .expect("tick applies");
    events
}

fn corridor() -> World {
    let config = GameConfig {
        initial_snake_length: 1,
        ..GameConfig::with_grid(5, 1)
    };
    World::new(config, 17).expect("corridor is playable")
}

#[test]
fn builder_requires_configuration_and_seed() {
    let missing_config = World::builder().seed(1).build();
    assert_eq!(
        missing_config.err(),
        Some(WorldError::MissingCollaborator("game configuration"))
    );

    let missing_seed = World::builder().config(GameConfig::default()).build();
    assert_eq!(
        missing_seed.err(),
        Some(WorldError::MissingCollaborator("random seed"))
    );
}

#[test]
fn builder_rejects_invalid_configuration() {
    let config = GameConfig {
        target_percentage: 1.5,
        ..GameConfig::default()
    };

    let result = World::new(config, 3);

    assert_eq!(
        result.err(),
        Some(WorldError::InvalidConfig(ConfigError::TargetOutOfRange(1.5)))
    );
}

#[test]
fn leaving_the_grid_ends_the_round() {
    let mut world = corridor();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ChangeDirection {
            direction: Coordinate::UP,
        },
        &mut events,
    )
    .expect("direction applies");
    assert!(events.is_empty());

    let events = tick(&mut world, 200);

    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced {
                dt: Duration::from_millis(200)
            },
            Event::GameOver {
                collision: Collision::Boundary
            },
        ],
        "the first step leaves the single-row grid"
    );
    assert_eq!(query::phase(&world), RoundPhase::Lost);
    assert_eq!(query::snake(&world).head(), Coordinate::new(2, 0));
}

#[test]
fn lost_round_ignores_everything_but_restart() {
    let mut world = corridor();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ChangeDirection {
            direction: Coordinate::DOWN,
        },
        &mut events,
    )
    .expect("direction applies");
    let _ = tick(&mut world, 200);
    assert_eq!(query::phase(&world), RoundPhase::Lost);

    let mut ignored = Vec::new();
    for command in [
        Command::Tick {
            dt: Duration::from_millis(200),
        },
        Command::ToggleWallMode,
        Command::StunSnake,
    ] {
        apply(&mut world, command, &mut ignored).expect("ignored command");
    }
    assert!(ignored.is_empty());
    assert_eq!(query::tick_index(&world), 1);
}

#[test]
fn restart_begins_a_fresh_round() {
    let mut world = corridor();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ChangeDirection {
            direction: Coordinate::UP,
        },
        &mut events,
    )
    .expect("direction applies");
    let _ = tick(&mut world, 200);

    let mut events = Vec::new();
    apply(&mut world, Command::Restart, &mut events).expect("restart applies");

    assert_eq!(events.first(), Some(&Event::RoundStarted));
    assert!(events.contains(&Event::TerritoryPercentageChanged { percentage: 0.0 }));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AppleSpawned { .. })));
    assert_eq!(query::phase(&world), RoundPhase::Playing);
    assert_eq!(query::tick_index(&world), 0);
    assert_eq!(query::snake(&world).head(), Coordinate::new(2, 0));
    assert_eq!(query::snake(&world).direction(), Coordinate::RIGHT);
    assert!(!query::snake(&world).is_game_over());
    assert_eq!(query::grid(&world).count_of(CellState::Body), 1);
    assert_eq!(query::grid(&world).count_of(CellState::Collectible), 1);
}

#[test]
fn stunned_snake_recovers_after_two_seconds_without_moving() {
    let mut world = World::new(GameConfig::default(), 5).expect("default config");
    let start = query::snake(&world).head();
    let mut events = Vec::new();
    apply(&mut world, Command::StunSnake, &mut events).expect("stun applies");
    assert_eq!(
        events,
        vec![Event::SnakeStateChanged {
            state: SnakeState::Stunned {
                elapsed: Duration::ZERO
            }
        }]
    );

    let mut during = Vec::new();
    for _ in 0..19 {
        during.extend(tick(&mut world, 100));
    }
    assert!(!during
        .iter()
        .any(|event| matches!(event, Event::SnakeMoved { .. })));
    assert!(query::snake(&world).state().is_stunned());

    let last = tick(&mut world, 100);

    assert!(last.contains(&Event::SnakeStateChanged {
        state: SnakeState::Normal
    }));
    assert!(!last
        .iter()
        .any(|event| matches!(event, Event::SnakeMoved { .. })));
    assert_eq!(query::snake(&world).head(), start);
}

#[test]
fn stun_cannot_be_stacked() {
    let mut world = World::new(GameConfig::default(), 5).expect("default config");
    let mut events = Vec::new();
    apply(&mut world, Command::StunSnake, &mut events).expect("stun applies");

    let mut repeated = Vec::new();
    apply(&mut world, Command::StunSnake, &mut repeated).expect("stun applies");
    apply(&mut world, Command::EnterWallMode, &mut repeated).expect("wall mode applies");

    assert!(repeated.is_empty());
}

#[test]
fn wall_mode_round_trip_reports_each_transition() {
    let mut world = World::new(GameConfig::default(), 8).expect("default config");
    let mut events = Vec::new();

    apply(&mut world, Command::EnterWallMode, &mut events).expect("enter applies");
    apply(&mut world, Command::EnterWallMode, &mut events).expect("enter applies");
    apply(&mut world, Command::ExitWallMode, &mut events).expect("exit applies");

    assert_eq!(
        events,
        vec![
            Event::SnakeStateChanged {
                state: SnakeState::WallBuilding
            },
            Event::SnakeStateChanged {
                state: SnakeState::Normal
            },
        ]
    );
}

#[test]
fn snake_steps_once_per_move_interval() {
    let mut world = World::new(GameConfig::default(), 13).expect("default config");
    let start = query::snake(&world).head();

    let first = tick(&mut world, 150);
    let second = tick(&mut world, 50);

    assert!(!first
        .iter()
        .any(|event| matches!(event, Event::SnakeMoved { .. })));
    assert!(second.iter().any(|event| matches!(
        event,
        Event::SnakeMoved { head, .. } if *head == start + Coordinate::RIGHT
    )));
    assert_eq!(query::snake(&world).head(), start + Coordinate::RIGHT);
}
