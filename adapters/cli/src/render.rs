use snake_jezzball_core::{AppleKind, CellState, Coordinate};
use snake_jezzball_world::query::{SnapshotCell, WorldSnapshot};

/// Renders the snapshot as one line of glyphs per grid row.
///
/// `@` head, `o` body, `#` wall, `+` temporary wall, `~` conquered ground,
/// `.` free ground. Apples render as `a` (normal), `g` (golden) or `s`
/// (shrink).
pub(crate) fn text_grid(snapshot: &WorldSnapshot) -> String {
    let columns = snapshot.columns as i32;
    let rows = snapshot.rows as i32;
    let mut text = String::new();

    for row in 0..rows {
        for column in 0..columns {
            let cell = Coordinate::new(column, row);
            text.push(glyph(snapshot, cell));
        }
        text.push('\n');
    }

    text
}

fn glyph(snapshot: &WorldSnapshot, cell: Coordinate) -> char {
    if cell == snapshot.snake_head {
        return '@';
    }

    let Some(SnapshotCell { state, conquered }) = snapshot.cell(cell) else {
        return ' ';
    };

    match state {
        CellState::Body => 'o',
        CellState::Wall => '#',
        CellState::TemporaryWall => '+',
        CellState::Collectible => match snapshot.apple {
            Some((position, kind)) if position == cell => apple_glyph(kind),
            _ => 'a',
        },
        CellState::Empty if conquered => '~',
        CellState::Empty => '.',
    }
}

const fn apple_glyph(kind: AppleKind) -> char {
    match kind {
        AppleKind::Normal => 'a',
        AppleKind::Golden => 'g',
        AppleKind::Shrink => 's',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_jezzball_core::{Command, GameConfig};
    use snake_jezzball_world::{apply, query, World};

    #[test]
    fn fresh_world_renders_snake_and_one_apple() {
        let config = GameConfig {
            initial_snake_length: 2,
            ..GameConfig::with_grid(5, 3)
        };
        let world = World::new(config, 9).expect("valid config");

        let text = text_grid(&query::snapshot(&world));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.chars().count() == 5));
        assert_eq!(&lines[1][1..3], "o@");
        let apples = text.chars().filter(|glyph| matches!(glyph, 'a' | 'g' | 's')).count();
        assert_eq!(apples, 1);
    }

    #[test]
    fn walls_render_after_wall_building() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::with_grid(9, 3)
        };
        let mut world = World::new(config, 1).expect("valid config");
        let mut events = Vec::new();
        apply(&mut world, Command::EnterWallMode, &mut events).expect("wall mode");
        apply(
            &mut world,
            Command::Tick {
                dt: std::time::Duration::from_millis(200),
            },
            &mut events,
        )
        .expect("tick");

        let text = text_grid(&query::snapshot(&world));

        let middle = text.lines().nth(1).expect("three rows");
        assert_eq!(middle.chars().nth(4), Some('#'));
        assert_eq!(middle.chars().nth(5), Some('@'));
    }
}
