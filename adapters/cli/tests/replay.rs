use std::process::Command;

fn snake_jezzball(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_snake-jezzball"))
        .args(args)
        .output()
        .expect("failed to run the snake-jezzball binary");

    assert!(
        output.status.success(),
        "snake-jezzball exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn scripted_turn_into_the_boundary_is_reported_as_lost() {
    let stdout = snake_jezzball(&["--columns", "5", "--rows", "1", "--script", "U", "--no-grid"]);

    assert!(
        stdout.contains("outcome:    lost (Collided with the grid boundary!)"),
        "unexpected summary:\n{stdout}"
    );
    assert!(stdout.contains("ticks:      1"), "unexpected summary:\n{stdout}");
}

#[test]
fn final_grid_shows_the_snake_after_the_script() {
    let stdout = snake_jezzball(&["--columns", "5", "--rows", "1", "--script", "."]);

    let grid = stdout.lines().last().expect("grid row printed");
    assert_eq!(grid.chars().count(), 5);
    assert_eq!(&grid[1..4], "oo@");
    assert!(stdout.contains("outcome:    in progress"));
}

#[test]
fn malformed_script_fails_with_context() {
    let output = Command::new(env!("CARGO_BIN_EXE_snake-jezzball"))
        .args(["--script", "R0"])
        .output()
        .expect("failed to run the snake-jezzball binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse input script"), "{stderr}");
}
