use snake_jezzball_core::Coordinate;
use snake_jezzball_system_steering::SteeringInput;
use thiserror::Error;

/// Errors that can occur while parsing an input script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The script contained a character that is not a frame token.
    #[error("unknown script token '{token}' at position {position}")]
    UnknownToken {
        /// Offending character.
        token: char,
        /// Character offset inside the script.
        position: usize,
    },
    /// A repeat count was zero or did not fit the counter.
    #[error("invalid repeat count '{0}'")]
    InvalidRepeat(String),
    /// A repeat count was not preceded by a token.
    #[error("repeat count at position {0} has no token to repeat")]
    DanglingRepeat(usize),
}

/// Parses a script into one steering input per simulated frame.
///
/// Tokens: `U`, `D`, `L`, `R` turn the snake, `W` toggles wall building,
/// `X` restarts a finished round and `.` waits. A decimal suffix repeats the
/// preceding token, so `R3` is three frames heading right. Whitespace is
/// ignored and tokens are case-insensitive.
pub(crate) fn parse(script: &str) -> Result<Vec<SteeringInput>, ScriptError> {
    let mut frames = Vec::new();
    let mut chars = script.char_indices().peekable();

    while let Some((position, token)) = chars.next() {
        if token.is_whitespace() {
            continue;
        }
        if token.is_ascii_digit() {
            return Err(ScriptError::DanglingRepeat(position));
        }

        let frame = frame_for(token).ok_or(ScriptError::UnknownToken { token, position })?;

        let mut digits = String::new();
        while let Some((_, digit)) = chars.next_if(|(_, next)| next.is_ascii_digit()) {
            digits.push(digit);
        }
        let repeat = parse_repeat(&digits)?;

        frames.extend(std::iter::repeat(frame).take(repeat));
    }

    Ok(frames)
}

fn frame_for(token: char) -> Option<SteeringInput> {
    let turn = |direction| SteeringInput::new(Some(direction), false, false);
    match token.to_ascii_uppercase() {
        'U' => Some(turn(Coordinate::UP)),
        'D' => Some(turn(Coordinate::DOWN)),
        'L' => Some(turn(Coordinate::LEFT)),
        'R' => Some(turn(Coordinate::RIGHT)),
        'W' => Some(SteeringInput::new(None, true, false)),
        'X' => Some(SteeringInput::new(None, false, true)),
        '.' => Some(SteeringInput::default()),
        _ => None,
    }
}

fn parse_repeat(digits: &str) -> Result<usize, ScriptError> {
    if digits.is_empty() {
        return Ok(1);
    }

    let repeat = digits
        .parse::<usize>()
        .map_err(|_| ScriptError::InvalidRepeat(digits.to_owned()))?;
    if repeat == 0 {
        return Err(ScriptError::InvalidRepeat(digits.to_owned()));
    }
    Ok(repeat)
}
