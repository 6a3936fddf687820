use crate::{AppError, AppResult};

use std::{
    io::{BufRead, ErrorKind, Write},
    panic::Location,
};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

pub(crate) const DURATION_PROMPT: &str = "Enter the time duration in seconds: ";

/// Prompts on `output` and reads one line from `input` as whole seconds.
///
/// Surrounding whitespace is ignored. Negative, fractional, empty, non-UTF-8
/// or non-numeric input is rejected; end of input counts as empty.
#[track_caller]
#[instrument(skip(input, output))]
pub(crate) fn read_duration<R: BufRead, W: Write>(mut input: R, output: &mut W) -> AppResult<u64> {
    write!(output, "{}", DURATION_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => AppError::InvalidDuration {
            input: String::new(),
            reason: "input is not valid UTF-8".to_string(),
            location: ErrorLocation::from(Location::caller()),
        },
        _ => AppError::from(e),
    })?;
    let trimmed = line.trim();

    let seconds = trimmed
        .parse::<u64>()
        .map_err(|e| AppError::InvalidDuration {
            input: trimmed.to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    debug!(seconds = seconds, "Duration entered");

    Ok(seconds)
}
