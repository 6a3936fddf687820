use wav_recorder_core::RecorderError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Process exit status for an unparseable duration.
pub(crate) const EXIT_INVALID_INPUT: i32 = 2;

/// Process exit status for every other failure.
pub(crate) const EXIT_FAILURE: i32 = 1;

/// Application-level errors for the wav-recorder binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Capture or persistence error from wav-recorder-core.
    #[error("Recorder error: {source} {location}")]
    Recorder {
        /// The underlying recorder error.
        #[source]
        source: RecorderError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The entered duration is not a non-negative whole number of seconds.
    #[error("Invalid duration {input:?}: {reason} {location}")]
    InvalidDuration {
        /// The trimmed line the user entered.
        input: String,
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from the console.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// Exit status the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidDuration { .. } => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        }
    }
}

// Manual From<RecorderError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<RecorderError> for AppError {
    #[track_caller]
    fn from(source: RecorderError) -> Self {
        AppError::Recorder {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
