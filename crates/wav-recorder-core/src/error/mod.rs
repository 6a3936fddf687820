use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// No audio input device found.
    #[error("No input device found {location}")]
    NoInputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The device only offers a sample format the recorder cannot convert.
    #[error("Unsupported device sample format: {format} {location}")]
    UnsupportedSampleFormat {
        /// The sample format reported by the device.
        format: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Requested duration does not fit a RIFF/WAVE data chunk.
    #[error("Duration of {seconds}s exceeds the maximum of {max_seconds}s {location}")]
    DurationTooLong {
        /// Requested duration in seconds.
        seconds: u64,
        /// Longest duration the container can hold.
        max_seconds: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Sample data does not form whole frames.
    #[error("Invalid sample buffer: {reason} {location}")]
    InvalidBuffer {
        /// Description of the shape problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing the WAV file failed.
    #[error("Failed to write WAV file {path:?}: {source} {location}")]
    WavWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying error from hound.
        #[source]
        source: hound::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading a WAV file failed.
    #[error("Failed to read WAV file {path:?}: {source} {location}")]
    WavRead {
        /// Source path.
        path: PathBuf,
        /// Underlying error from hound.
        #[source]
        source: hound::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem operation failed.
    #[error("IO error on {path:?}: {source} {location}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
