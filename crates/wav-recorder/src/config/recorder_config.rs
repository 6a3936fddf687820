use crate::config::DEFAULT_OUTPUT_FILE;

use std::path::PathBuf;

use wav_recorder_core::CaptureFormat;

/// Fixed recording parameters handed to capture and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Sample rate and channel layout for both capture and file.
    pub format: CaptureFormat,
    /// Destination WAV file.
    pub output_path: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            format: CaptureFormat::CD_STEREO,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}
