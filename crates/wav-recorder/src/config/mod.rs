mod recorder_config;

pub(crate) use recorder_config::RecorderConfig;

/// File written to the working directory.
pub(crate) const DEFAULT_OUTPUT_FILE: &str = "out.wav";

/// Log filter installed at startup.
pub(crate) const LOG_FILTER: &str = "wav_recorder=info,wav_recorder_core=info";
