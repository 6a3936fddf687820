//! wav-recorder: record a fixed-duration stereo clip to `out.wav`.

mod app;
mod config;
mod error;
mod prompt;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
};

use crate::config::{LOG_FILTER, RecorderConfig};

use std::io;

use tracing::{error, info};
use wav_recorder_core::DefaultInputSource;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(LOG_FILTER)
        .with_writer(io::stderr)
        .init();

    let mut app = App {
        config: RecorderConfig::default(),
        source: DefaultInputSource,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    match app.run(stdin.lock(), &mut stdout) {
        Ok(path) => info!(path = ?path, "Recording saved"),
        Err(e) => {
            error!("Recording failed: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
