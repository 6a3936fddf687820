use crate::{AppResult, config::RecorderConfig, prompt};

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use tracing::{info, instrument};
use wav_recorder_core::{AudioSource, write_wav};

/// Prompt, capture, write: the whole recording session.
pub(crate) struct App<S: AudioSource> {
    pub config: RecorderConfig,
    pub source: S,
}

impl<S: AudioSource> App<S> {
    /// Runs one session and returns the path of the written file.
    ///
    /// The duration is parsed before the source is touched, so invalid
    /// input never opens a device or creates the output file.
    #[instrument(skip(self, input, output))]
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> AppResult<PathBuf> {
        let seconds = prompt::read_duration(input, output)?;
        let format = self.config.format;
        let frames = format.frames_for(seconds)?;

        writeln!(output, "Recording...\n")?;
        output.flush()?;

        info!(seconds = seconds, frames = frames, "Capture requested");
        let buffer = self.source.record(format, frames)?;

        write_wav(&self.config.output_path, format, &buffer)?;

        let file_name = self
            .config
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.output_path.display().to_string());
        writeln!(output, "Finished...\nPlease check '{}'.", file_name)?;
        output.flush()?;

        Ok(self.config.output_path.clone())
    }
}
