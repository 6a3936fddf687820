//! wav-recorder core library
//!
//! Fixed-duration capture from the default input device using CPAL, with
//! RIFF/WAVE persistence through hound.
//!
//! # Example
//!
//! ```no_run
//! use wav_recorder_core::{CaptureFormat, CoreResult, Recorder, write_wav};
//!
//! use std::path::Path;
//!
//! fn main() -> CoreResult<()> {
//!     let format = CaptureFormat::CD_STEREO;
//!     let frames = format.frames_for(3)?;
//!
//!     let recorder = Recorder::new(format)?;
//!     let buffer = recorder.start(frames)?.wait()?;
//!
//!     write_wav(Path::new("out.wav"), format, &buffer)?;
//!     Ok(())
//! }
//! ```

mod audio;
mod error;

pub use {
    audio::{
        AudioSource, BITS_PER_SAMPLE, BYTES_PER_SAMPLE, CHANNELS, CaptureFormat,
        DefaultInputSource, Recorder, Recording, SAMPLE_RATE, SampleBuffer, read_wav, write_wav,
    },
    error::RecorderError,
    error::Result as CoreResult,
};
