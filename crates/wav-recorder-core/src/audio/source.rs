use crate::{
    CoreResult,
    audio::{CaptureFormat, Recorder, SampleBuffer},
};

use tracing::instrument;

/// Something that can produce a fixed number of captured frames.
pub trait AudioSource {
    /// Captures exactly `frames` frames in `format`, blocking until done.
    fn record(&mut self, format: CaptureFormat, frames: usize) -> CoreResult<SampleBuffer>;
}

/// Records from the system default input device.
///
/// The device is acquired at record time, so nothing touches the audio
/// subsystem until a capture is actually requested.
#[derive(Debug, Default)]
pub struct DefaultInputSource;

impl AudioSource for DefaultInputSource {
    #[instrument(skip(self))]
    fn record(&mut self, format: CaptureFormat, frames: usize) -> CoreResult<SampleBuffer> {
        let recorder = Recorder::new(format)?;
        let recording = recorder.start(frames)?;
        recording.wait()
    }
}
