use crate::{CoreResult, RecorderError, audio::format::BYTES_PER_SAMPLE};

use std::panic::Location;

use error_location::ErrorLocation;

/// Captured 16-bit PCM audio, stored interleaved (frame-major).
///
/// Conceptually a `frames × channels` matrix; row `i` is [`SampleBuffer::frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    channels: u16,
    samples: Vec<i16>,
}

impl SampleBuffer {
    /// Wraps interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::InvalidBuffer`] if `channels` is zero or the
    /// sample count is not a whole number of frames.
    #[track_caller]
    pub fn from_interleaved(channels: u16, samples: Vec<i16>) -> CoreResult<Self> {
        if channels == 0 {
            return Err(RecorderError::InvalidBuffer {
                reason: "channel count must be non-zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if samples.len() % usize::from(channels) != 0 {
            return Err(RecorderError::InvalidBuffer {
                reason: format!(
                    "{} samples do not form whole {}-channel frames",
                    samples.len(),
                    channels
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { channels, samples })
    }

    /// A buffer of `frames` frames of digital silence.
    #[track_caller]
    pub fn silent(frames: usize, channels: u16) -> CoreResult<Self> {
        Self::from_interleaved(channels, vec![0; frames * usize::from(channels)])
    }

    /// Number of frames (rows).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Number of channels (columns).
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// `(frames, channels)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.frames(), usize::from(self.channels))
    }

    /// Samples of frame `index`, one per channel.
    pub fn frame(&self, index: usize) -> Option<&[i16]> {
        let width = usize::from(self.channels);
        let start = index.checked_mul(width)?;
        self.samples.get(start..start + width)
    }

    /// All samples in interleaved order.
    pub fn as_interleaved(&self) -> &[i16] {
        &self.samples
    }

    /// Size of these samples inside a WAV data chunk.
    pub fn data_len_bytes(&self) -> usize {
        self.samples.len() * BYTES_PER_SAMPLE
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
