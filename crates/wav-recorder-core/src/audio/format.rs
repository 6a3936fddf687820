use crate::{CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;

/// Capture sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Captured channel count (stereo).
pub const CHANNELS: u16 = 2;

/// Bit depth of every stored sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per stored sample.
pub const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;

/// Size of the canonical RIFF/WAVE PCM header. The RIFF chunk size field
/// counts everything after its own first 8 bytes, so header plus data must
/// stay within `u32::MAX`.
const WAV_HEADER_BYTES: u64 = 44;

/// Sample rate and channel layout shared by capture and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    /// Frames per second.
    pub sample_rate: u32,
    /// Samples per frame.
    pub channels: u16,
}

impl CaptureFormat {
    /// 44.1 kHz stereo.
    pub const CD_STEREO: Self = Self {
        sample_rate: SAMPLE_RATE,
        channels: CHANNELS,
    };

    /// Number of frames covering `seconds` of audio.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DurationTooLong`] when the resulting data
    /// chunk would not fit a RIFF/WAVE file.
    #[track_caller]
    pub fn frames_for(&self, seconds: u64) -> CoreResult<usize> {
        let max_seconds = self.max_seconds();
        if seconds > max_seconds {
            return Err(RecorderError::DurationTooLong {
                seconds,
                max_seconds,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Bounded by max_seconds, so the product fits in u32 range.
        Ok((seconds * u64::from(self.sample_rate)) as usize)
    }

    /// Byte length of the data chunk holding `frames` frames.
    pub fn data_len_bytes(&self, frames: usize) -> usize {
        frames * self.bytes_per_frame()
    }

    /// Bytes per interleaved frame.
    pub fn bytes_per_frame(&self) -> usize {
        usize::from(self.channels) * BYTES_PER_SAMPLE
    }

    /// Longest whole-second duration a single WAV file can hold.
    pub fn max_seconds(&self) -> u64 {
        let bytes_per_second = u64::from(self.sample_rate) * self.bytes_per_frame() as u64;
        if bytes_per_second == 0 {
            return 0;
        }
        (u64::from(u32::MAX) - WAV_HEADER_BYTES) / bytes_per_second
    }

    pub(crate) fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self::CD_STEREO
    }
}
