//! Conversion of device-native capture into the recorder's format.

use crate::{
    CoreResult,
    audio::{CaptureFormat, Resampler, SampleBuffer},
};

use cpal::Sample;
use tracing::{debug, instrument};

/// Device frames needed to yield `frames` frames at `format.sample_rate`.
pub(crate) fn device_frames_for(frames: usize, device_rate: u32, format: CaptureFormat) -> usize {
    let numerator = frames as u128 * u128::from(device_rate);
    numerator.div_ceil(u128::from(format.sample_rate)) as usize
}

/// Maps `from`-channel interleaved audio onto `to` channels.
///
/// Output channel `c` takes input channel `min(c, from - 1)`: mono is
/// duplicated, surplus input channels are dropped.
pub(crate) fn remix_channels(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    let (from, to) = (usize::from(from), usize::from(to));
    if from == to || from == 0 {
        return samples.to_vec();
    }

    let mut output = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        output.extend((0..to).map(|c| frame[c.min(from - 1)]));
    }
    output
}

/// Truncates or zero-pads interleaved audio to exactly `frames` frames.
pub(crate) fn fit_to_frames(mut samples: Vec<f32>, frames: usize, channels: u16) -> Vec<f32> {
    samples.resize(frames * usize::from(channels), 0.0);
    samples
}

/// Converts captured device audio into a [`SampleBuffer`] of exactly `frames`
/// frames in `format`.
#[track_caller]
#[instrument(skip(samples))]
pub(crate) fn to_capture_format(
    samples: &[f32],
    device_channels: u16,
    device_rate: u32,
    format: CaptureFormat,
    frames: usize,
) -> CoreResult<SampleBuffer> {
    let remixed = remix_channels(samples, device_channels, format.channels);

    let resampled = if device_rate != format.sample_rate && !remixed.is_empty() {
        let mut resampler = Resampler::new(device_rate, format.sample_rate, format.channels)?;
        resampler.resample(&remixed)?
    } else {
        remixed
    };

    let fitted = fit_to_frames(resampled, frames, format.channels);
    let quantized: Vec<i16> = fitted.into_iter().map(|s| s.to_sample::<i16>()).collect();

    debug!(
        device_channels = device_channels,
        device_rate = device_rate,
        frames = frames,
        "Converted capture to target format"
    );

    SampleBuffer::from_interleaved(format.channels, quantized)
}
