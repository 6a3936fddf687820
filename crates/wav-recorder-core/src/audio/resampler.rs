use crate::{CoreResult, RecorderError};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Interleaved multi-channel sample rate converter.
pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: usize,
    chunk_size: usize,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32, channels: u16) -> CoreResult<Self> {
        let chunk_size = 1024;
        let sub_chunks = 2;
        let channels = usize::from(channels);

        let resampler = Fft::<f32>::new(
            input_rate as usize,  // sample_rate_input
            output_rate as usize, // sample_rate_output
            chunk_size,           // chunk_size
            sub_chunks,           // sub_chunks
            channels,             // nbr_channels
            FixedSync::Input,     // fixed
        )
        .map_err(|e| RecorderError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(
            input_rate = input_rate,
            output_rate = output_rate,
            channels = channels,
            chunk_size = chunk_size,
            "Resampler initialized"
        );

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            channels,
            chunk_size,
        })
    }

    /// Output frames the filter lags behind its input.
    pub fn output_delay(&self) -> usize {
        self.resampler.output_delay()
    }

    /// Resamples interleaved samples. Output length is the input frame count
    /// scaled by the rate ratio, rounded down, and frame 0 of the output is
    /// aligned with frame 0 of the input.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let input_frames = samples.len() / self.channels;
        let estimated_frames =
            (input_frames as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let delay = self.output_delay();
        let wanted_len = (estimated_frames + delay) * self.channels;
        let mut output = Vec::with_capacity(wanted_len);

        let chunk_len = self.chunk_size * self.channels;

        // Silent chunks pushed after the input to flush the filter's delay line.
        let flush_limit = (delay + self.chunk_size) as u64 * u64::from(self.input_rate)
            / (u64::from(self.output_rate) * self.chunk_size as u64)
            + 4;
        let mut flushed = 0u64;
        let mut chunks = samples.chunks(chunk_len);

        while output.len() < wanted_len {
            let input_chunk = match chunks.next() {
                Some(chunk) if chunk.len() == chunk_len => chunk.to_vec(),
                Some(chunk) => {
                    let mut padded = chunk.to_vec();
                    padded.resize(chunk_len, 0.0);
                    padded
                }
                None if flushed < flush_limit => {
                    flushed += 1;
                    vec![0.0f32; chunk_len]
                }
                None => {
                    return Err(RecorderError::ResamplingError {
                        reason: format!(
                            "Resampler produced {} of {} frames after flushing",
                            output.len() / self.channels,
                            wanted_len / self.channels
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };

            let input_adapter =
                InterleavedSlice::new(&input_chunk, self.channels, self.chunk_size).map_err(
                    |e| RecorderError::ResamplingError {
                        reason: format!("Failed to create input adapter: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    },
                )?;

            let output_frames = self.resampler.output_frames_max();
            let mut output_chunk = vec![0.0f32; output_frames * self.channels];

            let mut output_adapter =
                InterleavedSlice::new_mut(&mut output_chunk, self.channels, output_frames)
                    .map_err(|e| RecorderError::ResamplingError {
                        reason: format!("Failed to create output adapter: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;

            let (_input_frames, output_frames_written) = self
                .resampler
                .process_into_buffer(&input_adapter, &mut output_adapter, None)
                .map_err(|e| RecorderError::ResamplingError {
                    reason: format!("Resampling failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            output.extend_from_slice(&output_chunk[..output_frames_written * self.channels]);
        }

        output.drain(..delay * self.channels);
        output.truncate(estimated_frames * self.channels);

        debug!(
            input_frames = input_frames,
            output_frames = output.len() / self.channels,
            delay_frames = delay,
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled audio"
        );

        Ok(output)
    }
}
