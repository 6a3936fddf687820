use crate::{
    CoreResult, RecorderError,
    audio::{CaptureFormat, SampleBuffer},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader, WavWriter};
use tracing::{debug, info, instrument, warn};

/// Writes `buffer` to `path` as RIFF/WAVE PCM in `format`.
///
/// Samples go to a sibling `.tmp` file which is renamed over `path` only
/// after the writer has been finalized, so an existing file is never left
/// half-written.
///
/// # Errors
///
/// Returns error if the buffer's channel count does not match `format`, or
/// if the file cannot be created, written or renamed.
#[track_caller]
#[instrument(skip(buffer), fields(frames = buffer.frames()))]
pub fn write_wav(path: &Path, format: CaptureFormat, buffer: &SampleBuffer) -> CoreResult<()> {
    if buffer.channels() != format.channels {
        return Err(RecorderError::InvalidBuffer {
            reason: format!(
                "buffer has {} channels but format expects {}",
                buffer.channels(),
                format.channels
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let temp_path = temp_path_for(path);

    if let Err(e) = write_samples(&temp_path, format, buffer) {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            warn!(path = ?temp_path, error = %cleanup, "Failed to remove partial WAV file");
        }
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| RecorderError::Io {
        path: path.to_path_buf(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!(
        path = ?path,
        frames = buffer.frames(),
        data_bytes = buffer.data_len_bytes(),
        "WAV file written"
    );

    Ok(())
}

#[track_caller]
fn write_samples(path: &Path, format: CaptureFormat, buffer: &SampleBuffer) -> CoreResult<()> {
    let wav_error = |source| RecorderError::WavWrite {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    };

    let mut writer = WavWriter::create(path, format.wav_spec()).map_err(wav_error)?;

    let samples = buffer.as_interleaved();
    let mut sample_writer = writer.get_i16_writer(samples.len() as u32);
    for &sample in samples {
        sample_writer.write_sample(sample);
    }
    sample_writer.flush().map_err(wav_error)?;

    writer.finalize().map_err(wav_error)?;

    debug!(path = ?path, samples = samples.len(), "WAV samples flushed");

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads a 16-bit integer PCM WAV file back into a [`SampleBuffer`].
///
/// # Errors
///
/// Returns error if the file cannot be opened or is not 16-bit integer PCM.
#[track_caller]
#[instrument]
pub fn read_wav(path: &Path) -> CoreResult<(CaptureFormat, SampleBuffer)> {
    let wav_error = |source| RecorderError::WavRead {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    };

    let mut reader = WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(wav_error(hound::Error::Unsupported));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(wav_error)?;

    let format = CaptureFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    };
    let buffer = SampleBuffer::from_interleaved(spec.channels, samples)?;

    debug!(path = ?path, frames = buffer.frames(), "WAV file read");

    Ok((format, buffer))
}
