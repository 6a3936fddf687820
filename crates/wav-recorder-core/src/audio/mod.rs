mod buffer;
pub(crate) mod capture;
pub(crate) mod collector;
pub(crate) mod convert;
mod format;
mod resampler;
mod source;
mod wav;

pub(crate) use resampler::Resampler;

pub use {
    buffer::SampleBuffer,
    capture::{Recorder, Recording},
    format::{BITS_PER_SAMPLE, BYTES_PER_SAMPLE, CHANNELS, CaptureFormat, SAMPLE_RATE},
    source::{AudioSource, DefaultInputSource},
    wav::{read_wav, write_wav},
};
