use crate::{
    CoreResult, RecorderError,
    audio::{
        CaptureFormat, SampleBuffer,
        collector::FrameCollector,
        convert::{device_frames_for, to_capture_format},
    },
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, Sender},
    },
};

use cpal::{
    Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig, StreamError,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Message from the audio callback thread to the waiting caller.
#[derive(Debug)]
pub(crate) enum CaptureEvent {
    Complete,
    Failed(String),
}

/// Keeps a running capture alive until dropped.
pub(crate) trait ActiveStream {}

impl ActiveStream for Stream {}

/// How the device will be driven for a given [`CaptureFormat`].
#[derive(Debug, Clone)]
struct StreamPlan {
    config: StreamConfig,
    sample_format: SampleFormat,
    /// Device delivers `CaptureFormat` directly as i16.
    native: bool,
}

/// Whether a supported device configuration can deliver `format` as-is.
pub(crate) fn is_native_match(
    channels: u16,
    sample_format: SampleFormat,
    min_rate: u32,
    max_rate: u32,
    format: CaptureFormat,
) -> bool {
    channels == format.channels
        && sample_format == SampleFormat::I16
        && (min_rate..=max_rate).contains(&format.sample_rate)
}

/// Default-input-device recorder for a fixed [`CaptureFormat`].
pub struct Recorder {
    device: Device,
    format: CaptureFormat,
    plan: StreamPlan,
}

impl Recorder {
    /// Acquires the default input device and negotiates a stream config.
    ///
    /// # Errors
    ///
    /// Returns error if no input device exists or it has no usable config.
    #[track_caller]
    #[instrument]
    pub fn new(format: CaptureFormat) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(RecorderError::NoInputDevice {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let plan = Self::negotiate(&device, format)?;

        info!(
            device_id = ?device.id(),
            sample_rate = plan.config.sample_rate,
            channels = plan.config.channels,
            sample_format = %plan.sample_format,
            native = plan.native,
            "Recorder initialized"
        );

        Ok(Self {
            device,
            format,
            plan,
        })
    }

    #[track_caller]
    fn negotiate(device: &Device, format: CaptureFormat) -> CoreResult<StreamPlan> {
        let native = match device.supported_input_configs() {
            Ok(supported) => supported.into_iter().any(|range| {
                is_native_match(
                    range.channels(),
                    range.sample_format(),
                    range.min_sample_rate(),
                    range.max_sample_rate(),
                    format,
                )
            }),
            Err(e) => {
                warn!("Failed to query input configs, using default config: {}", e);
                false
            }
        };

        if native {
            return Ok(StreamPlan {
                config: StreamConfig {
                    channels: format.channels,
                    sample_rate: format.sample_rate,
                    buffer_size: cpal::BufferSize::Default,
                },
                sample_format: SampleFormat::I16,
                native: true,
            });
        }

        let fallback = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        warn!(
            sample_rate = fallback.sample_rate(),
            channels = fallback.channels(),
            sample_format = %fallback.sample_format(),
            "Device cannot capture target format natively, converting after capture"
        );

        Ok(StreamPlan {
            sample_format: fallback.sample_format(),
            config: fallback.into(),
            native: false,
        })
    }

    /// Starts capturing `frames` frames and returns without waiting.
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&self, frames: usize) -> CoreResult<Recording> {
        let (events_tx, events) = mpsc::channel();

        if frames == 0 {
            let _ = events_tx.send(CaptureEvent::Complete);
            info!("Zero-length capture requested, no stream opened");
            return Ok(Recording::from_parts(
                None,
                events,
                CaptureSink::Native(Arc::new(Mutex::new(FrameCollector::new(0)))),
                self.format,
                frames,
            ));
        }

        let (stream, sink) = if self.plan.native {
            let target = frames * usize::from(self.format.channels);
            let collector = Arc::new(Mutex::new(FrameCollector::<i16>::new(target)));
            let stream = build_stream::<i16, i16>(
                &self.device,
                &self.plan.config,
                Arc::clone(&collector),
                events_tx,
            )?;
            (stream, CaptureSink::Native(collector))
        } else {
            let device_rate = self.plan.config.sample_rate;
            let device_channels = self.plan.config.channels;
            let target =
                device_frames_for(frames, device_rate, self.format) * usize::from(device_channels);
            let collector = Arc::new(Mutex::new(FrameCollector::<f32>::new(target)));
            let stream = self.build_converting_stream(Arc::clone(&collector), events_tx)?;
            (
                stream,
                CaptureSink::Converted {
                    collector,
                    device_channels,
                    device_rate,
                },
            )
        };

        stream.play().map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(frames = frames, "Audio capture started");

        Ok(Recording::from_parts(
            Some(Box::new(stream)),
            events,
            sink,
            self.format,
            frames,
        ))
    }

    #[track_caller]
    fn build_converting_stream(
        &self,
        collector: Arc<Mutex<FrameCollector<f32>>>,
        events_tx: Sender<CaptureEvent>,
    ) -> CoreResult<Stream> {
        let (device, config) = (&self.device, &self.plan.config);

        match self.plan.sample_format {
            SampleFormat::I8 => build_stream::<i8, f32>(device, config, collector, events_tx),
            SampleFormat::I16 => build_stream::<i16, f32>(device, config, collector, events_tx),
            SampleFormat::I32 => build_stream::<i32, f32>(device, config, collector, events_tx),
            SampleFormat::U8 => build_stream::<u8, f32>(device, config, collector, events_tx),
            SampleFormat::U16 => build_stream::<u16, f32>(device, config, collector, events_tx),
            SampleFormat::U32 => build_stream::<u32, f32>(device, config, collector, events_tx),
            SampleFormat::F32 => build_stream::<f32, f32>(device, config, collector, events_tx),
            SampleFormat::F64 => build_stream::<f64, f32>(device, config, collector, events_tx),
            other => Err(RecorderError::UnsupportedSampleFormat {
                format: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Builds an input stream that converts each device sample `T` to `S` and
/// feeds the collector, signalling completion once it is full.
#[track_caller]
fn build_stream<T, S>(
    device: &Device,
    config: &StreamConfig,
    collector: Arc<Mutex<FrameCollector<S>>>,
    events_tx: Sender<CaptureEvent>,
) -> CoreResult<Stream>
where
    T: SizedSample,
    S: FromSample<T> + Send + 'static,
{
    let error_tx = events_tx.clone();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // A poisoned mutex means a previous holder panicked; the samples
                // already collected are still valid.
                let mut buf = collector.lock().unwrap_or_else(|e| {
                    error!("Sample buffer lock poisoned, recovering: {}", e);
                    e.into_inner()
                });
                if buf.extend(data.iter().map(|&s| s.to_sample::<S>())) {
                    let _ = events_tx.send(CaptureEvent::Complete);
                }
            },
            move |err| match err {
                StreamError::DeviceNotAvailable => {
                    error!("Input device no longer available");
                    let _ = error_tx.send(CaptureEvent::Failed(err.to_string()));
                }
                other => warn!("Audio stream error: {}", other),
            },
            None,
        )
        .map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

pub(crate) enum CaptureSink {
    Native(Arc<Mutex<FrameCollector<i16>>>),
    Converted {
        collector: Arc<Mutex<FrameCollector<f32>>>,
        device_channels: u16,
        device_rate: u32,
    },
}

/// An in-progress capture started by [`Recorder::start`].
pub struct Recording {
    stream: Option<Box<dyn ActiveStream>>,
    events: Receiver<CaptureEvent>,
    sink: CaptureSink,
    format: CaptureFormat,
    frames: usize,
}

impl Recording {
    pub(crate) fn from_parts(
        stream: Option<Box<dyn ActiveStream>>,
        events: Receiver<CaptureEvent>,
        sink: CaptureSink,
        format: CaptureFormat,
        frames: usize,
    ) -> Self {
        Self {
            stream,
            events,
            sink,
            format,
            frames,
        }
    }

    /// Blocks until every requested frame has been captured.
    ///
    /// There is no timeout; the call returns once the device has delivered
    /// the full duration or reported a fatal error.
    ///
    /// # Errors
    ///
    /// Returns error if the device disappears or the stream closes early.
    #[track_caller]
    #[instrument(skip(self), fields(frames = self.frames))]
    pub fn wait(mut self) -> CoreResult<SampleBuffer> {
        self.await_completion()?;
        self.into_buffer()
    }

    /// Blocks for the completion event, then stops the stream whatever the
    /// outcome.
    #[track_caller]
    pub(crate) fn await_completion(&mut self) -> CoreResult<()> {
        let event = self.events.recv();

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Audio capture stopped");
        }

        match event {
            Ok(CaptureEvent::Complete) => Ok(()),
            Ok(CaptureEvent::Failed(reason)) => Err(RecorderError::DeviceError {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(_) => Err(RecorderError::DeviceError {
                reason: "Capture stream closed before completion".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    pub(crate) fn into_buffer(self) -> CoreResult<SampleBuffer> {
        let buffer = match &self.sink {
            CaptureSink::Native(collector) => {
                let samples = collector.lock().unwrap_or_else(|e| e.into_inner()).take();
                SampleBuffer::from_interleaved(self.format.channels, samples)?
            }
            CaptureSink::Converted {
                collector,
                device_channels,
                device_rate,
            } => {
                let samples = collector.lock().unwrap_or_else(|e| e.into_inner()).take();
                debug!(sample_count = samples.len(), "Captured device samples");
                to_capture_format(
                    &samples,
                    *device_channels,
                    *device_rate,
                    self.format,
                    self.frames,
                )?
            }
        };

        debug!(frames = buffer.frames(), "Capture complete");

        Ok(buffer)
    }
}
