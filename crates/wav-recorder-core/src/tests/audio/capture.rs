use crate::{
    CaptureFormat, Recorder, RecorderError,
    audio::{
        capture::{ActiveStream, CaptureEvent, CaptureSink, Recording, is_native_match},
        collector::FrameCollector,
    },
};

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use cpal::SampleFormat;

/// Stands in for a device stream; records when it is dropped.
struct StreamHandle {
    dropped: Arc<AtomicBool>,
}

impl ActiveStream for StreamHandle {}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::Release);
    }
}

/// A recording over a native stereo collector already holding `samples`.
fn recording_with(
    samples: &[i16],
    frames: usize,
) -> (Recording, mpsc::Sender<CaptureEvent>, Arc<AtomicBool>) {
    let (events_tx, events) = mpsc::channel();
    let dropped = Arc::new(AtomicBool::new(false));
    let mut collector = FrameCollector::new(frames * 2);
    collector.extend(samples.iter().copied());

    let recording = Recording::from_parts(
        Some(Box::new(StreamHandle {
            dropped: Arc::clone(&dropped),
        })),
        events,
        CaptureSink::Native(Arc::new(Mutex::new(collector))),
        CaptureFormat::CD_STEREO,
        frames,
    );

    (recording, events_tx, dropped)
}

/// WHAT: Stereo i16 range containing 44.1kHz is a native match
/// WHY: Native capture skips conversion entirely
#[test]
fn given_stereo_i16_range_covering_44100_when_matching_then_native() {
    // Given / When / Then
    assert!(is_native_match(
        2,
        SampleFormat::I16,
        8_000,
        96_000,
        CaptureFormat::CD_STEREO
    ));
    assert!(is_native_match(
        2,
        SampleFormat::I16,
        44_100,
        44_100,
        CaptureFormat::CD_STEREO
    ));
}

/// WHAT: Wrong channels, format or rate is not a native match
/// WHY: Those devices must go through the converting path
#[test]
fn given_mismatched_range_when_matching_then_not_native() {
    let format = CaptureFormat::CD_STEREO;

    assert!(!is_native_match(1, SampleFormat::I16, 8_000, 96_000, format));
    assert!(!is_native_match(2, SampleFormat::F32, 8_000, 96_000, format));
    assert!(!is_native_match(2, SampleFormat::I16, 48_000, 48_000, format));
    assert!(!is_native_match(2, SampleFormat::I16, 8_000, 22_050, format));
}

/// WHAT: Zero-frame capture completes immediately with an empty buffer
/// WHY: D = 0 is pinned to a valid file with no data frames
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_zero_frames_when_recording_then_empty_stereo_buffer() {
    // Given: Recorder on the default input device
    let recorder = Recorder::new(CaptureFormat::CD_STEREO).unwrap();

    // When: Starting and waiting on a zero-frame capture
    let buffer = recorder.start(0).unwrap().wait().unwrap();

    // Then: Empty stereo buffer
    assert_eq!(buffer.shape(), (0, 2));
}

/// WHAT: Capture returns exactly the requested frame count
/// WHY: Frame count = seconds * 44100 regardless of device configuration
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_default_device_when_recording_quarter_second_then_exact_frames() {
    // Given: Recorder on the default input device
    let format = CaptureFormat::CD_STEREO;
    let recorder = Recorder::new(format).unwrap();
    let frames = 11_025;

    // When: Capturing and blocking until done
    let buffer = recorder.start(frames).unwrap().wait().unwrap();

    // Then: Exact shape
    assert_eq!(buffer.shape(), (frames, 2));
}

/// WHAT: Completion stops the stream before the buffer is built
/// WHY: The device must be released as soon as capture is done
#[test]
fn given_complete_event_when_awaiting_then_stream_stopped_and_buffer_returned() {
    // Given: A recording whose collector holds 3 stereo frames
    let samples = [1, -1, 2, -2, 3, -3];
    let (mut recording, events_tx, dropped) = recording_with(&samples, 3);
    events_tx.send(CaptureEvent::Complete).unwrap();

    // When: Awaiting completion
    recording.await_completion().unwrap();

    // Then: Stream already dropped, buffer holds the collected frames
    assert!(dropped.load(Ordering::Acquire));
    let buffer = recording.into_buffer().unwrap();
    assert_eq!(buffer.shape(), (3, 2));
    assert_eq!(buffer.as_interleaved(), &samples);
}

/// WHAT: A fatal stream error aborts the wait with a device error
/// WHY: A vanished device is fatal and no file may be written
#[test]
fn given_failed_event_when_waiting_then_device_error_and_stream_stopped() {
    // Given: A recording whose device reports it has gone away
    let (recording, events_tx, dropped) = recording_with(&[], 44_100);
    events_tx
        .send(CaptureEvent::Failed("device unplugged".to_string()))
        .unwrap();

    // When: Waiting
    let result = recording.wait();

    // Then: DeviceError carrying the reason, stream released
    match result {
        Err(RecorderError::DeviceError { reason, .. }) => assert_eq!(reason, "device unplugged"),
        other => panic!("expected DeviceError, got {:?}", other.map(|b| b.shape())),
    }
    assert!(dropped.load(Ordering::Acquire));
}

/// WHAT: Losing every event sender ends the wait with a device error
/// WHY: A stream that closes early must not hang or yield a short buffer
#[test]
fn given_closed_event_channel_when_waiting_then_device_error() {
    // Given: A recording whose callbacks are gone without signalling
    let (recording, events_tx, dropped) = recording_with(&[0; 10], 44_100);
    drop(events_tx);

    // When: Waiting
    let result = recording.wait();

    // Then: DeviceError, stream released
    assert!(matches!(result, Err(RecorderError::DeviceError { .. })));
    assert!(dropped.load(Ordering::Acquire));
}

/// WHAT: Converted capture is delivered at exactly the requested frames
/// WHY: Non-native devices still produce seconds * 44100 stereo rows
#[test]
fn given_converted_sink_when_waiting_then_exact_stereo_frames() {
    // Given: A mono 44.1kHz float collector holding 100 full-scale samples
    let (events_tx, events) = mpsc::channel();
    let mut collector = FrameCollector::new(100);
    collector.extend(std::iter::repeat_n(1.0f32, 100));
    let recording = Recording::from_parts(
        None,
        events,
        CaptureSink::Converted {
            collector: Arc::new(Mutex::new(collector)),
            device_channels: 1,
            device_rate: 44_100,
        },
        CaptureFormat::CD_STEREO,
        100,
    );
    events_tx.send(CaptureEvent::Complete).unwrap();

    // When: Waiting
    let buffer = recording.wait().unwrap();

    // Then: 100 stereo frames at full scale
    assert_eq!(buffer.shape(), (100, 2));
    assert!(buffer.as_interleaved().iter().all(|&s| s == i16::MAX));
}
