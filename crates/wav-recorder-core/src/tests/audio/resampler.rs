use crate::audio::Resampler;

// Test constants
const INPUT_SAMPLE_RATE: u32 = 48_000;
const OUTPUT_SAMPLE_RATE: u32 = 44_100;
const STEREO: u16 = 2;
const ONE_SECOND_INPUT_FRAMES: usize = INPUT_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_FRAMES: usize = OUTPUT_SAMPLE_RATE as usize;
const SETTLE_FRAMES: usize = 16;
const LEVEL_TOLERANCE: f32 = 0.05;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;
const TONE_INPUT_FRAMES: usize = 4800;
const TONE_FREQUENCY_FACTOR: f32 = 0.1;
const MAX_AMPLITUDE: f32 = 1.5;

/// WHAT: Resampler converts 48kHz stereo to 44.1kHz stereo
/// WHY: Devices that only run at 48kHz must still yield 44.1kHz files
#[test]
fn given_48khz_stereo_when_resampling_to_44100_then_frame_count_scaled() {
    // Given: Resampler configured for 48kHz -> 44.1kHz, 2 channels
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, STEREO).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_FRAMES * usize::from(STEREO)];

    // When: Resampling one second of audio
    let output = resampler.resample(&input).unwrap();

    // Then: Exactly one second of interleaved stereo at 44.1kHz
    assert_eq!(output.len(), ONE_SECOND_OUTPUT_FRAMES * usize::from(STEREO));
    assert!(output.iter().all(|&s| s.is_finite())); // No NaN/Inf
}

/// WHAT: Empty samples return empty output
/// WHY: Edge case handling for zero-length input
#[test]
fn given_empty_samples_when_resampling_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, STEREO).unwrap();
    let empty: Vec<f32> = vec![];

    // When: Resampling empty data
    let output = resampler.resample(&empty).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}

/// WHAT: Resampling keeps channels separate and bounded
/// WHY: Left and right must not bleed into each other
#[test]
fn given_distinct_channels_when_resampling_then_channels_stay_distinct() {
    // Given: Left carries a tone, right is silent
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, STEREO).unwrap();
    let input: Vec<f32> = (0..TONE_INPUT_FRAMES)
        .flat_map(|i| [(i as f32 * TONE_FREQUENCY_FACTOR).sin(), 0.0])
        .collect();

    // When: Resampling the signal
    let output = resampler.resample(&input).unwrap();

    // Then: Right channel stays near silent, all samples bounded
    assert_eq!(output.len() % 2, 0);
    assert!(
        output
            .iter()
            .all(|&s| s.is_finite() && s.abs() <= MAX_AMPLITUDE)
    );
    let right_peak = output
        .chunks_exact(2)
        .map(|f| f[1].abs())
        .fold(0.0f32, f32::max);
    let left_peak = output
        .chunks_exact(2)
        .map(|f| f[0].abs())
        .fold(0.0f32, f32::max);
    assert!(right_peak < 0.01, "right channel leaked: {}", right_peak);
    assert!(left_peak > 0.5, "left channel lost: {}", left_peak);
}

/// WHAT: Output is aligned with the input, not lagged by the filter delay
/// WHY: The recording must start and end where the capture did
#[test]
fn given_dc_input_when_resampling_then_at_level_from_start_to_end() {
    // Given: One second of DC at 48kHz stereo
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, STEREO).unwrap();
    assert!(resampler.output_delay() > 0);
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_FRAMES * usize::from(STEREO)];

    // When: Resampling
    let output = resampler.resample(&input).unwrap();

    // Then: The step onset is at frame 0 and the signal holds its level to the end
    let frames: Vec<&[f32]> = output.chunks_exact(usize::from(STEREO)).collect();
    assert_eq!(frames.len(), ONE_SECOND_OUTPUT_FRAMES);
    assert!(
        frames[0].iter().all(|&s| s > 0.15),
        "onset lagged: frame 0 = {:?}",
        frames[0]
    );
    for (i, frame) in frames[SETTLE_FRAMES..frames.len() - SETTLE_FRAMES]
        .iter()
        .enumerate()
    {
        assert!(
            frame
                .iter()
                .all(|&s| (s - TEST_SIGNAL_AMPLITUDE).abs() < LEVEL_TOLERANCE),
            "frame {} off level: {:?}",
            i + SETTLE_FRAMES,
            frame
        );
    }
}
