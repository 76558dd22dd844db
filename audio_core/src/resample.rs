use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::buffer::AudioBuffer;
use crate::error::AudioError;

fn interpolation_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Convert `buffer` to `to_rate`, keeping its duration.
///
/// The output has `round(frames * to_rate / from_rate)` frames: the
/// resampler's start-up delay is cut off and its tail flushed so nothing at
/// either end of the clip is lost.
pub fn resample(buffer: &AudioBuffer, to_rate: u32) -> Result<AudioBuffer, AudioError> {
    if to_rate == 0 {
        return Err(AudioError::InvalidArgument(
            "target sample rate must be positive".to_string(),
        ));
    }
    let from_rate = buffer.sample_rate();
    if from_rate == to_rate || buffer.is_empty() {
        return AudioBuffer::new(
            buffer.samples().to_vec(),
            to_rate,
            buffer.channels(),
            buffer.sample_width(),
        );
    }

    let channels = buffer.channels() as usize;
    let frames_in = buffer.frames();
    let ratio = to_rate as f64 / from_rate as f64;
    let expected = (frames_in as f64 * ratio).round() as usize;

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 2.0, interpolation_params(), frames_in, channels)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
    let delay = resampler.output_delay();

    let mut planes = resampler
        .process(&buffer.to_planar(), None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    // Each zero-fed pass yields about `expected` frames; inputs shorter than
    // the filter need several passes to push the delay out.
    let max_passes = delay / expected.max(1) + 2;
    let mut passes = 0;
    while planes[0].len() < delay + expected && passes < max_passes {
        let tail = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        for (plane, extra) in planes.iter_mut().zip(tail) {
            plane.extend(extra);
        }
        passes += 1;
    }

    let trimmed = planes
        .into_iter()
        .map(|plane| {
            let mut out: Vec<f32> = plane.into_iter().skip(delay).take(expected).collect();
            out.resize(expected, 0.0);
            out
        })
        .collect();

    AudioBuffer::from_planar(trimmed, to_rate, buffer.sample_width())
}
