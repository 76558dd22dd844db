//! Playback speed change by rate reinterpretation.
//!
//! The samples are declared to have been recorded at `rate * factor` and then
//! resampled back to `rate`. Duration scales by `1 / factor` and pitch moves
//! with it; there is no pitch correction.

use tracing::debug;

use crate::buffer::AudioBuffer;
use crate::error::AudioError;
use crate::resample::resample;

/// Change the playback speed of `buffer` by `factor`.
///
/// `1.0` hands the buffer back untouched. Any positive, finite factor is
/// accepted; callers that want a narrower range must clamp themselves.
pub fn adjust_speed(buffer: AudioBuffer, factor: f64) -> Result<AudioBuffer, AudioError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AudioError::InvalidArgument(format!(
            "speed factor must be a positive number, got {factor}"
        )));
    }
    if factor == 1.0 {
        return Ok(buffer);
    }

    let original_rate = buffer.sample_rate();
    let virtual_rate = (original_rate as f64 * factor) as u32;
    if virtual_rate == 0 {
        return Err(AudioError::InvalidArgument(format!(
            "speed factor {factor} is too small for a {original_rate} Hz buffer"
        )));
    }
    debug!(
        "adjusting speed by {factor}: {original_rate} Hz reinterpreted as {virtual_rate} Hz"
    );

    let reinterpreted = buffer.with_sample_rate(virtual_rate)?;
    resample(&reinterpreted, original_rate)
}
