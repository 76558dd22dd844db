use crate::error::ApiError;

/// Slowest speed the form offers
pub const MIN_SPEED: f64 = 0.5;
/// Fastest speed the form offers
pub const MAX_SPEED: f64 = 2.0;
/// Slider granularity
pub const SPEED_STEP: f64 = 0.1;
pub const DEFAULT_SPEED: f64 = 1.0;

// Slack for values like 0.30000000000000004 coming out of a JS slider.
const STEP_TOLERANCE: f64 = 1e-6;

/// Validate a process request before anything is sent to the synthesis service.
pub fn validate_process_request(text: &str, speed: f64) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::EmptyInput);
    }
    validate_speed(speed)
}

/// Speed must be on the slider: within [0.5, 2.0] in steps of 0.1.
pub fn validate_speed(speed: f64) -> Result<(), ApiError> {
    if !speed.is_finite()
        || speed < MIN_SPEED - STEP_TOLERANCE
        || speed > MAX_SPEED + STEP_TOLERANCE
    {
        return Err(ApiError::InvalidInput(format!(
            "Speed must be between {} and {}, got {}",
            MIN_SPEED, MAX_SPEED, speed
        )));
    }

    let steps = speed / SPEED_STEP;
    if (steps - steps.round()).abs() > STEP_TOLERANCE {
        return Err(ApiError::InvalidInput(format!(
            "Speed must be a multiple of {}, got {}",
            SPEED_STEP, speed
        )));
    }

    Ok(())
}
