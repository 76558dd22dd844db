//! The fixed output profile every processed clip is re-encoded to.
//!
//! Chosen for small files over fidelity; none of it is configurable.

/// Output sample rate in Hz.
pub const OUTPUT_SAMPLE_RATE: u32 = 11025;
/// Output channel count (mono).
pub const OUTPUT_CHANNELS: u16 = 1;
/// Output bit depth. WAV stores 8-bit PCM unsigned, centred on 128.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 8;

