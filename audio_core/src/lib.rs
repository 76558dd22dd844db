//! Audio side of the speech pipeline: decode what the synthesis service
//! returns, change its speed, and re-encode it to the small output profile.

mod buffer;
mod decode;
mod encode;
mod error;
pub mod profile;
mod resample;
mod speed;

pub use buffer::{AudioBuffer, AudioSpec};
pub use decode::{decode, decode_file};
pub use encode::{reencode, ProcessedAudio};
pub use error::AudioError;
pub use resample::resample;
pub use speed::adjust_speed;

