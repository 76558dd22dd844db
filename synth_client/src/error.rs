use thiserror::Error;

/// Everything that can go wrong between sending text and having the audio on
/// disk. Callers treat every variant as the same failure: synthesis failed.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("synthesis service returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("could not reach synthesis service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to store synthesized audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("synthesis client misconfigured: {0}")]
    Config(String),
}

impl SynthesisError {
    /// Text to show the user. For a rejection this is the service's response
    /// body, unchanged.
    pub fn user_message(&self) -> String {
        match self {
            SynthesisError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status the service answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SynthesisError::Rejected { status, .. } => Some(*status),
            SynthesisError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
