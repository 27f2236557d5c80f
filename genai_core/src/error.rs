use audio_core::WavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("API key is missing; set GEMINI_API_KEY")]
    Configuration,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The speech model answered with text instead of audio.
    #[error("Model returned text: {0}")]
    SynthesisRefused(String),

    #[error("No audio data found in response")]
    NoAudioProduced,

    #[error("Failed to generate images. Please try again.")]
    AllVariationsFailed,

    #[error("Upstream request failed: {0}")]
    Transport(anyhow::Error),

    #[error("Upstream payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Audio framing failed: {0}")]
    Audio(WavError),
}

impl From<reqwest::Error> for GenAiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport(anyhow::Error::new(source))
    }
}

impl From<serde_json::Error> for GenAiError {
    fn from(source: serde_json::Error) -> Self {
        Self::Transport(anyhow::Error::new(source))
    }
}

impl From<WavError> for GenAiError {
    fn from(source: WavError) -> Self {
        match source {
            WavError::InvalidBase64(e) => Self::Decode(e),
            other => Self::Audio(other),
        }
    }
}
