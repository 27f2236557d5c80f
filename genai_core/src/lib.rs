//! Client-side orchestration of the generative service: prompt enhancement,
//! image variation fan-out and speech synthesis.

pub mod backend;
pub mod config;
pub mod enhance;
pub mod error;
pub mod images;
pub mod mock;
pub mod presets;
pub mod speech;
pub mod studio;
pub mod types;
pub mod voices;

pub use backend::{GeminiClient, GenerativeBackend};
pub use config::{ApiKey, GenAiConfig};
pub use error::GenAiError;
pub use images::VARIATION_COUNT;
pub use presets::SocialPreset;
pub use studio::Studio;
pub use types::{AspectRatio, DetailTier, EncodedMedia};
pub use voices::{VoiceName, VoiceProfile};
