use std::{fmt, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Credential for the generative service. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Blank keys count as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub api_key: Option<ApiKey>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub speech_model: String,
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl GenAiConfig {
    /// Read configuration from the environment. `GEMINI_API_KEY` wins over the
    /// generic `API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .and_then(ApiKey::new)
            .or_else(|| std::env::var("API_KEY").ok().and_then(ApiKey::new));

        let base_url = std::env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let text_model = std::env::var("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model);
        let image_model = std::env::var("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model);
        let speech_model = std::env::var("GEMINI_SPEECH_MODEL").unwrap_or(defaults.speech_model);

        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_key,
            base_url,
            text_model,
            image_model,
            speech_model,
            timeout_secs,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_absent() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GenAiConfig::default().with_api_key("secret-value");
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret-value"));
        assert!(printed.contains("ApiKey(***)"));
    }

    #[test]
    fn test_defaults() {
        let config = GenAiConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.speech_model, DEFAULT_SPEECH_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }
}
