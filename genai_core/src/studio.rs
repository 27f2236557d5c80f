use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{GeminiClient, GenerativeBackend};
use crate::config::{ApiKey, GenAiConfig};
use crate::error::GenAiError;

/// Entry point for the creative tools. Holds the credential and model names
/// resolved at startup; the individual operations live in `speech`, `images`
/// and `enhance`.
#[derive(Clone)]
pub struct Studio {
    backend: Arc<dyn GenerativeBackend>,
    api_key: Option<ApiKey>,
    pub(crate) text_model: String,
    pub(crate) image_model: String,
    pub(crate) speech_model: String,
}

impl Studio {
    pub fn new(config: &GenAiConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        if config.api_key.is_none() {
            warn!("No API key configured; every generation request will be rejected");
        }
        Self {
            backend,
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            speech_model: config.speech_model.clone(),
        }
    }

    /// Studio backed by the Gemini REST API.
    pub fn from_config(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let client = GeminiClient::new(config)?;
        info!(
            "Using {} at {} (text={}, image={}, speech={})",
            client.name(),
            config.base_url,
            config.text_model,
            config.image_model,
            config.speech_model
        );
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub(crate) fn backend(&self) -> &dyn GenerativeBackend {
        self.backend.as_ref()
    }

    /// The single place the credential is checked. Every operation calls this
    /// before building a request.
    pub(crate) fn credential(&self) -> Result<&ApiKey, GenAiError> {
        self.api_key.as_ref().ok_or(GenAiError::Configuration)
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("backend", &self.backend.name())
            .field("configured", &self.is_configured())
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("speech_model", &self.speech_model)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::mock::MockBackend;

    pub fn studio(mock: MockBackend) -> (Studio, Arc<MockBackend>) {
        let mock = Arc::new(mock);
        let config = GenAiConfig::default().with_api_key("test-key");
        (Studio::new(&config, mock.clone()), mock)
    }

    pub fn unconfigured(mock: MockBackend) -> (Studio, Arc<MockBackend>) {
        let mock = Arc::new(mock);
        (Studio::new(&GenAiConfig::default(), mock.clone()), mock)
    }
}
