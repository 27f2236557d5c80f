use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{ApiKey, GenAiConfig};
use crate::error::GenAiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Transport to the generative service. One call = one `generateContent`
/// request; retries and fan-out are the caller's business.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_content(
        &self,
        api_key: &ApiKey,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError>;
}

/// REST client for the Gemini `models/{model}:generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_content(
        &self,
        api_key: &ApiKey,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = self.endpoint(model);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .json(request)
            .send()
            .await?
            .error_for_status()? // convert non-200 into error
            .json::<GenerateContentResponse>()
            .await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let config = GenAiConfig {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..GenAiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
