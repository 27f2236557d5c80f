use tracing::{error, info};

use crate::error::GenAiError;
use crate::studio::Studio;
use crate::types::{GenerateContentRequest, Part};

pub fn enhancement_request(original: &str) -> GenerateContentRequest {
    let instruction = format!(
        "You are an expert AI prompt engineer. Rewrite the following user prompt to be highly detailed, \
         descriptive, and optimized for generating a high-quality image. Focus on lighting, composition, \
         texture, mood, and artistic style. Output ONLY the refined prompt text, no explanations.\n\n\
         User Prompt: \"{original}\""
    );
    GenerateContentRequest::new(vec![Part::text(instruction)])
}

impl Studio {
    /// Ask the text model for a richer version of `original`.
    ///
    /// Best effort: upstream failures and empty replies fall back to the
    /// original prompt. Only a missing credential is reported.
    pub async fn enhance_prompt(&self, original: &str) -> Result<String, GenAiError> {
        let api_key = self.credential()?;
        if original.trim().is_empty() {
            return Ok(String::new());
        }

        let request = enhancement_request(original);
        match self
            .backend()
            .generate_content(api_key, &self.text_model, &request)
            .await
        {
            Ok(response) => {
                let refined = response.text().trim().to_string();
                if refined.is_empty() {
                    Ok(original.to_string())
                } else {
                    info!("Enhanced prompt ({} -> {} chars)", original.len(), refined.len());
                    Ok(refined)
                }
            }
            Err(e) => {
                error!("Prompt enhancement failed, keeping original: {e}");
                Ok(original.to_string())
            }
        }
    }
}
