use futures::future::join_all;
use tracing::{info, warn};

use crate::error::GenAiError;
use crate::presets::SocialPreset;
use crate::studio::Studio;
use crate::types::{
    AspectRatio, DetailTier, EncodedMedia, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, ImageConfig, Part,
};

/// Number of images requested per generation.
pub const VARIATION_COUNT: usize = 4;

const FALLBACK_IMAGE_MIME: &str = "image/png";

pub fn image_request(
    prompt: &str,
    aspect_ratio: AspectRatio,
    reference_image: Option<&EncodedMedia>,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    // Reference goes first so the model treats the text as an edit instruction.
    if let Some(reference) = reference_image {
        parts.push(reference.to_part());
    }
    parts.push(Part::text(prompt));

    GenerateContentRequest::new(parts).with_config(GenerationConfig {
        image_config: Some(ImageConfig { aspect_ratio }),
        ..GenerationConfig::default()
    })
}

/// First image part of a response as a `data:` URI.
pub fn extract_image(response: &GenerateContentResponse) -> Option<String> {
    response.first_inline_data().map(|inline| {
        let mime_type = if inline.mime_type.is_empty() {
            FALLBACK_IMAGE_MIME
        } else {
            inline.mime_type.as_str()
        };
        format!("data:{};base64,{}", mime_type, inline.data)
    })
}

impl Studio {
    /// Request [`VARIATION_COUNT`] images concurrently and keep the ones that
    /// arrive. Results follow request order; failed slots are dropped. Only a
    /// total wipe-out is reported as an error.
    pub async fn generate_variations(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        detail_tier: DetailTier,
        reference_image: Option<&EncodedMedia>,
    ) -> Result<Vec<String>, GenAiError> {
        let api_key = self.credential()?;
        if prompt.trim().is_empty() {
            return Err(GenAiError::InvalidInput("Prompt cannot be empty".to_string()));
        }

        let final_prompt = detail_tier.apply(prompt);

        let attempts = (0..VARIATION_COUNT).map(|slot| {
            let request = image_request(&final_prompt, aspect_ratio, reference_image);
            async move {
                match self
                    .backend()
                    .generate_content(api_key, &self.image_model, &request)
                    .await
                {
                    Ok(response) => {
                        let image = extract_image(&response);
                        if image.is_none() {
                            warn!("Image attempt {slot} returned no image part");
                        }
                        image
                    }
                    Err(e) => {
                        warn!("Image attempt {slot} failed: {e}");
                        None
                    }
                }
            }
        });

        let images: Vec<String> = join_all(attempts).await.into_iter().flatten().collect();

        if images.is_empty() {
            return Err(GenAiError::AllVariationsFailed);
        }

        info!(
            "Generated {}/{} image variations ({aspect_ratio}, {detail_tier:?})",
            images.len(),
            VARIATION_COUNT
        );
        Ok(images)
    }

    /// Platform-styled variations at the preset's aspect ratio.
    pub async fn generate_thumbnails(
        &self,
        preset: &SocialPreset,
        prompt: &str,
        reference_image: Option<&EncodedMedia>,
    ) -> Result<Vec<String>, GenAiError> {
        let full_prompt = preset.compose_prompt(prompt, reference_image.is_some());
        self.generate_variations(&full_prompt, preset.ratio, DetailTier::Mid, reference_image)
            .await
    }
}
