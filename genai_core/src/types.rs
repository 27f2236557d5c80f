//! Domain value types and the `generateContent` wire format.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::GenAiError;
use crate::voices::VoiceName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Wide,
        AspectRatio::Tall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = GenAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| {
                GenAiError::InvalidInput(format!(
                    "Unknown aspect ratio '{s}'. Valid values: 1:1, 3:4, 4:3, 16:9, 9:16"
                ))
            })
    }
}

/// Requested level of detail. The image model has no size parameter, so the
/// tier is expressed as a hint appended to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetailTier {
    #[serde(alias = "1K", alias = "low")]
    Low,
    #[default]
    #[serde(alias = "2K", alias = "mid")]
    Mid,
    #[serde(alias = "4K", alias = "high")]
    High,
}

impl DetailTier {
    pub fn prompt_hint(&self) -> Option<&'static str> {
        match self {
            DetailTier::High => Some(
                " , highly detailed, 4k resolution, photorealistic, sharp focus, masterpiece, ultra-high definition",
            ),
            DetailTier::Mid => Some(" , detailed, 2k resolution, high quality, sharp"),
            DetailTier::Low => None,
        }
    }

    /// Append the tier's quality hint to `prompt`.
    pub fn apply(&self, prompt: &str) -> String {
        match self.prompt_hint() {
            Some(hint) => format!("{prompt}{hint}"),
            None => prompt.to_string(),
        }
    }
}

/// Base64-encoded media blob with its declared MIME type, as carried in
/// `data:` URIs and in `inlineData` parts.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedMedia {
    mime_type: String,
    data: String,
}

impl EncodedMedia {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, general_purpose::STANDARD.encode(bytes))
    }

    /// Parse `data:<mime>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, GenAiError> {
        let invalid = || GenAiError::InvalidInput("Expected a base64 data URI".to_string());

        let rest = uri.trim().strip_prefix("data:").ok_or_else(invalid)?;
        let (header, data) = rest.split_once(',').ok_or_else(invalid)?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(invalid)?;
        if mime_type.is_empty() || !mime_type.contains('/') || data.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(mime_type, data))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn decode(&self) -> Result<Vec<u8>, GenAiError> {
        Ok(general_purpose::STANDARD.decode(&self.data)?)
    }

    /// Size of the decoded blob, computed from the encoded length.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub(crate) fn to_part(&self) -> Part {
        Part::inline(self.mime_type.clone(), self.data.clone())
    }
}

impl fmt::Debug for EncodedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedMedia")
            .field("mime_type", &self.mime_type)
            .field("encoded_len", &self.data.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// generateContent wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts,
            }],
            generation_config: None,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.contents.iter().flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of every text part.
    pub fn prompt_text(&self) -> String {
        self.parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<Modality>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

impl SpeechConfig {
    pub fn prebuilt(voice_name: VoiceName) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig { voice_name },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: VoiceName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Build a response with a single candidate holding `parts`.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
            }],
        }
    }

    /// Parts of the first candidate; empty if there is none.
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts().iter().find_map(|p| p.inline_data.as_ref())
    }

    pub fn first_text(&self) -> Option<&str> {
        self.parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .find(|t| !t.is_empty())
    }

    /// All text parts of the first candidate, concatenated.
    pub fn text(&self) -> String {
        self.parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Wide);
        assert_eq!(" 1:1 ".parse::<AspectRatio>().unwrap(), AspectRatio::Square);
        assert!("2:1".parse::<AspectRatio>().is_err());
        assert_eq!(
            serde_json::to_value(AspectRatio::Tall).unwrap(),
            json!("9:16")
        );
    }

    #[test]
    fn test_detail_tier_hints() {
        let high = DetailTier::High.apply("sunset");
        assert!(high.starts_with("sunset"));
        assert!(high.contains("4k"));

        let mid = DetailTier::Mid.apply("sunset");
        assert!(mid.contains("2k"));

        assert_eq!(DetailTier::Low.apply("sunset"), "sunset");
    }

    #[test]
    fn test_detail_tier_aliases() {
        let tier: DetailTier = serde_json::from_value(json!("4K")).unwrap();
        assert_eq!(tier, DetailTier::High);
        let tier: DetailTier = serde_json::from_value(json!("LOW")).unwrap();
        assert_eq!(tier, DetailTier::Low);
        assert_eq!(DetailTier::default(), DetailTier::Mid);
    }

    #[test]
    fn test_data_uri_parse() {
        let media = EncodedMedia::from_data_uri("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(media.mime_type(), "image/jpeg");
        assert_eq!(media.data(), "AAEC");
        assert_eq!(media.decode().unwrap(), vec![0, 1, 2]);
        assert_eq!(media.decoded_len(), 3);
        assert_eq!(media.to_data_uri(), "data:image/jpeg;base64,AAEC");
    }

    #[test]
    fn test_data_uri_rejects_malformed() {
        assert!(EncodedMedia::from_data_uri("AAEC").is_err());
        assert!(EncodedMedia::from_data_uri("data:image/png,AAEC").is_err());
        assert!(EncodedMedia::from_data_uri("data:;base64,AAEC").is_err());
        assert!(EncodedMedia::from_data_uri("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_decoded_len_with_padding() {
        let media = EncodedMedia::from_bytes("audio/mpeg", &[1, 2, 3, 4]);
        assert_eq!(media.data(), "AQIDBA==");
        assert_eq!(media.decoded_len(), 4);
    }

    #[test]
    fn test_speech_request_wire_shape() {
        let request = GenerateContentRequest::new(vec![Part::text("Say: hi")]).with_config(
            GenerationConfig {
                response_modalities: Some(vec![Modality::Audio]),
                speech_config: Some(SpeechConfig::prebuilt(VoiceName::Kore)),
                image_config: None,
            },
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{ "parts": [{ "text": "Say: hi" }] }],
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {
                        "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Kore" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBO" } }
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 10 }
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.first_text(), Some("here you go"));
        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "iVBO");
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.parts().is_empty());
        assert!(response.first_inline_data().is_none());
        assert!(response.first_text().is_none());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_first_text_skips_only_empty_parts() {
        let response = GenerateContentResponse::from_parts(vec![Part::text(""), Part::text("  \n")]);
        assert_eq!(response.first_text(), Some("  \n"));
    }
}
