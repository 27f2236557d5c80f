use audio_core::{encode_pcm_base64, AudioContainer};
use tracing::{error, info};

use crate::error::GenAiError;
use crate::studio::Studio;
use crate::types::{
    EncodedMedia, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Modality,
    Part, SpeechConfig,
};
use crate::voices::VoiceProfile;

const MIMIC_INSTRUCTION: &str = "Listen to the audio sample provided. Mimic the speaker's tone, voice, and pacing as closely as possible.";

/// Build the spoken prompt. The "say:" phrasing keeps the model in TTS mode.
pub fn speech_prompt(text: &str, voice: &VoiceProfile, mimic_reference: bool) -> String {
    let prompt = match voice.instruction {
        Some(instruction) => format!("{instruction} and say: {text}"),
        None => format!("Say: {text}"),
    };
    if mimic_reference {
        format!("{MIMIC_INSTRUCTION} {prompt}")
    } else {
        prompt
    }
}

pub fn speech_request(
    text: &str,
    voice: &VoiceProfile,
    reference_audio: Option<&EncodedMedia>,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(reference) = reference_audio {
        parts.push(reference.to_part());
    }
    parts.push(Part::text(speech_prompt(text, voice, reference_audio.is_some())));

    GenerateContentRequest::new(parts).with_config(GenerationConfig {
        response_modalities: Some(vec![Modality::Audio]),
        speech_config: Some(SpeechConfig::prebuilt(voice.voice)),
        image_config: None,
    })
}

/// Pull the PCM payload out of a synthesis response and frame it.
pub fn extract_audio(response: &GenerateContentResponse) -> Result<AudioContainer, GenAiError> {
    if let Some(inline) = response.first_inline_data() {
        return Ok(encode_pcm_base64(&inline.data)?);
    }

    // The model sometimes answers in text when it declines the audio modality.
    match response.first_text() {
        Some(text) => {
            error!("Model returned text instead of audio: {text}");
            Err(GenAiError::SynthesisRefused(text.to_string()))
        }
        None => Err(GenAiError::NoAudioProduced),
    }
}

impl Studio {
    /// Synthesize `text` in the given voice. Exactly one upstream call, no retries.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: &VoiceProfile,
        reference_audio: Option<&EncodedMedia>,
    ) -> Result<AudioContainer, GenAiError> {
        let api_key = self.credential()?;

        let request = speech_request(text, voice, reference_audio);
        let response = self
            .backend()
            .generate_content(api_key, &self.speech_model, &request)
            .await?;

        let container = extract_audio(&response)?;
        info!(
            "Synthesized {} ms of audio with voice {} ({})",
            container.duration_ms(),
            voice.id,
            voice.voice
        );
        Ok(container)
    }

    /// Short sample line in the voice, used for auditioning personas.
    pub async fn preview_voice(&self, voice: &VoiceProfile) -> Result<AudioContainer, GenAiError> {
        let text = format!("Hello, I am {}.", voice.label);
        self.synthesize_speech(&text, voice, None).await
    }
}
