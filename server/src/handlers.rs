use std::{future::Future, sync::atomic::Ordering, time::Instant};

use audio_core::AudioContainer;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use genai_core::{
    presets, voices, AspectRatio, DetailTier, GenAiError, SocialPreset, VoiceProfile,
    VARIATION_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics::{AudioStoreStats, DetailedMetricsResponse, EndpointMetrics, SystemMetrics};
use crate::validation::{
    parse_handle_id, parse_reference, validate_prompt, validate_speech_text,
    validate_thumbnail_request, MediaKind,
};
use crate::{AppState, START_TIME};

#[derive(Deserialize)]
pub struct EnhanceRequest {
    prompt: String,
}

#[derive(Serialize)]
pub struct EnhanceResponse {
    prompt: String,
}

#[derive(Deserialize)]
pub struct ImageRequest {
    prompt: String,
    #[serde(default)]
    aspect_ratio: AspectRatio,
    #[serde(default)]
    detail: DetailTier,
    reference_image: Option<String>, // data URI
}

#[derive(Deserialize)]
pub struct ThumbnailRequest {
    preset: String,
    #[serde(default)]
    prompt: String,
    reference_image: Option<String>, // data URI
}

#[derive(Serialize)]
pub struct ImagesResponse {
    images: Vec<String>,
    requested: usize,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct SpeechRequest {
    text: String,
    voice: Option<String>,
    reference_audio: Option<String>, // data URI
}

#[derive(Serialize)]
pub struct AudioResponse {
    id: Uuid,
    url: String,
    media_type: &'static str,
    voice: &'static str,
    sample_rate: u32,
    duration_ms: u64,
    byte_length: usize,
    created_at: DateTime<Utc>,
}

/// Run a handler body and record its latency and outcome.
async fn timed<T, F>(metrics: &EndpointMetrics, work: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let start = Instant::now();
    let result = work.await;
    metrics.record(start.elapsed(), result.is_ok());
    result
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_voices() -> Json<&'static [VoiceProfile]> {
    Json(voices::all())
}

pub async fn list_presets() -> Json<&'static [SocialPreset]> {
    Json(presets::all())
}

pub async fn enhance_endpoint(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    timed(&state.metrics.enhance, async {
        if !req.prompt.trim().is_empty() {
            validate_prompt(&req.prompt)?;
        }
        let prompt = state.studio.enhance_prompt(&req.prompt).await?;
        Ok::<_, ApiError>(Json(EnhanceResponse { prompt }))
    })
    .await
}

fn images_response(
    state: &AppState,
    result: Result<Vec<String>, GenAiError>,
) -> Result<Json<ImagesResponse>, ApiError> {
    match result {
        Ok(images) => {
            state.metrics.generation.record_batch(VARIATION_COUNT, images.len());
            Ok(Json(ImagesResponse {
                images,
                requested: VARIATION_COUNT,
                created_at: Utc::now(),
            }))
        }
        Err(GenAiError::AllVariationsFailed) => {
            state.metrics.generation.record_batch(VARIATION_COUNT, 0);
            Err(GenAiError::AllVariationsFailed.into())
        }
        // rejected before any request went out
        Err(e) => Err(e.into()),
    }
}

pub async fn images_endpoint(
    State(state): State<AppState>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<ImagesResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    timed(&state.metrics.images, async {
        validate_prompt(&req.prompt)?;
        let reference = parse_reference(
            req.reference_image.as_deref(),
            MediaKind::Image,
            state.config.max_upload_bytes,
        )?;

        info!(
            "Image request: ratio={}, detail={:?}, reference={}",
            req.aspect_ratio,
            req.detail,
            reference.is_some()
        );
        let result = state
            .studio
            .generate_variations(&req.prompt, req.aspect_ratio, req.detail, reference.as_ref())
            .await;
        images_response(&state, result)
    })
    .await
}

pub async fn thumbnails_endpoint(
    State(state): State<AppState>,
    Json(req): Json<ThumbnailRequest>,
) -> Result<Json<ImagesResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    timed(&state.metrics.thumbnails, async {
        let preset = presets::resolve(&req.preset)?;
        let reference = parse_reference(
            req.reference_image.as_deref(),
            MediaKind::Image,
            state.config.max_upload_bytes,
        )?;
        validate_thumbnail_request(&req.prompt, reference.is_some())?;

        info!("Thumbnail request: preset={}, reference={}", preset.id, reference.is_some());
        let result = state
            .studio
            .generate_thumbnails(preset, &req.prompt, reference.as_ref())
            .await;
        images_response(&state, result)
    })
    .await
}

fn register_audio(state: &AppState, container: AudioContainer, voice: &VoiceProfile) -> AudioResponse {
    let sample_rate = container.sample_rate();
    let duration_ms = container.duration_ms();
    let byte_length = container.len();
    let media_type = container.media_type();

    state.metrics.generation.record_synthesis(byte_length);
    let handle = state.audio.register(container);

    AudioResponse {
        id: handle.id,
        url: handle.url,
        media_type,
        voice: voice.id,
        sample_rate,
        duration_ms,
        byte_length,
        created_at: Utc::now(),
    }
}

fn note_refusal(state: &AppState, result: &Result<AudioContainer, GenAiError>) {
    if let Err(GenAiError::SynthesisRefused(_)) = result {
        state.metrics.generation.record_refusal();
    }
}

pub async fn speech_endpoint(
    State(state): State<AppState>,
    Json(req): Json<SpeechRequest>,
) -> Result<Json<AudioResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    timed(&state.metrics.speech, async {
        validate_speech_text(&req.text)?;
        let voice = voices::resolve(req.voice.as_deref())?;
        let reference = parse_reference(
            req.reference_audio.as_deref(),
            MediaKind::Audio,
            state.config.max_upload_bytes,
        )?;

        let result = state
            .studio
            .synthesize_speech(&req.text, voice, reference.as_ref())
            .await;
        note_refusal(&state, &result);
        Ok::<_, ApiError>(Json(register_audio(&state, result?, voice)))
    })
    .await
}

pub async fn voice_preview_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AudioResponse>, ApiError> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    timed(&state.metrics.speech, async {
        let voice = voices::find(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown voice profile '{id}'")))?;
        let result = state.studio.preview_voice(voice).await;
        note_refusal(&state, &result);
        Ok::<_, ApiError>(Json(register_audio(&state, result?, voice)))
    })
    .await
}

pub async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_handle_id(&id)?;
    let container = state
        .audio
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Audio {id} not found or released")))?;

    let disposition = format!("attachment; filename=\"voiceover-{id}.wav\"");
    Ok((
        [
            (header::CONTENT_TYPE, container.media_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        container.as_bytes().to_vec(),
    )
        .into_response())
}

pub async fn delete_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_handle_id(&id)?;
    if state.audio.revoke(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Audio {id} not found or released")))
    }
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<DetailedMetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_cpu();
    system.refresh_memory();

    // Get CPU usage (average across all cores)
    let cpu_usage = system.global_cpu_info().cpu_usage();

    let memory_used = system.used_memory();
    let memory_total = system.total_memory();
    let memory_usage_percent = if memory_total > 0 {
        (memory_used as f64 / memory_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    let uptime = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    // Load average is not reported on Windows
    let system_load = if cfg!(windows) {
        None
    } else {
        Some(sysinfo::System::load_average().one)
    };

    Json(DetailedMetricsResponse {
        timestamp: Utc::now(),
        system: SystemMetrics {
            cpu_usage_percent: cpu_usage,
            memory_used_mb: memory_used / 1024 / 1024, // Convert bytes to MB
            memory_total_mb: memory_total / 1024 / 1024,
            memory_usage_percent,
            request_count: state.request_count.load(Ordering::Relaxed),
            uptime_seconds: uptime,
            system_load,
        },
        endpoints: state.metrics.endpoints(),
        generation: state.metrics.generation.stats(),
        audio_store: AudioStoreStats {
            handles: state.audio.len(),
            capacity: state.audio.capacity(),
        },
    })
}
