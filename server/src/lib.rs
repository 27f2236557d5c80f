pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod validation;

use std::sync::{atomic::AtomicU64, Arc, OnceLock};
use std::time::Instant;

use audio_core::AudioStore;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use genai_core::Studio;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::metrics::AppMetrics;

pub(crate) static START_TIME: OnceLock<Instant> = OnceLock::new();

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Studio>,
    pub audio: Arc<AudioStore>,
    pub metrics: AppMetrics,
    pub request_count: Arc<AtomicU64>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(studio: Studio, config: ServerConfig) -> Self {
        Self {
            studio: Arc::new(studio),
            audio: Arc::new(AudioStore::new(config.max_audio_handles, "/audio")),
            metrics: AppMetrics::new(),
            request_count: Arc::new(AtomicU64::new(0)),
            config,
        }
    }
}

/// Routes shared by the root and the `/api` prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/voices", get(handlers::list_voices))
        .route("/voices/{id}/preview", post(handlers::voice_preview_endpoint))
        .route("/presets", get(handlers::list_presets))
        .route("/prompt/enhance", post(handlers::enhance_endpoint))
        .route("/images", post(handlers::images_endpoint))
        .route("/thumbnails", post(handlers::thumbnails_endpoint))
        .route("/speech", post(handlers::speech_endpoint))
        .route(
            "/audio/{id}",
            get(handlers::get_audio).delete(handlers::delete_audio),
        )
        // Metrics endpoint - consider adding authentication in production
        .route("/metrics", get(handlers::metrics_endpoint))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let base = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (development mode)");
        base.allow_origin(Any)
    } else {
        info!("CORS configured for {} origin(s)", origins.len());
        base.allow_origin(AllowOrigin::list(origins))
    }
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Milliseconds between replenished tokens for a per-minute limit.
pub fn refill_interval_ms(rate_limit_per_minute: u32) -> u64 {
    (60_000 / u64::from(rate_limit_per_minute.max(1))).max(1)
}

/// Wrap `app` in a global rate limiter: bursts up to the per-minute limit,
/// refilling one request every `60s / limit`.
pub fn with_rate_limit(app: Router, config: &ServerConfig) -> anyhow::Result<Router> {
    // One bucket shared by all clients; peer IPs are unreliable behind proxies.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(refill_interval_ms(config.rate_limit_per_minute))
            .burst_size(config.rate_limit_per_minute.max(1))
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );
    Ok(app.layer(GovernorLayer::new(governor_conf)))
}

/// Full application router with middleware, minus rate limiting (see
/// [`with_rate_limit`]).
pub fn build_app(state: AppState) -> Router {
    let _ = START_TIME.get_or_init(Instant::now);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(cors_layer(&state.config))
        .into_inner();

    let api = routes();

    Router::new()
        .merge(api.clone()) // root paths
        .nest("/api", api) // /api prefix
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes()))
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(middleware_stack)
        .with_state(state)
}
