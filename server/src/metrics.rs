// Metrics collection and tracking

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latency samples kept per endpoint for percentile calculation
const MAX_SAMPLES: usize = 1000;

/// Per-endpoint metrics
#[derive(Debug, Clone)]
pub struct EndpointMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
    pub total_latency_ms: Arc<AtomicU64>,
    pub max_latency_ms: Arc<AtomicU64>,
    latency_samples: Arc<Mutex<VecDeque<u64>>>,
}

impl EndpointMetrics {
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            total_latency_ms: Arc::new(AtomicU64::new(0)),
            max_latency_ms: Arc::new(AtomicU64::new(0)),
            latency_samples: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_SAMPLES))),
        }
    }

    /// Record one completed request. Failed requests count towards latency too.
    pub fn record(&self, elapsed: Duration, ok: bool) {
        let latency_ms = elapsed.as_millis() as u64;
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.max_latency_ms.fetch_max(latency_ms, Ordering::Relaxed);
        if !ok {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut samples) = self.latency_samples.lock() {
            if samples.len() == MAX_SAMPLES {
                samples.pop_front();
            }
            samples.push_back(latency_ms);
        }
    }

    pub fn avg_latency_ms(&self) -> f64 {
        let count = self.request_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        total as f64 / count as f64
    }

    fn percentile(&self, p: u8) -> u64 {
        let Ok(samples) = self.latency_samples.lock() else {
            return 0;
        };
        if samples.is_empty() {
            return 0;
        }
        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();
        let index = (sorted.len() * p as usize / 100).min(sorted.len() - 1);
        sorted[index]
    }

    pub fn stats(&self) -> EndpointStats {
        EndpointStats {
            request_count: self.request_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            avg_latency_ms: self.avg_latency_ms(),
            max_latency_ms: self.max_latency_ms.load(Ordering::Relaxed),
            p50_latency_ms: self.percentile(50),
            p95_latency_ms: self.percentile(95),
            p99_latency_ms: self.percentile(99),
        }
    }
}

impl Default for EndpointMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome counters for the generation pipelines
#[derive(Debug, Clone, Default)]
pub struct GenerationMetrics {
    pub image_batches: Arc<AtomicU64>,
    pub images_requested: Arc<AtomicU64>,
    pub images_produced: Arc<AtomicU64>,
    pub failed_batches: Arc<AtomicU64>,
    pub syntheses: Arc<AtomicU64>,
    pub refusals: Arc<AtomicU64>,
    pub audio_bytes: Arc<AtomicU64>,
}

impl GenerationMetrics {
    pub fn record_batch(&self, requested: usize, produced: usize) {
        self.image_batches.fetch_add(1, Ordering::Relaxed);
        self.images_requested.fetch_add(requested as u64, Ordering::Relaxed);
        self.images_produced.fetch_add(produced as u64, Ordering::Relaxed);
        if produced == 0 {
            self.failed_batches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_synthesis(&self, bytes: usize) {
        self.syntheses.fetch_add(1, Ordering::Relaxed);
        self.audio_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_refusal(&self) {
        self.refusals.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of individual image attempts that produced an image, in percent.
    pub fn image_success_rate(&self) -> f64 {
        let requested = self.images_requested.load(Ordering::Relaxed);
        if requested == 0 {
            return 0.0;
        }
        let produced = self.images_produced.load(Ordering::Relaxed);
        produced as f64 / requested as f64 * 100.0
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            image_batches: self.image_batches.load(Ordering::Relaxed),
            images_requested: self.images_requested.load(Ordering::Relaxed),
            images_produced: self.images_produced.load(Ordering::Relaxed),
            failed_batches: self.failed_batches.load(Ordering::Relaxed),
            image_success_rate: self.image_success_rate(),
            syntheses: self.syntheses.load(Ordering::Relaxed),
            refusals: self.refusals.load(Ordering::Relaxed),
            audio_bytes: self.audio_bytes.load(Ordering::Relaxed),
        }
    }
}

/// Comprehensive metrics structure
#[derive(Debug, Clone, Default)]
pub struct AppMetrics {
    pub enhance: EndpointMetrics,
    pub images: EndpointMetrics,
    pub thumbnails: EndpointMetrics,
    pub speech: EndpointMetrics,
    pub generation: GenerationMetrics,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoints(&self) -> EndpointMetricsResponse {
        EndpointMetricsResponse {
            enhance: self.enhance.stats(),
            images: self.images.stats(),
            thumbnails: self.thumbnails.stats(),
            speech: self.speech.stats(),
        }
    }
}

#[derive(Serialize)]
pub struct DetailedMetricsResponse {
    pub timestamp: DateTime<Utc>,
    pub system: SystemMetrics,
    pub endpoints: EndpointMetricsResponse,
    pub generation: GenerationStats,
    pub audio_store: AudioStoreStats,
}

#[derive(Serialize)]
pub struct SystemMetrics {
    pub cpu_usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_usage_percent: f32,
    pub request_count: u64,
    pub uptime_seconds: u64,
    pub system_load: Option<f64>,
}

#[derive(Serialize)]
pub struct EndpointMetricsResponse {
    pub enhance: EndpointStats,
    pub images: EndpointStats,
    pub thumbnails: EndpointStats,
    pub speech: EndpointStats,
}

#[derive(Debug, Serialize)]
pub struct EndpointStats {
    pub request_count: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p95_latency_ms: u64,
    pub p99_latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct GenerationStats {
    pub image_batches: u64,
    pub images_requested: u64,
    pub images_produced: u64,
    pub failed_batches: u64,
    pub image_success_rate: f64,
    pub syntheses: u64,
    pub refusals: u64,
    pub audio_bytes: u64,
}

#[derive(Serialize)]
pub struct AudioStoreStats {
    pub handles: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_stats() {
        let metrics = EndpointMetrics::new();
        metrics.record(Duration::from_millis(10), true);
        metrics.record(Duration::from_millis(30), false);

        let stats = metrics.stats();
        assert_eq!(stats.request_count, 2);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.max_latency_ms, 30);
        assert_eq!(stats.avg_latency_ms, 20.0);
        assert_eq!(stats.p99_latency_ms, 30);
    }

    #[test]
    fn test_sample_window_is_bounded() {
        let metrics = EndpointMetrics::new();
        for _ in 0..(MAX_SAMPLES + 10) {
            metrics.record(Duration::from_millis(1), true);
        }
        assert_eq!(metrics.latency_samples.lock().unwrap().len(), MAX_SAMPLES);
    }

    #[test]
    fn test_generation_stats() {
        let metrics = GenerationMetrics::default();
        metrics.record_batch(4, 3);
        metrics.record_batch(4, 0);
        metrics.record_synthesis(1044);

        let stats = metrics.stats();
        assert_eq!(stats.image_batches, 2);
        assert_eq!(stats.failed_batches, 1);
        assert_eq!(stats.images_produced, 3);
        assert_eq!(stats.image_success_rate, 37.5);
        assert_eq!(stats.syntheses, 1);
        assert_eq!(stats.audio_bytes, 1044);
    }
}
