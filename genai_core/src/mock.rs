//! Scripted backend for tests: replays canned replies in call order and
//! records every request it receives.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use anyhow::anyhow;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::backend::GenerativeBackend;
use crate::config::ApiKey;
use crate::error::GenAiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse, Part};

#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(GenerateContentResponse),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Scripted {
    reply: MockReply,
    delay: Duration,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub request: GenerateContentRequest,
}

#[derive(Debug)]
pub struct MockBackend {
    script: Mutex<VecDeque<Scripted>>,
    fallback: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// With an empty script every call fails.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockReply::Fail("no scripted reply left".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply used once the script is exhausted.
    pub fn otherwise(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn then(self, reply: MockReply) -> Self {
        self.then_after(reply, Duration::ZERO)
    }

    /// Queue a reply that is delivered only after `delay`.
    pub fn then_after(self, reply: MockReply, delay: Duration) -> Self {
        lock(&self.script).push_back(Scripted { reply, delay });
        self
    }

    pub fn then_respond(self, response: GenerateContentResponse) -> Self {
        self.then(MockReply::Respond(response))
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.then(MockReply::Fail(message.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn audio_response(pcm: &[u8]) -> GenerateContentResponse {
        GenerateContentResponse::from_parts(vec![Part::inline(
            "audio/L16;codec=pcm;rate=24000",
            general_purpose::STANDARD.encode(pcm),
        )])
    }

    pub fn image_response(png: &[u8]) -> GenerateContentResponse {
        GenerateContentResponse::from_parts(vec![Part::inline(
            "image/png",
            general_purpose::STANDARD.encode(png),
        )])
    }

    pub fn text_response(text: &str) -> GenerateContentResponse {
        GenerateContentResponse::from_parts(vec![Part::text(text)])
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate_content(
        &self,
        _api_key: &ApiKey,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        lock(&self.calls).push(RecordedCall {
            model: model.to_string(),
            request: request.clone(),
        });

        // Pop before sleeping so replies are matched to calls in issue order.
        let next = lock(&self.script).pop_front();
        let Scripted { reply, delay } = next.unwrap_or_else(|| Scripted {
            reply: self.fallback.clone(),
            delay: Duration::ZERO,
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(message) => Err(GenAiError::Transport(anyhow!(message))),
        }
    }
}
