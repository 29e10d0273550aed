//! Embedding providers with scripted behavior.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use lookalike_core::errors::{EmbeddingError, LookalikeError, LookalikeResult};
use lookalike_core::models::ImagePayload;
use lookalike_core::traits::IEmbeddingProvider;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Vector(Vec<f32>),
    RateLimited,
    Failure(String),
}

/// A rate-limit error as the HTTP provider would report it.
pub fn rate_limited(provider: &str) -> LookalikeError {
    EmbeddingError::RateLimited {
        provider: provider.to_string(),
        message: "Throttling.RateQuota: rate limit exceeded".to_string(),
    }
    .into()
}

/// Replays a queue of responses, then falls back to a fixed vector.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<ScriptedResponse>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<ImagePayload>>,
}

impl ScriptedProvider {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Queue responses to be returned, in order, before the fallback.
    pub fn with_script(self, responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        self.script.lock().unwrap().extend(responses);
        self
    }

    pub fn push(&self, response: ScriptedResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every payload received so far.
    pub fn payloads(&self) -> Vec<ImagePayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl IEmbeddingProvider for ScriptedProvider {
    fn embed_image(&self, payload: &ImagePayload) -> LookalikeResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None => Ok(self.fallback.clone()),
            Some(ScriptedResponse::Vector(v)) => Ok(v),
            Some(ScriptedResponse::RateLimited) => Err(rate_limited(self.name())),
            Some(ScriptedResponse::Failure(reason)) => Err(EmbeddingError::ProviderFailed {
                provider: self.name().to_string(),
                reason,
            }
            .into()),
        }
    }

    fn dimensions(&self) -> usize {
        self.fallback.len()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always returns the same vector.
pub struct ConstantProvider {
    vector: Vec<f32>,
}

impl ConstantProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

impl IEmbeddingProvider for ConstantProvider {
    fn embed_image(&self, _payload: &ImagePayload) -> LookalikeResult<Vec<f32>> {
        Ok(self.vector.clone())
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }

    fn name(&self) -> &str {
        "constant"
    }
}
