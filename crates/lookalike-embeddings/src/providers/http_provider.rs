//! Multimodal embedding over HTTP (DashScope `multimodal-embedding-v1`
//! request/response shape).
//!
//! Each call drives the async client on its own current-thread runtime.
//! When the caller already sits inside a tokio runtime, that runtime lives
//! on a scoped helper thread so it is never started or dropped in an async
//! context.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::errors::{EmbeddingError, LookalikeError, LookalikeResult};
use lookalike_core::models::ImagePayload;
use lookalike_core::traits::IEmbeddingProvider;

const PROVIDER_NAME: &str = "dashscope";

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    output: Option<EmbeddingOutput>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingOutput {
    #[serde(default)]
    embeddings: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

pub struct HttpEmbeddingProvider {
    timeout: Duration,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl HttpEmbeddingProvider {
    /// Create a provider for the configured endpoint and model.
    pub fn new(config: &EmbeddingConfig, api_key: String) -> LookalikeResult<Self> {
        Ok(Self {
            timeout: config.request_timeout(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
        })
    }

    /// Read the API key from `config.api_key_env`.
    pub fn from_env(config: &EmbeddingConfig) -> LookalikeResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            LookalikeError::ConfigError(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Self::new(config, api_key)
    }
}

impl IEmbeddingProvider for HttpEmbeddingProvider {
    fn embed_image(&self, payload: &ImagePayload) -> LookalikeResult<Vec<f32>> {
        let body = json!({
            "model": self.model,
            "input": { "contents": [ { "image": payload.data_uri } ] },
        });
        debug!(
            endpoint = %self.endpoint,
            payload_bytes = payload.encoded_bytes,
            "calling embedding provider"
        );

        let (status, text) = run_blocking(async {
            let client = Client::builder()
                .timeout(self.timeout)
                .gzip(true)
                .build()
                .map_err(|e| provider_err(format!("http client: {e}")))?;
            let resp = client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| provider_err(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| provider_err(e.to_string()))?;
            Ok::<_, LookalikeError>((status, text))
        })?;
        let parsed: Option<EmbeddingResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let (code, message) = match &parsed {
                Some(r) => (r.code.clone(), r.message.clone().unwrap_or_else(|| text.clone())),
                None => (None, text.clone()),
            };
            return Err(classify_failure(status, code.as_deref(), &message).into());
        }

        let parsed =
            parsed.ok_or_else(|| provider_err(format!("unparseable response body: {text}")))?;
        extract_vector(parsed)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

/// Drive `fut` to completion on a fresh current-thread runtime.
fn run_blocking<F, T>(fut: F) -> LookalikeResult<T>
where
    F: Future<Output = LookalikeResult<T>> + Send,
    T: Send,
{
    let drive = move || -> LookalikeResult<T> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| provider_err(format!("runtime error: {e}")))?
            .block_on(fut)
    };
    if tokio::runtime::Handle::try_current().is_err() {
        return drive();
    }
    std::thread::scope(|scope| {
        scope
            .spawn(drive)
            .join()
            .map_err(|_| provider_err("embedding request thread panicked".to_string()))?
    })
}

fn extract_vector(resp: EmbeddingResponse) -> LookalikeResult<Vec<f32>> {
    resp.output
        .and_then(|o| o.embeddings.into_iter().next())
        .map(|item| item.embedding)
        .ok_or_else(|| provider_err("response has no embeddings".to_string()))
}

/// Throttling is the only failure worth retrying: HTTP 429, a
/// `Throttling*` error code, or a message mentioning the rate limit.
fn classify_failure(status: StatusCode, code: Option<&str>, message: &str) -> EmbeddingError {
    let throttled = status == StatusCode::TOO_MANY_REQUESTS
        || code.is_some_and(|c| c.starts_with("Throttling"))
        || message.to_lowercase().contains("rate limit");
    if throttled {
        EmbeddingError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            message: message.to_string(),
        }
    } else {
        EmbeddingError::ProviderFailed {
            provider: PROVIDER_NAME.to_string(),
            reason: format!("HTTP {status}: {message}"),
        }
    }
}

fn provider_err(reason: String) -> LookalikeError {
    EmbeddingError::ProviderFailed {
        provider: PROVIDER_NAME.to_string(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_is_rate_limited() {
        assert!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, None, "slow down").is_rate_limited()
        );
        assert!(classify_failure(
            StatusCode::BAD_REQUEST,
            Some("Throttling.RateQuota"),
            "quota"
        )
        .is_rate_limited());
        assert!(
            classify_failure(StatusCode::BAD_REQUEST, None, "Requests rate limit exceeded")
                .is_rate_limited()
        );
    }

    #[test]
    fn other_failures_are_fatal() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, Some("InvalidApiKey"), "bad key");
        assert!(!err.is_rate_limited());
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn parses_first_embedding() {
        let body = r#"{"output":{"embeddings":[{"index":0,"embedding":[0.5,0.25],"type":"image"}]},
                      "usage":{"image_count":1},"request_id":"r-1"}"#;
        let resp: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_vector(resp).unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn empty_output_is_provider_failure() {
        let resp: EmbeddingResponse =
            serde_json::from_str(r#"{"output":{"embeddings":[]}}"#).unwrap();
        let err = extract_vector(resp).unwrap_err();
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn run_blocking_outside_a_runtime() {
        let value = run_blocking(async { Ok(7) }).unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn run_blocking_inside_a_runtime() {
        let value = run_blocking(async { Ok("done") }).unwrap();
        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_inside_a_runtime() {
        let config = EmbeddingConfig {
            endpoint: "http://127.0.0.1:9/embeddings".into(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let provider = HttpEmbeddingProvider::new(&config, "key".into()).unwrap();
        let payload = ImagePayload {
            data_uri: "data:image/jpeg;base64,AAAA".into(),
            encoded_bytes: 3,
            width: 1,
            height: 1,
            quality: 95,
        };
        let err = provider.embed_image(&payload).unwrap_err();
        assert!(!err.is_rate_limited());
        drop(provider);
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = EmbeddingConfig {
            api_key_env: "LOOKALIKE_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpEmbeddingProvider::from_env(&config),
            Err(LookalikeError::ConfigError(_))
        ));
    }
}
