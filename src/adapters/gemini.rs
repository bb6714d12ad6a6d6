//! Gemini adapter for series generation.
//!
//! Calls the `generateContent` REST endpoint once per request, asking for
//! JSON constrained by the series response schema.
//!
//! Endpoint: POST {endpoint}/models/{model}:generateContent
//! Auth: `x-goog-api-key` header

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::{parse_generation_text, GenerationClient, GenerationError};
use crate::config::ResolvedConfig;
use crate::core::prompt::{build_prompt, response_schema};
use crate::domain::{GenerationResult, Series};

/// Default model used for generation
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default REST base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    /// API credential (may be empty; the service then rejects the call)
    pub api_key: String,
    /// Model name, e.g. "gemini-3-flash-preview"
    pub model: String,
    /// REST base URL
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "(unset)" } else { "***" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl From<&ResolvedConfig> for GeminiConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Response body of `generateContent` (only the fields we read)
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Gemini generation client
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client that sends through the given HTTP client
    pub fn with_http_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(GeminiConfig::from(config))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build API URL
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for a prompt
    pub fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, reference), fields(model = %self.config.model))]
    async fn generate(&self, reference: &Series) -> Result<GenerationResult, GenerationError> {
        let prompt = build_prompt(reference)?;
        debug!(prompt_bytes = prompt.len(), "Sending generation request");

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(GenerationError::MalformedPayload)?;

        let result = parse_generation_text(parsed.text().as_deref())?;
        info!(series = result.len(), "Generation call returned");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{builtin_seed, Episode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on loopback; the handle yields the request
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let length = String::from_utf8_lossy(&request[..end])
                        .to_lowercase()
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/v1beta", addr), handle)
    }

    fn client_for(endpoint: &str) -> GeminiClient {
        // Bypass any proxy from the environment so loopback stays local
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        GeminiClient::with_http_client(
            GeminiConfig {
                api_key: "KEY".to_string(),
                model: "gemini-test".to_string(),
                endpoint: endpoint.to_string(),
            },
            http,
        )
    }

    #[test]
    fn test_api_url() {
        let client = client_for("https://example.test/v1beta/");
        assert_eq!(
            client.api_url(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_declares_json_schema() {
        let body = GeminiClient::request_body("olá");

        assert_eq!(body["contents"][0]["parts"][0]["text"], "olá");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            response_schema()
        );
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"newSeries\""}, {"text": ": []}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text().as_deref(), Some(r#"{"newSeries": []}"#));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text().is_none());
        assert!(parse_generation_text(parsed.text().as_deref())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_debug_masks_api_key() {
        let rendered = format!("{:?}", client_for("http://x").config());
        assert!(!rendered.contains("KEY"));
        assert!(rendered.contains("***"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 1 on loopback refuses connections
        let client = client_for("http://127.0.0.1:1/v1beta");
        let seed = builtin_seed().unwrap();

        let result = client.generate(&seed).await;
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }

    #[tokio::test]
    async fn test_invalid_reference_fails_before_request() {
        let client = client_for("http://127.0.0.1:1/v1beta");
        let result = client.generate(&Series::new("", "")).await;
        assert!(matches!(result, Err(GenerationError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn test_error_status_uses_envelope_message() {
        let envelope = r#"{"error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}}"#;
        let (endpoint, request) = serve_once("429 Too Many Requests", envelope.to_string()).await;
        let client = client_for(&endpoint);

        let result = client.generate(&builtin_seed().unwrap()).await;
        match result {
            Err(GenerationError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota");
            }
            other => panic!("expected Api error, got {:?}", other),
        }

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("post /v1beta/models/gemini-test:generatecontent "));
        assert!(request.contains("x-goog-api-key: key"));
    }

    #[tokio::test]
    async fn test_error_status_with_plain_body_keeps_body() {
        let (endpoint, _request) =
            serve_once("500 Internal Server Error", "upstream exploded".to_string()).await;
        let client = client_for(&endpoint);

        let result = client.generate(&builtin_seed().unwrap()).await;
        match result {
            Err(GenerationError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_parses_candidate_text() {
        let generated = GenerationResult {
            new_series: vec![Series::new("A GRANDE DEPRESSÃO", "Crises de crédito")
                .with_episode(Episode::new(
                    "1929 - A QUEDA",
                    "Como um dia apagou fortunas?",
                    "Margem e pânico",
                    "Corretores na rua",
                    "Alavancagem cobra juros",
                ))],
        };
        let text = serde_json::to_string(&generated).unwrap();
        let body = json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        });
        let (endpoint, request) = serve_once("200 OK", body.to_string()).await;
        let client = client_for(&endpoint);

        let result = client.generate(&builtin_seed().unwrap()).await.unwrap();
        assert_eq!(result, generated);

        let request = request.await.unwrap();
        assert!(request.contains("\"responseMimeType\":\"application/json\""));
    }

    #[tokio::test]
    async fn test_success_body_that_is_not_json_is_malformed() {
        let (endpoint, _request) = serve_once("200 OK", "<html>oops</html>".to_string()).await;
        let client = client_for(&endpoint);

        let result = client.generate(&builtin_seed().unwrap()).await;
        assert!(matches!(result, Err(GenerationError::MalformedPayload(_))));
    }
}
