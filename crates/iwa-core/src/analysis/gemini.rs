//! Gemini API client for warrant analysis.
//!
//! Sends the document inline (base64) alongside the prompt to the
//! `generateContent` endpoint and returns the model's text.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisError, AnalysisRequest, AnalysisService};
use crate::config::Credential;
use crate::error::{IwaError, IwaResult};

/// Default Gemini API URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    credential: Credential,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// Create a new client with the given credential, model, base URL and timeout.
    pub fn new(
        credential: Credential,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> IwaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IwaError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credential,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AnalysisService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &AnalysisRequest<'_>) -> Result<String, AnalysisError> {
        let data = base64::engine::general_purpose::STANDARD.encode(request.content);

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type,
                            data,
                        },
                    },
                    Part::Text {
                        text: request.prompt,
                    },
                ],
            }],
        };

        debug!(model = %self.model, mime = request.mime_type, "Calling Gemini API");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| AnalysisError::Malformed(e.to_string()))?;

        extract_text(parsed)
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, AnalysisError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(AnalysisError::Blocked(reason)),
            None => Err(AnalysisError::EmptyResponse),
        };
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            Err(AnalysisError::Blocked(reason.to_string()))
        }
        _ => Err(AnalysisError::EmptyResponse),
    }
}

fn transport_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        inner: Arc<Mutex<Option<(String, String, serde_json::Value)>>>,
    }

    /// Serve `reply` for every generateContent call, recording what was sent.
    async fn fake_gemini(
        status: StatusCode,
        reply: serde_json::Value,
        delay: Duration,
    ) -> (String, Captured) {
        let captured = Captured::default();

        let app = Router::new()
            .route(
                "/v1beta/models/{call}",
                post(
                    move |State(captured): State<Captured>,
                          Path(call): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<serde_json::Value>| async move {
                        let key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        *captured.inner.lock().unwrap() = Some((call, key, body));
                        tokio::time::sleep(delay).await;
                        (status, Json(reply))
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn client(base_url: &str, timeout: Duration) -> GeminiClient {
        let credential = Credential::new(Some("test-key".to_string())).unwrap();
        GeminiClient::new(credential, DEFAULT_MODEL, base_url, timeout).unwrap()
    }

    fn request<'a>() -> AnalysisRequest<'a> {
        AnalysisRequest {
            content: b"hello",
            mime_type: "application/pdf",
            prompt: "Classify this.",
        }
    }

    #[tokio::test]
    async fn test_request_shape_and_text_extraction() {
        let reply = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "This is an "}, {"text": "administrative warrant."}]},
                "finishReason": "STOP"
            }]
        });
        let (base, captured) = fake_gemini(StatusCode::OK, reply, Duration::ZERO).await;

        let text = client(&base, DEFAULT_TIMEOUT).generate(&request()).await.unwrap();
        assert_eq!(text, "This is an administrative warrant.");

        let (call, key, body) = captured.inner.lock().unwrap().clone().unwrap();
        assert_eq!(call, "gemini-2.0-flash:generateContent");
        assert_eq!(key, "test-key");

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(parts[0]["inline_data"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "Classify this.");
    }

    #[tokio::test]
    async fn test_api_error_message_surfaced() {
        let reply = serde_json::json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
        });
        let (base, _) = fake_gemini(StatusCode::BAD_REQUEST, reply, Duration::ZERO).await;

        let err = client(&base, DEFAULT_TIMEOUT).generate(&request()).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Api {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let reply = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let (base, _) = fake_gemini(StatusCode::OK, reply, Duration::ZERO).await;

        let err = client(&base, DEFAULT_TIMEOUT).generate(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Blocked("SAFETY".to_string()));
    }

    #[tokio::test]
    async fn test_empty_candidate_text() {
        let reply = serde_json::json!({"candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]});
        let (base, _) = fake_gemini(StatusCode::OK, reply, Duration::ZERO).await;

        let err = client(&base, DEFAULT_TIMEOUT).generate(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let reply = serde_json::json!({"candidates": "nope"});
        let (base, _) = fake_gemini(StatusCode::OK, reply, Duration::ZERO).await;

        let err = client(&base, DEFAULT_TIMEOUT).generate(&request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let reply = serde_json::json!({"candidates": []});
        let (base, _) = fake_gemini(StatusCode::OK, reply, Duration::from_secs(5)).await;

        let err = client(&base, Duration::from_millis(200)).generate(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr), DEFAULT_TIMEOUT)
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }
}
