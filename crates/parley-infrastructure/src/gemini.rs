//! Gemini implementation of the generative provider seam.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! Only the text subset is modeled; structured calls set a JSON response
//! MIME type and parse the returned text as a JSON value. Every call
//! carries an explicit timeout; expiry surfaces as a provider failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parley_core::llm::{GenerativeClient, ProviderError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
    }
}

/// Gemini-backed [`GenerativeClient`].
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Builds a client for the public API endpoint.
    ///
    /// # Errors
    ///
    /// Returns a provider error if the HTTP client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, timeout_secs)
    }

    /// Builds a client against an alternate endpoint (tests, proxies).
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs,
        })
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "provider rejected request");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: truncate(&message, 512),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedOutput(e.to_string()))?;
        body.first_text()
            .ok_or_else(|| ProviderError::MalformedOutput("no candidates in response".to_string()))
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn complete(
        &self,
        instruction: &str,
        context: Option<&str>,
        message: &str,
    ) -> Result<String, ProviderError> {
        let mut contents = Vec::new();
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            contents.push(Content::user(format!(
                "Previous conversation context:\n{}",
                context
            )));
        }
        contents.push(Content::user(message));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(instruction)),
            generation_config: Some(GenerationConfig {
                temperature: Some(1.0),
                response_mime_type: None,
            }),
        };
        self.generate(&request).await
    }

    async fn complete_structured(
        &self,
        instruction: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(instruction)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: Some(0.5),
                response_mime_type: Some("application/json".to_string()),
            }),
        };
        let text = self.generate(&request).await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::MalformedOutput(e.to_string()))
    }
}
