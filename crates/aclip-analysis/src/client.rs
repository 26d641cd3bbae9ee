//! Text-analysis collaborator client.
//!
//! A thin client for a Gemini-style generative endpoint. The response is
//! free-form text; all interpretation happens behind the parse boundary in
//! [`crate::parse`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnalysisError, AnalysisResult};

/// Text-analysis collaborator.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait TextAnalysis: Send + Sync {
    /// Run the prompt and return the raw response text.
    async fn analyze(&self, prompt: &str) -> AnalysisResult<String>;
}

/// Default model fallback order.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
];

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini client with model fallback.
pub struct GeminiAnalyzer {
    api_key: String,
    base_url: String,
    models: Vec<String>,
    client: Client,
}

impl GeminiAnalyzer {
    /// Create a client for the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            client: Client::new(),
        }
    }

    /// Override the model fallback list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    async fn call_model(&self, model: &str, prompt: &str) -> AnalysisResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, detail });
        }

        let body: GeminiResponse = response.json().await?;

        body.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(AnalysisError::NoContent)
    }
}

#[async_trait]
impl TextAnalysis for GeminiAnalyzer {
    async fn analyze(&self, prompt: &str) -> AnalysisResult<String> {
        let mut last_error: Option<AnalysisError> = None;

        for model in &self.models {
            match self.call_model(model, prompt).await {
                Ok(text) => {
                    info!(model = %model, "Analysis succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Analysis model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(AnalysisError::AllModelsFailed(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}
