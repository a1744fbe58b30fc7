//! Description Assist: drafts one-sentence menu copy via the Gemini API.
//!
//! Infallible from the caller's view: any failure (missing key, transport,
//! quota, parse, timeout) degrades to fixed fallback copy and a `warn` log.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;

const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.5-flash";

const FALLBACK_EMPTY: &str = "A delicious gourmet burger.";
const FALLBACK_FAILURE: &str = "A tasty burger made with fresh ingredients.";

#[derive(Clone)]
pub struct DescriptionAssist {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl DescriptionAssist {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            api_url: API_URL.to_string(),
            timeout: Duration::from_secs(config.describe_timeout_secs),
        }
    }

    /// Overrides the API endpoint, e.g. to point at a local test server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Always resolves to a non-empty sentence.
    pub async fn generate(&self, name: &str, ingredients: &str) -> String {
        match tokio::time::timeout(self.timeout, self.request(name, ingredients)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => FALLBACK_EMPTY.to_string(),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "description drafting failed, using fallback");
                FALLBACK_FAILURE.to_string()
            }
            Err(_) => {
                tracing::warn!("description drafting timed out, using fallback");
                FALLBACK_FAILURE.to_string()
            }
        }
    }

    async fn request(&self, name: &str, ingredients: &str) -> Result<String, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::ExternalService("GEMINI_API_KEY is not set".into()));
        };

        let prompt = format!(
            "Write a short, mouth-watering, 1-sentence description for a burger named \"{name}\". \
             Key ingredients/vibe: {ingredients}. \
             Keep it under 20 words. Make it sound premium and delicious."
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/models/{MODEL}:generateContent", self.api_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let parsed: GenerateResponse = response
                    .json()
                    .await
                    .map_err(|e| AppError::ExternalService(e.to_string()))?;
                let text = parsed
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content.parts.into_iter().next())
                    .map(|p| p.text)
                    .unwrap_or_default();
                Ok(text)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::ExternalService(format!(
                    "status {status}: {body}"
                )))
            }
        }
    }
}
