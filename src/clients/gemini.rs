//! Gemini text generation client for picture summaries

use super::{ensure_success, HttpClient, SummaryProvider};
use crate::domain::Record;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use serde_json::{json, Value};

const SYSTEM_INSTRUCTION: &str = "You are a cosmic storyteller. Your goal is to make space \
exploration feel magical yet educational. Keep responses under 150 words.";

pub struct GeminiClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String, model: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn prompt(record: &Record) -> String {
        format!(
            "Explain this NASA Astronomy Picture of the Day to a curious person in a poetic and \
engaging way. Focus on the science but keep it accessible.\nTitle: {}\nDescription: {}",
            record.title, record.explanation
        )
    }

    fn request_body(record: &Record) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": Self::prompt(record) }] }]
        })
    }
}

/// Concatenated text parts of the first candidate; empty when there are none.
fn candidate_text(json: &Value) -> String {
    json["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl SummaryProvider for GeminiClient {
    async fn summarize(&self, record: &Record) -> ApiResult<String> {
        if !self.is_configured() {
            return Err(ApiError::InvalidInput(
                "GEMINI_API_KEY is not configured".to_string(),
            ));
        }

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let resp = self
            .http_client
            .get_client()
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(record))
            .send()
            .await?;
        let resp = ensure_success(resp, "Summary generation failed").await?;

        let json: Value = resp.json().await?;
        Ok(candidate_text(&json).trim().to_string())
    }
}
