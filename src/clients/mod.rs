/// External API clients module
mod apod;
mod gemini;
mod library;

pub use apod::ApodClient;
pub use gemini::GeminiClient;
pub use library::LibraryClient;

use crate::domain::Record;
use crate::errors::{ApiError, ApiResult};
use crate::utils::non_blank;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("cosmospin/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Source of picture records
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch_by_date(&self, date: NaiveDate) -> ApiResult<Record>;
    async fn fetch_today(&self) -> ApiResult<Record>;
    async fn fetch_random_batch(&self, count: u32) -> ApiResult<Vec<Record>>;
    async fn search_library(&self, query: &str) -> ApiResult<Vec<Record>>;
}

/// Generates a short narrative about a record
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// May return an empty string when the model produced no text.
    async fn summarize(&self, record: &Record) -> ApiResult<String>;
}

/// Daily-picture API plus image-library search
pub struct NasaGateway {
    apod: ApodClient,
    library: LibraryClient,
}

impl NasaGateway {
    pub fn new(apod: ApodClient, library: LibraryClient) -> Self {
        Self { apod, library }
    }
}

#[async_trait]
impl Gateway for NasaGateway {
    async fn fetch_by_date(&self, date: NaiveDate) -> ApiResult<Record> {
        self.apod.fetch_by_date(date).await
    }

    async fn fetch_today(&self) -> ApiResult<Record> {
        self.apod.fetch_today().await
    }

    async fn fetch_random_batch(&self, count: u32) -> ApiResult<Vec<Record>> {
        self.apod.fetch_random(count).await
    }

    async fn search_library(&self, query: &str) -> ApiResult<Vec<Record>> {
        self.library.search(query).await
    }
}

/// `count` consecutive dates, newest first, starting `offset` days before `today`
pub fn generate_date_range(today: NaiveDate, count: u32, offset: u32) -> Vec<NaiveDate> {
    (0..count)
        .filter_map(|i| today.checked_sub_days(Days::new(u64::from(offset) + u64::from(i))))
        .collect()
}

/// Turn an unsuccessful origin response into an error carrying the origin's message.
async fn ensure_success(resp: Response, fallback: &str) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = origin_message(&body).unwrap_or_else(|| fallback.to_string());

    match status.as_u16() {
        400 | 404 => Err(ApiError::NotFound(message)),
        code => Err(ApiError::Upstream {
            status: code,
            message,
        }),
    }
}

/// APOD errors carry `msg`; the api.nasa.gov gateway nests `error.message`.
fn origin_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    non_blank(json.get("msg").and_then(Value::as_str))
        .or_else(|| non_blank(json.pointer("/error/message").and_then(Value::as_str)))
}
