//! Astronomy Picture of the Day client

use super::{ensure_success, HttpClient};
use crate::domain::Record;
use crate::errors::{ApiError, ApiResult};
use chrono::NaiveDate;
use reqwest::RequestBuilder;

pub struct ApodClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApodClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    fn request(&self) -> RequestBuilder {
        let req = self.http_client.get_client().get(&self.base_url);
        if self.api_key.is_empty() {
            req
        } else {
            req.query(&[("api_key", &self.api_key)])
        }
    }

    /// Fetch the picture published on `date`
    pub async fn fetch_by_date(&self, date: NaiveDate) -> ApiResult<Record> {
        let resp = self
            .request()
            .query(&[("date", date.to_string())])
            .send()
            .await?;
        let resp = ensure_success(resp, "Failed to fetch APOD by date").await?;

        let record: Record = resp.json().await?;
        if record.date != date {
            return Err(ApiError::NotFound(format!(
                "No data available for date: {date}"
            )));
        }
        Ok(record)
    }

    /// Fetch the picture the origin currently considers "today"
    pub async fn fetch_today(&self) -> ApiResult<Record> {
        let resp = self.request().send().await?;
        let resp = ensure_success(resp, "Failed to fetch today's APOD").await?;
        Ok(resp.json().await?)
    }

    /// Fetch `count` randomly sampled pictures, in origin order
    pub async fn fetch_random(&self, count: u32) -> ApiResult<Vec<Record>> {
        let resp = self
            .request()
            .query(&[("count", count.to_string())])
            .send()
            .await?;
        let resp = ensure_success(resp, "Failed to fetch random APODs").await?;
        Ok(resp.json().await?)
    }
}
