/// Domain models for the application
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::embed_url;

/// One astronomy picture (or video) of the day.
///
/// Serialized with the daily-picture API's field names so that origin
/// payloads and persisted favorites share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub title: String,
    pub explanation: String,
    #[serde(rename = "url")]
    pub media_url: String,
    #[serde(rename = "hdurl", default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    #[serde(rename = "media_type")]
    pub media_kind: MediaKind,
    #[serde(rename = "copyright", default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(rename = "service_version", default)]
    pub schema_version: String,
}

impl Record {
    pub fn high_res_url(&self) -> &str {
        self.hd_url.as_deref().unwrap_or(&self.media_url)
    }

    /// URL suitable for an inline player or image element.
    pub fn display_url(&self) -> String {
        match self.media_kind {
            MediaKind::Video => embed_url(&self.media_url),
            MediaKind::Image => self.media_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Feed,
    Explore,
    Random,
    Favorites,
}

/// Loading state of one tab
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum TabStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl TabStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, TabStatus::Loading)
    }
}

/// Scroll position reported by the presentation layer
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height + threshold
    }
}

/// A record together with its list reconciliation key (`date-position`).
#[derive(Debug, Clone, Serialize)]
pub struct ViewEntry {
    pub key: String,
    #[serde(flatten)]
    pub record: Record,
}

pub fn keyed(records: &[Record]) -> Vec<ViewEntry> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| ViewEntry {
            key: format!("{}-{}", record.date, idx),
            record: record.clone(),
        })
        .collect()
}

/// Snapshot of one tab for rendering
#[derive(Debug, Serialize)]
pub struct TabView {
    pub tab: Tab,
    pub status: TabStatus,
    pub entries: Vec<ViewEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) fn sample_record(date: &str) -> Record {
    Record {
        date: date.parse().expect("valid test date"),
        title: format!("Picture {date}"),
        explanation: "A nebula.".into(),
        media_url: format!("https://apod.nasa.gov/{date}.jpg"),
        hd_url: None,
        media_kind: MediaKind::Image,
        attribution: None,
        schema_version: "v1".into(),
    }
}
