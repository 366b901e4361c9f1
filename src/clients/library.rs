//! NASA Image and Video Library search client
//!
//! Library items have a different, loosely populated shape; they are mapped
//! into [`Record`] here so the rest of the gallery only sees one kind of item.

use super::{ensure_success, HttpClient};
use crate::domain::{MediaKind, Record};
use crate::errors::ApiResult;
use crate::utils::{date_portion, non_blank};
use serde::Deserialize;
use tracing::warn;

/// Only the head of the result set is shown
pub const LIBRARY_RESULT_LIMIT: usize = 20;

const NO_DESCRIPTION: &str = "No description available.";
const LIBRARY_SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    collection: Collection,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    items: Vec<LibraryItem>,
}

#[derive(Debug, Deserialize)]
struct LibraryItem {
    #[serde(default)]
    data: Vec<ItemData>,
    #[serde(default)]
    links: Vec<ItemLink>,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    title: Option<String>,
    description: Option<String>,
    date_created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemLink {
    href: Option<String>,
}

pub struct LibraryClient {
    http_client: HttpClient,
    base_url: String,
}

impl LibraryClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Free-text image search
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Record>> {
        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .query(&[("q", query), ("media_type", "image")])
            .send()
            .await?;
        let resp = ensure_success(resp, "Search failed").await?;

        let body: SearchResponse = resp.json().await?;
        Ok(normalize(body))
    }
}

pub(crate) fn normalize(body: SearchResponse) -> Vec<Record> {
    body.collection
        .items
        .into_iter()
        .take(LIBRARY_RESULT_LIMIT)
        .filter_map(normalize_item)
        .collect()
}

fn normalize_item(item: LibraryItem) -> Option<Record> {
    let Some(data) = item.data.into_iter().next() else {
        warn!("Skipping library item without metadata");
        return None;
    };
    let Some(href) = item.links.into_iter().next().and_then(|l| non_blank(l.href.as_deref()))
    else {
        warn!("Skipping library item without a preview link");
        return None;
    };
    let Some(date) = data.date_created.as_deref().and_then(date_portion) else {
        warn!("Skipping library item with unusable creation date: {:?}", data.date_created);
        return None;
    };

    Some(Record {
        date,
        title: data.title.unwrap_or_default(),
        explanation: non_blank(data.description.as_deref())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        media_url: href.clone(),
        hd_url: Some(href),
        media_kind: MediaKind::Image,
        attribution: None,
        schema_version: LIBRARY_SCHEMA_VERSION.to_string(),
    })
}
