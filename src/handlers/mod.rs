/// HTTP request handlers
use crate::clients::Gateway;
use crate::domain::{Health, Record, ScrollMetrics, Tab, TabView};
use crate::errors::{ApiError, ApiResult};
use crate::services::{DetailService, DetailView, FavoritesStore, GalleryService, SummaryState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub gallery: Arc<GalleryService>,
    pub favorites: Arc<FavoritesStore>,
    pub detail: Arc<DetailService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

type Reply<T> = ApiResult<Json<SuccessResponse<T>>>;

fn reply<T: Serialize>(data: T) -> Reply<T> {
    Ok(Json(SuccessResponse::new(data)))
}

#[derive(Serialize)]
pub struct RecordBody {
    pub record: Record,
}

#[derive(Serialize)]
pub struct DetailBody {
    pub detail: Option<DetailView>,
    pub favorite: bool,
}

#[derive(Serialize)]
pub struct FavoriteBody {
    pub date: NaiveDate,
    pub favorite: bool,
}

#[derive(Serialize)]
pub struct SummaryBody {
    pub summary: SummaryState,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidInput(format!("'{raw}' is not a YYYY-MM-DD date")))
}

async fn detail_body(state: &AppState, detail: Option<DetailView>) -> DetailBody {
    let favorite = match &detail {
        Some(view) => state.favorites.is_favorite(view.record.date).await,
        None => false,
    };
    DetailBody { detail, favorite }
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Today's picture
pub async fn get_today(State(state): State<AppState>) -> Reply<RecordBody> {
    let record = state.gateway.fetch_today().await?;
    reply(RecordBody { record })
}

/// Activate a tab and return its contents
pub async fn get_tab(Path(tab): Path<Tab>, State(state): State<AppState>) -> Reply<TabView> {
    state.gallery.activate(tab).await;
    reply(state.gallery.view(tab).await)
}

/// Report the scroll position of the active tab
pub async fn scroll(
    State(state): State<AppState>,
    Json(metrics): Json<ScrollMetrics>,
) -> Reply<TabView> {
    state.gallery.on_scroll(metrics).await;
    let tab = state.gallery.active_tab().await;
    reply(state.gallery.view(tab).await)
}

/// Replay the last failed request of a tab
pub async fn retry_tab(Path(tab): Path<Tab>, State(state): State<AppState>) -> Reply<TabView> {
    if let Some(record) = state.gallery.retry(tab).await? {
        state.detail.open(record).await;
    }
    reply(state.gallery.view(tab).await)
}

/// Keyword search of the image library
pub async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Reply<TabView> {
    state.gallery.search(&params.q).await;
    reply(state.gallery.view(Tab::Explore).await)
}

pub async fn clear_search(State(state): State<AppState>) -> Reply<TabView> {
    state.gallery.clear_search().await;
    reply(state.gallery.view(Tab::Explore).await)
}

/// Jump to the picture of a given date and open it
pub async fn lookup_date(
    Path(date): Path<String>,
    State(state): State<AppState>,
) -> Reply<DetailBody> {
    let date = parse_date(&date)?;
    let record = state.gallery.lookup_date(date).await?;
    let view = state.detail.open(record).await;
    reply(detail_body(&state, Some(view)).await)
}

pub async fn list_favorites(State(state): State<AppState>) -> Reply<TabView> {
    reply(state.gallery.view(Tab::Favorites).await)
}

pub async fn get_favorite(
    Path(date): Path<String>,
    State(state): State<AppState>,
) -> Reply<FavoriteBody> {
    let date = parse_date(&date)?;
    let favorite = state.favorites.is_favorite(date).await;
    reply(FavoriteBody { date, favorite })
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Reply<FavoriteBody> {
    let date = record.date;
    let favorite = state.favorites.toggle(record).await?;
    reply(FavoriteBody { date, favorite })
}

pub async fn get_detail(State(state): State<AppState>) -> Reply<DetailBody> {
    let detail = state.detail.current().await;
    reply(detail_body(&state, detail).await)
}

pub async fn open_detail(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Reply<DetailBody> {
    let view = state.detail.open(record).await;
    reply(detail_body(&state, Some(view)).await)
}

pub async fn close_detail(State(state): State<AppState>) -> Reply<DetailBody> {
    state.detail.close().await;
    reply(DetailBody {
        detail: None,
        favorite: false,
    })
}

/// Generate (or return the cached) summary of the open record
pub async fn request_summary(State(state): State<AppState>) -> Reply<SummaryBody> {
    let summary = state.detail.request_summary().await?;
    reply(SummaryBody { summary })
}
