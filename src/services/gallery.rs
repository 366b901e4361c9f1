//! View lists for the feed, random, explore and favorites tabs
//!
//! Each tab has its own [`TabStatus`]; a tab never has more than one batch
//! request in flight. The state lock is only held between awaits, never
//! across a network call, so a slow tab does not block the others.
//!
//! Fetches run in spawned tasks that the caller awaits. A caller that is
//! dropped mid-request leaves the task running, so the batch still lands and
//! the tab leaves `loading`.

use super::favorites::FavoritesStore;
use crate::clients::{generate_date_range, Gateway};
use crate::domain::{keyed, Record, ScrollMetrics, Tab, TabStatus, TabView};
use crate::errors::{ApiError, ApiResult};
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const FEED_BATCH_SIZE: u32 = 10;
pub const RANDOM_BATCH_SIZE: u32 = 10;
/// Remaining scroll distance below which the next page is requested
pub const SCROLL_THRESHOLD: f64 = 300.0;

pub const FEED_ERROR: &str = "Stellar transmission interrupted.";
pub const RANDOM_ERROR: &str = "Stellar coordinates failed.";
pub const SEARCH_ERROR: &str = "Search failed. The cosmos is vast and sometimes silent.";
pub const LOOKUP_ERROR: &str = "The lookup was interrupted. Try again.";

pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// A request that can be replayed by `retry`
#[derive(Debug, Clone, PartialEq)]
enum Request {
    FeedPage,
    RandomBatch,
    Search(String),
    Date(NaiveDate),
}

struct GalleryState {
    active: Tab,
    feed: Vec<Record>,
    random: Vec<Record>,
    search: Vec<Record>,
    query: Option<String>,
    cursor: u32,
    status: HashMap<Tab, TabStatus>,
    failed: HashMap<Tab, Request>,
}

impl GalleryState {
    fn new() -> Self {
        Self {
            active: Tab::Feed,
            feed: Vec::new(),
            random: Vec::new(),
            search: Vec::new(),
            query: None,
            cursor: 0,
            status: HashMap::new(),
            failed: HashMap::new(),
        }
    }

    fn status(&self, tab: Tab) -> TabStatus {
        self.status.get(&tab).cloned().unwrap_or_default()
    }

    /// Mark `tab` loading unless it already is
    fn begin(&mut self, tab: Tab) -> bool {
        if self.status(tab).is_loading() {
            return false;
        }
        self.status.insert(tab, TabStatus::Loading);
        true
    }

    fn succeed(&mut self, tab: Tab) {
        self.status.insert(tab, TabStatus::Idle);
        self.failed.remove(&tab);
    }

    fn fail(&mut self, tab: Tab, request: Request, message: impl Into<String>) {
        self.status.insert(tab, TabStatus::Error(message.into()));
        self.failed.insert(tab, request);
    }
}

pub struct GalleryService {
    gateway: Arc<dyn Gateway>,
    favorites: Arc<FavoritesStore>,
    today: Clock,
    state: Arc<Mutex<GalleryState>>,
}

impl GalleryService {
    pub fn new(gateway: Arc<dyn Gateway>, favorites: Arc<FavoritesStore>) -> Self {
        Self::with_clock(gateway, favorites, Arc::new(|| Utc::now().date_naive()))
    }

    pub fn with_clock(
        gateway: Arc<dyn Gateway>,
        favorites: Arc<FavoritesStore>,
        today: Clock,
    ) -> Self {
        Self {
            gateway,
            favorites,
            today,
            state: Arc::new(Mutex::new(GalleryState::new())),
        }
    }

    pub async fn active_tab(&self) -> Tab {
        self.state.lock().await.active
    }

    /// Switch tabs, loading the first page of an empty feed or random list.
    pub async fn activate(&self, tab: Tab) {
        let initial_load = {
            let mut state = self.state.lock().await;
            state.active = tab;
            let idle = state.status(tab) == TabStatus::Idle;
            match tab {
                Tab::Feed => idle && state.feed.is_empty(),
                Tab::Random => idle && state.random.is_empty(),
                Tab::Explore | Tab::Favorites => false,
            }
        };

        if initial_load {
            match tab {
                Tab::Feed => {
                    self.load_next_feed_page().await;
                }
                Tab::Random => {
                    self.load_random_batch().await;
                }
                Tab::Explore | Tab::Favorites => {}
            }
        }
    }

    /// Fetch the next chronological page, one request per date.
    ///
    /// Dates that fail are left out; the cursor still advances by the full
    /// batch. Dates the archive does not hold (`NotFound`) never block
    /// paging. Only a batch with no record and at least one gateway failure
    /// is an error, and then neither the list nor the cursor change.
    /// Returns false when a feed page was already loading.
    pub async fn load_next_feed_page(&self) -> bool {
        let cursor = {
            let mut state = self.state.lock().await;
            if !state.begin(Tab::Feed) {
                return false;
            }
            state.cursor
        };

        let dates = generate_date_range((self.today)(), FEED_BATCH_SIZE, cursor);
        let gateway = self.gateway.clone();
        let shared = self.state.clone();

        let task = tokio::spawn(async move {
            let results = join_all(dates.iter().map(|date| gateway.fetch_by_date(*date))).await;

            let mut records = Vec::with_capacity(dates.len());
            let mut gateway_failed = false;
            for (date, result) in dates.iter().zip(results) {
                match result {
                    Ok(record) => records.push(record),
                    Err(ApiError::NotFound(msg)) => {
                        warn!("No picture for {} in feed page: {}", date, msg)
                    }
                    Err(e) => {
                        gateway_failed = true;
                        warn!("Skipping {} in feed page: {}", date, e);
                    }
                }
            }

            let mut state = shared.lock().await;
            if records.is_empty() && gateway_failed {
                state.fail(Tab::Feed, Request::FeedPage, FEED_ERROR);
            } else {
                info!(
                    "Feed page at offset {}: {}/{} dates loaded",
                    cursor,
                    records.len(),
                    dates.len()
                );
                state.feed.extend(records);
                state.cursor += FEED_BATCH_SIZE;
                state.succeed(Tab::Feed);
            }
        });

        self.settle(Tab::Feed, Request::FeedPage, FEED_ERROR, task).await;
        true
    }

    /// Append another random batch. Returns false when one was already loading.
    pub async fn load_random_batch(&self) -> bool {
        if !self.state.lock().await.begin(Tab::Random) {
            return false;
        }

        let gateway = self.gateway.clone();
        let shared = self.state.clone();
        let task = tokio::spawn(async move {
            let result = gateway.fetch_random_batch(RANDOM_BATCH_SIZE).await;

            let mut state = shared.lock().await;
            match result {
                Ok(records) => {
                    state.random.extend(records);
                    state.succeed(Tab::Random);
                }
                Err(e) => {
                    warn!("Random batch failed: {}", e);
                    state.fail(Tab::Random, Request::RandomBatch, RANDOM_ERROR);
                }
            }
        });

        self.settle(Tab::Random, Request::RandomBatch, RANDOM_ERROR, task)
            .await;
        true
    }

    /// Replace the search results. A blank query does nothing.
    ///
    /// The remembered query only changes together with the results.
    pub async fn search(&self, query: &str) -> bool {
        let query = query.trim().to_string();
        if query.is_empty() {
            return false;
        }
        if !self.state.lock().await.begin(Tab::Explore) {
            return false;
        }

        let request = Request::Search(query.clone());
        let gateway = self.gateway.clone();
        let shared = self.state.clone();
        let task = tokio::spawn(async move {
            let result = gateway.search_library(&query).await;

            let mut state = shared.lock().await;
            match result {
                Ok(records) => {
                    info!("Search {:?} returned {} records", query, records.len());
                    state.search = records;
                    state.query = Some(query);
                    state.succeed(Tab::Explore);
                }
                Err(e) => {
                    warn!("Search {:?} failed: {}", query, e);
                    state.fail(Tab::Explore, Request::Search(query), SEARCH_ERROR);
                }
            }
        });

        self.settle(Tab::Explore, request, SEARCH_ERROR, task).await;
        true
    }

    pub async fn clear_search(&self) {
        let mut state = self.state.lock().await;
        state.search.clear();
        state.query = None;
    }

    /// Look up the record of a single date from the explore tab.
    ///
    /// On failure the explore tab shows the origin's message.
    pub async fn lookup_date(&self, date: NaiveDate) -> ApiResult<Record> {
        if !self.state.lock().await.begin(Tab::Explore) {
            return Err(ApiError::InvalidInput(
                "Explore is still loading".to_string(),
            ));
        }

        let gateway = self.gateway.clone();
        let shared = self.state.clone();
        let task = tokio::spawn(async move {
            let result = gateway.fetch_by_date(date).await;

            let mut state = shared.lock().await;
            match &result {
                Ok(_) => state.succeed(Tab::Explore),
                Err(e) => {
                    warn!("Lookup of {} failed: {}", date, e);
                    state.fail(Tab::Explore, Request::Date(date), e.user_message());
                }
            }
            result
        });

        self.settle(Tab::Explore, Request::Date(date), LOOKUP_ERROR, task)
            .await
            .unwrap_or_else(|| Err(ApiError::Internal(LOOKUP_ERROR.to_string())))
    }

    /// Wait for a spawned load. A task that died before merging its result
    /// leaves `tab` in error rather than loading.
    async fn settle<T>(
        &self,
        tab: Tab,
        request: Request,
        message: &str,
        task: JoinHandle<T>,
    ) -> Option<T> {
        match task.await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{:?} load did not finish: {}", tab, e);
                self.state.lock().await.fail(tab, request, message);
                None
            }
        }
    }

    /// Clear the tab's error and replay the request that caused it.
    ///
    /// Returns the record when the replayed request was a date lookup.
    pub async fn retry(&self, tab: Tab) -> ApiResult<Option<Record>> {
        let request = {
            let mut state = self.state.lock().await;
            if state.status(tab).is_loading() {
                return Ok(None);
            }
            state.status.insert(tab, TabStatus::Idle);
            state.failed.remove(&tab)
        };

        match request {
            Some(Request::FeedPage) => {
                self.load_next_feed_page().await;
            }
            Some(Request::RandomBatch) => {
                self.load_random_batch().await;
            }
            Some(Request::Search(query)) => {
                self.search(&query).await;
            }
            Some(Request::Date(date)) => return self.lookup_date(date).await.map(Some),
            None => {}
        }
        Ok(None)
    }

    /// Request the next page of the active tab when the viewport nears the end.
    ///
    /// Explore and favorites never paginate.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> bool {
        if !metrics.near_bottom(SCROLL_THRESHOLD) {
            return false;
        }

        match self.active_tab().await {
            Tab::Feed => self.load_next_feed_page().await,
            Tab::Random => self.load_random_batch().await,
            Tab::Explore | Tab::Favorites => false,
        }
    }

    pub async fn view(&self, tab: Tab) -> TabView {
        let favorites = match tab {
            Tab::Favorites => Some(self.favorites.records().await),
            _ => None,
        };

        let state = self.state.lock().await;
        let status = state.status(tab);
        match tab {
            Tab::Feed => TabView {
                tab,
                status,
                entries: keyed(&state.feed),
                cursor: Some(state.cursor),
                page: Some(state.cursor / FEED_BATCH_SIZE + 1),
                query: None,
            },
            Tab::Random => TabView {
                tab,
                status,
                entries: keyed(&state.random),
                cursor: None,
                page: None,
                query: None,
            },
            Tab::Explore => TabView {
                tab,
                status,
                entries: keyed(&state.search),
                cursor: None,
                page: None,
                query: state.query.clone(),
            },
            Tab::Favorites => TabView {
                tab,
                status,
                entries: keyed(favorites.as_deref().unwrap_or_default()),
                cursor: None,
                page: None,
                query: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_record;
    use crate::repo::memory_repo;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Semaphore;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[derive(Default)]
    struct FakeGateway {
        missing: StdMutex<HashSet<NaiveDate>>,
        down: StdMutex<bool>,
        calls: AtomicUsize,
        random_calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeGateway {
        fn gated(gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        fn set_down(&self, down: bool) {
            *self.down.lock().unwrap() = down;
        }

        async fn wait(&self) {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
        }

        fn check(&self) -> ApiResult<()> {
            if *self.down.lock().unwrap() {
                return Err(ApiError::Upstream {
                    status: 503,
                    message: "down".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn fetch_by_date(&self, date: NaiveDate) -> ApiResult<Record> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.wait().await;
            self.check()?;
            if self.missing.lock().unwrap().contains(&date) {
                return Err(ApiError::NotFound(format!("No data available for date: {date}")));
            }
            Ok(sample_record(&date.to_string()))
        }

        async fn fetch_today(&self) -> ApiResult<Record> {
            self.fetch_by_date(day("2024-03-10")).await
        }

        async fn fetch_random_batch(&self, count: u32) -> ApiResult<Vec<Record>> {
            let n = self.random_calls.fetch_add(1, Ordering::SeqCst);
            self.wait().await;
            self.check()?;
            Ok((0..count)
                .map(|i| sample_record(&format!("2001-01-{:02}", (n as u32 * count + i) % 28 + 1)))
                .collect())
        }

        async fn search_library(&self, query: &str) -> ApiResult<Vec<Record>> {
            self.check()?;
            let mut record = sample_record("2012-08-06");
            record.title = query.to_string();
            Ok(vec![record])
        }
    }

    async fn service(gateway: Arc<FakeGateway>) -> GalleryService {
        let favorites = Arc::new(FavoritesStore::load(memory_repo().await).await);
        GalleryService::with_clock(gateway, favorites, Arc::new(|| day("2024-03-10")))
    }

    fn dates(view: &TabView) -> Vec<String> {
        view.entries.iter().map(|e| e.record.date.to_string()).collect()
    }

    #[tokio::test]
    async fn test_activate_feed_loads_first_page() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;

        svc.activate(Tab::Feed).await;
        let view = svc.view(Tab::Feed).await;

        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.entries[0].record.date, day("2024-03-10"));
        assert_eq!(view.entries[9].record.date, day("2024-03-01"));
        assert_eq!(view.cursor, Some(10));
        assert_eq!(view.page, Some(2));
        assert_eq!(view.status, TabStatus::Idle);

        // A non-empty feed is not reloaded on activation
        svc.activate(Tab::Feed).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_partial_batch_keeps_order_and_advances_cursor() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.missing.lock().unwrap().extend([
            day("2024-03-09"),
            day("2024-03-05"),
            day("2024-03-02"),
        ]);
        let svc = service(gateway).await;

        assert!(svc.load_next_feed_page().await);
        let view = svc.view(Tab::Feed).await;

        assert_eq!(
            dates(&view),
            vec![
                "2024-03-10", "2024-03-08", "2024-03-07", "2024-03-06", "2024-03-04",
                "2024-03-03", "2024-03-01",
            ]
        );
        assert_eq!(view.cursor, Some(10));
        assert_eq!(view.status, TabStatus::Idle);
    }

    #[tokio::test]
    async fn test_second_page_continues_from_cursor() {
        let svc = service(Arc::new(FakeGateway::default())).await;
        svc.load_next_feed_page().await;
        svc.load_next_feed_page().await;

        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.entries.len(), 20);
        assert_eq!(view.entries[10].record.date, day("2024-02-29"));
        assert_eq!(view.entries[19].record.date, day("2024-02-20"));
        assert_eq!(view.cursor, Some(20));
    }

    #[tokio::test]
    async fn test_total_feed_failure_sets_error_and_retry_replays() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.set_down(true);
        let svc = service(gateway.clone()).await;

        svc.load_next_feed_page().await;
        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.status, TabStatus::Error(FEED_ERROR.into()));
        assert!(view.entries.is_empty());
        assert_eq!(view.cursor, Some(0));

        // An errored tab is not reloaded just by activating it
        svc.activate(Tab::Feed).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 10);

        gateway.set_down(false);
        svc.retry(Tab::Feed).await.unwrap();
        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.status, TabStatus::Idle);
        assert_eq!(view.entries[0].record.date, day("2024-03-10"));
        assert_eq!(view.cursor, Some(10));
    }

    #[tokio::test]
    async fn test_feed_load_is_guarded_while_in_flight() {
        let gate = Arc::new(Semaphore::new(0));
        let gateway = Arc::new(FakeGateway::gated(gate.clone()));
        let svc = Arc::new(service(gateway.clone()).await);

        let first = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.load_next_feed_page().await })
        };
        while !svc.view(Tab::Feed).await.status.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(!svc.load_next_feed_page().await);
        let scroll = ScrollMetrics {
            scroll_top: 900.0,
            scroll_height: 1000.0,
            client_height: 100.0,
        };
        assert!(!svc.on_scroll(scroll).await);

        // Other tabs are not blocked by the feed
        svc.search("Mars").await;
        assert_eq!(svc.view(Tab::Explore).await.entries.len(), 1);

        gate.add_permits(100);
        assert!(first.await.unwrap());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 10);
        assert_eq!(svc.view(Tab::Feed).await.cursor, Some(10));
    }

    #[tokio::test]
    async fn test_abandoned_feed_load_still_lands() {
        let gate = Arc::new(Semaphore::new(0));
        let gateway = Arc::new(FakeGateway::gated(gate.clone()));
        let svc = Arc::new(service(gateway.clone()).await);

        let caller = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.load_next_feed_page().await })
        };
        while !svc.view(Tab::Feed).await.status.is_loading() {
            tokio::task::yield_now().await;
        }
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        gate.add_permits(100);
        while svc.view(Tab::Feed).await.status.is_loading() {
            tokio::task::yield_now().await;
        }
        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.status, TabStatus::Idle);
        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.cursor, Some(10));

        // The tab accepts the next page again
        assert!(svc.load_next_feed_page().await);
        assert_eq!(svc.view(Tab::Feed).await.cursor, Some(20));
    }

    #[tokio::test]
    async fn test_batch_of_unarchived_dates_advances_cursor() {
        let gateway = Arc::new(FakeGateway::default());
        gateway
            .missing
            .lock()
            .unwrap()
            .extend(generate_date_range(day("2024-03-10"), 10, 0));
        let svc = service(gateway).await;

        assert!(svc.load_next_feed_page().await);
        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.status, TabStatus::Idle);
        assert!(view.entries.is_empty());
        assert_eq!(view.cursor, Some(10));

        svc.load_next_feed_page().await;
        let view = svc.view(Tab::Feed).await;
        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.entries[0].record.date, day("2024-02-29"));
        assert_eq!(view.cursor, Some(20));
    }

    #[tokio::test]
    async fn test_random_tab_appends_batches() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;

        svc.activate(Tab::Random).await;
        assert_eq!(svc.view(Tab::Random).await.entries.len(), 10);

        let scroll = ScrollMetrics {
            scroll_top: 700.0,
            scroll_height: 1000.0,
            client_height: 100.0,
        };
        assert!(svc.on_scroll(scroll).await);
        let view = svc.view(Tab::Random).await;
        assert_eq!(view.entries.len(), 20);
        assert_eq!(gateway.random_calls.load(Ordering::SeqCst), 2);
        assert_eq!(svc.view(Tab::Feed).await.entries.len(), 0);
    }

    #[tokio::test]
    async fn test_random_failure_keeps_list() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;
        svc.load_random_batch().await;

        gateway.set_down(true);
        svc.load_random_batch().await;
        let view = svc.view(Tab::Random).await;
        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.status, TabStatus::Error(RANDOM_ERROR.into()));
    }

    #[tokio::test]
    async fn test_scroll_far_from_bottom_does_nothing() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;
        let scroll = ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 5000.0,
            client_height: 800.0,
        };
        assert!(!svc.on_scroll(scroll).await);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_explore_and_favorites_never_paginate() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;
        let scroll = ScrollMetrics {
            scroll_top: 1000.0,
            scroll_height: 1000.0,
            client_height: 100.0,
        };
        for tab in [Tab::Explore, Tab::Favorites] {
            svc.activate(tab).await;
            assert!(!svc.on_scroll(scroll).await);
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.random_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_replaces_results_and_blank_is_ignored() {
        let svc = service(Arc::new(FakeGateway::default())).await;

        assert!(!svc.search("   ").await);
        assert!(svc.search(" Mars ").await);
        assert!(svc.search("Apollo 11").await);

        let view = svc.view(Tab::Explore).await;
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].record.title, "Apollo 11");
        assert_eq!(view.query.as_deref(), Some("Apollo 11"));

        svc.clear_search().await;
        let view = svc.view(Tab::Explore).await;
        assert!(view.entries.is_empty());
        assert_eq!(view.query, None);
    }

    #[tokio::test]
    async fn test_search_failure_and_retry() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.set_down(true);
        let svc = service(gateway.clone()).await;

        svc.search("Mars").await;
        assert_eq!(
            svc.view(Tab::Explore).await.status,
            TabStatus::Error(SEARCH_ERROR.into())
        );

        gateway.set_down(false);
        svc.retry(Tab::Explore).await.unwrap();
        let view = svc.view(Tab::Explore).await;
        assert_eq!(view.status, TabStatus::Idle);
        assert_eq!(view.entries[0].record.title, "Mars");
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_query() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;
        svc.search("Mars").await;

        gateway.set_down(true);
        svc.search("Venus").await;
        let view = svc.view(Tab::Explore).await;
        assert_eq!(view.status, TabStatus::Error(SEARCH_ERROR.into()));
        assert_eq!(view.query.as_deref(), Some("Mars"));
        assert_eq!(view.entries[0].record.title, "Mars");

        gateway.set_down(false);
        svc.retry(Tab::Explore).await.unwrap();
        let view = svc.view(Tab::Explore).await;
        assert_eq!(view.query.as_deref(), Some("Venus"));
        assert_eq!(view.entries[0].record.title, "Venus");
    }

    #[tokio::test]
    async fn test_lookup_date_error_shows_origin_message() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.missing.lock().unwrap().insert(day("1990-01-01"));
        let svc = service(gateway.clone()).await;

        assert!(svc.lookup_date(day("1990-01-01")).await.is_err());
        assert_eq!(
            svc.view(Tab::Explore).await.status,
            TabStatus::Error("No data available for date: 1990-01-01".into())
        );

        gateway.missing.lock().unwrap().clear();
        let replayed = svc.retry(Tab::Explore).await.unwrap();
        assert_eq!(replayed.map(|r| r.date), Some(day("1990-01-01")));
        assert_eq!(svc.view(Tab::Explore).await.status, TabStatus::Idle);
    }

    #[tokio::test]
    async fn test_favorites_view_reads_store() {
        let favorites = Arc::new(FavoritesStore::load(memory_repo().await).await);
        favorites.toggle(sample_record("2024-01-01")).await.unwrap();
        favorites.toggle(sample_record("2024-02-01")).await.unwrap();
        let svc = GalleryService::new(Arc::new(FakeGateway::default()), favorites);

        let view = svc.view(Tab::Favorites).await;
        assert_eq!(dates(&view), vec!["2024-02-01", "2024-01-01"]);
        assert_eq!(view.entries[0].key, "2024-02-01-0");
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_noop() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = service(gateway.clone()).await;
        assert!(svc.retry(Tab::Random).await.unwrap().is_none());
        assert_eq!(gateway.random_calls.load(Ordering::SeqCst), 0);
    }
}
