//! The open record and its on-demand summary

use crate::clients::SummaryProvider;
use crate::domain::Record;
use crate::errors::{ApiError, ApiResult};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

pub const SILENT_SUMMARY: &str = "The stars are silent today. Try again later.";
pub const UNREACHABLE_SUMMARY: &str = "Unable to connect to the cosmic archives at this time.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum SummaryState {
    Absent,
    Pending,
    Ready(String),
}

/// Rendering snapshot of the detail overlay
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub record: Record,
    pub display_url: String,
    pub high_res_url: String,
    pub summary: SummaryState,
}

struct Selection {
    record: Record,
    summary: SummaryState,
    // Bumped on every open so a summary for a closed view is dropped
    generation: u64,
}

#[derive(Default)]
struct DetailState {
    current: Option<Selection>,
    opened: u64,
}

pub struct DetailService {
    provider: Arc<dyn SummaryProvider>,
    state: Arc<Mutex<DetailState>>,
}

impl DetailService {
    pub fn new(provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(DetailState::default())),
        }
    }

    /// Open `record`, replacing any open record and its summary
    pub async fn open(&self, record: Record) -> DetailView {
        let mut state = self.state.lock().await;
        state.opened += 1;
        let selection = Selection {
            record,
            summary: SummaryState::Absent,
            generation: state.opened,
        };
        let view = snapshot(&selection);
        state.current = Some(selection);
        view
    }

    pub async fn close(&self) {
        self.state.lock().await.current = None;
    }

    pub async fn current(&self) -> Option<DetailView> {
        self.state.lock().await.current.as_ref().map(snapshot)
    }

    /// Summary of the open record, generated at most once per open.
    ///
    /// A cached or pending summary is returned as is. Provider failures are
    /// never surfaced; they become a fixed fallback text. The provider call
    /// runs in its own task so a dropped caller cannot strand `Pending`.
    pub async fn request_summary(&self) -> ApiResult<SummaryState> {
        let (record, generation) = {
            let mut state = self.state.lock().await;
            let Some(selection) = state.current.as_mut() else {
                return Err(ApiError::InvalidInput("No record is open".to_string()));
            };
            if selection.summary != SummaryState::Absent {
                return Ok(selection.summary.clone());
            }
            selection.summary = SummaryState::Pending;
            (selection.record.clone(), selection.generation)
        };

        let provider = self.provider.clone();
        let shared = self.state.clone();
        let task = tokio::spawn(async move {
            let text = match provider.summarize(&record).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => SILENT_SUMMARY.to_string(),
                Err(e) => {
                    warn!("Summary for {} failed: {}", record.date, e);
                    UNREACHABLE_SUMMARY.to_string()
                }
            };

            let ready = SummaryState::Ready(text);
            if let Some(selection) = shared.lock().await.current_at(generation) {
                selection.summary = ready.clone();
            }
            ready
        });

        match task.await {
            Ok(ready) => Ok(ready),
            Err(e) => {
                warn!("Summary task did not finish: {}", e);
                if let Some(selection) = self.state.lock().await.current_at(generation) {
                    selection.summary = SummaryState::Absent;
                }
                Ok(SummaryState::Ready(UNREACHABLE_SUMMARY.to_string()))
            }
        }
    }
}

impl DetailState {
    /// The open selection, if it is still the one from `generation`
    fn current_at(&mut self, generation: u64) -> Option<&mut Selection> {
        self.current
            .as_mut()
            .filter(|s| s.generation == generation)
    }
}

fn snapshot(selection: &Selection) -> DetailView {
    DetailView {
        display_url: selection.record.display_url(),
        high_res_url: selection.record.high_res_url().to_string(),
        record: selection.record.clone(),
        summary: selection.summary.clone(),
    }
}
