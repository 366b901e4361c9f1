//! Pinned records, persisted to a single storage slot

use crate::domain::Record;
use crate::errors::{ApiError, ApiResult};
use crate::repo::SlotRepo;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub const FAVORITES_SLOT: &str = "cosmos_pins";

/// Favorites ordered newest-pinned first, keyed by date.
pub struct FavoritesStore {
    repo: SlotRepo,
    entries: Mutex<Vec<Record>>,
}

impl FavoritesStore {
    /// Load the persisted favorites. Never fails: unreadable or malformed
    /// storage yields an empty store.
    pub async fn load(repo: SlotRepo) -> Self {
        let entries = match repo.read(FAVORITES_SLOT).await {
            Ok(Some(raw)) => parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed favorites in storage: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read favorites, starting empty: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} favorites", entries.len());

        Self {
            repo,
            entries: Mutex::new(entries),
        }
    }

    /// Pin the record if its date is not pinned yet, unpin it otherwise.
    ///
    /// The new sequence is written before it becomes visible, so a storage
    /// failure leaves the favorites unchanged. Returns whether the record is
    /// now a favorite.
    pub async fn toggle(&self, record: Record) -> ApiResult<bool> {
        let mut entries = self.entries.lock().await;

        let pinned = !entries.iter().any(|f| f.date == record.date);
        let next: Vec<Record> = if pinned {
            std::iter::once(record)
                .chain(entries.iter().cloned())
                .collect()
        } else {
            entries
                .iter()
                .filter(|f| f.date != record.date)
                .cloned()
                .collect()
        };

        let raw = serde_json::to_string(&next)
            .map_err(|e| ApiError::Internal(format!("serialize favorites: {e}")))?;
        if let Err(e) = self.repo.write(FAVORITES_SLOT, &raw).await {
            error!("Failed to persist favorites: {}", e);
            return Err(e);
        }

        *entries = next;
        Ok(pinned)
    }

    pub async fn is_favorite(&self, date: NaiveDate) -> bool {
        self.entries.lock().await.iter().any(|f| f.date == date)
    }

    pub async fn records(&self) -> Vec<Record> {
        self.entries.lock().await.clone()
    }
}

fn parse(raw: &str) -> ApiResult<Vec<Record>> {
    Ok(serde_json::from_str(raw)?)
}
