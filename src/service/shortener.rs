//! URL shortener service.
//!
//! Short codes come from an atomic store sequence. Once per process the
//! sequence is raised to at least `max(existing short) + 1`, so a fresh store
//! starts at 1 and a stale counter never hands out a stored code.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::ShortenerConfig;
use crate::domain::{ShortUrl, is_valid_url};
use crate::error::{AppError, Result, StorageError};
use crate::storage::DynStorage;

/// Attempts at inserting a freshly allocated code before giving up.
const MAX_ALLOCATION_ATTEMPTS: usize = 3;

/// Service for shortening and resolving URLs.
pub struct ShortenerService {
    /// Storage backend.
    storage: Arc<DynStorage>,
    /// Sequence that hands out codes.
    sequence_name: String,
    /// Set once the sequence is known to be ahead of every stored code.
    sequence_ready: OnceCell<()>,
}

impl ShortenerService {
    /// Create a new shortener service.
    pub fn new(storage: Arc<DynStorage>, config: &ShortenerConfig) -> Self {
        Self {
            storage,
            sequence_name: config.sequence_name.clone(),
            sequence_ready: OnceCell::new(),
        }
    }

    /// Shorten `url`, reusing the existing code if it was shortened before.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the URL fails the format check,
    /// `ShortCodeConflict` if allocated codes keep colliding with stored ones,
    /// or a storage error.
    pub async fn shorten(&self, url: &str) -> Result<ShortUrl> {
        if !is_valid_url(url) {
            debug!(url = %url, "Rejected invalid url");
            return Err(AppError::InvalidUrl);
        }

        if let Some(existing) = self.storage.find_url_by_original(url).await? {
            debug!(short = existing.short, "Url already shortened");
            return Ok(existing);
        }

        let mut last_code = 0;
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let record = ShortUrl::new(url, self.next_code().await?);
            last_code = record.short;

            match self.storage.insert_url(&record).await {
                Ok(()) => {
                    info!(short = record.short, original = %record.original, "Short url created");
                    metrics::counter!("shortener_urls_created_total").increment(1);
                    return Ok(record);
                }
                // An identical request won the race; hand back its record
                Err(StorageError::Duplicate {
                    field: "original", ..
                }) => {
                    return self
                        .storage
                        .find_url_by_original(url)
                        .await?
                        .ok_or_else(|| {
                            AppError::Internal(format!("url vanished after duplicate insert: {url}"))
                        });
                }
                Err(StorageError::Duplicate { field: "short", .. }) => {
                    warn!(short = record.short, "Allocated short code already stored");
                    metrics::counter!("shortener_code_conflicts_total").increment(1);
                }
                Err(e) => return Err(AppError::Storage(e)),
            }
        }

        Err(AppError::ShortCodeConflict(last_code))
    }

    /// Look up the URL behind a short code.
    ///
    /// # Errors
    ///
    /// Returns `ShortUrlNotFound` for an unassigned code, or a storage error.
    pub async fn resolve(&self, short: u64) -> Result<ShortUrl> {
        let found = self.storage.find_url_by_short(short).await?;

        metrics::counter!(
            "shortener_redirects_total",
            "result" => if found.is_some() { "hit" } else { "miss" }
        )
        .increment(1);

        found.ok_or(AppError::ShortUrlNotFound(short))
    }

    /// Allocate the next short code.
    async fn next_code(&self) -> Result<u64> {
        self.sequence_ready
            .get_or_try_init(|| async {
                let floor = self
                    .storage
                    .max_short()
                    .await?
                    .map_or(1, |max| max.saturating_add(1));
                let next = self.storage.advance_to(&self.sequence_name, floor).await?;
                debug!(sequence = %self.sequence_name, floor, next, "Short code sequence ready");
                Ok::<(), AppError>(())
            })
            .await?;

        Ok(self.storage.next_value(&self.sequence_name).await?)
    }
}
