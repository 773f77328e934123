use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn, Instrument, Span};
use uuid::Uuid;

use crate::applications::store::ApplicationStore;
use crate::errors::AppError;
use crate::import::decoder::{decode, DecodeError, RawRow};
use crate::import::dedup::Deduplicator;
use crate::import::models::{ImportOutcome, ImportSummary, NormalizedDraft};
use crate::import::normalize::normalize_row;
use crate::import::schema::{validate_header, SchemaError, IMPORT_COLUMNS};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("An import is already running for this user")]
    AlreadyRunning,

    #[error("Failed to load existing applications: {0}")]
    Snapshot(#[source] AppError),

    #[error("The import task stopped unexpectedly: {0}")]
    Interrupted(#[source] JoinError),
}

/// Rows that survived normalization and dedup, plus what was dropped on the way.
#[derive(Debug, Default)]
pub struct StagedBatch {
    pub drafts: Vec<NormalizedDraft>,
    pub skipped_duplicate: usize,
    pub skipped_incomplete: usize,
    pub dates_defaulted: usize,
}

/// Runs a CSV import end to end: decode, validate the header, stage rows,
/// then persist each staged draft independently.
#[derive(Clone)]
pub struct ImportCoordinator {
    store: Arc<dyn ApplicationStore>,
    concurrency: usize,
    running: Arc<Mutex<HashSet<Uuid>>>,
}

/// Releases the user's running slot when dropped.
struct RunGuard {
    running: Arc<Mutex<HashSet<Uuid>>>,
    user_id: Uuid,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}

impl ImportCoordinator {
    pub fn new(store: Arc<dyn ApplicationStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
            running: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub async fn run(&self, user_id: Uuid, csv_text: &str) -> Result<ImportSummary, ImportError> {
        self.run_at(user_id, csv_text, Utc::now().naive_utc().date())
            .await
    }

    /// Same as [`run`](Self::run) with an explicit fallback date for unreadable dates.
    ///
    /// The run is spawned onto the runtime and holds the user's slot until it
    /// finishes. Dropping the returned future detaches the run; every staged
    /// draft is still attempted.
    pub async fn run_at(
        &self,
        user_id: Uuid,
        csv_text: &str,
        today: NaiveDate,
    ) -> Result<ImportSummary, ImportError> {
        let guard = self.begin(user_id)?;
        let this = self.clone();
        let csv_text = csv_text.to_owned();

        let run = tokio::spawn(
            async move {
                let _guard = guard;
                this.execute(user_id, &csv_text, today).await
            }
            .instrument(Span::current()),
        );
        run.await.map_err(ImportError::Interrupted)?
    }

    async fn execute(
        &self,
        user_id: Uuid,
        csv_text: &str,
        today: NaiveDate,
    ) -> Result<ImportSummary, ImportError> {
        info!("Starting CSV import for user {user_id} ({} bytes)", csv_text.len());

        let decoded = match decode(csv_text) {
            Ok(decoded) => decoded,
            Err(DecodeError::NoDataRows) => {
                info!("CSV import for user {user_id} has no data rows");
                return Ok(ImportSummary::empty(ImportOutcome::NoDataRows));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = validate_header(&decoded.header, &IMPORT_COLUMNS) {
            warn!("Rejected CSV import for user {user_id}: {e}");
            return Err(e.into());
        }

        let existing = self
            .store
            .list_existing(user_id)
            .await
            .map_err(ImportError::Snapshot)?;
        let mut dedup = Deduplicator::seeded(&existing);
        debug!("Dedup set seeded with {} keys", dedup.len());

        let batch = stage_rows(&decoded.rows, &mut dedup, today);
        if batch.dates_defaulted > 0 {
            warn!(
                "{} row(s) had unreadable dates and were assigned {today}",
                batch.dates_defaulted
            );
        }

        if batch.drafts.is_empty() {
            info!(
                "CSV import for user {user_id}: no new entries ({} duplicate, {} incomplete)",
                batch.skipped_duplicate, batch.skipped_incomplete
            );
            return Ok(ImportSummary {
                staged: 0,
                succeeded: 0,
                failed: 0,
                skipped_duplicate: batch.skipped_duplicate,
                skipped_incomplete: batch.skipped_incomplete,
                dates_defaulted: batch.dates_defaulted,
                outcome: ImportOutcome::NoNewEntries,
            });
        }

        let staged = batch.drafts.len();
        let (succeeded, failed) = self.persist_all(user_id, batch.drafts).await;
        let summary = ImportSummary {
            staged,
            succeeded,
            failed,
            skipped_duplicate: batch.skipped_duplicate,
            skipped_incomplete: batch.skipped_incomplete,
            dates_defaulted: batch.dates_defaulted,
            outcome: ImportOutcome::classify(succeeded, failed),
        };

        info!(
            "CSV import for user {user_id} finished: {:?} ({} staged, {} saved, {} failed, {} duplicate)",
            summary.outcome, staged, succeeded, failed, summary.skipped_duplicate
        );
        Ok(summary)
    }

    fn begin(&self, user_id: Uuid) -> Result<RunGuard, ImportError> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(user_id) {
            return Err(ImportError::AlreadyRunning);
        }
        Ok(RunGuard {
            running: Arc::clone(&self.running),
            user_id,
        })
    }

    /// Saves every draft and waits for all of them. Returns (succeeded, failed).
    async fn persist_all(&self, user_id: Uuid, drafts: Vec<NormalizedDraft>) -> (usize, usize) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for draft in drafts {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(e.into()))?;
                store.create(user_id, &draft).await.map_err(|e| {
                    warn!(
                        "Failed to save imported application {} / {}: {e}",
                        draft.company_name, draft.position
                    );
                    e
                })
            });
        }

        // Single consumer of the results; the counters need no lock.
        let mut succeeded = 0;
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(_)) => succeeded += 1,
                Ok(Err(_)) => failed += 1,
                Err(e) => {
                    error!("Import persistence task aborted: {e}");
                    failed += 1;
                }
            }
        }
        (succeeded, failed)
    }
}

/// Normalizes, filters and dedups the data rows in file order.
pub fn stage_rows(rows: &[RawRow], dedup: &mut Deduplicator, today: NaiveDate) -> StagedBatch {
    let mut batch = StagedBatch::default();

    for row in rows {
        let draft = normalize_row(row, today);
        if !draft.is_complete() {
            batch.skipped_incomplete += 1;
            continue;
        }
        if !dedup.admit(&draft.company_name, &draft.position) {
            batch.skipped_duplicate += 1;
            continue;
        }
        if draft.date_defaulted {
            batch.dates_defaulted += 1;
        }
        batch.drafts.push(draft);
    }

    batch
}
