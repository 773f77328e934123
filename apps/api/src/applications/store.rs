//! Application persistence: pluggable, trait-based store behind the importer
//! and the read endpoints.
//!
//! Default: `PgApplicationStore` (PostgreSQL via sqlx).
//! `InMemoryApplicationStore` is used when no `DATABASE_URL` is configured.
//!
//! `AppState` holds an `Arc<dyn ApplicationStore>`, chosen at startup.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::import::dates::CANONICAL_DATE_FORMAT;
use crate::import::models::NormalizedDraft;
use crate::models::application::{ApplicationRow, ExistingApplication};

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Snapshot of what the user already tracks, for duplicate detection.
    async fn list_existing(&self, user_id: Uuid) -> Result<Vec<ExistingApplication>, AppError>;

    /// Persists one draft and returns the new application id.
    async fn create(&self, user_id: Uuid, draft: &NormalizedDraft) -> Result<Uuid, AppError>;

    /// All applications for a user, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError>;

    fn backend_name(&self) -> &'static str;
}

fn draft_to_row(id: Uuid, user_id: Uuid, draft: &NormalizedDraft) -> Result<ApplicationRow, AppError> {
    let date_applied = NaiveDate::parse_from_str(&draft.date_applied, CANONICAL_DATE_FORMAT)
        .with_context(|| format!("Draft carries a non-canonical date '{}'", draft.date_applied))?;

    Ok(ApplicationRow {
        id,
        user_id,
        company_name: draft.company_name.clone(),
        position: draft.position.clone(),
        job_type: draft.job_type.clone(),
        state: draft.location.state.clone(),
        city: draft.location.city.clone(),
        salary_min: draft.salary_range.min,
        salary_max: draft.salary_range.max,
        work_mode: draft.work_mode.as_str().to_string(),
        status: draft.status.as_str().to_string(),
        date_applied,
        follow_up_days: i32::try_from(draft.follow_up_days)
            .context("follow_up_days out of range")?,
        is_priority: draft.is_priority,
        notes: draft.notes.clone(),
        created_at: Utc::now(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn list_existing(&self, user_id: Uuid) -> Result<Vec<ExistingApplication>, AppError> {
        Ok(sqlx::query_as::<_, ExistingApplication>(
            "SELECT company_name, position FROM job_applications WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create(&self, user_id: Uuid, draft: &NormalizedDraft) -> Result<Uuid, AppError> {
        let row = draft_to_row(Uuid::new_v4(), user_id, draft)?;

        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, user_id, company_name, position, job_type, state, city,
                 salary_min, salary_max, work_mode, status, date_applied,
                 follow_up_days, is_priority, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.company_name)
        .bind(&row.position)
        .bind(&row.job_type)
        .bind(&row.state)
        .bind(&row.city)
        .bind(row.salary_min)
        .bind(row.salary_max)
        .bind(&row.work_mode)
        .bind(&row.status)
        .bind(row.date_applied)
        .bind(row.follow_up_days)
        .bind(row.is_priority)
        .bind(&row.notes)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Inserted application {} for user {user_id}", row.id);
        Ok(row.id)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryApplicationStore {
    rows: RwLock<HashMap<Uuid, Vec<ApplicationRow>>>,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn list_existing(&self, user_id: Uuid) -> Result<Vec<ExistingApplication>, AppError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .get(&user_id)
            .map(|apps| {
                apps.iter()
                    .map(|a| ExistingApplication {
                        company_name: a.company_name.clone(),
                        position: a.position.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, user_id: Uuid, draft: &NormalizedDraft) -> Result<Uuid, AppError> {
        let row = draft_to_row(Uuid::new_v4(), user_id, draft)?;
        let id = row.id;
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id)
            .or_default()
            .push(row);
        Ok(id)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut apps = rows.get(&user_id).cloned().unwrap_or_default();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apps)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::models::{ApplicationStatus, Location, SalaryRange, WorkMode};

    fn draft(company: &str, position: &str) -> NormalizedDraft {
        NormalizedDraft {
            company_name: company.to_string(),
            position: position.to_string(),
            job_type: "Full-time".to_string(),
            location: Location {
                state: "NY".to_string(),
                city: "New York".to_string(),
            },
            date_applied: "02/13/2024".to_string(),
            date_defaulted: false,
            work_mode: WorkMode::Onsite,
            status: ApplicationStatus::FinalRound,
            salary_range: SalaryRange::default(),
            notes: String::new(),
            follow_up_days: 7,
            is_priority: false,
        }
    }

    #[test]
    fn test_draft_to_row_maps_enums_and_date() {
        let row = draft_to_row(Uuid::new_v4(), Uuid::new_v4(), &draft("Acme", "SRE")).unwrap();
        assert_eq!(row.work_mode, "onsite");
        assert_eq!(row.status, "final_round");
        assert_eq!(row.date_applied, NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        assert_eq!(row.follow_up_days, 7);
    }

    #[test]
    fn test_draft_to_row_rejects_non_canonical_date() {
        let mut d = draft("Acme", "SRE");
        d.date_applied = "2024-02-13".to_string();
        assert!(draft_to_row(Uuid::new_v4(), Uuid::new_v4(), &d).is_err());
    }

    #[tokio::test]
    async fn test_memory_store_is_scoped_per_user() {
        let store = InMemoryApplicationStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.create(alice, &draft("Acme", "SRE")).await.unwrap();
        store.create(alice, &draft("Globex", "Analyst")).await.unwrap();
        store.create(bob, &draft("Initech", "Dev")).await.unwrap();

        let existing = store.list_existing(alice).await.unwrap();
        assert_eq!(existing.len(), 2);
        assert!(existing.iter().any(|e| e.company_name == "Globex"));
        assert_eq!(store.list(bob).await.unwrap().len(), 1);
        assert!(store.list(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
