use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub position: String,
    pub job_type: String,
    pub state: String,
    pub city: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub work_mode: String,
    pub status: String,
    pub date_applied: NaiveDate,
    pub follow_up_days: i32,
    pub is_priority: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// The two fields the importer needs to detect duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ExistingApplication {
    pub company_name: String,
    pub position: String,
}
