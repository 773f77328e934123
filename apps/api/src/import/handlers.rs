use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::import::models::ImportSummary;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    #[serde(flatten)]
    pub summary: ImportSummary,
    pub message: &'static str,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            message: summary.outcome.message(),
            summary,
        }
    }
}

/// POST /api/v1/applications/import
///
/// Expects a multipart body with the CSV in a field named `file`.
pub async fn handle_import(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let csv_text = read_csv_upload(&mut multipart).await?;
    let summary = state.importer.run(params.user_id, &csv_text).await?;
    Ok(Json(summary.into()))
}

async fn read_csv_upload(multipart: &mut Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        return String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("The CSV file must be UTF-8 encoded".to_string()));
    }
    Err(AppError::Validation(
        "Missing 'file' field in upload".to_string(),
    ))
}
