use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::applications::export::render_csv;
use crate::errors::AppError;
use crate::import::handlers::UserIdQuery;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    Ok(Json(state.store.list(params.user_id).await?))
}

/// GET /api/v1/applications/export
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list(params.user_id).await?;
    let body = render_csv(&rows)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=job_applications.csv",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::applications::store::{ApplicationStore, InMemoryApplicationStore};
    use crate::config::Config;
    use crate::import::coordinator::ImportCoordinator;
    use crate::import::models::ImportOutcome;
    use crate::routes::build_router;
    use crate::state::AppState;

    const CSV: &str = "Company Name,Position,Position Type,State,City,Date Applied,Work Mode,Application Status\n\
                       Acme,\"Engineer, Backend\",Full-time,CA,SF,Feb 13 2024,Remote,Recruiter call\n\
                       Globex,Analyst,Contract,NY,NYC,2024-01-05,Office,Offered";

    #[tokio::test]
    async fn test_export_reimports_as_duplicates() {
        let store: Arc<dyn ApplicationStore> = Arc::new(InMemoryApplicationStore::new());
        let importer = ImportCoordinator::new(Arc::clone(&store), 2);
        let state = AppState {
            store,
            importer: importer.clone(),
            config: Config::for_tests(),
        };
        let user = Uuid::new_v4();
        importer.run(user, CSV).await.unwrap();

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/applications/export?user_id={user}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/csv; charset=utf-8"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let exported = String::from_utf8(bytes.to_vec()).unwrap();
        let summary = importer.run(user, &exported).await.unwrap();
        assert_eq!(summary.outcome, ImportOutcome::NoNewEntries);
        assert_eq!(summary.skipped_duplicate, 2);
    }
}
