// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP routes over the complaint store.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State as AxumState},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use rti_tracker::{Moment, StoredAttachment};
use rti_tracker_api::{
    AlertsResponse, ApiError, AttachDocumentResponse, BulkUpsertRequest, BulkUpsertResponse,
    ComplaintResponse, CreateComplaintRequest, DashboardResponse, FeedSyncRequest,
    FeedSyncResponse, HealthResponse, ListSyncRunsResponse, UpdateComplaintRequest,
    translate_domain_error,
};
use rti_tracker_domain::DomainError;
use rti_tracker_persistence::DEFAULT_SYNC_RUN_LIMIT;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::backends::ServerStore;

/// Largest accepted document upload.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The complaint store, remote and local collaborators included.
    pub store: Arc<Mutex<ServerStore>>,
    /// Source of the current instant.
    pub clock: fn() -> Result<Moment, DomainError>,
}

impl AppState {
    /// Wraps a store that reads the system clock.
    #[must_use]
    pub fn new(store: ServerStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            clock: Moment::now,
        }
    }

    fn now(&self) -> Result<Moment, HttpError> {
        (self.clock)().map_err(|e| HttpError::from(translate_domain_error(e)))
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound {
                ref resource_type, ..
            } => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("{resource_type} not found"),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Query parameters for `GET /api/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertsQuery {
    /// Maximum entries per alert list.
    pub limit: Option<usize>,
}

/// Query parameters for `GET /api/sync-runs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncRunsQuery {
    /// Maximum runs returned, newest first.
    pub limit: Option<i64>,
}

/// Query parameters for `POST /api/complaints/{id}/documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachQuery {
    /// File name shown for the document.
    pub name: Option<String>,
}

/// Handler for GET `/api/health`.
async fn handle_health(AxumState(app_state): AxumState<AppState>) -> Response {
    let mut store = app_state.store.lock().await;
    let response: HealthResponse = rti_tracker_api::health(store.remote_mut());
    let status: StatusCode = if response.ok {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response)).into_response()
}

/// Handler for GET `/api/complaints`.
async fn handle_list_complaints(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ComplaintResponse>>, HttpError> {
    let now: Moment = app_state.now()?;
    let store = app_state.store.lock().await;
    Ok(Json(rti_tracker_api::list_complaints(&store, now.today())))
}

/// Handler for POST `/api/complaints`.
///
/// A complaint whose portal and complaint id match an existing one updates
/// it in place.
async fn handle_create_complaint(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateComplaintRequest>,
) -> Result<Json<ComplaintResponse>, HttpError> {
    info!(
        portal = %req.portal_name,
        complaint_id = %req.complaint_id,
        "Handling create_complaint request"
    );

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    let response: ComplaintResponse = rti_tracker_api::create_complaint(&mut store, req, &now)?;
    Ok(Json(response))
}

/// Handler for PATCH `/api/complaints/{id}`.
async fn handle_update_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateComplaintRequest>,
) -> Result<Json<ComplaintResponse>, HttpError> {
    info!(id = %id, "Handling update_complaint request");

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    let response: ComplaintResponse =
        rti_tracker_api::update_complaint(&mut store, &id, req, &now)?;
    Ok(Json(response))
}

/// Handler for DELETE `/api/complaints/{id}`.
async fn handle_delete_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    info!(id = %id, "Handling delete_complaint request");

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    rti_tracker_api::delete_complaint(&mut store, &id, &now)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/api/complaints/bulk-upsert`.
async fn handle_bulk_upsert(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkUpsertRequest>,
) -> Result<Json<BulkUpsertResponse>, HttpError> {
    info!(count = req.complaints.len(), "Handling bulk_upsert request");

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    let response: BulkUpsertResponse = rti_tracker_api::bulk_upsert(&mut store, req, &now)?;
    Ok(Json(response))
}

/// Handler for POST `/api/complaints/sync`.
async fn handle_sync_feed(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<FeedSyncRequest>,
) -> Result<Json<FeedSyncResponse>, HttpError> {
    info!(
        count = req.feed.complaints.len(),
        force = req.force,
        "Handling sync_feed request"
    );

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    let response: FeedSyncResponse = rti_tracker_api::sync_feed(&mut store, req, &now)?;
    Ok(Json(response))
}

/// Handler for GET `/api/complaints/export.csv`.
async fn handle_export_csv(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let now: Moment = app_state.now()?;
    let store = app_state.store.lock().await;
    let csv: String = rti_tracker_api::export_csv(&store, now.today())?;

    let disposition: String = format!(
        "attachment; filename=\"complaints-{}.csv\"",
        now.date_string()
    );
    Ok((
        [
            (CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// Handler for POST `/api/complaints/{id}/documents`.
///
/// The request body is the raw document; its `Content-Type` header is kept
/// as the document's MIME type.
async fn handle_attach_document(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AttachQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AttachDocumentResponse>), HttpError> {
    let name: String = query.name.unwrap_or_else(|| String::from("document"));
    let mime_type: &str = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    info!(id = %id, name = %name, size = body.len(), "Handling attach_document request");

    let now: Moment = app_state.now()?;
    let mut store = app_state.store.lock().await;
    let response: AttachDocumentResponse =
        rti_tracker_api::attach_document(&mut store, &id, &name, mime_type, &body, &now)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/api/documents/{id}`.
async fn handle_read_document(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let store = app_state.store.lock().await;
    let stored: StoredAttachment = rti_tracker_api::read_document(&store, &id)?;

    let mut response: Response = stored.bytes.into_response();
    let headers: &mut HeaderMap = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&stored.meta.mime_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    let disposition: String = format!(
        "attachment; filename=\"{}\"",
        stored.meta.name.replace('"', "")
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

/// Handler for GET `/api/dashboard`.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let now: Moment = app_state.now()?;
    let store = app_state.store.lock().await;
    Ok(Json(rti_tracker_api::dashboard(&store, now.today())))
}

/// Handler for GET `/api/alerts`.
async fn handle_alerts(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<AlertsResponse>, HttpError> {
    let now: Moment = app_state.now()?;
    let store = app_state.store.lock().await;
    Ok(Json(rti_tracker_api::alerts(
        &store,
        now.today(),
        query.limit,
    )))
}

/// Handler for GET `/api/sync-runs`.
async fn handle_list_sync_runs(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<SyncRunsQuery>,
) -> Result<Json<ListSyncRunsResponse>, HttpError> {
    let limit: i64 = query.limit.unwrap_or(DEFAULT_SYNC_RUN_LIMIT);
    let mut store = app_state.store.lock().await;
    let response: ListSyncRunsResponse =
        rti_tracker_api::list_sync_runs(store.remote_mut(), limit)?;
    Ok(Json(response))
}

/// Builds the application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route(
            "/api/complaints",
            get(handle_list_complaints).post(handle_create_complaint),
        )
        .route("/api/complaints/bulk-upsert", post(handle_bulk_upsert))
        .route("/api/complaints/sync", post(handle_sync_feed))
        .route("/api/complaints/export.csv", get(handle_export_csv))
        .route(
            "/api/complaints/{id}",
            patch(handle_update_complaint).delete(handle_delete_complaint),
        )
        .route(
            "/api/complaints/{id}/documents",
            post(handle_attach_document).layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES)),
        )
        .route("/api/documents/{id}", get(handle_read_document))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/alerts", get(handle_alerts))
        .route("/api/sync-runs", get(handle_list_sync_runs))
        .with_state(app_state)
}
