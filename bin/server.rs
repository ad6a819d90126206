// Recon Ledger - Web Server
// HTTP surface over the reconciliation core. Session identity is an
// explicit path segment; the core never infers it from ambient state.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use recon_ledger::{
    export_rows, new_session_id, options_query, reconcile_csv, rows_query, AllocationRecord,
    FilterCriteria, FilterOptions, SessionStore, VERSION,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<SessionStore>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, error: String) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
        }
    }
}

/// Reconcile response
#[derive(Serialize)]
struct ReconcileResponse {
    session_id: String,
    records: usize,
}

/// Row query response
#[derive(Serialize)]
struct RowsResponse {
    rows: Vec<AllocationRecord>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(format!("OK {}", VERSION)))
}

/// POST /api/sessions - Mint a fresh session id
///
/// Convenience for clients without their own identity scheme; every
/// other route takes the id explicitly in the path.
async fn create_session() -> impl IntoResponse {
    Json(ApiResponse::ok(new_session_id()))
}

/// POST /api/sessions/:sid/reconcile - Upload CSV bytes, build the ledger
///
/// A successful run replaces any previous ledger for the session whole.
/// Schema errors (missing required columns, unreadable CSV) fail the
/// call with 422 and leave the previous ledger untouched.
async fn reconcile_upload(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    match reconcile_csv(&body) {
        Ok(ledger) => {
            let records = ledger.len();
            state.store.put(&session_id, ledger);
            println!(
                "✓ Session {}: stored {} allocation records",
                session_id, records
            );
            (
                StatusCode::OK,
                Json(ApiResponse::ok(ReconcileResponse {
                    session_id,
                    records,
                })),
            )
        }
        Err(e) => {
            eprintln!("Error reconciling upload for {}: {}", session_id, e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::err(
                    ReconcileResponse {
                        session_id,
                        records: 0,
                    },
                    e.to_string(),
                )),
            )
        }
    }
}

/// POST /api/sessions/:sid/filter_options - Cascading option sets
///
/// An unknown session answers with empty lists, mirroring the core's
/// ledger-not-found semantics.
async fn filter_options(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    let options: FilterOptions = options_query(&state.store, &session_id, &criteria);
    Json(ApiResponse::ok(options))
}

/// POST /api/sessions/:sid/show_results - Filtered row view
async fn show_results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    let rows = rows_query(&state.store, &session_id, &criteria);
    Json(ApiResponse::ok(RowsResponse { rows }))
}

/// GET /api/sessions/:sid/download_filtered - CSV of the filtered view
async fn download_filtered(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(criteria): Query<FilterCriteria>,
) -> impl IntoResponse {
    let rows = rows_query(&state.store, &session_id, &criteria);
    csv_attachment(&rows, "reconciliation_filtered.csv")
}

/// GET /api/sessions/:sid/download_complete - CSV of the whole ledger
async fn download_complete(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let rows = rows_query(&state.store, &session_id, &FilterCriteria::default());
    csv_attachment(&rows, "reconciliation_complete.csv")
}

fn csv_attachment(rows: &[AllocationRecord], filename: &str) -> axum::response::Response {
    match export_rows(rows) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            eprintln!("Error exporting csv: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "export failed").into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Recon Ledger - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Create shared state (ledgers live in memory for the process life)
    let state = AppState {
        store: Arc::new(SessionStore::new()),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/sessions", post(create_session))
        .route("/sessions/:sid/reconcile", post(reconcile_upload))
        .route("/sessions/:sid/filter_options", post(filter_options))
        .route("/sessions/:sid/show_results", post(show_results))
        .route("/sessions/:sid/download_filtered", get(download_filtered))
        .route("/sessions/:sid/download_complete", get(download_complete))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Health: http://localhost:3000/api/health");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
