use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{authorize, AccessPolicy, ApiResponse, ApiResult};
use crate::services::{NotificationService, SweepKind};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SweepQuery {
    /// Run against the development project.
    pub test: bool,
}

async fn run(state: AppState, headers: HeaderMap, query: SweepQuery, kind: SweepKind) -> ApiResult {
    let db = authorize(&state.config, &headers, query.test, AccessPolicy::ServiceOrUserToken).await?;
    let summary = NotificationService::new(&db, &state.config, state.mailer.as_ref())
        .run(kind, chrono::Utc::now())
        .await;
    Ok(ApiResponse::created(summary.message()))
}

/// GET /notifications/actividades - Activity deadline pushes
pub async fn actividades(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SweepQuery>,
) -> ApiResult {
    run(state, headers, query, SweepKind::Actividades).await
}

/// GET /notifications/tramites - Procedure deadline pushes and overdue emails
pub async fn tramites(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SweepQuery>,
) -> ApiResult {
    run(state, headers, query, SweepKind::Tramites).await
}

/// GET /notifications/cajachica - Unliquidated petty cash reminders
pub async fn caja_chica(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SweepQuery>,
) -> ApiResult {
    run(state, headers, query, SweepKind::CajaChica).await
}

/// GET /notifications/factura - Unliquidated billable record reminders
pub async fn factura(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SweepQuery>,
) -> ApiResult {
    run(state, headers, query, SweepKind::Factura).await
}

/// GET /notifications/habilitantes - Permit expiry pushes
pub async fn habilitantes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SweepQuery>,
) -> ApiResult {
    run(state, headers, query, SweepKind::Habilitantes).await
}
