// handlers/reports/mod.rs - Liquidation report handlers
//
// Each route liquidates a set of records: it renders the PDF report,
// stores it, records the liquidation and answers 201 with a signed URL to
// the stored report.

use axum::{extract::State, http::HeaderMap};

use crate::app::AppState;
use crate::middleware::{authorize, AccessPolicy, ApiResponse, ApiResult, JsonBody};
use crate::services::{LiquidationRequest, LiquidationService};

/// POST /reportePDF/reportePDFRegFac - Liquidate billable hours of a case
pub async fn billable(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<LiquidationRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;
    let url = LiquidationService::new(&db, &state.config)
        .billable(&body, chrono::Utc::now())
        .await?;
    Ok(ApiResponse::created(url))
}

/// POST /reportePDF/reportePDFCajaChicaInterna - Settle a user's petty cash
pub async fn petty_cash_internal(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<LiquidationRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;
    let url = LiquidationService::new(&db, &state.config)
        .petty_cash_internal(&body, chrono::Utc::now())
        .await?;
    Ok(ApiResponse::created(url))
}

/// POST /reportePDF/reportePDFCajaChicaCliente - Bill settled petty cash to the client
pub async fn petty_cash_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<LiquidationRequest>,
) -> ApiResult {
    let db = authorize(&state.config, &headers, body.test, AccessPolicy::UserToken).await?;
    let url = LiquidationService::new(&db, &state.config)
        .petty_cash_client(&body, chrono::Utc::now())
        .await?;
    Ok(ApiResponse::created(url))
}
