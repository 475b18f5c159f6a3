use std::sync::Arc;

use axum::{
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::mail::Mailer;

/// Shared by every handler through `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Account and password flows
        .merge(auth_routes())
        .merge(password_routes())
        // Storage proxy
        .merge(files_routes())
        // Scheduled sweeps and ad-hoc email
        .merge(notification_routes())
        // Liquidation reports
        .merge(report_routes())
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/changePassword", put(auth::change_password))
        .route("/auth/forgotPassword", post(auth::forgot_password))
        .route("/auth/confirmForgotPassword", post(auth::confirm_forgot_password))
        .route("/auth/signUp", post(auth::sign_up))
        .route("/auth/changeUserEmail", put(auth::change_user_email))
}

fn password_routes() -> Router<AppState> {
    use handlers::auth;

    // Older deployments exposed the same flows under these paths
    Router::new()
        .route("/password/changePassword", put(auth::change_password))
        .route("/password/forgotPassword", post(auth::reset_password))
        .route("/changePassword", put(auth::change_password))
        .route("/signUp", post(auth::sign_up))
}

fn files_routes() -> Router<AppState> {
    use handlers::files;

    Router::new().route("/files/deleteFile", post(files::delete_file))
}

fn notification_routes() -> Router<AppState> {
    use handlers::notifications;

    Router::new()
        .route("/notifications/actividades", get(notifications::actividades))
        .route("/notifications/tramites", get(notifications::tramites))
        .route("/notifications/cajachica", get(notifications::caja_chica))
        .route("/notifications/factura", get(notifications::factura))
        .route("/notifications/habilitantes", get(notifications::habilitantes))
        .route("/notifications/customEmail", post(notifications::custom_email))
}

fn report_routes() -> Router<AppState> {
    use handlers::reports;

    Router::new()
        .route("/reportePDF/reportePDFRegFac", post(reports::billable))
        .route("/reportePDF/reportePDFCajaChicaInterna", post(reports::petty_cash_internal))
        .route("/reportePDF/reportePDFCajaChicaCliente", post(reports::petty_cash_client))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "AION API",
        "version": version,
        "description": "Account flows, file proxy, deadline notifications and liquidation reports",
        "endpoints": {
            "auth": "/auth/changePassword, /auth/forgotPassword, /auth/confirmForgotPassword, /auth/signUp, /auth/changeUserEmail",
            "password": "/password/changePassword, /password/forgotPassword (legacy)",
            "files": "/files/deleteFile",
            "notifications": "/notifications/{actividades,tramites,cajachica,factura,habilitantes,customEmail}",
            "reports": "/reportePDF/{reportePDFRegFac,reportePDFCajaChicaInterna,reportePDFCajaChicaCliente}",
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

/// Bind `0.0.0.0:{port}` and serve until the process stops.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    for warning in state.config.warnings() {
        tracing::warn!("{}", warning);
    }

    let bind_addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("AION API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
