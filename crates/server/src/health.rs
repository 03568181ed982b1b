use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub notify_transport: &'static str,
    pub pricing_version: String,
    pub checked_at: String,
}

/// Quoting is pure and in-process, so once the state is built there is
/// nothing left to degrade; the body reports how the instance is wired.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: "salonbook-server",
        version: env!("CARGO_PKG_VERSION"),
        notify_transport: state.notifier.transport_name(),
        pricing_version: state.pricing.version.clone(),
        checked_at: Utc::now().to_rfc3339(),
    })
}
