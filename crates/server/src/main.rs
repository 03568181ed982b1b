mod booking;
mod bootstrap;
mod enquiry;
mod health;
mod rate_limit;
mod responses;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::watch;
use tracing::{error, info, warn};

use salonbook_core::config::{AppConfig, LoadOptions};

use crate::bootstrap::AppState;

fn init_logging(config: &AppConfig) {
    use salonbook_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/booking", post(booking::submit_booking))
        .route("/enquiry", post(enquiry::submit_enquiry))
        .route("/health", get(health::health))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        notify_transport = app.state.notifier.transport_name(),
        "listening for booking and enquiry requests"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(err) => error!(
                event_name = "system.server.signal_error",
                correlation_id = "shutdown",
                error = %err,
                "could not listen for the shutdown signal"
            ),
        }
    });

    let mut drain_rx = shutdown_rx.clone();
    let mut signal_rx = shutdown_rx;
    let server = axum::serve(
        listener,
        router(app.state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = signal_rx.changed().await;
        info!(
            event_name = "system.server.stopping",
            correlation_id = "shutdown",
            "shutdown signal received, draining open connections"
        );
    });

    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = drain_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "open connections did not drain in time, exiting anyway"
            );
        }
    }

    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "salonbook-server stopped"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use salonbook_core::AppConfig;

    use crate::bootstrap::bootstrap_with_config;

    fn test_router() -> axum::Router {
        let app = bootstrap_with_config(AppConfig::default()).expect("bootstrap");
        super::router(app.state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
    }

    #[tokio::test]
    async fn health_route_is_wired() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn booking_route_round_trips_camel_case_json() {
        let payload = serde_json::json!({
            "serviceType": "haircut",
            "selectedOption": "wash-cut-finish",
            "serviceName": "Haircuts",
            "optionName": "Wash, Cut & Finish",
            "postcode": "CH1 4EY",
            "address": "12 Garden Lane, Chester",
            "selectedDate": "2026-09-01",
            "selectedTime": "10:00",
            "clientName": "Jane Doe",
            "clientEmail": "jane@example.com",
            "clientPhone": "07700900123",
            "isNewClient": false,
            "consentBoundaries": true,
            "consentCancellation": true,
            "consentWomenOnly": true
        });

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/booking")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(value["success"], true);
        assert!(value["bookingReference"].as_str().expect("reference").starts_with("CHS-"));
        assert_eq!(value["total"], 35.0);
        assert_eq!(value["depositRequired"], false);
    }

    #[tokio::test]
    async fn enquiry_route_round_trips_camel_case_json() {
        let payload = serde_json::json!({
            "postcode": "LL65 1AA",
            "clientName": "Alex Roe",
            "clientEmail": "alex@example.com",
            "clientPhone": "07700900456",
            "message": "Could you travel to Anglesey for a wedding party of five people?",
            "reason": "out-of-area"
        });

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/enquiry")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(value["success"], true);
        assert!(value["enquiryReference"].as_str().expect("reference").starts_with("ENQ-"));
    }
}
