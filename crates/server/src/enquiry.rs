//! `POST /enquiry`: the catch-all contact form, including the redirect
//! target for out-of-area postcodes. Same guard order as the booking
//! endpoint; no pricing happens here.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use salonbook_core::domain::enquiry::RawEnquiryRequest;
use salonbook_core::reference::{self, ReferenceKind, SPAM_SENTINEL};
use salonbook_core::validate;

use crate::bootstrap::AppState;
use crate::rate_limit::client_ip;
use crate::responses::{ApiError, EnquiryResponse, ENQUIRY_RECEIVED_MESSAGE};

pub async fn submit_enquiry(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<RawEnquiryRequest>,
) -> Result<Json<EnquiryResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();
    let ip = client_ip(&headers, peer);

    if !state.rate_limiter.check(ip).await.is_allowed() {
        return Err(ApiError::rate_limited());
    }

    if validate::honeypot_tripped(&body.website) {
        info!(
            event_name = "enquiry.request.spam_blocked",
            correlation_id = %correlation_id,
            client_ip = %ip,
            "honeypot field was filled in, dropping the enquiry silently"
        );
        return Ok(Json(EnquiryResponse {
            success: true,
            enquiry_reference: SPAM_SENTINEL.to_string(),
            message: ENQUIRY_RECEIVED_MESSAGE.to_string(),
        }));
    }

    let enquiry = validate::validate_enquiry(&body).map_err(|issues| {
        info!(
            event_name = "enquiry.request.invalid",
            correlation_id = %correlation_id,
            issue_count = issues.len(),
            "enquiry request failed validation"
        );
        ApiError::validation(issues)
    })?;

    let enquiry_reference = reference::generate(ReferenceKind::Enquiry, Utc::now());

    info!(
        event_name = "enquiry.accepted",
        correlation_id = %correlation_id,
        reference = %enquiry_reference,
        reason = enquiry.reason.as_str(),
        "enquiry accepted"
    );

    let report = state.notifier.enquiry_received(&enquiry, &enquiry_reference).await;
    if !report.fully_sent() {
        warn!(
            event_name = "enquiry.notify.incomplete",
            correlation_id = %correlation_id,
            reference = %enquiry_reference,
            business = ?report.business,
            customer = ?report.customer,
            "enquiry accepted but notification delivery was incomplete"
        );
    }

    Ok(Json(EnquiryResponse {
        success: true,
        enquiry_reference,
        message: ENQUIRY_RECEIVED_MESSAGE.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::extract::{ConnectInfo, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::Json;

    use salonbook_core::catalogue::ServiceCatalogue;
    use salonbook_core::domain::enquiry::RawEnquiryRequest;
    use salonbook_core::quote::config::PricingConfig;
    use salonbook_core::reference::SPAM_SENTINEL;
    use salonbook_core::LimitsConfig;
    use salonbook_notify::{
        EmailMessage, EmailTransport, Notifier, NotifySettings, TransportError,
    };

    use crate::bootstrap::AppState;
    use crate::rate_limit::RateLimiter;
    use crate::responses::{ApiError, EnquiryResponse};

    use super::submit_enquiry;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn test_state(transport: Arc<RecordingTransport>) -> AppState {
        AppState {
            catalogue: Arc::new(ServiceCatalogue::standard()),
            pricing: Arc::new(PricingConfig::default()),
            rate_limiter: RateLimiter::new(&LimitsConfig {
                window_secs: 60,
                max_requests: 5,
                max_tracked_ips: 64,
            }),
            notifier: Arc::new(Notifier::new(
                transport,
                NotifySettings {
                    business_address: "owner@salon.example".to_string(),
                    send_customer_confirmation: true,
                    timeout: Duration::from_secs(5),
                },
            )),
        }
    }

    fn valid_payload() -> RawEnquiryRequest {
        RawEnquiryRequest {
            postcode: Some("LL65 1AA".to_string()),
            client_name: Some("Alex Roe".to_string()),
            client_email: Some("alex@example.com".to_string()),
            client_phone: Some("07700900456".to_string()),
            message: Some(
                "Could you travel to Anglesey for a wedding party of five people?".to_string(),
            ),
            reason: Some("out-of-area".to_string()),
            ..RawEnquiryRequest::default()
        }
    }

    async fn submit(
        state: AppState,
        payload: RawEnquiryRequest,
    ) -> Result<Json<EnquiryResponse>, (StatusCode, Json<ApiError>)> {
        submit_enquiry(
            State(state),
            ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))),
            HeaderMap::new(),
            Json(payload),
        )
        .await
    }

    #[tokio::test]
    async fn accepted_enquiry_notifies_both_parties() {
        let transport = Arc::new(RecordingTransport::default());
        let state = test_state(transport.clone());

        let response = submit(state, valid_payload()).await.expect("should succeed").0;

        assert!(response.success);
        assert!(response.enquiry_reference.starts_with("ENQ-"));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "owner@salon.example");
        assert_eq!(sent[1].to, "alex@example.com");
        assert!(sent[0].text_body.contains("out-of-area"));
    }

    #[tokio::test]
    async fn short_message_fails_validation() {
        let transport = Arc::new(RecordingTransport::default());
        let state = test_state(transport.clone());

        let mut payload = valid_payload();
        payload.message = Some("Help please".to_string());

        let (status, body) = submit(state, payload).await.expect_err("should fail");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body.0.details.as_ref().expect("details");
        assert!(details.iter().any(|issue| issue.field == "message"));
        assert_eq!(transport.sent.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_reason_fails_validation() {
        let transport = Arc::new(RecordingTransport::default());
        let state = test_state(transport);

        let mut payload = valid_payload();
        payload.reason = Some("pricing-complaint".to_string());

        let (status, body) = submit(state, payload).await.expect_err("should fail");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body.0.details.as_ref().expect("details");
        assert!(details.iter().any(|issue| issue.field == "reason"));
    }

    #[tokio::test]
    async fn honeypot_answers_success_without_forwarding_anything() {
        let transport = Arc::new(RecordingTransport::default());
        let state = test_state(transport.clone());

        let mut payload = valid_payload();
        payload.website = Some("https://spam.example".to_string());

        let response = submit(state, payload).await.expect("should look successful").0;

        assert!(response.success);
        assert_eq!(response.enquiry_reference, SPAM_SENTINEL);
        assert_eq!(transport.sent.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn enquiries_share_the_per_address_window() {
        let transport = Arc::new(RecordingTransport::default());
        let state = test_state(transport);

        for _ in 0..5 {
            submit(state.clone(), valid_payload()).await.expect("within the window");
        }

        let (status, _) = submit(state, valid_payload()).await.expect_err("should be limited");
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
