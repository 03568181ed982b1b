//! Best-effort delivery orchestration.
//!
//! `Notifier` never returns an error: a booking that priced and validated is
//! accepted whether or not the emails about it go out. Every send is bounded
//! by the configured timeout and its outcome lands in the [`DeliveryReport`]
//! so callers can log what actually happened.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use salonbook_core::{NotifyConfig, QuoteOutcome, ValidatedBooking, ValidatedEnquiry};

use crate::message::{
    business_booking_email, business_enquiry_email, customer_booking_confirmation,
    customer_enquiry_acknowledgement, EmailMessage,
};
use crate::transport::{EmailTransport, NoopEmailTransport};

/// Runtime delivery settings, distilled from [`NotifyConfig`].
#[derive(Clone, Debug)]
pub struct NotifySettings {
    pub business_address: String,
    pub send_customer_confirmation: bool,
    pub timeout: Duration,
}

impl From<&NotifyConfig> for NotifySettings {
    fn from(config: &NotifyConfig) -> Self {
        Self {
            business_address: config.business_address.clone(),
            send_customer_confirmation: config.send_customer_confirmation,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed(String),
    TimedOut,
}

/// Per-recipient outcome of one notification round. `customer` is `None`
/// when confirmations are turned off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    pub business: DeliveryStatus,
    pub customer: Option<DeliveryStatus>,
}

impl DeliveryReport {
    pub fn fully_sent(&self) -> bool {
        self.business == DeliveryStatus::Sent
            && self.customer.as_ref().map_or(true, |status| *status == DeliveryStatus::Sent)
    }
}

pub struct Notifier {
    transport: Arc<dyn EmailTransport>,
    settings: NotifySettings,
}

impl Notifier {
    pub fn new(transport: Arc<dyn EmailTransport>, settings: NotifySettings) -> Self {
        Self { transport, settings }
    }

    /// A notifier that drops everything, for disabled configurations.
    pub fn disabled(settings: NotifySettings) -> Self {
        Self::new(Arc::new(NoopEmailTransport), settings)
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Emails the stylist the job sheet, then optionally confirms to the
    /// client. Sends run sequentially; the business copy always goes first.
    pub async fn booking_received(
        &self,
        booking: &ValidatedBooking,
        outcome: &QuoteOutcome,
        reference: &str,
    ) -> DeliveryReport {
        let business = self
            .deliver(&business_booking_email(
                booking,
                outcome,
                reference,
                &self.settings.business_address,
            ))
            .await;

        let customer = if self.settings.send_customer_confirmation {
            Some(self.deliver(&customer_booking_confirmation(booking, outcome, reference)).await)
        } else {
            None
        };

        DeliveryReport { business, customer }
    }

    pub async fn enquiry_received(
        &self,
        enquiry: &ValidatedEnquiry,
        reference: &str,
    ) -> DeliveryReport {
        let business = self
            .deliver(&business_enquiry_email(enquiry, reference, &self.settings.business_address))
            .await;

        let customer = if self.settings.send_customer_confirmation {
            Some(self.deliver(&customer_enquiry_acknowledgement(enquiry, reference)).await)
        } else {
            None
        };

        DeliveryReport { business, customer }
    }

    async fn deliver(&self, message: &EmailMessage) -> DeliveryStatus {
        match tokio::time::timeout(self.settings.timeout, self.transport.send(message)).await {
            Ok(Ok(())) => DeliveryStatus::Sent,
            Ok(Err(error)) => {
                warn!(
                    transport = self.transport.name(),
                    to = %message.to,
                    %error,
                    "email delivery failed"
                );
                DeliveryStatus::Failed(error.to_string())
            }
            Err(_) => {
                warn!(
                    transport = self.transport.name(),
                    to = %message.to,
                    timeout_secs = self.settings.timeout.as_secs(),
                    "email delivery timed out"
                );
                DeliveryStatus::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use salonbook_core::quote::area::{AreaResolution, ResolvedTier};
    use salonbook_core::quote::deposit::DepositDecision;
    use salonbook_core::quote::pricing::{BreakdownItemKind, PriceBreakdown, PriceBreakdownItem};
    use salonbook_core::{
        ClientSubmittedFigures, EnquiryReason, NotifyConfig, QuoteOutcome, ValidatedBooking,
        ValidatedEnquiry,
    };

    use crate::message::EmailMessage;
    use crate::transport::{EmailTransport, TransportError};

    use super::{DeliveryStatus, Notifier, NotifySettings};

    fn booking() -> ValidatedBooking {
        ValidatedBooking {
            service_type: "haircut".to_string(),
            selected_option: "wash-cut-finish".to_string(),
            service_name: "Haircuts".to_string(),
            option_name: "Wash, Cut & Finish".to_string(),
            add_on_ids: Vec::new(),
            hair_length_surcharge: false,
            additional_client_service_ids: Vec::new(),
            time_based_hours: None,
            postcode: "CH1 4EY".to_string(),
            address: "12 Garden Lane, Chester".to_string(),
            selected_date: "2026-09-01".to_string(),
            selected_time: "10:00".to_string(),
            is_same_day: false,
            client_name: "Jane Doe".to_string(),
            client_email: "jane@example.com".to_string(),
            client_phone: "07700900123".to_string(),
            special_requests: None,
            is_new_client: false,
            client_figures: ClientSubmittedFigures::default(),
        }
    }

    fn outcome() -> QuoteOutcome {
        QuoteOutcome {
            area: AreaResolution {
                normalized_postcode: "CH1 4EY".to_string(),
                district: "CH1".to_string(),
                distance_miles: Some(0.8),
                tier: ResolvedTier {
                    label: "Local (up to 5 miles)".to_string(),
                    fee: Decimal::ZERO,
                    enquiry_only: false,
                },
            },
            breakdown: PriceBreakdown {
                items: vec![PriceBreakdownItem {
                    label: "Wash, Cut & Finish".to_string(),
                    amount: Decimal::from(35),
                    kind: BreakdownItemKind::Service,
                }],
                subtotal: Decimal::from(35),
                total: Decimal::from(35),
                minimum_charge_applied: false,
                estimated_duration_minutes: 45,
            },
            deposit: DepositDecision::not_required(),
            is_colour_service: false,
        }
    }

    fn enquiry() -> ValidatedEnquiry {
        ValidatedEnquiry {
            service_type: None,
            service_name: None,
            postcode: "LL65 1AA".to_string(),
            address: None,
            client_name: "Alex Roe".to_string(),
            client_email: "alex@example.com".to_string(),
            client_phone: "07700900456".to_string(),
            message: "Could you travel to Anglesey for a wedding party of five?".to_string(),
            preferred_date: None,
            preferred_time: None,
            reason: EnquiryReason::OutOfArea,
        }
    }

    fn settings(send_customer_confirmation: bool) -> NotifySettings {
        NotifySettings {
            business_address: "me@salon.example".to_string(),
            send_customer_confirmation,
            timeout: Duration::from_secs(5),
        }
    }

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

    struct FailingTransport;

    #[async_trait]
    impl EmailTransport for FailingTransport {
        async fn send(&self, _message: &EmailMessage) -> Result<(), TransportError> {
            Err(TransportError::Request("connection refused".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct SleepingTransport;

    #[async_trait]
    impl EmailTransport for SleepingTransport {
        async fn send(&self, _message: &EmailMessage) -> Result<(), TransportError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "sleeping"
        }
    }

    #[test]
    fn settings_derive_from_notify_config() {
        let config = NotifyConfig {
            enabled: true,
            api_base_url: Some("https://mail.example.com".to_string()),
            api_token: None,
            from_address: "bookings@salon.example".to_string(),
            business_address: "owner@salon.example".to_string(),
            send_customer_confirmation: false,
            timeout_secs: 3,
        };

        let settings = NotifySettings::from(&config);
        assert_eq!(settings.business_address, "owner@salon.example");
        assert!(!settings.send_customer_confirmation);
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn booking_emails_business_then_customer() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone(), settings(true));

        let report = notifier.booking_received(&booking(), &outcome(), "CHS-20260901-K3QX").await;

        assert!(report.fully_sent());
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "me@salon.example");
        assert_eq!(sent[1].to, "jane@example.com");
        assert!(sent[0].subject.contains("CHS-20260901-K3QX"));
        assert!(sent[1].text_body.contains("CHS-20260901-K3QX"));
    }

    #[tokio::test]
    async fn customer_confirmation_can_be_turned_off() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone(), settings(false));

        let report = notifier.booking_received(&booking(), &outcome(), "CHS-20260901-K3QX").await;

        assert_eq!(report.customer, None);
        assert!(report.fully_sent());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_not_raised() {
        let notifier = Notifier::new(Arc::new(FailingTransport), settings(false));

        let report = notifier.booking_received(&booking(), &outcome(), "CHS-20260901-K3QX").await;

        assert!(!report.fully_sent());
        match report.business {
            DeliveryStatus::Failed(reason) => assert!(reason.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_transport_hits_the_timeout() {
        let mut slow = settings(false);
        slow.timeout = Duration::from_millis(10);
        let notifier = Notifier::new(Arc::new(SleepingTransport), slow);

        let report = notifier.booking_received(&booking(), &outcome(), "CHS-20260901-K3QX").await;

        assert_eq!(report.business, DeliveryStatus::TimedOut);
        assert!(!report.fully_sent());
    }

    #[tokio::test]
    async fn enquiry_round_reaches_both_parties() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone(), settings(true));

        let report = notifier.enquiry_received(&enquiry(), "ENQ-20260901-P2QR").await;

        assert!(report.fully_sent());
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "me@salon.example");
        assert_eq!(sent[1].to, "alex@example.com");
        assert!(sent[0].text_body.contains("out-of-area"));
    }
}
