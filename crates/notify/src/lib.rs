//! Outbound email for accepted bookings and enquiries.
//!
//! Delivery is best-effort: the booking is already accepted by the time
//! anything here runs, so failures are reported and logged but never bubble
//! up as request errors.

pub mod message;
pub mod notifier;
pub mod transport;

pub use message::EmailMessage;
pub use notifier::{DeliveryReport, DeliveryStatus, Notifier, NotifySettings};
pub use transport::{EmailTransport, HttpEmailTransport, NoopEmailTransport, TransportError};
