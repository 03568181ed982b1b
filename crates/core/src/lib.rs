pub mod catalogue;
pub mod config;
pub mod domain;
pub mod errors;
pub mod quote;
pub mod reference;
pub mod validate;

pub use catalogue::{AddOnOption, ServiceCatalogue, ServiceCategory, ServiceOption};
pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LimitsConfig, LoadOptions, LogFormat, NotifyConfig,
};
pub use domain::booking::{ClientSubmittedFigures, RawBookingRequest, ValidatedBooking};
pub use domain::enquiry::{EnquiryReason, RawEnquiryRequest, ValidatedEnquiry};
pub use errors::{QuoteError, ValidationIssue};
pub use quote::anomaly::FigureMismatch;
pub use quote::area::AreaResolution;
pub use quote::config::{DepositTrigger, PricingConfig, PricingConfigError, TravelTier};
pub use quote::deposit::DepositDecision;
pub use quote::pricing::{BreakdownItemKind, PriceBreakdown, PriceBreakdownItem};
pub use quote::QuoteOutcome;
pub use reference::ReferenceKind;
