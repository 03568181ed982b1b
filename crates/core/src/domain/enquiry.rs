//! Wire-level enquiry request types.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEnquiryRequest {
    /// Honeypot. Real clients never fill this in.
    pub website: Option<String>,
    pub service_type: Option<String>,
    pub service_name: Option<String>,
    pub postcode: Option<String>,
    pub address: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub message: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryReason {
    OutOfArea,
    General,
    CustomRequest,
}

impl EnquiryReason {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "out-of-area" => Some(Self::OutOfArea),
            "general" => Some(Self::General),
            "custom-request" => Some(Self::CustomRequest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfArea => "out-of-area",
            Self::General => "general",
            Self::CustomRequest => "custom-request",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedEnquiry {
    pub service_type: Option<String>,
    pub service_name: Option<String>,
    pub postcode: String,
    pub address: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub message: String,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub reason: EnquiryReason,
}
