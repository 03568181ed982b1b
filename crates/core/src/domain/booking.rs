//! Wire-level booking request types.
//!
//! `RawBookingRequest` mirrors the website's JSON body exactly, with every
//! field optional so one missing key never aborts deserialization; the
//! validator reports per-field issues instead. Client-submitted money is kept
//! only inside `ClientSubmittedFigures` for anomaly diffing and never feeds
//! the price computation.

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBookingRequest {
    /// Honeypot. Real clients never fill this in.
    pub website: Option<String>,
    pub service_type: Option<String>,
    pub selected_option: Option<String>,
    pub service_name: Option<String>,
    pub option_name: Option<String>,
    pub add_ons: Vec<RawAddOn>,
    pub hair_length_surcharge: Option<bool>,
    pub additional_clients: Vec<RawAdditionalClient>,
    pub time_based_selection: Option<RawTimeBasedSelection>,
    pub postcode: Option<String>,
    pub address: Option<String>,
    pub travel_fee: Option<Decimal>,
    pub selected_date: Option<String>,
    pub selected_time: Option<String>,
    pub is_same_day: Option<bool>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub special_requests: Option<String>,
    pub is_new_client: Option<bool>,
    pub consent_boundaries: Option<bool>,
    pub consent_cancellation: Option<bool>,
    pub consent_women_only: Option<bool>,
    pub total: Option<Decimal>,
    pub deposit_required: Option<bool>,
    pub deposit_amount: Option<Decimal>,
    pub estimated_duration: Option<Decimal>,
    pub is_colour_service: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAddOn {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub duration: Option<Decimal>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAdditionalClient {
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    pub price: Option<Decimal>,
    pub duration: Option<Decimal>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTimeBasedSelection {
    pub hours: Option<Decimal>,
    pub price: Option<Decimal>,
}

/// A booking that passed schema validation. Ids still need catalogue
/// resolution; strings are trimmed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedBooking {
    pub service_type: String,
    pub selected_option: String,
    pub service_name: String,
    pub option_name: String,
    pub add_on_ids: Vec<String>,
    pub hair_length_surcharge: bool,
    pub additional_client_service_ids: Vec<String>,
    pub time_based_hours: Option<Decimal>,
    pub postcode: String,
    pub address: String,
    pub selected_date: String,
    pub selected_time: String,
    pub is_same_day: bool,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub special_requests: Option<String>,
    pub is_new_client: bool,
    pub client_figures: ClientSubmittedFigures,
}

/// Figures the client sent along. Recomputed server-side, never trusted;
/// retained only so divergences can be logged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientSubmittedFigures {
    pub total: Option<Decimal>,
    pub deposit_required: Option<bool>,
    pub deposit_amount: Option<Decimal>,
    pub travel_fee: Option<Decimal>,
    pub estimated_duration: Option<Decimal>,
    pub is_colour_service: Option<bool>,
}
