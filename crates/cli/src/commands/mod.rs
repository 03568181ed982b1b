pub mod config;
pub mod doctor;
pub mod postcode;
pub mod quote;

use salonbook_core::config::AppConfig;
use salonbook_core::quote::config::{PricingConfig, PricingConfigError};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// The ruleset the server would run with: the configured TOML file when one
/// is set, otherwise the built-in defaults.
pub(crate) fn effective_pricing(config: &AppConfig) -> Result<PricingConfig, PricingConfigError> {
    match &config.pricing.config_path {
        Some(path) => PricingConfig::from_path(path),
        None => Ok(PricingConfig::default()),
    }
}
