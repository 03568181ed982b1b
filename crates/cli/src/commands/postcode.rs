use salonbook_core::config::{AppConfig, LoadOptions};
use salonbook_core::quote::area::{self, AreaResolution};
use serde::Serialize;

use crate::commands::{effective_pricing, CommandResult};

#[derive(Debug, Serialize)]
struct PostcodeReport {
    command: &'static str,
    status: &'static str,
    /// False when the district lands in an enquiry-only tier or is unknown.
    bookable: bool,
    area: AreaResolution,
}

pub fn run(postcode: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("postcode", "config_validation", error.to_string(), 2)
        }
    };
    let pricing = match effective_pricing(&config) {
        Ok(pricing) => pricing,
        Err(error) => {
            return CommandResult::failure("postcode", "pricing_rules", error.to_string(), 2)
        }
    };

    let area = area::resolve(postcode, &pricing);
    let report = PostcodeReport {
        command: "postcode",
        status: "ok",
        bookable: !area.tier.enquiry_only,
        area,
    };
    CommandResult {
        exit_code: 0,
        output: serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"postcode\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        }),
    }
}
