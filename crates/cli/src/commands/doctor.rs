use salonbook_core::catalogue::ServiceCatalogue;
use salonbook_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::effective_pricing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_pricing_rules(&config));
            checks.push(check_catalogue_integrity());
            checks.push(check_notify_readiness(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "pricing_rules",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            // The catalogue is compiled in, so it can still be checked.
            checks.push(check_catalogue_integrity());
            checks.push(DoctorCheck {
                name: "notify_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_pricing_rules(config: &AppConfig) -> DoctorCheck {
    match effective_pricing(config) {
        Ok(pricing) => DoctorCheck {
            name: "pricing_rules",
            status: CheckStatus::Pass,
            details: format!(
                "version {} with {} travel tiers",
                pricing.version,
                pricing.travel_tiers.len()
            ),
        },
        Err(error) => DoctorCheck {
            name: "pricing_rules",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_catalogue_integrity() -> DoctorCheck {
    let catalogue = ServiceCatalogue::standard();
    let issues = catalogue.integrity_issues();

    if issues.is_empty() {
        DoctorCheck {
            name: "catalogue_integrity",
            status: CheckStatus::Pass,
            details: format!(
                "{} service options and {} add-ons are consistent",
                catalogue.options().len(),
                catalogue.add_ons().len()
            ),
        }
    } else {
        DoctorCheck {
            name: "catalogue_integrity",
            status: CheckStatus::Fail,
            details: issues.join("; "),
        }
    }
}

fn check_notify_readiness(config: &AppConfig) -> DoctorCheck {
    if !config.notify.enabled {
        return DoctorCheck {
            name: "notify_readiness",
            status: CheckStatus::Pass,
            details: "notify disabled, bookings are accepted without email".to_string(),
        };
    }

    DoctorCheck {
        name: "notify_readiness",
        status: CheckStatus::Pass,
        details: format!(
            "credentials validated by config contract, sending as {}",
            config.notify.from_address
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
