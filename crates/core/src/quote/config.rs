//! Versioned pricing rules.
//!
//! One immutable value loaded at startup (code defaults, optionally replaced
//! field-by-field from a TOML file) and passed by reference into the engines.
//! Nothing here mutates at request time, so quoting stays a pure function of
//! the request and this config.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalogue::ServiceCategory;

// ---------------------------------------------------------------------------
// Configuration value
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Bumped whenever the business changes rates; logged with every quote.
    pub version: String,
    pub minimum_charge: Decimal,
    pub booking_minimums: BookingMinimums,
    pub travel_tiers: Vec<TravelTier>,
    pub surcharges: SurchargeConfig,
    pub group: GroupBookingConfig,
    pub deposit: DepositConfig,
}

/// Shortest booking accepted, with a longer floor once travel gets far enough
/// that a tiny appointment is not worth the round trip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingMinimums {
    pub standard_minutes: u32,
    pub distant_minutes: u32,
    pub distant_from_miles: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelTier {
    pub min_miles: f64,
    pub max_miles: f64,
    pub fee: Decimal,
    pub label: String,
    #[serde(default)]
    pub enquiry_only: bool,
}

impl TravelTier {
    /// Half-open containment: `min_miles <= distance < max_miles`.
    pub fn contains(&self, distance_miles: f64) -> bool {
        distance_miles >= self.min_miles && distance_miles < self.max_miles
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurchargeConfig {
    pub hair_length_fee: Decimal,
    pub same_day_enabled: bool,
    pub same_day_fee: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupBookingConfig {
    pub enabled: bool,
    pub discount_per_client: Decimal,
    pub eligible_categories: Vec<ServiceCategory>,
    pub max_additional_clients: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    pub enabled: bool,
    pub trigger: DepositTrigger,
    pub amount: DepositAmountRule,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositTrigger {
    All,
    NewClient,
    Colour,
    NewClientOrColour,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum DepositAmountRule {
    /// Flat deposit in GBP.
    Fixed(Decimal),
    /// Percentage of the post-floor total, rounded to whole pounds.
    Percentage(Decimal),
}

// ---------------------------------------------------------------------------
// Defaults (the live ruleset)
// ---------------------------------------------------------------------------

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            version: "2025.1".to_string(),
            minimum_charge: Decimal::from(30),
            booking_minimums: BookingMinimums::default(),
            travel_tiers: vec![
                tier(0.0, 5.0, 0, "Local (up to 5 miles)", false),
                tier(5.0, 8.0, 5, "5-8 miles", false),
                tier(8.0, 12.0, 8, "8-12 miles", false),
                tier(12.0, 16.0, 12, "12-16 miles", false),
                tier(16.0, 25.0, 0, "16-25 miles (enquiry only)", true),
            ],
            surcharges: SurchargeConfig::default(),
            group: GroupBookingConfig::default(),
            deposit: DepositConfig::default(),
        }
    }
}

impl Default for BookingMinimums {
    fn default() -> Self {
        Self { standard_minutes: 30, distant_minutes: 60, distant_from_miles: 8.0 }
    }
}

impl Default for SurchargeConfig {
    fn default() -> Self {
        Self {
            hair_length_fee: Decimal::from(10),
            same_day_enabled: true,
            same_day_fee: Decimal::from(15),
        }
    }
}

impl Default for GroupBookingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            discount_per_client: Decimal::from(5),
            eligible_categories: vec![
                ServiceCategory::Haircut,
                ServiceCategory::Styling,
                ServiceCategory::Occasion,
            ],
            max_additional_clients: 4,
        }
    }
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger: DepositTrigger::NewClientOrColour,
            amount: DepositAmountRule::Percentage(Decimal::from(20)),
        }
    }
}

fn tier(min_miles: f64, max_miles: f64, fee_pounds: i64, label: &str, enquiry_only: bool) -> TravelTier {
    TravelTier {
        min_miles,
        max_miles,
        fee: Decimal::from(fee_pounds),
        label: label.to_string(),
        enquiry_only,
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PricingConfigError {
    #[error("could not read pricing config `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse pricing config `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("pricing config validation failed: {0}")]
    Validation(String),
}

impl PricingConfig {
    pub fn from_path(path: &Path) -> Result<Self, PricingConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| PricingConfigError::ReadFile { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|source| PricingConfigError::ParseFile { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PricingConfigError> {
        if self.minimum_charge <= Decimal::ZERO {
            return Err(validation("minimum_charge must be greater than zero"));
        }

        let minimums = &self.booking_minimums;
        if minimums.standard_minutes == 0 {
            return Err(validation("booking_minimums.standard_minutes must be greater than zero"));
        }
        if minimums.distant_minutes < minimums.standard_minutes {
            return Err(validation(
                "booking_minimums.distant_minutes must be at least the standard minimum",
            ));
        }
        if minimums.distant_from_miles <= 0.0 {
            return Err(validation("booking_minimums.distant_from_miles must be greater than zero"));
        }

        validate_tiers(&self.travel_tiers)?;

        if self.surcharges.hair_length_fee < Decimal::ZERO {
            return Err(validation("surcharges.hair_length_fee must not be negative"));
        }
        if self.surcharges.same_day_fee < Decimal::ZERO {
            return Err(validation("surcharges.same_day_fee must not be negative"));
        }

        if self.group.enabled {
            if self.group.discount_per_client < Decimal::ZERO {
                return Err(validation("group.discount_per_client must not be negative"));
            }
            if self.group.eligible_categories.is_empty() {
                return Err(validation(
                    "group.eligible_categories must not be empty while group bookings are enabled",
                ));
            }
            if self.group.max_additional_clients == 0 {
                return Err(validation("group.max_additional_clients must be at least 1"));
            }
        }

        match self.deposit.amount {
            DepositAmountRule::Fixed(value) if value < Decimal::ZERO => {
                return Err(validation("deposit.amount must not be negative"));
            }
            DepositAmountRule::Percentage(value)
                if value <= Decimal::ZERO || value > Decimal::from(100) =>
            {
                return Err(validation("deposit.amount percentage must be within (0, 100]"));
            }
            _ => {}
        }

        Ok(())
    }
}

fn validate_tiers(tiers: &[TravelTier]) -> Result<(), PricingConfigError> {
    let Some(first) = tiers.first() else {
        return Err(validation("travel_tiers must contain at least one tier"));
    };
    if first.min_miles != 0.0 {
        return Err(validation("the first travel tier must start at 0 miles"));
    }

    let mut previous_fee = Decimal::ZERO;
    let mut seen_enquiry_only = false;
    for (index, tier) in tiers.iter().enumerate() {
        if tier.max_miles <= tier.min_miles {
            return Err(validation(format!(
                "travel tier {index} has an empty range [{}, {})",
                tier.min_miles, tier.max_miles
            )));
        }
        if index > 0 && tiers[index - 1].max_miles != tier.min_miles {
            return Err(validation(format!(
                "travel tiers must be contiguous: tier {index} starts at {} but the previous ends at {}",
                tier.min_miles,
                tiers[index - 1].max_miles
            )));
        }
        if tier.fee < Decimal::ZERO {
            return Err(validation(format!("travel tier {index} has a negative fee")));
        }

        if tier.enquiry_only {
            seen_enquiry_only = true;
            if tier.fee != Decimal::ZERO {
                return Err(validation(format!(
                    "travel tier {index} is enquiry-only and must carry a zero fee"
                )));
            }
        } else {
            if seen_enquiry_only {
                return Err(validation(
                    "bookable travel tiers must not follow an enquiry-only tier",
                ));
            }
            if tier.fee < previous_fee {
                return Err(validation(format!(
                    "travel fees must not decrease with distance (tier {index})"
                )));
            }
            previous_fee = tier.fee;
        }
    }

    Ok(())
}

fn validation(message: impl Into<String>) -> PricingConfigError {
    PricingConfigError::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{DepositAmountRule, PricingConfig, PricingConfigError};

    #[test]
    fn default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.version, "2025.1");
        assert_eq!(config.minimum_charge, Decimal::from(30));
    }

    #[test]
    fn tier_containment_is_half_open() {
        let config = PricingConfig::default();
        let second = &config.travel_tiers[1];

        assert!(second.contains(5.0));
        assert!(second.contains(7.99));
        assert!(!second.contains(8.0));
    }

    #[test]
    fn gap_between_tiers_fails_validation() {
        let mut config = PricingConfig::default();
        config.travel_tiers[1].min_miles = 6.0;

        let error = config.validate().unwrap_err();
        assert!(matches!(
            error,
            PricingConfigError::Validation(ref message) if message.contains("contiguous")
        ));
    }

    #[test]
    fn decreasing_fee_fails_validation() {
        let mut config = PricingConfig::default();
        config.travel_tiers[2].fee = Decimal::from(2);

        let error = config.validate().unwrap_err();
        assert!(matches!(
            error,
            PricingConfigError::Validation(ref message) if message.contains("decrease")
        ));
    }

    #[test]
    fn out_of_range_deposit_percentage_fails_validation() {
        let mut config = PricingConfig::default();
        config.deposit.amount = DepositAmountRule::Percentage(Decimal::from(150));

        let error = config.validate().unwrap_err();
        assert!(matches!(
            error,
            PricingConfigError::Validation(ref message) if message.contains("(0, 100]")
        ));
    }

    #[test]
    fn partial_toml_file_overrides_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("pricing.toml");
        fs::write(
            &path,
            r#"
version = "2025.2"
minimum_charge = 35.0

[deposit]
enabled = true
trigger = "all"
amount = { kind = "fixed", value = 15.0 }
"#,
        )
        .expect("write pricing file");

        let config = PricingConfig::from_path(&path).expect("load pricing config");

        assert_eq!(config.version, "2025.2");
        assert_eq!(config.minimum_charge, Decimal::from(35));
        assert_eq!(config.deposit.amount, DepositAmountRule::Fixed(Decimal::from(15)));
        // Untouched sections keep their defaults.
        assert_eq!(config.travel_tiers.len(), 5);
        assert_eq!(config.surcharges.same_day_fee, Decimal::from(15));
    }

    #[test]
    fn invalid_toml_file_reports_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("pricing.toml");
        fs::write(&path, "minimum_charge = [not valid").expect("write pricing file");

        let error = PricingConfig::from_path(&path).unwrap_err();
        assert!(matches!(error, PricingConfigError::ParseFile { .. }));
    }
}
