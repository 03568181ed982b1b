//! Service-area resolution: raw postcode → district → distance → travel tier.
//!
//! The distance table is approximate road mileage from the salon's base in
//! central Chester. Resolution never fails; anything it cannot place degrades
//! to the enquiry-only "beyond" tier with a zero fee, never to a free booking.

use rust_decimal::Decimal;
use serde::Serialize;

use super::config::{PricingConfig, TravelTier};

pub const BEYOND_TIER_LABEL: &str = "Outside standard service area";

/// Approximate miles from the base (CH1) per outward postcode district.
const DISTRICT_MILES: &[(&str, f64)] = &[
    ("CH1", 0.8),
    ("CH2", 1.6),
    ("CH3", 2.4),
    ("CH4", 3.1),
    ("CH5", 5.6),
    ("CH6", 8.7),
    ("CH7", 10.4),
    ("CH8", 13.2),
    ("CH41", 16.8),
    ("CH44", 17.9),
    ("CH60", 14.1),
    ("CH63", 15.3),
    ("CH64", 9.6),
    ("CH65", 7.8),
    ("CH66", 6.9),
    ("LL11", 10.8),
    ("LL12", 8.9),
    ("LL13", 11.6),
    ("LL14", 14.2),
    ("CW6", 12.4),
    ("CW7", 14.9),
    ("CW8", 16.2),
    ("CW9", 17.8),
    ("WA4", 17.2),
    ("WA6", 9.4),
    ("WA7", 12.7),
    ("SY14", 12.9),
    ("L1", 23.9),
    ("L24", 19.6),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedTier {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub enquiry_only: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaResolution {
    pub normalized_postcode: String,
    pub district: String,
    pub distance_miles: Option<f64>,
    pub tier: ResolvedTier,
}

pub fn resolve(raw_postcode: &str, config: &PricingConfig) -> AreaResolution {
    let normalized_postcode = normalize_postcode(raw_postcode);
    let district = extract_district(&normalized_postcode);
    let distance_miles = district_distance_miles(&district);
    let tier = resolve_tier(distance_miles, &config.travel_tiers);

    AreaResolution { normalized_postcode, district, distance_miles, tier }
}

/// Uppercase, trim, collapse internal whitespace to a single space.
pub fn normalize_postcode(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// UK outward code: one or two letters, one or two digits, an optional
/// trailing letter. Falls back to the first whitespace token when the leading
/// pattern does not match; the unknown district then resolves as beyond-tier.
fn extract_district(normalized: &str) -> String {
    let token = normalized.split_whitespace().next().unwrap_or("");
    let chars: Vec<char> = token.chars().collect();

    let mut index = 0;
    while index < chars.len() && index < 2 && chars[index].is_ascii_alphabetic() {
        index += 1;
    }
    let letter_count = index;
    if letter_count == 0 {
        return token.to_string();
    }

    let digit_start = index;
    while index < chars.len() && index - digit_start < 2 && chars[index].is_ascii_digit() {
        index += 1;
    }
    if index == digit_start {
        return token.to_string();
    }

    if index < chars.len() && chars[index].is_ascii_alphabetic() {
        index += 1;
    }

    chars[..index].iter().collect()
}

fn district_distance_miles(district: &str) -> Option<f64> {
    DISTRICT_MILES
        .iter()
        .find(|(known, _)| *known == district)
        .map(|(_, miles)| *miles)
}

fn resolve_tier(distance_miles: Option<f64>, tiers: &[TravelTier]) -> ResolvedTier {
    let Some(distance) = distance_miles else {
        return beyond_tier();
    };

    tiers
        .iter()
        .find(|tier| tier.contains(distance))
        .map(|tier| ResolvedTier {
            label: tier.label.clone(),
            fee: tier.fee,
            enquiry_only: tier.enquiry_only,
        })
        .unwrap_or_else(beyond_tier)
}

fn beyond_tier() -> ResolvedTier {
    ResolvedTier { label: BEYOND_TIER_LABEL.to_string(), fee: Decimal::ZERO, enquiry_only: true }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::quote::config::PricingConfig;

    use super::{extract_district, normalize_postcode, resolve, BEYOND_TIER_LABEL};

    #[test]
    fn normalization_uppercases_and_collapses_whitespace() {
        assert_eq!(normalize_postcode("  ch1   4ey "), "CH1 4EY");
        assert_eq!(normalize_postcode("ch664ab"), "CH664AB");
    }

    #[test]
    fn district_extraction_handles_outward_code_shapes() {
        assert_eq!(extract_district("CH1 4EY"), "CH1");
        assert_eq!(extract_district("CH66 9PQ"), "CH66");
        assert_eq!(extract_district("L1 8JQ"), "L1");
        assert_eq!(extract_district("SY14 7HT"), "SY14");
        assert_eq!(extract_district("EC1A 1BB"), "EC1A");
    }

    #[test]
    fn district_extraction_falls_back_to_first_token() {
        assert_eq!(extract_district("CHESTER CITY"), "CHESTER");
        assert_eq!(extract_district("12345"), "12345");
    }

    #[test]
    fn core_area_postcode_resolves_with_zero_fee() {
        let config = PricingConfig::default();
        let resolution = resolve("ch1 4ey", &config);

        assert_eq!(resolution.district, "CH1");
        assert_eq!(resolution.distance_miles, Some(0.8));
        assert_eq!(resolution.tier.fee, Decimal::ZERO);
        assert!(!resolution.tier.enquiry_only);
    }

    #[test]
    fn boundary_distance_lands_in_the_upper_tier() {
        let config = PricingConfig::default();
        // CH5 sits at 5.6 miles, inside [5, 8); the boundary itself belongs to
        // the upper tier because containment is half-open.
        let resolution = resolve("CH5 3DT", &config);
        assert_eq!(resolution.tier.fee, Decimal::from(5));

        let second = &config.travel_tiers[1];
        assert!(second.contains(5.0));
        assert!(!config.travel_tiers[0].contains(5.0));
    }

    #[test]
    fn unknown_district_degrades_to_enquiry_only() {
        let config = PricingConfig::default();
        let resolution = resolve("ZZ9 9ZZ", &config);

        assert_eq!(resolution.distance_miles, None);
        assert!(resolution.tier.enquiry_only);
        assert_eq!(resolution.tier.fee, Decimal::ZERO);
        assert_eq!(resolution.tier.label, BEYOND_TIER_LABEL);
    }

    #[test]
    fn distant_configured_tier_is_enquiry_only() {
        let config = PricingConfig::default();
        // CH44 (17.9 miles) sits inside the configured 16-25 mile tier.
        let resolution = resolve("CH44 5XB", &config);

        assert!(resolution.tier.enquiry_only);
        assert_eq!(resolution.tier.fee, Decimal::ZERO);
        assert_ne!(resolution.tier.label, BEYOND_TIER_LABEL);
    }

    #[test]
    fn liverpool_postcode_lands_past_the_last_tier() {
        let config = PricingConfig::default();
        let resolution = resolve("L1 8JQ", &config);

        assert!(resolution.tier.enquiry_only);
    }

    #[test]
    fn fee_never_decreases_with_distance() {
        let config = PricingConfig::default();
        let mut previous_fee = Decimal::ZERO;

        let mut distance = 0.0;
        while distance < 16.0 {
            let tier = config
                .travel_tiers
                .iter()
                .find(|tier| tier.contains(distance))
                .expect("bookable distances must be covered");
            assert!(tier.fee >= previous_fee, "fee decreased at {distance} miles");
            previous_fee = tier.fee;
            distance += 0.5;
        }
    }
}
