//! Itemized price computation.
//!
//! A pure function over the resolved input and the pricing config. Step order
//! is fixed; every pound of the final total is traceable to exactly one item,
//! and the minimum-charge floor closes the breakdown with an adjustment item
//! so the item sum always reconciles with the total.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalogue::ServiceCategory;

use super::config::PricingConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownItemKind {
    Service,
    Addon,
    Travel,
    Surcharge,
    Discount,
    Adjustment,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceBreakdownItem {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub kind: BreakdownItemKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub items: Vec<PriceBreakdownItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub minimum_charge_applied: bool,
    pub estimated_duration_minutes: u32,
}

/// A canonical extra line: an add-on or an additional client's service,
/// already re-resolved from the catalogue.
#[derive(Clone, Debug, PartialEq)]
pub struct PricedExtra {
    pub label: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// Everything the engine needs, fully resolved. No client-submitted money
/// survives into this struct.
#[derive(Clone, Debug, PartialEq)]
pub struct QuotePriceInput {
    pub service_label: String,
    pub service_price: Decimal,
    pub service_duration_minutes: u32,
    pub service_category: ServiceCategory,
    pub hair_length_eligible: bool,
    pub package_discount: Option<Decimal>,
    pub add_ons: Vec<PricedExtra>,
    pub additional_clients: Vec<PricedExtra>,
    pub hair_length_surcharge_requested: bool,
    pub same_day: bool,
    pub travel_fee: Decimal,
    pub travel_label: Option<String>,
}

pub fn compute_breakdown(input: &QuotePriceInput, config: &PricingConfig) -> PriceBreakdown {
    let mut items = Vec::new();
    let mut estimated_duration_minutes = input.service_duration_minutes;

    items.push(PriceBreakdownItem {
        label: input.service_label.clone(),
        amount: input.service_price,
        kind: BreakdownItemKind::Service,
    });

    for add_on in &input.add_ons {
        items.push(PriceBreakdownItem {
            label: add_on.label.clone(),
            amount: add_on.price,
            kind: BreakdownItemKind::Addon,
        });
        estimated_duration_minutes += add_on.duration_minutes;
    }

    for client in &input.additional_clients {
        items.push(PriceBreakdownItem {
            label: format!("Additional client: {}", client.label),
            amount: client.price,
            kind: BreakdownItemKind::Service,
        });
        estimated_duration_minutes += client.duration_minutes;
    }
    if config.group.enabled
        && !input.additional_clients.is_empty()
        && config.group.eligible_categories.contains(&input.service_category)
    {
        let discount =
            config.group.discount_per_client * Decimal::from(input.additional_clients.len() as u32);
        if discount > Decimal::ZERO {
            items.push(PriceBreakdownItem {
                label: "Group booking discount".to_string(),
                amount: -discount,
                kind: BreakdownItemKind::Discount,
            });
        }
    }

    if input.hair_length_surcharge_requested
        && input.hair_length_eligible
        && config.surcharges.hair_length_fee > Decimal::ZERO
    {
        items.push(PriceBreakdownItem {
            label: "Long hair surcharge".to_string(),
            amount: config.surcharges.hair_length_fee,
            kind: BreakdownItemKind::Surcharge,
        });
    }

    if config.surcharges.same_day_enabled && input.same_day && config.surcharges.same_day_fee > Decimal::ZERO
    {
        items.push(PriceBreakdownItem {
            label: "Same-day booking surcharge".to_string(),
            amount: config.surcharges.same_day_fee,
            kind: BreakdownItemKind::Surcharge,
        });
    }

    if input.travel_fee > Decimal::ZERO {
        let label = match &input.travel_label {
            Some(band) => format!("Travel fee ({band})"),
            None => "Travel fee".to_string(),
        };
        items.push(PriceBreakdownItem {
            label,
            amount: input.travel_fee,
            kind: BreakdownItemKind::Travel,
        });
    }

    if let Some(discount) = input.package_discount {
        if discount > Decimal::ZERO {
            items.push(PriceBreakdownItem {
                label: "Package discount".to_string(),
                amount: -discount,
                kind: BreakdownItemKind::Discount,
            });
        }
    }

    let subtotal: Decimal = items.iter().map(|item| item.amount).sum();
    let (total, minimum_charge_applied) = if subtotal < config.minimum_charge {
        let shortfall = config.minimum_charge - subtotal;
        items.push(PriceBreakdownItem {
            label: "Minimum charge adjustment".to_string(),
            amount: shortfall,
            kind: BreakdownItemKind::Adjustment,
        });
        (config.minimum_charge, true)
    } else {
        (subtotal, false)
    };

    PriceBreakdown { items, subtotal, total, minimum_charge_applied, estimated_duration_minutes }
}
