//! Deposit policy: a pure predicate plus a bounded amount.
//!
//! Amounts are computed against the post-floor total, so a percentage deposit
//! is always a fraction of what the client will actually pay.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::config::{DepositAmountRule, DepositConfig, DepositTrigger};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DepositDecision {
    pub required: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl DepositDecision {
    pub fn not_required() -> Self {
        Self { required: false, amount: Decimal::ZERO }
    }
}

pub fn decide(
    total: Decimal,
    is_new_client: bool,
    is_colour_service: bool,
    config: &DepositConfig,
) -> DepositDecision {
    if !config.enabled {
        return DepositDecision::not_required();
    }

    let triggered = match config.trigger {
        DepositTrigger::All => true,
        DepositTrigger::NewClient => is_new_client,
        DepositTrigger::Colour => is_colour_service,
        DepositTrigger::NewClientOrColour => is_new_client || is_colour_service,
    };
    if !triggered {
        return DepositDecision::not_required();
    }

    let raw_amount = match config.amount {
        DepositAmountRule::Fixed(value) => value,
        DepositAmountRule::Percentage(percentage) => (total * percentage / Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
    };

    let amount = raw_amount.max(Decimal::ZERO).min(total);
    DepositDecision { required: true, amount }
}
