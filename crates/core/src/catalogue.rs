//! Static service catalogue: the trusted source for prices and durations.
//!
//! Everything the website lets a client pick (main services, hourly occasion
//! work, packages, add-ons) resolves here by id before any money is computed.
//! Client-submitted prices are never used.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    Haircut,
    Colour,
    Styling,
    Treatment,
    Occasion,
}

impl ServiceCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "haircut" => Some(Self::Haircut),
            "colour" | "color" => Some(Self::Colour),
            "styling" => Some(Self::Styling),
            "treatment" => Some(Self::Treatment),
            "occasion" => Some(Self::Occasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Haircut => "haircut",
            Self::Colour => "colour",
            Self::Styling => "styling",
            Self::Treatment => "treatment",
            Self::Occasion => "occasion",
        }
    }

    /// Colour work triggers the colour arm of the deposit policy.
    pub fn is_colour(&self) -> bool {
        matches!(self, Self::Colour)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceOption {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    /// Canonical price in GBP. For time-based options this is the price at the
    /// minimum duration; billing always derives from `hourly_rate`.
    pub price: Decimal,
    pub duration_minutes: u32,
    pub time_based: bool,
    pub hourly_rate: Option<Decimal>,
    pub min_duration_minutes: Option<u32>,
    pub increment_minutes: Option<u32>,
    pub hair_length_surcharge_eligible: bool,
    /// Saving baked into a package offer, emitted as a negative breakdown item.
    pub package_discount: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AddOnOption {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

#[derive(Default)]
pub struct ServiceCatalogue {
    options: Vec<ServiceOption>,
    add_ons: Vec<AddOnOption>,
}

impl ServiceCatalogue {
    pub fn new(options: Vec<ServiceOption>, add_ons: Vec<AddOnOption>) -> Self {
        Self { options, add_ons }
    }

    /// The live salon offering. Prices reviewed seasonally; ids are stable
    /// because the website wizard embeds them.
    pub fn standard() -> Self {
        use ServiceCategory::{Colour, Haircut, Occasion, Styling, Treatment};

        let options = vec![
            fixed("dry-cut", "Dry Cut", Haircut, 2800, 30, false),
            fixed("wash-cut-finish", "Wash, Cut & Finish", Haircut, 3500, 45, false),
            fixed("restyle", "Restyle & Finish", Haircut, 4800, 60, false),
            fixed("gents-cut", "Gents Cut", Haircut, 2000, 30, false),
            fixed("child-cut", "Children's Cut (under 12)", Haircut, 1500, 20, false),
            fixed("root-tint", "Root Tint", Colour, 4500, 90, true),
            fixed("full-head-colour", "Full Head Colour", Colour, 6200, 120, true),
            fixed("half-head-highlights", "Half Head Highlights", Colour, 5800, 105, true),
            fixed("full-head-highlights", "Full Head Highlights", Colour, 7400, 135, true),
            fixed("toner-refresh", "Toner Refresh", Colour, 3000, 45, false),
            fixed("blow-dry", "Blow Dry", Styling, 2500, 40, true),
            fixed("occasion-updo", "Occasion Updo", Styling, 4500, 60, true),
            fixed("curls-waves", "Curls & Waves", Styling, 3000, 45, false),
            fixed("deep-condition", "Deep Conditioning Treatment", Treatment, 1800, 30, false),
            fixed("scalp-treatment", "Scalp Treatment", Treatment, 2200, 35, false),
            hourly("wedding-party", "Wedding Party Styling", Occasion, 4000, 120, 30),
            hourly("photo-shoot-styling", "Photo Shoot Styling", Occasion, 4200, 90, 30),
            package("pamper-package", "Pamper Package (Cut, Blow Dry & Treatment)", Styling, 7800, 100, 1000),
            package("colour-cut-package", "Colour & Cut Package", Colour, 9500, 150, 800),
        ];

        let add_ons = vec![
            add_on("olaplex", "Olaplex Bond Builder", 1500, 15),
            add_on("gloss-toner", "Gloss Toner", 1800, 20),
            add_on("conditioning-boost", "Conditioning Boost", 1000, 10),
            add_on("scalp-massage", "Scalp Massage", 800, 10),
            add_on("fringe-trim", "Fringe Trim", 500, 10),
        ];

        Self { options, add_ons }
    }

    pub fn find_option(&self, id: &str) -> Option<&ServiceOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn find_add_on(&self, id: &str) -> Option<&AddOnOption> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }

    pub fn options(&self) -> &[ServiceOption] {
        &self.options
    }

    pub fn add_ons(&self) -> &[AddOnOption] {
        &self.add_ons
    }

    /// Data problems that would surface as request-time internal errors.
    /// Checked by the doctor command and at server bootstrap.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (index, option) in self.options.iter().enumerate() {
            if self.options.iter().skip(index + 1).any(|other| other.id == option.id) {
                issues.push(format!("duplicate service option id `{}`", option.id));
            }
            if option.price < Decimal::ZERO {
                issues.push(format!("service option `{}` has a negative price", option.id));
            }
            if option.time_based {
                match option.hourly_rate {
                    Some(rate) if rate > Decimal::ZERO => {}
                    _ => issues.push(format!(
                        "service option `{}` is time-based but has no positive hourly rate",
                        option.id
                    )),
                }
                if option.min_duration_minutes.unwrap_or(0) == 0 {
                    issues.push(format!(
                        "service option `{}` is time-based but has no minimum duration",
                        option.id
                    ));
                }
            } else if option.duration_minutes == 0 {
                issues.push(format!("service option `{}` has zero duration", option.id));
            }
            if let Some(discount) = option.package_discount {
                if discount < Decimal::ZERO {
                    issues.push(format!("service option `{}` has a negative package discount", option.id));
                }
                if discount >= option.price {
                    issues.push(format!(
                        "service option `{}` package discount swallows its whole price",
                        option.id
                    ));
                }
            }
        }

        for (index, add_on) in self.add_ons.iter().enumerate() {
            if self.add_ons.iter().skip(index + 1).any(|other| other.id == add_on.id) {
                issues.push(format!("duplicate add-on id `{}`", add_on.id));
            }
            if add_on.price < Decimal::ZERO {
                issues.push(format!("add-on `{}` has a negative price", add_on.id));
            }
        }

        issues
    }
}

fn fixed(
    id: &str,
    name: &str,
    category: ServiceCategory,
    price_pence: i64,
    duration_minutes: u32,
    hair_length_surcharge_eligible: bool,
) -> ServiceOption {
    ServiceOption {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price: Decimal::new(price_pence, 2),
        duration_minutes,
        time_based: false,
        hourly_rate: None,
        min_duration_minutes: None,
        increment_minutes: None,
        hair_length_surcharge_eligible,
        package_discount: None,
    }
}

fn hourly(
    id: &str,
    name: &str,
    category: ServiceCategory,
    rate_pence: i64,
    min_duration_minutes: u32,
    increment_minutes: u32,
) -> ServiceOption {
    let rate = Decimal::new(rate_pence, 2);
    let minimum_price = rate * Decimal::from(min_duration_minutes) / Decimal::from(60);
    ServiceOption {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price: minimum_price,
        duration_minutes: min_duration_minutes,
        time_based: true,
        hourly_rate: Some(rate),
        min_duration_minutes: Some(min_duration_minutes),
        increment_minutes: Some(increment_minutes),
        hair_length_surcharge_eligible: false,
        package_discount: None,
    }
}

fn package(
    id: &str,
    name: &str,
    category: ServiceCategory,
    price_pence: i64,
    duration_minutes: u32,
    discount_pence: i64,
) -> ServiceOption {
    ServiceOption {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price: Decimal::new(price_pence, 2),
        duration_minutes,
        time_based: false,
        hourly_rate: None,
        min_duration_minutes: None,
        increment_minutes: None,
        hair_length_surcharge_eligible: matches!(category, ServiceCategory::Colour),
        package_discount: Some(Decimal::new(discount_pence, 2)),
    }
}

fn add_on(id: &str, name: &str, price_pence: i64, duration_minutes: u32) -> AddOnOption {
    AddOnOption {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::new(price_pence, 2),
        duration_minutes,
    }
}
