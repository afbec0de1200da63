use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetUnitId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Furnishing {
    Full,
    Semi,
    None,
}

/// Operator-entered description of the space being let out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseSpaceForm {
    pub floor_number: i32,
    pub total_floors: i32,
    pub carpet_area: Option<Decimal>,
    pub furnishing: Furnishing,
}

/// Commercial terms for the listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTermForm {
    pub expected_rent: Decimal,
    pub security_deposit: Decimal,
    pub available_from: DateTime<Utc>,
    pub minimum_lease_months: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaseValidationFailure {
    FloorAboveTotal { floor_number: i32, total_floors: i32 },
    NegativeArea { carpet_area: Decimal },
    NonPositiveRent { expected_rent: Decimal },
    NegativeDeposit { security_deposit: Decimal },
    ZeroLeasePeriod,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaseValidation {
    pub failures: Vec<LeaseValidationFailure>,
}

impl LeaseValidation {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Client-side gate: invalid forms never reach the network.
pub fn validate_lease(space: &LeaseSpaceForm, term: &LeaseTermForm) -> LeaseValidation {
    let mut failures = Vec::new();

    if space.floor_number > space.total_floors {
        failures.push(LeaseValidationFailure::FloorAboveTotal {
            floor_number: space.floor_number,
            total_floors: space.total_floors,
        });
    }
    if let Some(carpet_area) = space.carpet_area {
        if carpet_area.is_sign_negative() {
            failures.push(LeaseValidationFailure::NegativeArea { carpet_area });
        }
    }
    if term.expected_rent <= Decimal::ZERO {
        failures.push(LeaseValidationFailure::NonPositiveRent {
            expected_rent: term.expected_rent,
        });
    }
    if term.security_deposit.is_sign_negative() {
        failures.push(LeaseValidationFailure::NegativeDeposit {
            security_deposit: term.security_deposit,
        });
    }
    if term.minimum_lease_months == 0 {
        failures.push(LeaseValidationFailure::ZeroLeasePeriod);
    }

    LeaseValidation { failures }
}
