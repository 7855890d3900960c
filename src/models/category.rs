//! Vehicle category codes.
//!
//! Every delivery is counted against exactly one vehicle category. The set of
//! categories is closed; each code maps to one commission rate in the
//! [`RateTable`](crate::calculation::RateTable).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A class of delivery vehicle, identified by a three-letter code.
///
/// The declaration order is the display order used by every per-category
/// listing.
///
/// # Example
///
/// ```
/// use fleet_commission::models::VehicleCategory;
///
/// let category: VehicleCategory = "GKY".parse().unwrap();
/// assert_eq!(category, VehicleCategory::Gky);
/// assert_eq!(category.code(), "GKY");
/// assert!("ZZZ".parse::<VehicleCategory>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleCategory {
    /// BKO trucks.
    Bko,
    /// PYW trucks.
    Pyw,
    /// NYC trucks.
    Nyc,
    /// GKY trucks.
    Gky,
    /// GSD trucks.
    Gsd,
    /// AUA trucks.
    Aua,
}

impl VehicleCategory {
    /// All known categories in display order.
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Bko,
        VehicleCategory::Pyw,
        VehicleCategory::Nyc,
        VehicleCategory::Gky,
        VehicleCategory::Gsd,
        VehicleCategory::Aua,
    ];

    /// Returns the upper-case code for this category.
    pub fn code(self) -> &'static str {
        match self {
            VehicleCategory::Bko => "BKO",
            VehicleCategory::Pyw => "PYW",
            VehicleCategory::Nyc => "NYC",
            VehicleCategory::Gky => "GKY",
            VehicleCategory::Gsd => "GSD",
            VehicleCategory::Aua => "AUA",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VehicleCategory {
    type Err = LedgerError;

    /// Parses an exact upper-case code. Codes are case-sensitive.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        VehicleCategory::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or_else(|| LedgerError::UnknownCategory {
                code: code.to_string(),
            })
    }
}
