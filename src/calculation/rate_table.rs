//! Commission rate lookup.
//!
//! This module provides the [`RateTable`], an immutable mapping from vehicle
//! category to the commission paid per delivery.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::RatesConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::VehicleCategory;

/// Immutable per-category commission rates.
///
/// # Examples
///
/// ```
/// use fleet_commission::calculation::RateTable;
/// use fleet_commission::models::VehicleCategory;
/// use rust_decimal::Decimal;
///
/// let table = RateTable::reference();
/// assert_eq!(table.rate_for(VehicleCategory::Gky).unwrap(), Decimal::new(750, 2));
/// assert!(table.rate_for_code("ZZZ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    name: String,
    version: String,
    rates: BTreeMap<VehicleCategory, Decimal>,
}

impl RateTable {
    /// The reference rate schedule.
    pub fn reference() -> Self {
        let rates = [
            (VehicleCategory::Bko, Decimal::new(350, 2)),
            (VehicleCategory::Pyw, Decimal::new(350, 2)),
            (VehicleCategory::Nyc, Decimal::new(350, 2)),
            (VehicleCategory::Gky, Decimal::new(750, 2)),
            (VehicleCategory::Gsd, Decimal::new(750, 2)),
            (VehicleCategory::Aua, Decimal::new(1000, 2)),
        ];

        Self {
            name: "Reference fleet commission".to_string(),
            version: "reference".to_string(),
            rates: rates.into_iter().collect(),
        }
    }

    /// Builds a rate table from configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a code is not a known category, a known
    /// category has no rate, or a rate is negative.
    pub fn from_config(config: &RatesConfig) -> LedgerResult<Self> {
        let mut rates = BTreeMap::new();

        for (code, &rate) in &config.rates {
            let category: VehicleCategory =
                code.parse().map_err(|_| LedgerError::InvalidConfig {
                    message: format!("unknown vehicle category '{}' in rate table", code),
                })?;

            if rate < Decimal::ZERO {
                return Err(LedgerError::InvalidConfig {
                    message: format!("rate for '{}' must not be negative, got {}", code, rate),
                });
            }

            rates.insert(category, rate);
        }

        let missing: Vec<&str> = VehicleCategory::ALL
            .into_iter()
            .filter(|category| !rates.contains_key(category))
            .map(VehicleCategory::code)
            .collect();
        if !missing.is_empty() {
            return Err(LedgerError::InvalidConfig {
                message: format!("missing rate for categories: {}", missing.join(", ")),
            });
        }

        Ok(Self {
            name: config.name.clone(),
            version: config.version.clone(),
            rates,
        })
    }

    /// Returns the commission per delivery for a category.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if the table has no rate for the category.
    pub fn rate_for(&self, category: VehicleCategory) -> LedgerResult<Decimal> {
        self.rates
            .get(&category)
            .copied()
            .ok_or_else(|| LedgerError::UnknownCategory {
                code: category.code().to_string(),
            })
    }

    /// Parses a category code and returns its rate.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if the code is not a known category.
    pub fn rate_for_code(&self, code: &str) -> LedgerResult<Decimal> {
        self.rate_for(code.parse()?)
    }

    /// Iterates over (category, rate) pairs in category order.
    pub fn rates(&self) -> impl Iterator<Item = (VehicleCategory, Decimal)> + '_ {
        self.rates.iter().map(|(&category, &rate)| (category, rate))
    }

    /// Name of the rate schedule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version label of the rate schedule.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::reference()
    }
}
