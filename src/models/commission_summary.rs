//! Commission summary models.
//!
//! A [`CommissionSummary`] is always derived from a
//! [`DeliveryRecord`](super::DeliveryRecord) on demand and is never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::VehicleCategory;

/// Commission earned in a single vehicle category.
///
/// # Example
///
/// ```
/// use fleet_commission::models::{CategoryCommission, VehicleCategory};
/// use rust_decimal::Decimal;
///
/// let line = CategoryCommission {
///     category: VehicleCategory::Gky,
///     count: 4,
///     rate: Decimal::new(750, 2),
///     commission: Decimal::new(3000, 2),
/// };
/// assert_eq!(line.commission.to_string(), "30.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCommission {
    /// The vehicle category.
    pub category: VehicleCategory,
    /// Deliveries completed in this category.
    pub count: u32,
    /// Commission paid per delivery.
    pub rate: Decimal,
    /// `count * rate`, rounded to two decimal places.
    pub commission: Decimal,
}

/// Per-category and total commission for one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSummary {
    /// One line per known category, in category order.
    pub lines: Vec<CategoryCommission>,
    /// Sum of the rounded per-category commissions.
    pub total_commission: Decimal,
    /// Sum of all category counts.
    pub total_deliveries: u64,
}

impl CommissionSummary {
    /// Returns the line for a category, if present.
    pub fn line(&self, category: VehicleCategory) -> Option<&CategoryCommission> {
        self.lines.iter().find(|line| line.category == category)
    }

    /// Returns the commission for a category, zero if the category has no line.
    pub fn commission_for(&self, category: VehicleCategory) -> Decimal {
        self.line(category)
            .map(|line| line.commission)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the count for a category, zero if the category has no line.
    pub fn count_for(&self, category: VehicleCategory) -> u32 {
        self.line(category).map(|line| line.count).unwrap_or(0)
    }
}
