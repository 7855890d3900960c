//! Commission calculation functionality.
//!
//! This module turns a [`DeliveryRecord`] into a [`CommissionSummary`] and
//! validates count updates before they are applied to a record. Every function
//! here is pure: nothing is mutated in place and identical inputs always give
//! identical outputs.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CategoryCommission, CommissionSummary, DeliveryRecord, VehicleCategory};

use super::RateTable;

/// Number of decimal places commission amounts are carried at.
pub const COMMISSION_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount to two decimal places, half away from zero.
///
/// The result always carries exactly two decimal places, so zero renders as
/// `0.00`.
///
/// # Examples
///
/// ```
/// use fleet_commission::calculation::round_commission;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rounded = round_commission(Decimal::from_str("2.345").unwrap());
/// assert_eq!(rounded.to_string(), "2.35");
/// assert_eq!(round_commission(Decimal::ZERO).to_string(), "0.00");
/// ```
pub fn round_commission(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(COMMISSION_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(COMMISSION_DECIMAL_PLACES);
    rounded
}

/// Computes per-category and total commission for a delivery record.
///
/// Every known category gets a line, absent categories counting as zero.
/// Per-category commission is `count * rate` rounded with
/// [`round_commission`]; the total is the sum of the rounded lines. Total
/// deliveries is the plain integer sum of the counts.
///
/// # Errors
///
/// Returns `UnknownCategory` if the rate table has no rate for a category.
///
/// # Examples
///
/// ```
/// use fleet_commission::calculation::{summarize, RateTable};
/// use fleet_commission::models::{DeliveryRecord, VehicleCategory};
///
/// let record = DeliveryRecord::from_counts([
///     (VehicleCategory::Bko, 10),
///     (VehicleCategory::Aua, 2),
/// ]);
/// let summary = summarize(&record, &RateTable::reference()).unwrap();
///
/// assert_eq!(summary.commission_for(VehicleCategory::Bko).to_string(), "35.00");
/// assert_eq!(summary.commission_for(VehicleCategory::Aua).to_string(), "20.00");
/// assert_eq!(summary.total_commission.to_string(), "55.00");
/// assert_eq!(summary.total_deliveries, 12);
/// ```
pub fn summarize(record: &DeliveryRecord, rates: &RateTable) -> LedgerResult<CommissionSummary> {
    let lines = record
        .counts()
        .map(|(category, count)| {
            let rate = rates.rate_for(category)?;
            Ok(CategoryCommission {
                category,
                count,
                rate,
                commission: round_commission(Decimal::from(count) * rate),
            })
        })
        .collect::<LedgerResult<Vec<_>>>()?;

    let total_commission = round_commission(lines.iter().map(|line| line.commission).sum());

    Ok(CommissionSummary {
        lines,
        total_commission,
        total_deliveries: record.total_deliveries(),
    })
}

/// Sets the count for one category, returning the updated record.
///
/// This is a set, not an increment: `new_count` replaces whatever was stored
/// for `category`. Other categories are untouched and the input record is not
/// modified.
///
/// # Errors
///
/// Returns `InvalidCount` if `new_count` is negative or larger than `u32::MAX`.
///
/// # Examples
///
/// ```
/// use fleet_commission::calculation::apply_delta;
/// use fleet_commission::models::{DeliveryRecord, VehicleCategory};
///
/// let record = DeliveryRecord::from_counts([(VehicleCategory::Gky, 9)]);
/// let updated = apply_delta(&record, VehicleCategory::Gky, 4).unwrap();
/// assert_eq!(updated.count(VehicleCategory::Gky), 4);
///
/// assert!(apply_delta(&record, VehicleCategory::Bko, -1).is_err());
/// ```
pub fn apply_delta(
    record: &DeliveryRecord,
    category: VehicleCategory,
    new_count: i64,
) -> LedgerResult<DeliveryRecord> {
    let count = validate_count(new_count)?;
    Ok(record.clone().with_count(category, count))
}

/// Checks that a raw count is a non-negative integer that fits a record.
///
/// # Errors
///
/// Returns `InvalidCount` for negative values and values above `u32::MAX`.
pub fn validate_count(raw: i64) -> LedgerResult<u32> {
    if raw < 0 {
        return Err(LedgerError::InvalidCount {
            value: raw.to_string(),
            reason: "count must not be negative".to_string(),
        });
    }

    u32::try_from(raw).map_err(|_| LedgerError::InvalidCount {
        value: raw.to_string(),
        reason: format!("count must not exceed {}", u32::MAX),
    })
}

/// Converts a JSON value into a delivery count.
///
/// Integral floats such as `4.0` are accepted; fractional values, strings,
/// booleans and other non-numbers are not.
///
/// # Errors
///
/// Returns `InvalidCount` for non-numeric, negative, fractional or
/// out-of-range values.
pub fn count_from_json(value: &serde_json::Value) -> LedgerResult<u32> {
    let serde_json::Value::Number(number) = value else {
        return Err(LedgerError::InvalidCount {
            value: value.to_string(),
            reason: "count must be a number".to_string(),
        });
    };

    if let Some(raw) = number.as_i64() {
        return validate_count(raw);
    }

    let too_large = || LedgerError::InvalidCount {
        value: number.to_string(),
        reason: format!("count must not exceed {}", u32::MAX),
    };

    if number.is_u64() {
        return Err(too_large());
    }

    match number.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 => {
            if value < 0.0 {
                Err(LedgerError::InvalidCount {
                    value: number.to_string(),
                    reason: "count must not be negative".to_string(),
                })
            } else if value > f64::from(u32::MAX) {
                Err(too_large())
            } else {
                validate_count(value as i64)
            }
        }
        _ => Err(LedgerError::InvalidCount {
            value: number.to_string(),
            reason: "count must be a whole number".to_string(),
        }),
    }
}
