//! Per-worker delivery counts for the current period.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::VehicleCategory;

/// Deliveries completed by one worker in the current accounting period.
///
/// Counts are keyed by category. Categories without an entry count as zero,
/// and zero counts are never stored, so two records with the same effective
/// counts always compare equal.
///
/// # Example
///
/// ```
/// use fleet_commission::models::{DeliveryRecord, VehicleCategory};
///
/// let record = DeliveryRecord::default()
///     .with_count(VehicleCategory::Bko, 10)
///     .with_count(VehicleCategory::Aua, 2);
/// assert_eq!(record.count(VehicleCategory::Bko), 10);
/// assert_eq!(record.count(VehicleCategory::Gky), 0);
/// assert_eq!(record.total_deliveries(), 12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<VehicleCategory, u32>",
    into = "BTreeMap<VehicleCategory, u32>"
)]
pub struct DeliveryRecord {
    counts: BTreeMap<VehicleCategory, u32>,
}

impl From<BTreeMap<VehicleCategory, u32>> for DeliveryRecord {
    fn from(counts: BTreeMap<VehicleCategory, u32>) -> Self {
        Self::from_counts(counts)
    }
}

impl From<DeliveryRecord> for BTreeMap<VehicleCategory, u32> {
    fn from(record: DeliveryRecord) -> Self {
        record.counts
    }
}

impl DeliveryRecord {
    /// Builds a record from (category, count) pairs. Later pairs win.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (VehicleCategory, u32)>,
    {
        counts
            .into_iter()
            .fold(Self::default(), |record, (category, count)| {
                record.with_count(category, count)
            })
    }

    /// Returns the count for a category, zero if unset.
    pub fn count(&self, category: VehicleCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Returns a copy of this record with `category` set to `count`.
    pub fn with_count(mut self, category: VehicleCategory, count: u32) -> Self {
        if count == 0 {
            self.counts.remove(&category);
        } else {
            self.counts.insert(category, count);
        }
        self
    }

    /// Iterates over every known category with its effective count.
    pub fn counts(&self) -> impl Iterator<Item = (VehicleCategory, u32)> + '_ {
        VehicleCategory::ALL
            .into_iter()
            .map(|category| (category, self.count(category)))
    }

    /// Sum of all category counts.
    pub fn total_deliveries(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    /// Returns true if every category is at zero.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
