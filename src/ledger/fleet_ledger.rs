//! The fleet-wide store of current-period delivery counts.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{RateTable, apply_delta, summarize, validate_count};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CommissionSummary, DeliveryRecord, Role, VehicleCategory, Worker};

/// What a period reset changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOutcome {
    /// Number of workers whose records were zeroed.
    pub workers_reset: usize,
    /// Number of workers that had at least one non-zero count before the reset.
    pub records_modified: usize,
}

#[derive(Debug)]
struct WorkerEntry {
    worker: Worker,
    record: RwLock<DeliveryRecord>,
}

#[derive(Debug, Default)]
struct Roster {
    entries: Vec<WorkerEntry>,
    index: HashMap<String, usize>,
}

impl Roster {
    fn get(&self, worker_id: &str) -> LedgerResult<&WorkerEntry> {
        self.index
            .get(worker_id)
            .map(|&position| &self.entries[position])
            .ok_or_else(|| LedgerError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.worker.id.clone(), position))
            .collect();
    }
}

// Every mutation is fully computed before it is written back, so a poisoned
// lock never guards a half-written record.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Authoritative current-period delivery counts for every registered worker.
///
/// The ledger is shared between request handlers behind an `Arc`. The worker
/// roster sits behind one `RwLock` and each worker's record behind its own:
///
/// - updates hold the roster shared and the worker's record exclusively, so
///   updates to different workers proceed in parallel while updates to the
///   same worker are serialized;
/// - resets, registrations and removals hold the roster exclusively, so no
///   update can interleave with a reset;
/// - reads hold the roster shared and copy each record under its read lock.
///
/// # Example
///
/// ```
/// use fleet_commission::calculation::RateTable;
/// use fleet_commission::ledger::FleetLedger;
/// use fleet_commission::models::{Role, VehicleCategory};
///
/// let ledger = FleetLedger::new(RateTable::reference());
/// let worker = ledger.register_worker("alice", Role::Driver).unwrap();
///
/// let summary = ledger.update_worker_delivery(&worker.id, "GKY", 4).unwrap();
/// assert_eq!(summary.commission_for(VehicleCategory::Gky).to_string(), "30.00");
///
/// ledger.reset_all_deliveries();
/// assert_eq!(ledger.get_summary(&worker.id).unwrap().total_deliveries, 0);
/// ```
#[derive(Debug)]
pub struct FleetLedger {
    rates: RateTable,
    roster: RwLock<Roster>,
}

impl FleetLedger {
    /// Creates an empty ledger that summarizes with the given rate table.
    pub fn new(rates: RateTable) -> Self {
        Self {
            rates,
            roster: RwLock::new(Roster::default()),
        }
    }

    /// Returns the rate table used for every summary.
    pub fn rate_table(&self) -> &RateTable {
        &self.rates
    }

    /// Number of registered workers.
    pub fn worker_count(&self) -> usize {
        read_lock(&self.roster).entries.len()
    }

    /// Registers a new worker with an all-zero delivery record.
    ///
    /// # Errors
    ///
    /// - `InvalidUsername` if the username is blank
    /// - `DuplicateUsername` if another worker already has the username
    pub fn register_worker(&self, username: &str, role: Role) -> LedgerResult<Worker> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::InvalidUsername {
                message: "username must not be empty".to_string(),
            });
        }

        let mut roster = write_lock(&self.roster);
        if roster
            .entries
            .iter()
            .any(|entry| entry.worker.username == username)
        {
            return Err(LedgerError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let worker = Worker {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
            created_at: Utc::now(),
        };

        let position = roster.entries.len();
        roster.index.insert(worker.id.clone(), position);
        roster.entries.push(WorkerEntry {
            worker: worker.clone(),
            record: RwLock::new(DeliveryRecord::default()),
        });

        info!(
            worker_id = %worker.id,
            username = %worker.username,
            role = %worker.role,
            "Registered worker"
        );
        Ok(worker)
    }

    /// Removes a worker and their delivery record.
    ///
    /// # Errors
    ///
    /// Returns `WorkerNotFound` if no worker has the given id.
    pub fn remove_worker(&self, worker_id: &str) -> LedgerResult<Worker> {
        let mut roster = write_lock(&self.roster);
        let position = *roster
            .index
            .get(worker_id)
            .ok_or_else(|| LedgerError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })?;

        let entry = roster.entries.remove(position);
        roster.reindex();

        info!(worker_id = %entry.worker.id, "Removed worker");
        Ok(entry.worker)
    }

    /// Looks up a worker's identity.
    ///
    /// # Errors
    ///
    /// Returns `WorkerNotFound` if no worker has the given id.
    pub fn worker(&self, worker_id: &str) -> LedgerResult<Worker> {
        let roster = read_lock(&self.roster);
        roster.get(worker_id).map(|entry| entry.worker.clone())
    }

    /// Finds a worker by username, ignoring surrounding whitespace as
    /// registration does.
    pub fn find_by_username(&self, username: &str) -> Option<Worker> {
        let username = username.trim();
        read_lock(&self.roster)
            .entries
            .iter()
            .find(|entry| entry.worker.username == username)
            .map(|entry| entry.worker.clone())
    }

    /// Returns a copy of a worker's current delivery record.
    ///
    /// # Errors
    ///
    /// Returns `WorkerNotFound` if no worker has the given id.
    pub fn delivery_record(&self, worker_id: &str) -> LedgerResult<DeliveryRecord> {
        let roster = read_lock(&self.roster);
        let entry = roster.get(worker_id)?;
        let record = read_lock(&entry.record).clone();
        Ok(record)
    }

    /// Computes a worker's commission summary from their current record.
    ///
    /// # Errors
    ///
    /// Returns `WorkerNotFound` if no worker has the given id.
    pub fn get_summary(&self, worker_id: &str) -> LedgerResult<CommissionSummary> {
        let record = self.delivery_record(worker_id)?;
        summarize(&record, &self.rates)
    }

    /// Lists every worker with their summary, in registration order.
    ///
    /// The roster stays read-locked for the whole listing, so a concurrent
    /// reset is either fully visible or not visible at all.
    pub fn list_all_summaries(&self) -> LedgerResult<Vec<(Worker, CommissionSummary)>> {
        self.collect_summaries(|_| true)
    }

    /// Lists workers holding one of `roles` with their summary, in
    /// registration order.
    pub fn list_summaries_for_roles(
        &self,
        roles: &[Role],
    ) -> LedgerResult<Vec<(Worker, CommissionSummary)>> {
        self.collect_summaries(|worker| roles.contains(&worker.role))
    }

    fn collect_summaries<F>(&self, include: F) -> LedgerResult<Vec<(Worker, CommissionSummary)>>
    where
        F: Fn(&Worker) -> bool,
    {
        let roster = read_lock(&self.roster);
        roster
            .entries
            .iter()
            .filter(|entry| include(&entry.worker))
            .map(|entry| {
                let record = read_lock(&entry.record);
                let summary = summarize(&record, &self.rates)?;
                Ok((entry.worker.clone(), summary))
            })
            .collect()
    }

    /// Sets a worker's count for one category and returns the new summary.
    ///
    /// The count replaces the stored value; it is not added to it. The
    /// category is validated first, then the count, then the worker. Nothing
    /// is changed if any check fails.
    ///
    /// # Errors
    ///
    /// - `UnknownCategory` if `category_code` is not a known category
    /// - `InvalidCount` if `new_count` is negative or too large
    /// - `WorkerNotFound` if no worker has the given id
    pub fn update_worker_delivery(
        &self,
        worker_id: &str,
        category_code: &str,
        new_count: i64,
    ) -> LedgerResult<CommissionSummary> {
        let category: VehicleCategory = category_code.parse()?;
        validate_count(new_count)?;

        let roster = read_lock(&self.roster);
        let entry = roster.get(worker_id)?;

        let mut record = write_lock(&entry.record);
        let previous = record.count(category);
        let updated = apply_delta(&record, category, new_count)?;
        let summary = summarize(&updated, &self.rates)?;
        *record = updated;

        info!(
            worker_id = %worker_id,
            category = %category,
            previous_count = previous,
            new_count = new_count,
            total_commission = %summary.total_commission,
            "Updated delivery count"
        );
        Ok(summary)
    }

    /// Zeroes every worker's delivery record in one step.
    ///
    /// The roster is held exclusively for the whole reset, so readers see
    /// either the state before the reset or the fully reset state. The reset
    /// keeps no snapshot of the previous counts.
    pub fn reset_all_deliveries(&self) -> ResetOutcome {
        let mut roster = write_lock(&self.roster);
        let mut records_modified = 0;

        for entry in roster.entries.iter_mut() {
            let record = entry
                .record
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner);
            if !record.is_empty() {
                records_modified += 1;
                debug!(
                    worker_id = %entry.worker.id,
                    deliveries = record.total_deliveries(),
                    "Zeroing delivery record"
                );
            }
            *record = DeliveryRecord::default();
        }

        let outcome = ResetOutcome {
            workers_reset: roster.entries.len(),
            records_modified,
        };
        info!(
            workers_reset = outcome.workers_reset,
            records_modified = outcome.records_modified,
            "Reset all delivery counts"
        );
        outcome
    }
}

impl Default for FleetLedger {
    fn default() -> Self {
        Self::new(RateTable::reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ledger_with_driver() -> (FleetLedger, Worker) {
        let ledger = FleetLedger::default();
        let worker = ledger.register_worker("driver1", Role::Driver).unwrap();
        (ledger, worker)
    }

    /// FL-001: update then summary
    #[test]
    fn test_update_then_get_summary() {
        let (ledger, worker) = ledger_with_driver();

        ledger.update_worker_delivery(&worker.id, "GKY", 4).unwrap();
        let summary = ledger.get_summary(&worker.id).unwrap();

        assert_eq!(summary.commission_for(VehicleCategory::Gky), dec("30.00"));
        assert_eq!(summary.total_commission, dec("30.00"));
        assert_eq!(summary.total_deliveries, 4);
    }

    /// FL-002: unknown category leaves record unchanged
    #[test]
    fn test_unknown_category_leaves_record_unchanged() {
        let (ledger, worker) = ledger_with_driver();
        ledger.update_worker_delivery(&worker.id, "BKO", 3).unwrap();
        let before = ledger.delivery_record(&worker.id).unwrap();

        match ledger.update_worker_delivery(&worker.id, "ZZZ", 1) {
            Err(LedgerError::UnknownCategory { code }) => assert_eq!(code, "ZZZ"),
            other => panic!("Expected UnknownCategory, got {:?}", other),
        }
        assert_eq!(ledger.delivery_record(&worker.id).unwrap(), before);
    }

    /// FL-003: negative count leaves record unchanged
    #[test]
    fn test_negative_count_leaves_record_unchanged() {
        let (ledger, worker) = ledger_with_driver();
        ledger.update_worker_delivery(&worker.id, "BKO", 3).unwrap();
        let before = ledger.delivery_record(&worker.id).unwrap();

        assert!(matches!(
            ledger.update_worker_delivery(&worker.id, "BKO", -1),
            Err(LedgerError::InvalidCount { .. })
        ));
        assert_eq!(ledger.delivery_record(&worker.id).unwrap(), before);
    }

    #[test]
    fn test_update_unknown_worker_returns_error() {
        let ledger = FleetLedger::default();
        match ledger.update_worker_delivery("nobody", "BKO", 1) {
            Err(LedgerError::WorkerNotFound { worker_id }) => assert_eq!(worker_id, "nobody"),
            other => panic!("Expected WorkerNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_category_is_validated_before_worker() {
        let ledger = FleetLedger::default();
        assert!(matches!(
            ledger.update_worker_delivery("nobody", "ZZZ", -1),
            Err(LedgerError::UnknownCategory { .. })
        ));
        assert!(matches!(
            ledger.update_worker_delivery("nobody", "BKO", -1),
            Err(LedgerError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_get_summary_unknown_worker_returns_error() {
        let ledger = FleetLedger::default();
        assert!(matches!(
            ledger.get_summary("missing"),
            Err(LedgerError::WorkerNotFound { .. })
        ));
    }

    #[test]
    fn test_update_only_touches_one_category() {
        let (ledger, worker) = ledger_with_driver();
        ledger.update_worker_delivery(&worker.id, "BKO", 10).unwrap();
        ledger.update_worker_delivery(&worker.id, "AUA", 2).unwrap();

        let summary = ledger.get_summary(&worker.id).unwrap();
        assert_eq!(summary.commission_for(VehicleCategory::Bko), dec("35.00"));
        assert_eq!(summary.commission_for(VehicleCategory::Aua), dec("20.00"));
        assert_eq!(summary.total_commission, dec("55.00"));
        assert_eq!(summary.total_deliveries, 12);
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let (ledger, _) = ledger_with_driver();
        match ledger.register_worker("driver1", Role::Helper) {
            Err(LedgerError::DuplicateUsername { username }) => assert_eq!(username, "driver1"),
            other => panic!("Expected DuplicateUsername, got {:?}", other),
        }
        assert_eq!(ledger.worker_count(), 1);
    }

    #[test]
    fn test_register_rejects_blank_username() {
        let ledger = FleetLedger::default();
        assert!(matches!(
            ledger.register_worker("   ", Role::Driver),
            Err(LedgerError::InvalidUsername { .. })
        ));
    }

    #[test]
    fn test_register_starts_with_zero_record() {
        let (ledger, worker) = ledger_with_driver();
        assert!(ledger.delivery_record(&worker.id).unwrap().is_empty());
        assert_eq!(ledger.worker(&worker.id).unwrap(), worker);
        assert_eq!(ledger.find_by_username("driver1"), Some(worker));
    }

    #[test]
    fn test_find_by_username_trims_like_register() {
        let ledger = FleetLedger::default();
        let worker = ledger.register_worker(" alice ", Role::Helper).unwrap();

        assert_eq!(worker.username, "alice");
        assert_eq!(ledger.find_by_username(" alice "), Some(worker.clone()));
        assert_eq!(ledger.find_by_username("alice"), Some(worker));
        assert_eq!(ledger.find_by_username("   "), None);
    }

    #[test]
    fn test_list_all_summaries_in_registration_order() {
        let ledger = FleetLedger::default();
        let names = ["zoe", "adam", "mia"];
        for name in names {
            ledger.register_worker(name, Role::Driver).unwrap();
        }

        let listed: Vec<_> = ledger
            .list_all_summaries()
            .unwrap()
            .into_iter()
            .map(|(worker, _)| worker.username)
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_list_summaries_for_roles_filters_admins() {
        let ledger = FleetLedger::default();
        ledger.register_worker("boss", Role::Admin).unwrap();
        ledger.register_worker("driver", Role::Driver).unwrap();
        ledger.register_worker("helper", Role::Helper).unwrap();

        let listed: Vec<_> = ledger
            .list_summaries_for_roles(&[Role::Driver, Role::Helper])
            .unwrap()
            .into_iter()
            .map(|(worker, _)| worker.username)
            .collect();
        assert_eq!(listed, ["driver", "helper"]);
    }

    #[test]
    fn test_reset_zeroes_every_worker() {
        let ledger = FleetLedger::default();
        let a = ledger.register_worker("a", Role::Driver).unwrap();
        let b = ledger.register_worker("b", Role::Helper).unwrap();
        ledger.register_worker("c", Role::Driver).unwrap();
        ledger.update_worker_delivery(&a.id, "BKO", 10).unwrap();
        ledger.update_worker_delivery(&b.id, "GSD", 3).unwrap();

        let outcome = ledger.reset_all_deliveries();
        assert_eq!(
            outcome,
            ResetOutcome {
                workers_reset: 3,
                records_modified: 2
            }
        );

        for (_, summary) in ledger.list_all_summaries().unwrap() {
            assert_eq!(summary.total_commission.to_string(), "0.00");
            assert_eq!(summary.total_deliveries, 0);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (ledger, worker) = ledger_with_driver();
        ledger.update_worker_delivery(&worker.id, "NYC", 8).unwrap();

        ledger.reset_all_deliveries();
        let after_first: Vec<_> = ledger.list_all_summaries().unwrap();
        let second = ledger.reset_all_deliveries();
        let after_second: Vec<_> = ledger.list_all_summaries().unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(second.records_modified, 0);
    }

    #[test]
    fn test_remove_worker() {
        let ledger = FleetLedger::default();
        let a = ledger.register_worker("a", Role::Driver).unwrap();
        let b = ledger.register_worker("b", Role::Driver).unwrap();
        ledger.update_worker_delivery(&b.id, "AUA", 1).unwrap();

        ledger.remove_worker(&a.id).unwrap();

        assert!(matches!(
            ledger.get_summary(&a.id),
            Err(LedgerError::WorkerNotFound { .. })
        ));
        assert_eq!(
            ledger.get_summary(&b.id).unwrap().total_commission,
            dec("10.00")
        );
        assert!(ledger.remove_worker(&a.id).is_err());
    }

    #[test]
    fn test_concurrent_updates_to_different_categories_are_kept() {
        let ledger = Arc::new(FleetLedger::default());
        let worker = ledger.register_worker("busy", Role::Driver).unwrap();

        thread::scope(|scope| {
            for (position, category) in VehicleCategory::ALL.into_iter().enumerate() {
                let ledger = Arc::clone(&ledger);
                let worker_id = worker.id.clone();
                scope.spawn(move || {
                    for count in 1..=50 {
                        ledger
                            .update_worker_delivery(&worker_id, category.code(), count + position as i64)
                            .unwrap();
                    }
                });
            }
        });

        let record = ledger.delivery_record(&worker.id).unwrap();
        for (position, category) in VehicleCategory::ALL.into_iter().enumerate() {
            assert_eq!(record.count(category), 50 + position as u32);
        }
    }

    #[test]
    fn test_final_reset_after_concurrent_updates_clears_everyone() {
        let ledger = Arc::new(FleetLedger::default());
        let workers: Vec<_> = (0..8)
            .map(|n| ledger.register_worker(&format!("w{}", n), Role::Driver).unwrap())
            .collect();

        thread::scope(|scope| {
            for worker in &workers {
                let ledger = Arc::clone(&ledger);
                scope.spawn(move || {
                    for count in 1..=100 {
                        ledger.update_worker_delivery(&worker.id, "BKO", count).unwrap();
                    }
                });
            }
            let ledger = Arc::clone(&ledger);
            scope.spawn(move || {
                for _ in 0..20 {
                    ledger.reset_all_deliveries();
                }
            });
        });

        // Once all writers are done a final reset must leave nothing behind
        ledger.reset_all_deliveries();
        assert!(
            ledger
                .list_all_summaries()
                .unwrap()
                .iter()
                .all(|(_, summary)| summary.total_deliveries == 0)
        );
    }

    #[test]
    fn test_readers_never_observe_partial_reset() {
        let ledger = FleetLedger::default();
        for n in 0..16 {
            let worker = ledger
                .register_worker(&format!("w{}", n), Role::Driver)
                .unwrap();
            ledger
                .update_worker_delivery(&worker.id, "GKY", 3 + n)
                .unwrap();
        }
        let reset_done = AtomicBool::new(false);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut snapshots_after_reset = 0;
                    while snapshots_after_reset < 5 {
                        let finished = reset_done.load(Ordering::Acquire);
                        let totals: Vec<u64> = ledger
                            .list_all_summaries()
                            .unwrap()
                            .iter()
                            .map(|(_, summary)| summary.total_deliveries)
                            .collect();

                        assert_eq!(totals.len(), 16);
                        let zeroed = totals.iter().filter(|&&total| total == 0).count();
                        assert!(
                            zeroed == 0 || zeroed == totals.len(),
                            "observed a partially reset store: {:?}",
                            totals
                        );
                        if finished {
                            assert_eq!(zeroed, totals.len());
                            snapshots_after_reset += 1;
                        }
                    }
                });
            }
            scope.spawn(|| {
                thread::sleep(Duration::from_millis(5));
                let outcome = ledger.reset_all_deliveries();
                assert_eq!(outcome.records_modified, 16);
                reset_done.store(true, Ordering::Release);
            });
        });
    }
}
