//! Transaction store for JSON storage
//!
//! Every operation goes to disk: mutations read the latest file, apply one
//! change, and write the whole map back. Nothing is cached between calls, so
//! separate CLI invocations and web requests always see each other's writes.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::StorePaths;
use crate::error::{ClosingError, ClosingResult};
use crate::models::{Task, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// All transactions keyed by id, in id order
pub type TransactionMap = BTreeMap<TransactionId, Transaction>;

/// On-disk shape of a transaction; the id lives in the object key
#[derive(Debug, Deserialize)]
struct StoredTransaction {
    property_address: String,
    closing_date: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct StoredTransactionRef<'a> {
    property_address: &'a str,
    closing_date: &'a str,
    tasks: &'a [Task],
}

/// Read-modify-write access to one backing store
pub struct TransactionStore {
    paths: StorePaths,
    audit: AuditLogger,
}

impl TransactionStore {
    /// Create a store for the given location
    pub fn new(paths: StorePaths) -> Self {
        let audit = AuditLogger::new(paths.audit_log());
        Self { paths, audit }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// The audit log recording this store's mutations
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load every transaction from disk
    ///
    /// A missing file is an empty store. Anything that does not match the
    /// expected shape is a `CorruptStore` error.
    pub fn load(&self) -> ClosingResult<TransactionMap> {
        let stored: BTreeMap<TransactionId, StoredTransaction> =
            read_json(self.paths.data_file())?;

        log::debug!(
            "Loaded {} transactions from {}",
            stored.len(),
            self.paths.data_file().display()
        );

        Ok(stored
            .into_iter()
            .map(|(id, record)| {
                let txn = Transaction {
                    id: id.clone(),
                    property_address: record.property_address,
                    closing_date: record.closing_date,
                    tasks: record.tasks,
                };
                (id, txn)
            })
            .collect())
    }

    /// Overwrite the backing store with the full map
    pub fn save(&self, data: &TransactionMap) -> ClosingResult<()> {
        let stored: BTreeMap<&TransactionId, StoredTransactionRef<'_>> = data
            .iter()
            .map(|(id, txn)| {
                let record = StoredTransactionRef {
                    property_address: &txn.property_address,
                    closing_date: &txn.closing_date,
                    tasks: &txn.tasks,
                };
                (id, record)
            })
            .collect();

        write_json_atomic(self.paths.data_file(), &stored)
    }

    /// Create a transaction with a fresh id and no tasks
    pub fn create_transaction(
        &self,
        property_address: &str,
        closing_date: &str,
    ) -> ClosingResult<Transaction> {
        let txn = Transaction::new(property_address, closing_date);

        self.with_lock(|data| {
            data.insert(txn.id.clone(), txn.clone());
            Ok(())
        })?;

        log::info!("Created transaction {} for {}", txn.id, txn.property_address);
        self.record(AuditEntry::transaction_created(&txn));

        Ok(txn)
    }

    /// Append a task to a transaction
    pub fn add_task(
        &self,
        transaction_id: &TransactionId,
        description: &str,
        due_date: &str,
    ) -> ClosingResult<Task> {
        let (task, index) = self.with_lock(|data| {
            let txn = data
                .get_mut(transaction_id)
                .ok_or_else(|| ClosingError::transaction_not_found(transaction_id.as_str()))?;
            let task = txn.add_task(description, due_date);
            Ok((task, txn.tasks.len() - 1))
        })?;

        log::info!("Added task {} to transaction {}", index, transaction_id);
        self.record(AuditEntry::task_added(transaction_id, index, &task));

        Ok(task)
    }

    /// Mark a task as completed
    ///
    /// Completing an already completed task succeeds and leaves it completed.
    pub fn complete_task(&self, transaction_id: &TransactionId, task_index: i64) -> ClosingResult<()> {
        let (slot, before, after) = self.with_lock(|data| {
            let txn = data
                .get_mut(transaction_id)
                .ok_or_else(|| ClosingError::transaction_not_found(transaction_id.as_str()))?;
            let (slot, before) = txn.complete_task(task_index)?;
            Ok((slot, before, txn.tasks[slot].clone()))
        })?;

        log::info!("Completed task {} of transaction {}", slot, transaction_id);
        self.record(AuditEntry::task_completed(transaction_id, slot, &before, &after));

        Ok(())
    }

    /// Read-only view of every transaction; same as `load`
    pub fn list_transactions(&self) -> ClosingResult<TransactionMap> {
        self.load()
    }

    /// Load a single transaction
    pub fn get_transaction(&self, transaction_id: &TransactionId) -> ClosingResult<Transaction> {
        self.load()?
            .remove(transaction_id)
            .ok_or_else(|| ClosingError::transaction_not_found(transaction_id.as_str()))
    }

    /// Append to the audit log after a committed change
    ///
    /// The data file is already saved, so a failed append is logged and the
    /// operation still succeeds.
    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.append(&entry) {
            log::error!("Audit log not updated for {}: {}", entry.entity_id, e);
        }
    }

    /// Run one read-modify-write cycle under an exclusive file lock
    ///
    /// The closure's error aborts the cycle before anything is written.
    fn with_lock<T, F>(&self, mutate: F) -> ClosingResult<T>
    where
        F: FnOnce(&mut TransactionMap) -> ClosingResult<T>,
    {
        self.paths.ensure_parent_dir()?;
        let lock = self.acquire_lock()?;

        let result = self.load().and_then(|mut data| {
            let value = mutate(&mut data)?;
            self.save(&data)?;
            Ok(value)
        });

        FileExt::unlock(&lock)
            .map_err(|e| ClosingError::Storage(format!("Failed to release lock: {}", e)))?;

        result
    }

    fn acquire_lock(&self) -> ClosingResult<File> {
        let lock_path = self.paths.lock_file();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                ClosingError::Storage(format!(
                    "Failed to open lock file {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;

        file.lock_exclusive()
            .map_err(|e| ClosingError::Storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{EntityType, Operation};
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, TransactionStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::new(temp_dir.path().join("data.json"));
        (temp_dir, TransactionStore::new(paths))
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.paths().data_file().exists());
    }

    #[test]
    fn test_create_transaction() {
        let (_temp_dir, store) = create_test_store();

        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();
        assert_eq!(txn.property_address, "123 Main St");
        assert_eq!(txn.closing_date, "2024-12-01");
        assert!(txn.tasks.is_empty());

        let all = store.list_transactions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&txn.id], txn);
    }

    #[test]
    fn test_add_task() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();

        let task = store
            .add_task(&txn.id, "Schedule inspection", "2024-10-01")
            .unwrap();
        assert_eq!(task, Task::new("Schedule inspection", "2024-10-01"));

        let reloaded = store.get_transaction(&txn.id).unwrap();
        assert_eq!(reloaded.tasks.len(), 1);
    }

    #[test]
    fn test_complete_task() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();
        store
            .add_task(&txn.id, "Schedule inspection", "2024-10-01")
            .unwrap();

        store.complete_task(&txn.id, 0).unwrap();

        let all = store.list_transactions().unwrap();
        assert!(all[&txn.id].tasks[0].completed);
    }

    #[test]
    fn test_complete_task_twice_stays_completed() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("9 Elm Ct", "2025-01-15").unwrap();
        store.add_task(&txn.id, "Final walkthrough", "2025-01-14").unwrap();

        store.complete_task(&txn.id, 0).unwrap();
        store.complete_task(&txn.id, 0).unwrap();

        assert!(store.get_transaction(&txn.id).unwrap().tasks[0].completed);
    }

    #[test]
    fn test_tasks_keep_call_order() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("77 Bay Rd", "2025-03-01").unwrap();

        let calls: Vec<(String, String)> = (0..5)
            .map(|i| (format!("Task {}", i), format!("2025-02-0{}", i + 1)))
            .collect();
        for (description, due) in &calls {
            store.add_task(&txn.id, description, due).unwrap();
        }

        let tasks = store.get_transaction(&txn.id).unwrap().tasks;
        assert_eq!(tasks.len(), calls.len());
        for (task, (description, due)) in tasks.iter().zip(&calls) {
            assert_eq!(&task.description, description);
            assert_eq!(&task.due_date, due);
            assert!(!task.completed);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let (_temp_dir, store) = create_test_store();

        let ids: HashSet<_> = (0..20)
            .map(|i| store.create_transaction(&format!("{} Main St", i), "2024-12-01").unwrap().id)
            .collect();

        assert_eq!(ids.len(), 20);
        assert_eq!(store.load().unwrap().len(), 20);
    }

    #[test]
    fn test_unknown_transaction() {
        let (_temp_dir, store) = create_test_store();
        let missing = TransactionId::from("does-not-exist");

        let err = store.add_task(&missing, "Anything", "2024-10-01").unwrap_err();
        assert!(err.is_not_found());

        let err = store.complete_task(&missing, 0).unwrap_err();
        assert!(err.is_not_found());

        assert!(store.get_transaction(&missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_task_index_out_of_range() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();

        for index in [0, -1] {
            let err = store.complete_task(&txn.id, index).unwrap_err();
            assert!(matches!(err, ClosingError::TaskIndexOutOfRange { len: 0, .. }));
        }

        store.add_task(&txn.id, "Schedule inspection", "2024-10-01").unwrap();
        let err = store.complete_task(&txn.id, 1).unwrap_err();
        assert!(matches!(
            err,
            ClosingError::TaskIndexOutOfRange { index: 1, len: 1, .. }
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_temp_dir, store) = create_test_store();

        let first = store.create_transaction("1 First Ave", "2024-11-01").unwrap();
        let second = store.create_transaction("2 Second Ave", "2024-11-15").unwrap();
        store.add_task(&first.id, "Title search", "2024-10-10").unwrap();
        store.add_task(&first.id, "Wire funds", "2024-10-31").unwrap();
        store.add_task(&second.id, "Appraisal", "2024-11-01").unwrap();
        store.complete_task(&first.id, 1).unwrap();

        let before = store.load().unwrap();
        store.save(&before).unwrap();
        let after = store.load().unwrap();

        assert_eq!(before, after);
        assert!(!after[&first.id].tasks[0].completed);
        assert!(after[&first.id].tasks[1].completed);
    }

    #[test]
    fn test_persisted_layout() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("321 Oak", "2024-12-01").unwrap();
        store.add_task(&txn.id, "Inspection", "2024-10-01").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.paths().data_file()).unwrap()).unwrap();
        let record = &raw[txn.id.as_str()];

        assert_eq!(record["property_address"], "321 Oak");
        assert_eq!(record["closing_date"], "2024-12-01");
        assert!(record.get("id").is_none());
        assert_eq!(record["tasks"][0]["description"], "Inspection");
        assert_eq!(record["tasks"][0]["due_date"], "2024-10-01");
        assert_eq!(record["tasks"][0]["completed"], false);
    }

    #[test]
    fn test_loads_existing_file_with_defaults() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.paths().data_file(),
            r#"{
                "legacy": {"property_address": "5 Pine", "closing_date": "2024-09-09"},
                "other": {
                    "property_address": "6 Fir",
                    "closing_date": "2024-09-10",
                    "tasks": [{"description": "Survey", "due_date": "2024-09-01"}]
                }
            }"#,
        )
        .unwrap();

        let data = store.load().unwrap();
        let legacy = &data[&TransactionId::from("legacy")];
        assert_eq!(legacy.id.as_str(), "legacy");
        assert!(legacy.tasks.is_empty());
        assert!(!data[&TransactionId::from("other")].tasks[0].completed);
    }

    #[test]
    fn test_corrupt_store() {
        let (_temp_dir, store) = create_test_store();
        let cases = [
            "{ this is not json",
            "[]",
            r#"{"x": {"closing_date": "2024-12-01"}}"#,
            r#"{"x": {"property_address": 12, "closing_date": "2024-12-01"}}"#,
            r#"{"x": {"property_address": "a", "closing_date": "b", "tasks": [{"due_date": "c"}]}}"#,
        ];

        for content in cases {
            fs::write(store.paths().data_file(), content).unwrap();
            assert!(store.load().unwrap_err().is_corrupt(), "accepted: {}", content);
        }

        // Mutations refuse to overwrite a corrupt file
        let err = store.create_transaction("1 Main", "2024-12-01").unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(
            fs::read_to_string(store.paths().data_file()).unwrap(),
            cases[cases.len() - 1]
        );
    }

    #[test]
    fn test_failed_mutation_does_not_write() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();
        let before = fs::read_to_string(store.paths().data_file()).unwrap();

        store.complete_task(&txn.id, 3).unwrap_err();

        assert_eq!(fs::read_to_string(store.paths().data_file()).unwrap(), before);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp_dir, store) = create_test_store();
        let txn = store.create_transaction("123 Main St", "2024-12-01").unwrap();
        store.add_task(&txn.id, "Schedule inspection", "2024-10-01").unwrap();
        store.complete_task(&txn.id, 0).unwrap();
        store.complete_task(&txn.id, 5).unwrap_err();

        let entries = store.audit().recent(usize::MAX).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].entity_type, EntityType::Transaction);
        assert_eq!(entries[0].entity_id, txn.id.as_str());

        assert_eq!(entries[1].entity_type, EntityType::Task);
        assert_eq!(entries[1].entity_id, format!("{}#0", txn.id));

        assert_eq!(entries[2].operation, Operation::Update);
        assert_eq!(entries[2].before.as_ref().unwrap()["completed"], false);
        assert_eq!(entries[2].after.as_ref().unwrap()["completed"], true);
    }

    #[test]
    fn test_audit_failure_does_not_fail_saved_mutation() {
        let (_temp_dir, store) = create_test_store();
        fs::create_dir(store.paths().audit_log()).unwrap();

        let txn = store.create_transaction("1 Main", "2024-12-01").unwrap();
        store.add_task(&txn.id, "Title search", "2024-11-01").unwrap();
        store.complete_task(&txn.id, 0).unwrap();

        let data = store.load().unwrap();
        assert_eq!(data.len(), 1);
        assert!(data[&txn.id].tasks[0].completed);
    }

    #[test]
    fn test_separate_handles_see_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.json");
        let a = TransactionStore::new(StorePaths::new(&path));
        let b = TransactionStore::new(StorePaths::new(&path));

        let txn = a.create_transaction("10 Shared Ln", "2025-05-05").unwrap();
        b.add_task(&txn.id, "From b", "2025-05-01").unwrap();
        a.add_task(&txn.id, "From a", "2025-05-02").unwrap();

        let tasks = b.get_transaction(&txn.id).unwrap().tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "From b");
        assert_eq!(tasks[1].description, "From a");
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contended.json");
        let txn = TransactionStore::new(StorePaths::new(&path))
            .create_transaction("1 Busy St", "2025-06-01")
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let path = path.clone();
                let id = txn.id.clone();
                std::thread::spawn(move || {
                    let store = TransactionStore::new(StorePaths::new(path));
                    for i in 0..5 {
                        store
                            .add_task(&id, &format!("w{}-{}", worker, i), "2025-05-31")
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let store = TransactionStore::new(StorePaths::new(&path));
        assert_eq!(store.get_transaction(&txn.id).unwrap().tasks.len(), 20);
    }
}
