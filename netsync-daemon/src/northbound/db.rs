//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use pickledb::PickleDb;
use tracing::error;

use crate::northbound::core::Transaction;

// Records a transaction in the rollback log.
pub(crate) fn transaction_record(
    db: &mut PickleDb,
    transaction: &mut Transaction,
) {
    transaction.id = transaction_next_key(db);
    let key = format!("transaction{}", transaction.id);
    if let Err(error) = db.set(&key, transaction) {
        error!(%error, "failed to record transaction in the rollback log");
    }
}

// Retrieves a transaction from the rollback log, identified by its ID.
pub(crate) fn transaction_get(
    db: &PickleDb,
    transaction_id: u32,
) -> Option<Transaction> {
    let key = format!("transaction{}", transaction_id);
    db.get(&key)
}

// Retrieves all transactions from the rollback log.
pub(crate) fn transaction_get_all(db: &PickleDb) -> Vec<Transaction> {
    let mut transactions = db
        .iter()
        .filter(|entry| entry.get_key().starts_with("transaction"))
        .map(|entry| entry.get_value::<Transaction>().unwrap())
        .collect::<Vec<_>>();
    transactions.sort_by_key(|transaction| transaction.id);
    transactions
}

// Retrieves the next available transaction ID and updates it.
fn transaction_next_key(db: &mut PickleDb) -> u32 {
    let mut next_id = db.get("next_id").unwrap_or(0);
    next_id += 1;
    if let Err(error) = db.set("next_id", &next_id) {
        error!(%error, "failed to update the next transaction ID in the rollback log");
    }
    next_id
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use std::sync::Once;

    use chrono::Utc;
    use netsync_yang::YANG_CTX;
    use pickledb::{PickleDb, PickleDbDumpPolicy, SerializationMethod};
    use yang4::data::DataTree;

    use super::*;

    static INIT: Once = Once::new();

    fn test_db(name: &str) -> PickleDb {
        INIT.call_once(crate::northbound::yang::create_context);
        let path = std::env::temp_dir()
            .join(format!("netsync-{}-{}.db", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        PickleDb::new(
            path,
            PickleDbDumpPolicy::DumpUponRequest,
            SerializationMethod::Bin,
        )
    }

    fn transaction(comment: &str) -> Transaction {
        let yang_ctx = YANG_CTX.get().unwrap();
        let mut configuration = DataTree::new(yang_ctx);
        configuration
            .new_path("/ietf-interfaces:interfaces", None, false)
            .unwrap();
        Transaction::new(Utc::now(), comment.to_owned(), configuration)
    }

    #[test]
    fn record_assigns_sequential_ids() {
        let mut db = test_db("sequential-ids");

        let mut transaction1 = transaction("first");
        transaction_record(&mut db, &mut transaction1);
        let mut transaction2 = transaction("second");
        transaction_record(&mut db, &mut transaction2);

        assert_eq!(transaction1.id, 1);
        assert_eq!(transaction2.id, 2);
    }

    #[test]
    fn get_by_id() {
        let mut db = test_db("get-by-id");

        let mut transaction1 = transaction("initial configuration");
        transaction_record(&mut db, &mut transaction1);

        let stored = transaction_get(&db, transaction1.id).unwrap();
        assert_eq!(stored.id, transaction1.id);
        assert_eq!(stored.comment, "initial configuration");
        assert!(transaction_get(&db, 42).is_none());
    }

    #[test]
    fn get_all_sorted_by_id() {
        let mut db = test_db("get-all");
        assert!(transaction_get_all(&db).is_empty());

        for comment in ["first", "second", "third"] {
            let mut transaction = transaction(comment);
            transaction_record(&mut db, &mut transaction);
        }

        let transactions = transaction_get_all(&db);
        assert_eq!(
            transactions
                .iter()
                .map(|transaction| transaction.id)
                .collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(transactions.last().unwrap().comment, "third");
    }
}
