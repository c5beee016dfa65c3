use crate::core::models::{Analytics, Budget, Transaction};
use std::sync::Arc;
use tracing::debug;

pub const RECENT_TRANSACTIONS: usize = 5;

/// Everything the client knows about the remote state at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Full transaction list, `None` until it has been fetched once.
    pub transactions: Option<Vec<Transaction>>,
    pub recent_transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub categories: Vec<String>,
    pub analytics: Option<Analytics>,
}

/// Fields to overwrite; `None` leaves the current value in place.
#[derive(Debug, Clone, Default)]
pub struct SnapshotUpdate {
    pub transactions: Option<Vec<Transaction>>,
    pub recent_transactions: Option<Vec<Transaction>>,
    pub budgets: Option<Vec<Budget>>,
    pub categories: Option<Vec<String>>,
    pub analytics: Option<Analytics>,
}

/// Last `RECENT_TRANSACTIONS` entries by position, newest first.
pub fn recent_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .rev()
        .take(RECENT_TRANSACTIONS)
        .cloned()
        .collect()
}

/// Single owner of the client-side snapshot. Readers get an immutable
/// `Arc<Snapshot>`; writers swap in a new one.
#[derive(Debug, Default)]
pub struct StateStore {
    current: Arc<Snapshot>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn replace(&mut self, update: SnapshotUpdate) {
        let mut next = Snapshot::clone(&self.current);
        let mut replaced = Vec::new();

        if let Some(transactions) = update.transactions {
            next.transactions = Some(transactions);
            replaced.push("transactions");
        }
        if let Some(recent) = update.recent_transactions {
            next.recent_transactions = recent;
            replaced.push("recent_transactions");
        }
        if let Some(budgets) = update.budgets {
            next.budgets = budgets;
            replaced.push("budgets");
        }
        if let Some(categories) = update.categories {
            next.categories = categories;
            replaced.push("categories");
        }
        if let Some(analytics) = update.analytics {
            next.analytics = Some(analytics);
            replaced.push("analytics");
        }

        debug!("Store REPLACE {:?}", replaced);
        self.current = Arc::new(next);
    }
}
