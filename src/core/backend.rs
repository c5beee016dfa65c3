//! Finance API abstraction consumed by the refresh orchestrator

use crate::core::error::FetchError;
use crate::core::models::{
    Analytics, Budget, DashboardData, HealthStatus, NewBudget, NewCategory, NewTransaction,
    Transaction, TransactionFilter,
};
use async_trait::async_trait;

/// One method per REST endpoint. Every call is expected to have already
/// gone through retry, so an `Err` is final for that endpoint.
#[async_trait]
pub trait FinanceBackend: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardData, FetchError>;
    async fn categories(&self) -> Result<Vec<String>, FetchError>;
    async fn analytics(&self) -> Result<Analytics, FetchError>;
    async fn budgets(&self) -> Result<Vec<Budget>, FetchError>;
    /// Complete, unpaginated transaction list in backend order.
    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, FetchError>;

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), FetchError>;
    async fn delete_transaction(&self, id: i64) -> Result<(), FetchError>;
    async fn upsert_budget(&self, budget: &NewBudget) -> Result<(), FetchError>;
    async fn delete_budget(&self, id: i64) -> Result<(), FetchError>;
    async fn create_category(&self, category: &NewCategory) -> Result<(), FetchError>;

    async fn health(&self) -> Result<HealthStatus, FetchError>;
}
