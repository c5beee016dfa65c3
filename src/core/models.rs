//! Wire types exchanged with the finance API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionType::Income => "income",
                TransactionType::Expense => "expense",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: Option<i64>,
    pub category: String,
    pub budget: f64,
    #[serde(default)]
    pub spent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
}

/// Aggregates computed by the backend. Month keys are `YYYY-MM`, so the
/// map iterates chronologically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    #[serde(default)]
    pub category_expenses: BTreeMap<String, f64>,
    #[serde(default)]
    pub monthly_data: BTreeMap<String, MonthlyTotals>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardData {
    pub recent_transactions: Vec<Transaction>,
    pub analytics: Analytics,
    pub budgets: Vec<Budget>,
    pub categories: Vec<String>,
}

/// `GET /api/transactions` answers with a bare list when `no_pagination`
/// is set and with a page object otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionsPayload {
    List(Vec<Transaction>),
    Page(TransactionPage),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl TransactionsPayload {
    pub fn into_transactions(self) -> Vec<Transaction> {
        match self {
            TransactionsPayload::List(list) => list,
            TransactionsPayload::Page(page) => page.transactions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudget {
    pub category: String,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Optional narrowing of the full transaction list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Query pairs for an unpaginated `GET /api/transactions`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("no_pagination".to_string(), "true".to_string())];
        if let Some(category) = &self.category {
            query.push(("category".to_string(), category.clone()));
        }
        if let Some(start) = self.start_date {
            query.push(("start_date".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("end_date".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        query
    }
}
