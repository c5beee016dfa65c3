//! Budget progress and spending derivations.
use crate::core::models::{Analytics, Budget, Transaction, TransactionType};
use std::collections::HashMap;
use tracing::warn;

/// Half a minor currency unit.
pub const AMOUNT_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Success,
    Warning,
    Danger,
}

impl ProgressLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 75.0 {
            ProgressLevel::Success
        } else if percentage <= 100.0 {
            ProgressLevel::Warning
        } else {
            ProgressLevel::Danger
        }
    }
}

/// Render-time view of a budget against its spending.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub percentage: f64,
    pub level: ProgressLevel,
}

impl BudgetStatus {
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.budget
    }
}

/// Sum of absolute expense amounts per category. Income never counts.
pub fn derive_spent(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut spent: HashMap<String, f64> = HashMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
    {
        *spent.entry(txn.category.clone()).or_insert(0.0) += txn.amount.abs();
    }
    spent
}

pub fn progress_percentage(spent: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return 0.0;
    }
    (spent / budget) * 100.0
}

/// Pairs each budget with its spending. Backend-supplied `spent` wins; the
/// derived sum fills in when it is absent.
pub fn budget_statuses(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
    let derived = derive_spent(transactions);
    budgets
        .iter()
        .map(|b| {
            let spent = b
                .spent
                .unwrap_or_else(|| derived.get(&b.category).copied().unwrap_or(0.0));
            let percentage = progress_percentage(spent, b.budget);
            BudgetStatus {
                category: b.category.clone(),
                budget: b.budget,
                spent,
                percentage,
                level: ProgressLevel::from_percentage(percentage),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Discrepancy {
    BudgetSpent {
        category: String,
        declared: f64,
        derived: f64,
    },
    CategoryExpenses {
        category: String,
        declared: f64,
        derived: f64,
    },
}

/// Compares spending derived from the full transaction list against the
/// aggregates the backend declared. Each mismatch is logged and returned.
pub fn check_consistency(
    transactions: &[Transaction],
    budgets: &[Budget],
    analytics: Option<&Analytics>,
) -> Vec<Discrepancy> {
    let derived = derive_spent(transactions);
    let derived_for = |category: &str| derived.get(category).copied().unwrap_or(0.0);
    let mut found = Vec::new();

    for budget in budgets {
        if let Some(declared) = budget.spent {
            let derived = derived_for(&budget.category);
            if (declared - derived).abs() > AMOUNT_TOLERANCE {
                found.push(Discrepancy::BudgetSpent {
                    category: budget.category.clone(),
                    declared,
                    derived,
                });
            }
        }
    }

    if let Some(analytics) = analytics {
        let mut categories: Vec<&String> = analytics.category_expenses.keys().collect();
        categories.extend(derived.keys().filter(|c| !analytics.category_expenses.contains_key(*c)));
        for category in categories {
            let declared = analytics
                .category_expenses
                .get(category)
                .copied()
                .unwrap_or(0.0);
            let derived = derived_for(category);
            if (declared - derived).abs() > AMOUNT_TOLERANCE {
                found.push(Discrepancy::CategoryExpenses {
                    category: category.clone(),
                    declared,
                    derived,
                });
            }
        }
    }

    for discrepancy in &found {
        warn!(?discrepancy, "Backend aggregates disagree with transaction list");
    }
    found
}
