//! Terminal rendering of the snapshot

use super::ui;
use crate::core::budget::{BudgetStatus, budget_statuses};
use crate::core::models::{Analytics, Transaction, TransactionFilter};
use crate::core::{AppError, Renderer, Section};
use crate::store::Snapshot;
use comfy_table::{Cell, CellAlignment};
use indicatif::ProgressBar;

/// Prints each section as comfy-table tables on stdout.
pub struct TableRenderer {
    currency: String,
    spinner: Option<ProgressBar>,
}

impl TableRenderer {
    pub fn new(currency: impl Into<String>) -> Self {
        TableRenderer {
            currency: currency.into(),
            spinner: None,
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Renderer for TableRenderer {
    fn loading(&mut self, message: &str) {
        self.stop_spinner();
        self.spinner = Some(ui::new_spinner(message));
    }

    fn render(&mut self, snapshot: &Snapshot, section: &Section) {
        self.stop_spinner();
        let output = match section {
            Section::Dashboard => dashboard_view(snapshot, &self.currency),
            Section::Transactions(filter) => transactions_view(snapshot, filter, &self.currency),
            Section::Budgets => budgets_view(snapshot, &self.currency),
            Section::Analytics => analytics_view(snapshot, &self.currency),
        };
        println!("{output}");
    }

    fn render_failure(&mut self, error: &AppError) {
        self.stop_spinner();
        eprintln!(
            "{}\n{}",
            ui::style_text("Failed to load application data", ui::StyleType::Error),
            ui::style_text(&error.to_string(), ui::StyleType::Subtle)
        );
    }
}

pub fn status_message(status: &BudgetStatus, currency: &str) -> String {
    if status.is_over() {
        format!(
            "Over budget by {}",
            ui::format_currency(status.spent - status.budget, currency)
        )
    } else {
        format!(
            "{} remaining",
            ui::format_currency(status.remaining(), currency)
        )
    }
}

fn totals_view(analytics: &Analytics, currency: &str) -> String {
    let net_style = if analytics.net_income >= 0.0 {
        ui::StyleType::Positive
    } else {
        ui::StyleType::Negative
    };
    format!(
        "{} {}   {} {}   {} {}",
        ui::style_text("Income:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(analytics.total_income, currency),
            ui::StyleType::Positive
        ),
        ui::style_text("Expenses:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(analytics.total_expenses, currency),
            ui::StyleType::Negative
        ),
        ui::style_text("Net:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(analytics.net_income, currency),
            net_style
        ),
    )
}

fn transaction_table(transactions: &[Transaction], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
    ]);
    for txn in transactions {
        table.add_row(vec![
            Cell::new(txn.id).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_date(txn.date)),
            Cell::new(&txn.description),
            Cell::new(&txn.category),
            ui::amount_cell(txn.amount, txn.kind, currency),
        ]);
    }
    table.to_string()
}

fn budget_table(statuses: &[(Option<i64>, BudgetStatus)], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Category"),
        ui::header_cell("Budget"),
        ui::header_cell("Spent"),
        ui::header_cell("Progress"),
        ui::header_cell("Status"),
    ]);
    for (id, status) in statuses {
        table.add_row(vec![
            Cell::new(id.map_or("-".to_string(), |id| id.to_string()))
                .set_alignment(CellAlignment::Right),
            Cell::new(&status.category),
            Cell::new(ui::format_currency(status.budget, currency))
                .set_alignment(CellAlignment::Right),
            Cell::new(ui::format_currency(status.spent, currency))
                .set_alignment(CellAlignment::Right),
            ui::progress_cell(status.percentage, status.level),
            Cell::new(status_message(status, currency)),
        ]);
    }
    table.to_string()
}

fn snapshot_budget_statuses(snapshot: &Snapshot) -> Vec<(Option<i64>, BudgetStatus)> {
    let transactions = snapshot.transactions.as_deref().unwrap_or_default();
    snapshot
        .budgets
        .iter()
        .map(|b| b.id)
        .zip(budget_statuses(&snapshot.budgets, transactions))
        .collect()
}

pub fn dashboard_view(snapshot: &Snapshot, currency: &str) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Dashboard", ui::StyleType::Title));

    if let Some(analytics) = &snapshot.analytics {
        output.push_str(&totals_view(analytics, currency));
        output.push_str("\n\n");
    }

    output.push_str(&ui::style_text(
        "Recent Transactions",
        ui::StyleType::TotalLabel,
    ));
    output.push('\n');
    if snapshot.recent_transactions.is_empty() {
        output.push_str(&ui::style_text(
            "No recent transactions",
            ui::StyleType::Subtle,
        ));
    } else {
        output.push_str(&transaction_table(&snapshot.recent_transactions, currency));
    }
    output.push_str("\n\n");

    output.push_str(&ui::style_text("Budget Overview", ui::StyleType::TotalLabel));
    output.push('\n');
    output.push_str(&budgets_body(snapshot, currency));

    if !snapshot.categories.is_empty() {
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("Categories:", ui::StyleType::TotalLabel),
            snapshot.categories.join(", ")
        ));
    }
    output
}

fn budgets_body(snapshot: &Snapshot, currency: &str) -> String {
    if snapshot.budgets.is_empty() {
        ui::style_text("No budgets set", ui::StyleType::Subtle)
    } else {
        budget_table(&snapshot_budget_statuses(snapshot), currency)
    }
}

pub fn budgets_view(snapshot: &Snapshot, currency: &str) -> String {
    format!(
        "{}\n\n{}",
        ui::style_text("Budgets", ui::StyleType::Title),
        budgets_body(snapshot, currency)
    )
}

fn describe_filter(filter: &TransactionFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(category) = &filter.category {
        parts.push(format!("category {category}"));
    }
    if let Some(start) = filter.start_date {
        parts.push(format!("from {}", ui::format_date(start)));
    }
    if let Some(end) = filter.end_date {
        parts.push(format!("to {}", ui::format_date(end)));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

pub fn transactions_view(
    snapshot: &Snapshot,
    filter: &TransactionFilter,
    currency: &str,
) -> String {
    let mut output = format!("{}\n", ui::style_text("Transactions", ui::StyleType::Title));
    if let Some(description) = describe_filter(filter) {
        output.push_str(&ui::style_text(
            &format!("Filtered by {description}"),
            ui::StyleType::Subtle,
        ));
        output.push('\n');
    }
    output.push('\n');

    match snapshot.transactions.as_deref() {
        Some(transactions) if !transactions.is_empty() => {
            output.push_str(&transaction_table(transactions, currency));
            output.push_str(&format!(
                "\n\n{} {}",
                ui::style_text("Count:", ui::StyleType::TotalLabel),
                transactions.len()
            ));
        }
        _ => output.push_str(&ui::style_text(
            "No transactions found",
            ui::StyleType::Subtle,
        )),
    }
    output
}

pub fn analytics_view(snapshot: &Snapshot, currency: &str) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Analytics", ui::StyleType::Title));
    let Some(analytics) = &snapshot.analytics else {
        output.push_str(&ui::style_text(
            "No analytics available",
            ui::StyleType::Subtle,
        ));
        return output;
    };

    output.push_str(&totals_view(analytics, currency));
    output.push_str("\n\n");

    output.push_str(&ui::style_text(
        "Expenses by Category",
        ui::StyleType::TotalLabel,
    ));
    output.push('\n');
    if analytics.category_expenses.is_empty() {
        output.push_str(&ui::style_text("No expenses", ui::StyleType::Subtle));
    } else {
        let mut categories: Vec<(&String, &f64)> = analytics.category_expenses.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));
        let total: f64 = categories.iter().map(|(_, amount)| **amount).sum();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell("Amount"),
            ui::header_cell("Share (%)"),
        ]);
        for (category, amount) in categories {
            let share = if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            };
            table.add_row(vec![
                Cell::new(category),
                Cell::new(ui::format_currency(*amount, currency))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
            ]);
        }
        output.push_str(&table.to_string());
    }
    output.push_str("\n\n");

    output.push_str(&ui::style_text("Monthly Trend", ui::StyleType::TotalLabel));
    output.push('\n');
    if analytics.monthly_data.is_empty() {
        output.push_str(&ui::style_text("No monthly data", ui::StyleType::Subtle));
    } else {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Month"),
            ui::header_cell("Income"),
            ui::header_cell("Expenses"),
            ui::header_cell("Net"),
        ]);
        for (month, totals) in &analytics.monthly_data {
            table.add_row(vec![
                Cell::new(month),
                Cell::new(ui::format_currency(totals.income, currency))
                    .set_alignment(CellAlignment::Right),
                Cell::new(ui::format_currency(totals.expenses, currency))
                    .set_alignment(CellAlignment::Right),
                ui::signed_cell(totals.income - totals.expenses, currency),
            ]);
        }
        output.push_str(&table.to_string());
    }
    output
}
