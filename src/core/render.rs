//! Rendering surface driven by the refresh orchestrator

use crate::core::error::AppError;
use crate::core::models::TransactionFilter;
use crate::store::Snapshot;
use std::fmt::Display;

/// Visible part of the application.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Transactions(TransactionFilter),
    Budgets,
    Analytics,
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Section::Dashboard => "dashboard",
                Section::Transactions(_) => "transactions",
                Section::Budgets => "budgets",
                Section::Analytics => "analytics",
            }
        )
    }
}

pub trait Renderer {
    /// Called when a load starts; the next `render` or `render_failure` ends it.
    fn loading(&mut self, _message: &str) {}

    fn render(&mut self, snapshot: &Snapshot, section: &Section);

    /// Blocking failure state after the initial load could not complete.
    fn render_failure(&mut self, error: &AppError);
}
