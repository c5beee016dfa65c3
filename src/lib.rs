pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::alert::Notifier;
use crate::core::config::AppConfig;
use crate::core::models::TransactionFilter;
use crate::core::validation::{BudgetForm, CategoryForm, TransactionForm};
use crate::core::{FinanceBackend, RefreshOrchestrator, Section};
use crate::providers::{ApiClient, RestBackend};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Dashboard,
    Transactions(TransactionFilter),
    Budgets,
    Analytics,
    AddTransaction(TransactionForm),
    DeleteTransaction(i64),
    SetBudget(BudgetForm),
    DeleteBudget(i64),
    AddCategory(CategoryForm),
    Health,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("budgetboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let client = ApiClient::new(&config.api).context("Failed to build HTTP client")?;
    let backend: Arc<dyn FinanceBackend> = Arc::new(RestBackend::new(client));

    if let AppCommand::Health = command {
        return cli::health::run(backend.as_ref()).await;
    }

    let renderer = cli::TableRenderer::new(&config.currency);
    let notifier = Notifier::new(config.alert_timeout());
    let mut orchestrator = RefreshOrchestrator::new(backend, renderer, notifier);

    let result = match command {
        AppCommand::Dashboard => orchestrator.initialize().await.map(|_| ()),
        AppCommand::Budgets => {
            orchestrator = orchestrator.with_section(Section::Budgets);
            orchestrator.initialize().await.map(|_| ())
        }
        AppCommand::Transactions(filter) => {
            orchestrator
                .show_section(Section::Transactions(filter))
                .await
        }
        AppCommand::Analytics => orchestrator.show_section(Section::Analytics).await,
        AppCommand::AddTransaction(form) => orchestrator.submit_transaction(&form).await,
        AppCommand::DeleteTransaction(id) => orchestrator.delete_transaction(id).await,
        AppCommand::SetBudget(form) => orchestrator.submit_budget(&form).await,
        AppCommand::DeleteBudget(id) => orchestrator.delete_budget(id).await,
        AppCommand::AddCategory(form) => orchestrator.submit_category(&form).await,
        AppCommand::Health => unreachable!("Health is handled before the orchestrator is built"),
    };

    if let Some(alert) = orchestrator.notifier().current() {
        cli::ui::print_alert(alert);
    }

    Ok(result?)
}
