use anyhow::Result;
use budgetboard::cli::{setup, ui};
use budgetboard::core::alert::Alert;
use budgetboard::core::log::init_logging;
use budgetboard::core::models::TransactionFilter;
use budgetboard::core::validation::{BudgetForm, CategoryForm, TransactionForm};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for budgetboard::AppCommand {
    fn from(cmd: Commands) -> budgetboard::AppCommand {
        use budgetboard::AppCommand;
        match cmd {
            Commands::Dashboard => AppCommand::Dashboard,
            Commands::Transactions { category, from, to } => {
                AppCommand::Transactions(TransactionFilter {
                    category,
                    start_date: from,
                    end_date: to,
                })
            }
            Commands::Budgets => AppCommand::Budgets,
            Commands::Analytics => AppCommand::Analytics,
            Commands::Add {
                date,
                description,
                amount,
                category,
            } => AppCommand::AddTransaction(TransactionForm {
                date,
                description,
                amount,
                category,
            }),
            Commands::Delete { id, .. } => AppCommand::DeleteTransaction(id),
            Commands::SetBudget { category, amount } => AppCommand::SetBudget(BudgetForm {
                category,
                budget: amount,
            }),
            Commands::DeleteBudget { id, .. } => AppCommand::DeleteBudget(id),
            Commands::AddCategory { name } => AppCommand::AddCategory(CategoryForm { name }),
            Commands::Health => AppCommand::Health,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display totals, recent transactions and budget overview
    Dashboard,
    /// List transactions
    Transactions {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Display budgets and their progress
    Budgets,
    /// Display income, expenses and spending breakdowns
    Analytics,
    /// Add a transaction; negative amounts are expenses
    Add {
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Delete a transaction
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Create or update the budget of a category
    SetBudget {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        amount: String,
    },
    /// Delete a budget
    DeleteBudget {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Add a category
    AddCategory { name: String },
    /// Check backend health
    Health,
}

impl Commands {
    /// Confirmation prompt for destructive commands, unless `--yes` was given.
    fn confirmation(&self) -> Option<String> {
        match self {
            Commands::Delete { id, yes: false } => {
                Some(format!("Are you sure you want to delete transaction {id}?"))
            }
            Commands::DeleteBudget { id, yes: false } => {
                Some(format!("Are you sure you want to delete budget {id}?"))
            }
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => setup::setup_at_path(path),
            None => setup::setup(),
        },
        Some(cmd) => run(cmd, cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

async fn run(cmd: Commands, config_path: Option<&str>) -> Result<()> {
    if let Some(prompt) = cmd.confirmation() {
        if !ui::confirm(&prompt)? {
            ui::print_alert(&Alert::info("Deletion cancelled"));
            return Ok(());
        }
    }
    budgetboard::run_command(cmd.into(), config_path).await
}
