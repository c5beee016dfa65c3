use crate::core::alert::{Alert, AlertLevel};
use crate::core::budget::ProgressLevel;
use crate::core::models::TransactionType;
use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Positive,
    Negative,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Formats an amount with two decimals, thousands separators and the
/// currency symbol, e.g. `-$1,234.50`. Unknown codes are appended instead.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let negative = amount < 0.0 && fixed != "0.00";
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}.{fraction} {currency}"),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Amount cell colored by transaction type. Expenses are shown negative.
pub fn amount_cell(amount: f64, kind: TransactionType, currency: &str) -> Cell {
    let (text, color) = match kind {
        TransactionType::Income => (format_currency(amount.abs(), currency), Color::Green),
        TransactionType::Expense => (format_currency(-amount.abs(), currency), Color::Red),
    };
    Cell::new(text)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for a signed total, green when non-negative.
pub fn signed_cell(value: f64, currency: &str) -> Cell {
    let color = if value >= 0.0 { Color::Green } else { Color::Red };
    Cell::new(format_currency(value, currency))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn progress_cell(percentage: f64, level: ProgressLevel) -> Cell {
    let color = match level {
        ProgressLevel::Success => Color::Green,
        ProgressLevel::Warning => Color::Yellow,
        ProgressLevel::Danger => Color::Red,
    };
    Cell::new(format!("{} {percentage:.1}%", progress_bar(percentage)))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Ten-step text bar, capped at full.
pub fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 10.0).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

/// Creates a spinner shown while a request is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn format_alert(alert: &Alert) -> String {
    let styled = match alert.level {
        AlertLevel::Success => style(format!("✔ {}", alert.message)).green(),
        AlertLevel::Info => style(format!("ℹ {}", alert.message)).cyan(),
        AlertLevel::Warning => style(format!("! {}", alert.message)).yellow(),
        AlertLevel::Danger => style(format!("✖ {}", alert.message)).red().bold(),
    };
    styled.to_string()
}

pub fn print_alert(alert: &Alert) {
    match alert.level {
        AlertLevel::Success | AlertLevel::Info => println!("{}", format_alert(alert)),
        AlertLevel::Warning | AlertLevel::Danger => eprintln!("{}", format_alert(alert)),
    }
}

/// Asks a yes/no question on the terminal. Anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    let term = console::Term::stderr();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
