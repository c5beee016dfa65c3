use super::ui;
use crate::core::FinanceBackend;
use crate::core::models::HealthStatus;
use anyhow::{Context, Result};

pub fn health_view(health: &HealthStatus) -> String {
    let status = if health.is_healthy() {
        ui::style_text(&health.status, ui::StyleType::Positive)
    } else {
        ui::style_text(&health.status, ui::StyleType::Negative)
    };

    let mut output = format!(
        "{} {status}",
        ui::style_text("Backend:", ui::StyleType::TotalLabel)
    );
    if let Some(database) = &health.database {
        output.push_str(&format!(
            "\n{} {database}",
            ui::style_text("Database:", ui::StyleType::TotalLabel)
        ));
    }
    if let Some(timestamp) = &health.timestamp {
        output.push_str(&format!(
            "\n{} {}",
            ui::style_text("Checked at:", ui::StyleType::TotalLabel),
            ui::style_text(timestamp, ui::StyleType::Subtle)
        ));
    }
    if let Some(error) = &health.error {
        output.push_str(&format!(
            "\n{} {}",
            ui::style_text("Error:", ui::StyleType::TotalLabel),
            ui::style_text(error, ui::StyleType::Error)
        ));
    }
    output
}

/// Prints the backend health and fails when it is not healthy.
pub async fn run(backend: &dyn FinanceBackend) -> Result<()> {
    let spinner = ui::new_spinner("Checking backend health...");
    let result = backend.health().await;
    spinner.finish_and_clear();

    let health = result.context("Health check request failed")?;
    println!("{}", health_view(&health));

    if !health.is_healthy() {
        anyhow::bail!("Backend reported status '{}'", health.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_view_includes_error() {
        let health = HealthStatus {
            status: "unhealthy".to_string(),
            database: Some("disconnected".to_string()),
            timestamp: None,
            error: Some("connection refused".to_string()),
        };
        let output = health_view(&health);
        assert!(output.contains("unhealthy"));
        assert!(output.contains("disconnected"));
        assert!(output.contains("connection refused"));
        assert!(!output.contains("Checked at"));
    }
}
