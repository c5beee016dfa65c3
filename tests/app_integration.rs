use budgetboard::core::models::TransactionFilter;
use budgetboard::core::validation::{BudgetForm, TransactionForm};
use budgetboard::{AppCommand, run_command};
use std::fs;
use tempfile::NamedTempFile;
use tracing::info;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub const DASHBOARD: &str = r#"{
        "recent_transactions": [
            {"id": 2, "date": "2024-01-20", "description": "Groceries", "amount": -45.5, "category": "Food", "type": "expense"},
            {"id": 1, "date": "2024-01-01", "description": "Salary", "amount": 3000.0, "category": "Salary", "type": "income"}
        ],
        "analytics": {
            "total_income": 3000.0,
            "total_expenses": 45.5,
            "net_income": 2954.5,
            "category_expenses": {"Food": 45.5},
            "monthly_data": {"2024-01": {"income": 3000.0, "expenses": 45.5}}
        },
        "budgets": [{"id": 1, "category": "Food", "budget": 400.0, "spent": 45.5}],
        "categories": ["Food", "Salary"]
    }"#;

    pub const TRANSACTIONS: &str = r#"[
        {"id": 1, "date": "2024-01-01", "description": "Salary", "amount": 3000.0, "category": "Salary", "type": "income"},
        {"id": 2, "date": "2024-01-20", "description": "Groceries", "amount": -45.5, "category": "Food", "type": "expense"}
    ]"#;

    pub const ANALYTICS: &str = r#"{
        "total_income": 3000.0,
        "total_expenses": 45.5,
        "net_income": 2954.5,
        "category_expenses": {"Food": 45.5},
        "monthly_data": {"2024-01": {"income": 3000.0, "expenses": 45.5}}
    }"#;

    /// Config pointing at the mock server with a 1ms backoff base.
    pub fn write_config(server: &MockServer) -> NamedTempFile {
        let config_file = NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            api:
              base_url: "{}"
              retries: 3
              backoff_base_ms: 1
              timeout_secs: 5
            currency: "USD"
            "#,
            server.uri()
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }

    pub async fn mount_json(server: &MockServer, url_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(server)
            .await;
    }

    pub fn path_of(config: &NamedTempFile) -> &str {
        config.path().to_str().expect("temp path is valid UTF-8")
    }
}

use test_utils::*;

#[test_log::test(tokio::test)]
async fn test_dashboard_uses_combined_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(DASHBOARD, "application/json"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/budgets"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let config = write_config(&server);

    let result = run_command(AppCommand::Dashboard, Some(path_of(&config))).await;
    assert!(result.is_ok(), "Dashboard failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_dashboard_falls_back_to_separate_endpoints() {
    let server = MockServer::start().await;
    // One initial attempt plus three retries
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;
    mount_json(&server, "/api/categories", r#"["Food", "Salary"]"#).await;
    mount_json(&server, "/api/analytics", ANALYTICS).await;
    mount_json(
        &server,
        "/api/budgets",
        r#"[{"id": 1, "category": "Food", "budget": 400.0, "spent": 45.5}]"#,
    )
    .await;
    mount_json(&server, "/api/transactions", TRANSACTIONS).await;
    let config = write_config(&server);

    let result = run_command(AppCommand::Budgets, Some(path_of(&config))).await;
    assert!(result.is_ok(), "Fallback failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_initialization_fails_when_both_paths_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let config = write_config(&server);

    let result = run_command(AppCommand::Dashboard, Some(path_of(&config))).await;
    let err = result.expect_err("initialization should fail");
    info!(error = %err, "Initialization failed as expected");
    assert!(err.to_string().contains("Error loading application data"));
}

#[test_log::test(tokio::test)]
async fn test_add_transaction_refreshes_before_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .and(body_json(serde_json::json!({
            "date": "2024-01-20",
            "description": "Groceries",
            "amount": -45.5,
            "category": "Food"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id": 2}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(DASHBOARD, "application/json"))
        .expect(1)
        .mount(&server)
        .await;
    let config = write_config(&server);

    let form = TransactionForm {
        date: "2024-01-20".to_string(),
        description: "Groceries".to_string(),
        amount: "-45.50".to_string(),
        category: "Food".to_string(),
    };
    let result = run_command(AppCommand::AddTransaction(form), Some(path_of(&config))).await;
    assert!(result.is_ok(), "Submit failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_never_reaches_backend() {
    let server = MockServer::start().await;
    let config = write_config(&server);

    for amount in ["", "abc"] {
        let form = TransactionForm {
            date: "2024-01-20".to_string(),
            description: "Groceries".to_string(),
            amount: amount.to_string(),
            category: "Food".to_string(),
        };
        let result = run_command(AppCommand::AddTransaction(form), Some(path_of(&config))).await;
        assert!(result.is_err(), "amount {amount:?} should be rejected");
    }

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "unexpected requests: {requests:?}");
}

#[test_log::test(tokio::test)]
async fn test_failed_budget_submission_skips_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/budgets"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(DASHBOARD, "application/json"))
        .expect(0)
        .mount(&server)
        .await;
    let config = write_config(&server);

    let form = BudgetForm {
        category: "Food".to_string(),
        budget: "400".to_string(),
    };
    let result = run_command(AppCommand::SetBudget(form), Some(path_of(&config))).await;
    let err = result.expect_err("submission should fail");
    assert!(err.to_string().contains("budget"), "unexpected error: {err}");
}

#[test_log::test(tokio::test)]
async fn test_filtered_transactions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .and(query_param("no_pagination", "true"))
        .and(query_param("category", "Food"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id": 2, "date": "2024-01-20", "description": "Groceries", "amount": -45.5, "category": "Food", "type": "expense"}]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let config = write_config(&server);

    let filter = TransactionFilter {
        category: Some("Food".to_string()),
        ..TransactionFilter::default()
    };
    let result = run_command(AppCommand::Transactions(filter), Some(path_of(&config))).await;
    assert!(result.is_ok(), "Transactions failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_health_command() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/health",
        r#"{"status": "healthy", "database": "connected", "timestamp": "2024-01-20T10:00:00"}"#,
    )
    .await;
    let config = write_config(&server);

    let result = run_command(AppCommand::Health, Some(path_of(&config))).await;
    assert!(result.is_ok(), "Health failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_reported() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.yaml");

    let result = run_command(AppCommand::Dashboard, missing.to_str()).await;
    let err = result.expect_err("missing config should fail");
    assert!(err.to_string().contains("Failed to read config file"));
}
