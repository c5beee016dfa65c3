use super::client::{ApiClient, RequestOptions};
use crate::core::backend::FinanceBackend;
use crate::core::error::FetchError;
use crate::core::models::{
    Analytics, Budget, DashboardData, HealthStatus, NewBudget, NewCategory, NewTransaction,
    Transaction, TransactionFilter, TransactionsPayload,
};
use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

/// `FinanceBackend` over the JSON REST API.
pub struct RestBackend {
    client: ApiClient,
}

impl RestBackend {
    pub fn new(client: ApiClient) -> Self {
        RestBackend { client }
    }
}

#[async_trait]
impl FinanceBackend for RestBackend {
    #[instrument(name = "DashboardFetch", skip(self))]
    async fn dashboard(&self) -> Result<DashboardData, FetchError> {
        self.client.get_json("/api/dashboard", vec![]).await
    }

    #[instrument(name = "CategoriesFetch", skip(self))]
    async fn categories(&self) -> Result<Vec<String>, FetchError> {
        self.client.get_json("/api/categories", vec![]).await
    }

    #[instrument(name = "AnalyticsFetch", skip(self))]
    async fn analytics(&self) -> Result<Analytics, FetchError> {
        self.client.get_json("/api/analytics", vec![]).await
    }

    #[instrument(name = "BudgetsFetch", skip(self))]
    async fn budgets(&self) -> Result<Vec<Budget>, FetchError> {
        self.client.get_json("/api/budgets", vec![]).await
    }

    #[instrument(name = "TransactionsFetch", skip(self))]
    async fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, FetchError> {
        let payload: TransactionsPayload = self
            .client
            .get_json("/api/transactions", filter.to_query())
            .await?;
        Ok(payload.into_transactions())
    }

    #[instrument(name = "TransactionCreate", skip(self, transaction), fields(description = %transaction.description))]
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), FetchError> {
        self.client
            .send_json(Method::POST, "/api/transactions", transaction)
            .await
    }

    #[instrument(name = "TransactionDelete", skip(self))]
    async fn delete_transaction(&self, id: i64) -> Result<(), FetchError> {
        let endpoint = format!("/api/transactions/{id}");
        self.client
            .request(&endpoint, RequestOptions::delete())
            .await?;
        Ok(())
    }

    #[instrument(name = "BudgetUpsert", skip(self, budget), fields(category = %budget.category))]
    async fn upsert_budget(&self, budget: &NewBudget) -> Result<(), FetchError> {
        self.client
            .send_json(Method::POST, "/api/budgets", budget)
            .await
    }

    #[instrument(name = "BudgetDelete", skip(self))]
    async fn delete_budget(&self, id: i64) -> Result<(), FetchError> {
        let endpoint = format!("/api/budgets/{id}");
        self.client
            .request(&endpoint, RequestOptions::delete())
            .await?;
        Ok(())
    }

    #[instrument(name = "CategoryCreate", skip(self, category), fields(name = %category.name))]
    async fn create_category(&self, category: &NewCategory) -> Result<(), FetchError> {
        self.client
            .send_json(Method::POST, "/api/categories", category)
            .await
    }

    #[instrument(name = "HealthCheck", skip(self))]
    async fn health(&self) -> Result<HealthStatus, FetchError> {
        self.client.get_json("/health", vec![]).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::util::testing::RecordingSleeper;
    use super::*;
    use crate::core::config::ApiConfig;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> RestBackend {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        let client =
            ApiClient::with_sleeper(&config, Arc::new(RecordingSleeper::default())).unwrap();
        RestBackend::new(client)
    }

    #[tokio::test]
    async fn test_fetch_filtered_transactions() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/transactions"))
            .and(query_param("no_pagination", "true"))
            .and(query_param("category", "Food"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id": 3, "date": "2025-04-01", "description": "Lunch", "amount": -12.0, "category": "Food", "type": "expense"}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let filter = TransactionFilter {
            category: Some("Food".to_string()),
            ..TransactionFilter::default()
        };
        let list = backend.transactions(&filter).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].description, "Lunch");
    }

    #[tokio::test]
    async fn test_delete_ignores_response_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/transactions/17"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/budgets/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success": true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        backend.delete_transaction(17).await.unwrap();
        backend.delete_budget(2).await.unwrap();
    }

    #[tokio::test]
    async fn test_health_reports_unhealthy_database() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status": "unhealthy", "database": "disconnected", "error": "no such table", "timestamp": "2025-05-01T12:00:00"}"#,
            ))
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let health = backend.health().await.unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.database.as_deref(), Some("disconnected"));
        assert_eq!(health.error.as_deref(), Some("no such table"));
    }
}
