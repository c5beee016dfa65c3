//! Keeps the local snapshot in step with the finance API.
//!
//! A full load first tries the combined dashboard endpoint and falls back to
//! fetching categories, analytics, budgets and transactions separately. Every
//! successful mutation is followed by a full load before it is reported as
//! done, and switching to the transactions or analytics section re-fetches
//! only what that section shows.
//!
//! Submissions hold a per-form guard while in flight, the equivalent of a
//! disabled submit button. With `&mut self` on every operation the
//! orchestrator itself never overlaps two submissions; the guard rejects a
//! submission with `AppError::Busy` when a caller still holds one for that
//! form.

use crate::core::alert::{Alert, Notifier};
use crate::core::backend::FinanceBackend;
use crate::core::budget::check_consistency;
use crate::core::error::{AppError, FetchError, FormKind, ValidationError};
use crate::core::models::{Budget, Transaction, TransactionFilter};
use crate::core::render::{Renderer, Section};
use crate::core::validation::{BudgetForm, CategoryForm, TransactionForm};
use crate::store::{Snapshot, SnapshotUpdate, StateStore, recent_transactions};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Which strategy satisfied a full load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPath {
    Combined,
    Fallback,
}

/// Marks a form as submitting until dropped.
#[derive(Debug)]
pub struct SubmitGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One in-flight flag per form. A held guard makes further submissions of
/// that form fail with `AppError::Busy` without a request.
#[derive(Debug, Default)]
pub struct SubmitGuards {
    flags: HashMap<FormKind, Arc<AtomicBool>>,
}

impl SubmitGuards {
    pub fn try_acquire(&mut self, kind: FormKind) -> Option<SubmitGuard> {
        let flag = self.flags.entry(kind).or_default();
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard {
                flag: Arc::clone(flag),
            })
    }

    pub fn is_submitting(&self, kind: FormKind) -> bool {
        self.flags
            .get(&kind)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}

struct Mutation {
    kind: FormKind,
    action: &'static str,
    success: &'static str,
    failure: &'static str,
}

const ADD_TRANSACTION: Mutation = Mutation {
    kind: FormKind::Transaction,
    action: "Adding transaction",
    success: "Transaction added successfully",
    failure: "Error adding transaction",
};

const DELETE_TRANSACTION: Mutation = Mutation {
    kind: FormKind::DeleteTransaction,
    action: "Deleting transaction",
    success: "Transaction deleted successfully",
    failure: "Error deleting transaction",
};

const SET_BUDGET: Mutation = Mutation {
    kind: FormKind::Budget,
    action: "Setting budget",
    success: "Budget set successfully",
    failure: "Error setting budget",
};

const DELETE_BUDGET: Mutation = Mutation {
    kind: FormKind::DeleteBudget,
    action: "Deleting budget",
    success: "Budget deleted successfully",
    failure: "Error deleting budget",
};

const ADD_CATEGORY: Mutation = Mutation {
    kind: FormKind::Category,
    action: "Adding category",
    success: "Category added successfully",
    failure: "Error adding category",
};

pub struct RefreshOrchestrator<R: Renderer> {
    backend: Arc<dyn FinanceBackend>,
    store: StateStore,
    renderer: R,
    notifier: Notifier,
    section: Section,
    load_state: LoadState,
    submissions: SubmitGuards,
}

impl<R: Renderer> RefreshOrchestrator<R> {
    pub fn new(backend: Arc<dyn FinanceBackend>, renderer: R, notifier: Notifier) -> Self {
        RefreshOrchestrator {
            backend,
            store: StateStore::new(),
            renderer,
            notifier,
            section: Section::default(),
            load_state: LoadState::Idle,
            submissions: SubmitGuards::default(),
        }
    }

    /// Section shown by the first render, without fetching anything for it.
    pub fn with_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.get()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Initial full load. Failure of both strategies leaves the store as it
    /// was and puts the application in a failed state.
    pub async fn initialize(&mut self) -> Result<RefreshPath, AppError> {
        info!("Loading application data");
        self.load_state = LoadState::Loading;
        self.renderer.loading("Loading dashboard...");

        match self.full_refresh().await {
            Ok((path, update)) => {
                self.store.replace(update);
                self.load_state = LoadState::Ready;
                self.render();
                Ok(path)
            }
            Err((combined, fallback)) => {
                let err = AppError::Initialization { combined, fallback };
                self.load_state = LoadState::Failed(err.to_string());
                self.notifier
                    .show(Alert::danger("Error loading application data"));
                self.renderer.render_failure(&err);
                Err(err)
            }
        }
    }

    /// Switches the visible section, re-fetching the data it depends on.
    /// On failure the previous data stays visible.
    pub async fn show_section(&mut self, section: Section) -> Result<(), AppError> {
        debug!(%section, "Showing section");
        self.section = section;

        let fetched = match &self.section {
            Section::Transactions(filter) => {
                self.renderer.loading("Loading transactions...");
                let budgets = self.store.get().budgets.clone();
                self.fetch_transactions(filter, &budgets)
                    .await
                    .map(|transactions| SnapshotUpdate {
                        transactions: Some(transactions),
                        ..SnapshotUpdate::default()
                    })
            }
            Section::Analytics => {
                self.renderer.loading("Loading analytics...");
                self.backend.analytics().await.map(|analytics| SnapshotUpdate {
                    analytics: Some(analytics),
                    ..SnapshotUpdate::default()
                })
            }
            Section::Dashboard | Section::Budgets => Ok(SnapshotUpdate::default()),
        };

        match fetched {
            Ok(update) => {
                self.store.replace(update);
                self.render();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, section = %self.section, "Section refresh failed");
                self.notifier
                    .show(Alert::danger(format!("Error loading {}", self.section)));
                self.render();
                Err(AppError::Refresh(e))
            }
        }
    }

    pub async fn submit_transaction(&mut self, form: &TransactionForm) -> Result<(), AppError> {
        let body = self.validated(form.validate())?;
        self.mutate(&ADD_TRANSACTION, move |backend| async move {
            backend.create_transaction(&body).await
        })
        .await
    }

    pub async fn delete_transaction(&mut self, id: i64) -> Result<(), AppError> {
        self.mutate(&DELETE_TRANSACTION, move |backend| async move {
            backend.delete_transaction(id).await
        })
        .await
    }

    pub async fn submit_budget(&mut self, form: &BudgetForm) -> Result<(), AppError> {
        let body = self.validated(form.validate())?;
        self.mutate(&SET_BUDGET, move |backend| async move {
            backend.upsert_budget(&body).await
        })
        .await
    }

    pub async fn delete_budget(&mut self, id: i64) -> Result<(), AppError> {
        self.mutate(&DELETE_BUDGET, move |backend| async move {
            backend.delete_budget(id).await
        })
        .await
    }

    pub async fn submit_category(&mut self, form: &CategoryForm) -> Result<(), AppError> {
        let body = self.validated(form.validate())?;
        self.mutate(&ADD_CATEGORY, move |backend| async move {
            backend.create_category(&body).await
        })
        .await
    }

    fn validated<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, AppError> {
        result.map_err(|e| {
            debug!(error = %e, "Submission rejected before sending");
            self.notifier.show(Alert::warning(e.to_string()));
            AppError::Validation(e)
        })
    }

    async fn mutate<F, Fut>(&mut self, mutation: &Mutation, send: F) -> Result<(), AppError>
    where
        F: FnOnce(Arc<dyn FinanceBackend>) -> Fut,
        Fut: Future<Output = Result<(), FetchError>>,
    {
        let Some(_guard) = self.submissions.try_acquire(mutation.kind) else {
            self.notifier.show(Alert::warning(format!(
                "A {} submission is already in progress",
                mutation.kind
            )));
            return Err(AppError::Busy(mutation.kind));
        };

        info!("{}", mutation.action);
        if let Err(source) = send(Arc::clone(&self.backend)).await {
            warn!(error = %source, "{} failed", mutation.action);
            self.notifier.show(Alert::danger(mutation.failure));
            return Err(AppError::Mutation {
                action: mutation.action,
                source,
            });
        }

        self.refresh_after_mutation().await?;
        self.notifier.show(Alert::success(mutation.success));
        Ok(())
    }

    /// Full reload after a mutation. The full transaction list is re-fetched
    /// too when one is held, so it never lags behind the aggregates. The
    /// store is only written once every request has succeeded.
    async fn refresh_after_mutation(&mut self) -> Result<(), AppError> {
        let had_full_list = self.store.get().transactions.is_some();

        let mut update = match self.full_refresh().await {
            Ok((_, update)) => update,
            Err((_, fallback)) => return Err(self.stale_refresh(fallback)),
        };

        if had_full_list {
            let filter = match &self.section {
                Section::Transactions(filter) => filter.clone(),
                _ => TransactionFilter::default(),
            };
            // The fallback path already carries the unfiltered list
            if update.transactions.is_none() || filter != TransactionFilter::default() {
                let budgets = update.budgets.clone().unwrap_or_default();
                match self.fetch_transactions(&filter, &budgets).await {
                    Ok(transactions) => update.transactions = Some(transactions),
                    Err(e) => return Err(self.stale_refresh(e)),
                }
            }
        }

        self.store.replace(update);
        self.load_state = LoadState::Ready;
        self.render();
        Ok(())
    }

    fn stale_refresh(&mut self, error: FetchError) -> AppError {
        warn!(error = %error, "Refresh failed, keeping previous data");
        self.notifier.show(Alert::danger(format!(
            "Saved, but refreshing failed: {error}"
        )));
        self.render();
        AppError::Refresh(error)
    }

    /// Combined path, then fallback. Nothing is written to the store; the
    /// caller applies the returned update.
    async fn full_refresh(
        &self,
    ) -> Result<(RefreshPath, SnapshotUpdate), (FetchError, FetchError)> {
        let combined = match self.backend.dashboard().await {
            Ok(data) => {
                let update = SnapshotUpdate {
                    transactions: None,
                    recent_transactions: Some(data.recent_transactions),
                    budgets: Some(data.budgets),
                    categories: Some(data.categories),
                    analytics: Some(data.analytics),
                };
                return Ok((RefreshPath::Combined, update));
            }
            Err(e) => e,
        };

        warn!(error = %combined, "Dashboard request failed, falling back to separate requests");
        match self.fetch_separately().await {
            Ok(update) => Ok((RefreshPath::Fallback, update)),
            Err(fallback) => Err((combined, fallback)),
        }
    }

    async fn fetch_separately(&self) -> Result<SnapshotUpdate, FetchError> {
        let everything = TransactionFilter::default();
        let (categories, analytics, budgets, transactions) = futures::try_join!(
            self.backend.categories(),
            self.backend.analytics(),
            self.backend.budgets(),
            self.backend.transactions(&everything),
        )?;

        check_consistency(&transactions, &budgets, Some(&analytics));
        Ok(SnapshotUpdate {
            recent_transactions: Some(recent_transactions(&transactions)),
            transactions: Some(transactions),
            budgets: Some(budgets),
            categories: Some(categories),
            analytics: Some(analytics),
        })
    }

    /// Fetches `filter`'s list. An unfiltered list is checked against
    /// `budgets` before it is returned.
    async fn fetch_transactions(
        &self,
        filter: &TransactionFilter,
        budgets: &[Budget],
    ) -> Result<Vec<Transaction>, FetchError> {
        let transactions = self.backend.transactions(filter).await?;
        if filter == &TransactionFilter::default() {
            check_consistency(&transactions, budgets, None);
        }
        Ok(transactions)
    }

    fn render(&mut self) {
        let snapshot = self.store.get();
        self.renderer.render(&snapshot, &self.section);
    }
}
