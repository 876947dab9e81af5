//! The state behind the transactions page.
//!
//! The controller caches the latest backend results for one user session and
//! derives the table from them: which rows match the filters, how many are
//! disclosed, and which are selected. Every mutation goes through the backend
//! and is followed by a wholesale re-fetch so the cache never drifts from the
//! backend's state.

use std::{
    collections::BTreeSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    api::{ApiError, CashbookApi, DashboardResponse},
    pagination::PaginationConfig,
    transaction::{FilterSet, Transaction, TransactionFields, TransactionId},
};

/// Where the controller is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been requested yet.
    Initial,
    /// A refresh is in flight.
    Loading,
    /// The cache holds the result of the latest completed refresh, or the
    /// previous state if that refresh failed.
    Ready,
}

/// What happened to the result of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The results replaced the cached state.
    Applied,
    /// A newer refresh was started before this one finished, so its results
    /// were discarded.
    Superseded,
}

/// Errors from controller operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ControllerError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A bulk delete was requested with no rows selected.
    #[error("no transactions are selected")]
    NothingSelected,
}

impl ControllerError {
    /// Whether the user must log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ControllerError::Api(error) if error.is_unauthorized())
    }
}

/// The result of a best-effort bulk delete.
#[derive(Debug, Default, PartialEq)]
pub struct BulkDeleteReport {
    /// The transactions the backend deleted.
    pub deleted: Vec<TransactionId>,
    /// The transactions the backend refused to delete and why.
    pub failed: Vec<(TransactionId, ApiError)>,
    /// Set if the re-fetch after the deletes failed.
    pub refresh_error: Option<ControllerError>,
}

impl BulkDeleteReport {
    /// Whether any backend call was rejected because the session expired.
    pub fn requires_log_in(&self) -> bool {
        self.failed.iter().any(|(_, error)| error.is_unauthorized())
            || self
                .refresh_error
                .as_ref()
                .is_some_and(ControllerError::is_unauthorized)
    }
}

/// A consistent copy of what the transactions page should render.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionView {
    /// The load phase at the time of the snapshot.
    pub phase: Phase,
    /// The filters the cache was loaded with.
    pub filters: FilterSet,
    /// The disclosed rows in backend order.
    pub rows: Vec<Transaction>,
    /// The selected rows among `rows`.
    pub selected_ids: BTreeSet<TransactionId>,
    /// The number of transactions that match the filters.
    pub filtered_count: usize,
    /// The summary and charts for the filters.
    pub dashboard: DashboardResponse,
}

impl TransactionView {
    /// Whether more matching rows exist than are shown.
    pub fn has_more(&self) -> bool {
        self.rows.len() < self.filtered_count
    }

    /// Whether `transaction_id` is selected.
    pub fn is_selected(&self, transaction_id: &TransactionId) -> bool {
        self.selected_ids.contains(transaction_id)
    }

    /// Whether every shown row is selected. False when no rows are shown.
    pub fn all_rows_selected(&self) -> bool {
        !self.rows.is_empty() && self.selected_ids.len() == self.rows.len()
    }
}

#[derive(Debug)]
struct ViewState {
    phase: Phase,
    filters: FilterSet,
    all_transactions: Vec<Transaction>,
    dashboard: DashboardResponse,
    displayed_count: usize,
    selected_ids: BTreeSet<TransactionId>,
    latest_request: u64,
}

impl ViewState {
    fn new(pagination: PaginationConfig) -> Self {
        Self {
            phase: Phase::Initial,
            filters: FilterSet::default(),
            all_transactions: Vec::new(),
            dashboard: DashboardResponse::default(),
            displayed_count: pagination.initial_page_size,
            selected_ids: BTreeSet::new(),
            latest_request: 0,
        }
    }

    fn filtered(&self) -> impl Iterator<Item = &Transaction> {
        self.all_transactions
            .iter()
            .filter(|transaction| self.filters.matches(transaction))
    }

    fn filtered_count(&self) -> usize {
        self.filtered().count()
    }

    fn rows(&self) -> impl Iterator<Item = &Transaction> {
        self.filtered().take(self.displayed_count)
    }

    fn is_shown(&self, transaction_id: &TransactionId) -> bool {
        self.rows()
            .any(|transaction| &transaction.transaction_id == transaction_id)
    }
}

/// Coordinates the transaction table and the dashboard summary for one user.
///
/// Methods take `&self` so one controller can be shared between concurrent
/// requests. The internal lock is never held across a backend call.
#[derive(Debug)]
pub struct TransactionViewController<A> {
    api: A,
    pagination: PaginationConfig,
    state: Mutex<ViewState>,
}

impl<A: CashbookApi> TransactionViewController<A> {
    /// Create a controller with an empty cache. Call [Self::refresh] to load it.
    pub fn new(api: A, pagination: PaginationConfig) -> Self {
        Self {
            api,
            pagination,
            state: Mutex::new(ViewState::new(pagination)),
        }
    }

    /// The backend this controller reads from and writes to.
    pub fn api(&self) -> &A {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // The state is replaced wholesale under the lock, so it is never
        // observed half-written even after a panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-fetch the summary and transactions with the current filters.
    ///
    /// Both requests run concurrently and their results are applied together
    /// or not at all. On success the rows shown are reset to the first page
    /// and the selection is cleared. On failure the cached state is kept.
    ///
    /// # Errors
    /// Returns [ControllerError::Api] if either request fails.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ControllerError> {
        let filters = self.lock().filters.clone();

        self.load(filters).await
    }

    /// Replace the filters and refresh.
    ///
    /// The new filters only take effect if the refresh succeeds.
    ///
    /// # Errors
    /// Returns [ControllerError::Api] if either request fails.
    pub async fn apply_filter(&self, filters: FilterSet) -> Result<RefreshOutcome, ControllerError> {
        self.load(filters).await
    }

    async fn load(&self, filters: FilterSet) -> Result<RefreshOutcome, ControllerError> {
        let request = {
            let mut state = self.lock();
            state.latest_request += 1;
            state.phase = Phase::Loading;
            state.latest_request
        };
        tracing::debug!(request, ?filters, "refreshing transactions");

        let (dashboard, transactions) = tokio::join!(
            self.api.dashboard(&filters),
            self.api.transactions(&filters)
        );

        let mut state = self.lock();

        if request != state.latest_request {
            tracing::debug!(
                request,
                latest_request = state.latest_request,
                "discarding superseded refresh"
            );
            return Ok(RefreshOutcome::Superseded);
        }

        match (dashboard, transactions) {
            (Ok(dashboard), Ok(transactions)) => {
                state.phase = Phase::Ready;
                state.filters = filters;
                state.all_transactions = transactions;
                state.dashboard = dashboard;
                state.displayed_count = self.pagination.initial_page_size;
                state.selected_ids.clear();

                Ok(RefreshOutcome::Applied)
            }
            (Err(error), _) | (_, Err(error)) => {
                state.phase = Phase::Ready;
                tracing::warn!("Could not refresh transactions: {error}");

                Err(error.into())
            }
        }
    }

    /// Disclose the next page of rows.
    ///
    /// Does nothing once every matching row is shown.
    /// Returns whether further rows remain hidden.
    pub fn load_more(&self) -> bool {
        let mut state = self.lock();
        let total = state.filtered_count();

        if state.displayed_count < total {
            state.displayed_count = self.pagination.next_count(state.displayed_count, total);
        }

        state.displayed_count < total
    }

    /// Select or deselect a shown row.
    ///
    /// IDs that are not currently shown are ignored.
    /// Returns the number of selected rows.
    pub fn toggle_row_selection(&self, transaction_id: &TransactionId, selected: bool) -> usize {
        let mut state = self.lock();

        if !state.is_shown(transaction_id) {
            tracing::debug!("Ignoring selection of hidden transaction {transaction_id}");
        } else if selected {
            state.selected_ids.insert(transaction_id.clone());
        } else {
            state.selected_ids.remove(transaction_id);
        }

        state.selected_ids.len()
    }

    /// Select or deselect every shown row. Hidden rows are never selected.
    ///
    /// Returns the number of selected rows.
    pub fn toggle_select_all(&self, selected: bool) -> usize {
        let mut state = self.lock();

        if selected {
            let shown: Vec<TransactionId> = state
                .rows()
                .map(|transaction| transaction.transaction_id.clone())
                .collect();
            state.selected_ids.extend(shown);
        } else {
            state.selected_ids.clear();
        }

        state.selected_ids.len()
    }

    /// Delete every selected transaction, one request at a time.
    ///
    /// A failed delete does not stop the rest. Afterwards the selection is
    /// cleared and the cache is refreshed regardless of how many succeeded.
    ///
    /// # Errors
    /// Returns [ControllerError::NothingSelected] without contacting the
    /// backend if no rows are selected. Per-row failures are reported in the
    /// [BulkDeleteReport] rather than as an error.
    pub async fn bulk_delete(&self) -> Result<BulkDeleteReport, ControllerError> {
        let selected_ids: Vec<TransactionId> = self.lock().selected_ids.iter().cloned().collect();

        if selected_ids.is_empty() {
            return Err(ControllerError::NothingSelected);
        }

        let mut report = BulkDeleteReport::default();

        for transaction_id in selected_ids {
            match self.api.delete_transaction(&transaction_id).await {
                Ok(()) => report.deleted.push(transaction_id),
                Err(error) => {
                    tracing::warn!("Could not delete transaction {transaction_id}: {error}");
                    report.failed.push((transaction_id, error));
                }
            }
        }

        tracing::info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "bulk delete finished"
        );

        self.lock().selected_ids.clear();
        report.refresh_error = self.refresh().await.err();

        Ok(report)
    }

    /// Delete a single transaction and refresh.
    ///
    /// # Errors
    /// Returns [ControllerError::Api] if the backend refuses the delete, in
    /// which case the cache is left as is.
    pub async fn delete_transaction(&self, transaction_id: &TransactionId) -> Result<(), ControllerError> {
        self.api.delete_transaction(transaction_id).await?;
        self.refresh_after_write().await;

        Ok(())
    }

    /// Record a new transaction and refresh.
    ///
    /// # Errors
    /// Returns [ControllerError::Api] if the backend refuses the transaction,
    /// in which case the cache is left as is.
    pub async fn create_transaction(&self, fields: &TransactionFields) -> Result<(), ControllerError> {
        self.api.create_transaction(fields).await?;
        self.refresh_after_write().await;

        Ok(())
    }

    /// Replace the fields of an existing transaction and refresh.
    ///
    /// # Errors
    /// Returns [ControllerError::Api] if the backend refuses the update, in
    /// which case the cache is left as is.
    pub async fn edit_transaction(
        &self,
        transaction_id: &TransactionId,
        fields: &TransactionFields,
    ) -> Result<(), ControllerError> {
        self.api.update_transaction(transaction_id, fields).await?;
        self.refresh_after_write().await;

        Ok(())
    }

    /// The write already succeeded, so a failed re-fetch only means the cache
    /// is stale until the next page load.
    async fn refresh_after_write(&self) {
        if let Err(error) = self.refresh().await {
            tracing::debug!("Keeping stale transactions after write: {error}");
        }
    }

    /// The cached transaction with `transaction_id`, whether shown or not.
    pub fn find(&self, transaction_id: &TransactionId) -> Option<Transaction> {
        self.lock()
            .all_transactions
            .iter()
            .find(|transaction| &transaction.transaction_id == transaction_id)
            .cloned()
    }

    /// The number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.lock().selected_ids.len()
    }

    /// The current load phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// A consistent copy of the state for rendering.
    pub fn snapshot(&self) -> TransactionView {
        let state = self.lock();
        let rows: Vec<Transaction> = state.rows().cloned().collect();
        let selected_ids = state
            .selected_ids
            .iter()
            .filter(|transaction_id| {
                rows.iter()
                    .any(|transaction| &&transaction.transaction_id == transaction_id)
            })
            .cloned()
            .collect();

        TransactionView {
            phase: state.phase,
            filters: state.filters.clone(),
            rows,
            selected_ids,
            filtered_count: state.filtered_count(),
            dashboard: state.dashboard.clone(),
        }
    }
}
