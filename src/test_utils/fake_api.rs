use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    api::{ApiError, BankBalance, CashbookApi, CategoryAmount, DashboardResponse, DashboardSummary},
    transaction::{FilterSet, Transaction, TransactionFields, TransactionId, TransactionType},
};

#[derive(Debug, Default)]
struct FakeState {
    transactions: Vec<Transaction>,
    next_id: usize,
    ignore_filters: bool,
    delay: Duration,
    fail_all: Option<ApiError>,
    fail_dashboard: Option<ApiError>,
    fail_transactions: Option<ApiError>,
    fail_delete: HashMap<TransactionId, ApiError>,
    last_filters: Option<FilterSet>,
    deleted_ids: Vec<TransactionId>,
    imported_files: Vec<(String, Vec<u8>)>,
}

/// An in-memory [CashbookApi] with failure injection.
///
/// Clones share state so a test can keep a handle after moving one into a
/// controller.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.next_id = transactions.len() + 1;
            state.transactions = transactions;
        }
        api
    }

    /// Return every transaction regardless of the filters asked for.
    pub(crate) fn ignoring_filters(self) -> Self {
        self.state.lock().unwrap().ignore_filters = true;
        self
    }

    /// Wait this long before answering each request.
    pub(crate) fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = delay;
    }

    /// Fail every subsequent request with `error`.
    pub(crate) fn fail_all_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_all = Some(error);
    }

    /// Fail every subsequent dashboard request with `error`.
    pub(crate) fn fail_dashboard_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_dashboard = Some(error);
    }

    /// Fail every subsequent transactions request with `error`.
    pub(crate) fn fail_transactions_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_transactions = Some(error);
    }

    pub(crate) fn fail_delete_of(&self, transaction_id: TransactionId, error: ApiError) {
        self.state
            .lock()
            .unwrap()
            .fail_delete
            .insert(transaction_id, error);
    }

    /// The filters of the most recent transactions request.
    pub(crate) fn last_filters(&self) -> Option<FilterSet> {
        self.state.lock().unwrap().last_filters.clone()
    }

    pub(crate) fn deleted_ids(&self) -> Vec<TransactionId> {
        self.state.lock().unwrap().deleted_ids.clone()
    }

    /// Everything in the store, ignoring filters and injected failures.
    pub(crate) fn stored_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub(crate) fn imported_files(&self) -> Vec<(String, Vec<u8>)> {
        self.state.lock().unwrap().imported_files.clone()
    }

    /// Sleep for the configured delay, then report the injected failure if any.
    async fn begin(&self) -> Result<(), ApiError> {
        let delay = self.state.lock().unwrap().delay;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match &self.state.lock().unwrap().fail_all {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn matching(&self, filters: &FilterSet) -> Vec<Transaction> {
        let state = self.state.lock().unwrap();

        state
            .transactions
            .iter()
            .filter(|transaction| state.ignore_filters || filters.matches(transaction))
            .cloned()
            .collect()
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: axum::http::StatusCode::NOT_FOUND,
        message: "Transaction not found".to_owned(),
    }
}

impl CashbookApi for FakeApi {
    async fn dashboard(&self, filters: &FilterSet) -> Result<DashboardResponse, ApiError> {
        self.begin().await?;

        if let Some(error) = &self.state.lock().unwrap().fail_dashboard {
            return Err(error.clone());
        }

        let transactions = self.matching(filters);

        let total_income: f64 = transactions
            .iter()
            .filter(|transaction| transaction.transaction_type == TransactionType::In)
            .map(|transaction| transaction.amount)
            .sum();
        let real_expenses: f64 = transactions
            .iter()
            .filter(|transaction| transaction.transaction_type == TransactionType::Out)
            .map(|transaction| transaction.amount)
            .sum();

        let mut bank_chart: Vec<BankBalance> = Vec::new();
        let mut expense_chart: Vec<CategoryAmount> = Vec::new();

        for transaction in &transactions {
            let signed_amount = match transaction.transaction_type {
                TransactionType::In => transaction.amount,
                TransactionType::Out => -transaction.amount,
            };

            match bank_chart
                .iter_mut()
                .find(|bank| bank.bank_cash == transaction.bank_cash)
            {
                Some(bank) => bank.amount += signed_amount,
                None => bank_chart.push(BankBalance {
                    bank_cash: transaction.bank_cash.clone(),
                    amount: signed_amount,
                }),
            }

            if transaction.transaction_type == TransactionType::Out {
                match expense_chart
                    .iter_mut()
                    .find(|category| category.category == transaction.category)
                {
                    Some(category) => category.amount += transaction.amount,
                    None => expense_chart.push(CategoryAmount {
                        category: transaction.category.clone(),
                        amount: transaction.amount,
                    }),
                }
            }
        }

        Ok(DashboardResponse {
            summary: DashboardSummary {
                total_income,
                real_expenses,
                wealth_added: total_income - real_expenses,
                current_balance: total_income - real_expenses,
            },
            bank_chart,
            expense_chart,
        })
    }

    async fn transactions(&self, filters: &FilterSet) -> Result<Vec<Transaction>, ApiError> {
        self.begin().await?;
        {
            let mut state = self.state.lock().unwrap();

            if let Some(error) = &state.fail_transactions {
                return Err(error.clone());
            }

            state.last_filters = Some(filters.clone());
        }

        Ok(self.matching(filters))
    }

    async fn create_transaction(&self, fields: &TransactionFields) -> Result<(), ApiError> {
        self.begin().await?;
        let mut state = self.state.lock().unwrap();
        let transaction_id = TransactionId::new(format!("new-{}", state.next_id));
        state.next_id += 1;
        state
            .transactions
            .push(fields.clone().into_transaction(transaction_id));

        Ok(())
    }

    async fn update_transaction(
        &self,
        transaction_id: &TransactionId,
        fields: &TransactionFields,
    ) -> Result<(), ApiError> {
        self.begin().await?;
        let mut state = self.state.lock().unwrap();
        let transaction = state
            .transactions
            .iter_mut()
            .find(|transaction| &transaction.transaction_id == transaction_id)
            .ok_or_else(not_found)?;
        *transaction = fields.clone().into_transaction(transaction_id.clone());

        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &TransactionId) -> Result<(), ApiError> {
        self.begin().await?;
        let mut state = self.state.lock().unwrap();

        if let Some(error) = state.fail_delete.get(transaction_id) {
            return Err(error.clone());
        }

        let count_before = state.transactions.len();
        state
            .transactions
            .retain(|transaction| &transaction.transaction_id != transaction_id);

        if state.transactions.len() == count_before {
            return Err(not_found());
        }

        state.deleted_ids.push(transaction_id.clone());

        Ok(())
    }

    async fn banks(&self) -> Result<Vec<String>, ApiError> {
        self.begin().await?;
        let state = self.state.lock().unwrap();
        let mut banks: Vec<String> = state
            .transactions
            .iter()
            .map(|transaction| transaction.bank_cash.clone())
            .collect();
        banks.sort();
        banks.dedup();

        Ok(banks)
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.begin().await?;
        let state = self.state.lock().unwrap();
        let mut categories: Vec<String> = state
            .transactions
            .iter()
            .map(|transaction| transaction.category.clone())
            .collect();
        categories.sort();
        categories.dedup();

        Ok(categories)
    }

    async fn import_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String, ApiError> {
        self.begin().await?;
        let line_count = String::from_utf8_lossy(&contents).lines().count().saturating_sub(1);
        self.state
            .lock()
            .unwrap()
            .imported_files
            .push((file_name.to_owned(), contents));

        Ok(format!("Imported {line_count} transactions from {file_name}"))
    }
}
