//! Access to the cash-book REST backend.
//!
//! The backend owns persistence, aggregation and authentication. This module
//! exposes it through the [CashbookApi] trait so the view controller can be
//! driven by a real HTTP client in production and by an in-memory fake in
//! tests.

use std::future::Future;

mod client;
mod error;
mod models;

pub use client::HttpCashbookApi;
pub use error::ApiError;
pub use models::{BankBalance, CategoryAmount, DashboardResponse, DashboardSummary};

use crate::transaction::{FilterSet, Transaction, TransactionFields, TransactionId};

/// The authenticated operations the front end performs against the backend.
pub trait CashbookApi: Send + Sync {
    /// GET /dashboard: totals and chart breakdowns for the matching transactions.
    fn dashboard(
        &self,
        filters: &FilterSet,
    ) -> impl Future<Output = Result<DashboardResponse, ApiError>> + Send;

    /// GET /transactions: the matching transactions.
    fn transactions(
        &self,
        filters: &FilterSet,
    ) -> impl Future<Output = Result<Vec<Transaction>, ApiError>> + Send;

    /// POST /transactions
    fn create_transaction(
        &self,
        fields: &TransactionFields,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// PUT /transactions/{id}
    fn update_transaction(
        &self,
        transaction_id: &TransactionId,
        fields: &TransactionFields,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// DELETE /transactions/{id}
    fn delete_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// GET /banks: the distinct wallet and bank names in use.
    fn banks(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// GET /categories: the distinct category names in use.
    fn categories(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// POST /import: upload a CSV file of transactions.
    ///
    /// Returns the backend's confirmation message.
    fn import_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;
}
