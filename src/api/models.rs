//! Request and response bodies exchanged with the cash-book backend.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInRequest {
    pub username: String,
    pub password: String,
}

/// Successful response from `POST /login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The bearer token for all other requests.
    pub access_token: String,
    /// The canonical username, which may differ in case from what was typed.
    pub username: String,
    #[serde(default)]
    pub message: String,
}

/// Response from `GET /transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Aggregate totals for the transactions that match a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of all inflows.
    pub total_income: f64,
    /// Sum of outflows excluding transfers between the user's own wallets.
    pub real_expenses: f64,
    /// Income that was kept, i.e. income minus real expenses.
    pub wealth_added: f64,
    /// The balance across all wallets.
    pub current_balance: f64,
}

impl DashboardSummary {
    /// The share of income that was kept, as a whole percentage.
    ///
    /// Returns zero when there was no income.
    pub fn wealth_rate(&self) -> i64 {
        if self.total_income > 0.0 {
            (self.wealth_added / self.total_income * 100.0).round() as i64
        } else {
            0
        }
    }
}

/// The balance held in one wallet or bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankBalance {
    pub bank_cash: String,
    pub amount: f64,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Response from `GET /dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    #[serde(default)]
    pub bank_chart: Vec<BankBalance>,
    #[serde(default)]
    pub expense_chart: Vec<CategoryAmount>,
}

/// A response carrying a human-readable confirmation, e.g. from `POST /import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// The body the backend sends with a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    /// Token failures are reported under `msg`.
    pub msg: Option<String>,
    pub message: Option<String>,
}
