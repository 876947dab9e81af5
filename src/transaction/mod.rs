//! Transactions: the domain types, the per-session view controller and the
//! pages and htmx endpoints built on it.
//!
//! - [Transaction], [TransactionFields] and the date-time helpers describe
//!   what the backend stores.
//! - [FilterSet] narrows the table and the summary.
//! - [TransactionViewController] caches what the backend returned for one
//!   session and derives the visible rows and selection from it.

mod controller;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod export_endpoint;
mod filter;
mod form;
mod table_endpoints;
mod transactions_page;
mod view;

pub use controller::{
    BulkDeleteReport, ControllerError, TransactionView, TransactionViewController,
};
pub use core::{
    Transaction, TransactionFields, TransactionId, TransactionType,
    format_date_time, format_date_time_local, parse_date_time,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export_endpoint::export_transactions_endpoint;
pub use filter::{FilterError, FilterForm, FilterSet, WILDCARD, format_filter_date};
pub use table_endpoints::{
    bulk_delete_endpoint, filter_transactions_endpoint, load_more_endpoint,
    select_all_transactions_endpoint, select_transaction_endpoint,
};
pub use transactions_page::get_transactions_page;
