//! The URIs served by the front end.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page with the summary cards, wealth rate and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page with the filters, summary and transaction table.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for uploading a CSV file of transactions.
pub const IMPORT_VIEW: &str = "/import";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to apply the filter form.
pub const FILTER_TRANSACTIONS: &str = "/api/transaction_table/filter";
/// The route to show the next page of rows.
pub const LOAD_MORE_TRANSACTIONS: &str = "/api/transaction_table/load_more";
/// The route to select or deselect every shown row.
pub const SELECT_ALL_TRANSACTIONS: &str = "/api/transaction_table/selection";
/// The route to select or deselect one row.
pub const SELECT_TRANSACTION: &str = "/api/transaction_table/{transaction_id}/selection";
/// The route to delete the selected rows.
pub const BULK_DELETE_TRANSACTIONS: &str = "/api/transaction_table/bulk_delete";
/// The route to upload a CSV file for importing transactions.
pub const IMPORT: &str = "/api/import";
/// The route to download every transaction as CSV.
pub const EXPORT: &str = "/api/export";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}/edit',
/// '{transaction_id}' is the parameter.
///
/// `id` is percent-encoded so that any backend ID yields a valid path.
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        encode_path_segment(id),
        &endpoint_path[param_end..]
    )
}

fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());

    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    encoded
}
