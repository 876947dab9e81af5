//! htmx endpoints for filtering, paging and selecting rows in the transactions table.

use std::sync::Arc;

use axum::{
    Extension,
    extract::Path,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    session::SessionController,
    transaction::{
        BulkDeleteReport, FilterForm, FilterSet, TransactionId,
        view::{bulk_action_bar, select_all_checkbox, table_section, transactions_view_partial},
    },
};

/// The state of a selection checkbox.
///
/// Browsers omit unchecked checkboxes from the form data, so a missing
/// field means "deselect".
#[derive(Debug, Default, Deserialize)]
pub struct SelectionForm {
    /// Present when the checkbox is checked.
    #[serde(default)]
    pub selected: Option<String>,
}

impl SelectionForm {
    fn is_selected(&self) -> bool {
        self.selected.is_some()
    }
}

/// Apply the submitted filters and return the summary, charts and table.
///
/// The previous filters stay in effect if the form is invalid or the backend
/// request fails.
pub async fn filter_transactions_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Form(form): Form<FilterForm>,
) -> Response {
    let filters = match FilterSet::try_from(form) {
        Ok(filters) => filters,
        Err(error) => {
            tracing::debug!("Rejected filter form: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    if let Err(error) = controller.apply_filter(filters).await {
        return Error::from(error).into_alert_response();
    }

    transactions_view_partial(&controller.snapshot()).into_response()
}

/// Show the next page of rows.
pub async fn load_more_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
) -> Response {
    controller.load_more();

    table_section(&controller.snapshot()).into_response()
}

/// Select or deselect one row and return the updated bulk action bar.
///
/// The select-all checkbox is swapped out-of-band so it reflects the new selection.
pub async fn select_transaction_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Path(transaction_id): Path<String>,
    Form(form): Form<SelectionForm>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);
    let selected_count = controller.toggle_row_selection(&transaction_id, form.is_selected());
    let view = controller.snapshot();

    html! {
        (bulk_action_bar(selected_count))
        (select_all_checkbox(&view, true))
    }
    .into_response()
}

/// Select or deselect every shown row and return the table.
pub async fn select_all_transactions_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Form(form): Form<SelectionForm>,
) -> Response {
    controller.toggle_select_all(form.is_selected());

    table_section(&controller.snapshot()).into_response()
}

/// Delete the selected rows and return the refreshed summary, charts and table.
///
/// Rows that could not be deleted are listed in an error alert.
pub async fn bulk_delete_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
) -> Response {
    let report = match controller.bulk_delete().await {
        Ok(report) => report,
        Err(error) => return Error::from(error).into_alert_response(),
    };

    if report.requires_log_in() {
        return Error::SessionExpired.into_alert_response();
    }

    let alert = bulk_delete_alert(&report);

    html! {
        (transactions_view_partial(&controller.snapshot()))
        (alert.into_html())
    }
    .into_response()
}

fn bulk_delete_alert(report: &BulkDeleteReport) -> Alert {
    let deleted = report.deleted.len();

    if !report.failed.is_empty() {
        let details = report
            .failed
            .iter()
            .map(|(transaction_id, error)| format!("{transaction_id}: {}", error.user_message()))
            .collect::<Vec<_>>()
            .join("; ");

        return Alert::Error {
            message: format!(
                "Could not delete {} of {} transactions",
                report.failed.len(),
                deleted + report.failed.len()
            ),
            details,
        };
    }

    if let Some(error) = &report.refresh_error {
        return Alert::Error {
            message: format!("Deleted {deleted} transaction(s)"),
            details: format!("The table could not be reloaded: {error}"),
        };
    }

    Alert::Success {
        message: format!("Deleted {deleted} transaction(s)"),
        details: String::new(),
    }
}
