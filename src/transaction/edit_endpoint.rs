//! Defines the endpoint for updating a transaction.
use std::sync::Arc;

use axum::{
    Extension,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    session::SessionController,
    transaction::{TransactionId, form::TransactionForm},
};

/// A route handler for updating a transaction.
///
/// Redirects to the transactions view on success. On failure the form stays
/// open and the reason is shown inside it.
pub async fn edit_transaction_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Path(transaction_id): Path<String>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);

    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(error) => return error.into_inline_alert_response(),
    };

    if let Err(error) = controller.edit_transaction(&transaction_id, &fields).await {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return Error::from(error).into_inline_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
