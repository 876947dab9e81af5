//! Defines the endpoint for creating a new transaction.
use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints, session::SessionController, transaction::form::TransactionForm,
};

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = controller.create_transaction(&fields).await {
        tracing::error!("could not create transaction: {error}");
        return Error::from(error).into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
