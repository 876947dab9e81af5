use std::sync::Arc;

use axum::{
    Extension,
    extract::Path,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::CashbookApi,
    auth::Session,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    session::SessionController,
    transaction::{
        FilterSet, Transaction, TransactionId,
        form::{FieldSuggestions, TransactionFormDefaults, transaction_form_fields},
    },
};

/// The ID of the element that shows why a save failed.
pub(crate) const EDIT_ERROR_ID: &str = "edit-error";

fn edit_transaction_view(
    nav_bar: Markup,
    transaction: &Transaction,
    suggestions: &FieldSuggestions,
) -> Markup {
    let defaults = TransactionFormDefaults {
        transaction_type: transaction.transaction_type,
        amount: Some(transaction.amount),
        date: transaction.date,
        category: Some(&transaction.category),
        bank_cash: Some(&transaction.bank_cash),
        remark: Some(&transaction.remark),
    };
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.transaction_id.as_str());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                form
                    hx-put=(update_url)
                    hx-target={ "#" (EDIT_ERROR_ID) }
                    hx-swap="innerHTML"
                    hx-disabled-elt="find button[type=submit]"
                    class="w-full space-y-4"
                {
                    (transaction_form_fields(&defaults, suggestions))

                    div id=(EDIT_ERROR_ID) {}

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save changes" }
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}

/// The transaction with `transaction_id`.
///
/// The controller only caches rows that match the current filters, so fall
/// back to the unfiltered list for anything else.
async fn find_transaction(
    controller: &SessionController,
    transaction_id: &TransactionId,
) -> Result<Transaction, Error> {
    if let Some(transaction) = controller.find(transaction_id) {
        return Ok(transaction);
    }

    controller
        .api()
        .transactions(&FilterSet::default())
        .await?
        .into_iter()
        .find(|transaction| &transaction.transaction_id == transaction_id)
        .ok_or(Error::NotFound)
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Extension(session): Extension<Session>,
    Extension(controller): Extension<Arc<SessionController>>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let transaction_id = TransactionId::new(transaction_id);
    let (transaction, suggestions) = tokio::join!(
        find_transaction(&controller, &transaction_id),
        FieldSuggestions::load(controller.api())
    );
    let transaction = transaction
        .inspect_err(|error| tracing::warn!("Could not open transaction {transaction_id}: {error}"))?;

    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW, &session.username).into_html();

    Ok(edit_transaction_view(nav_bar, &transaction, &suggestions).into_response())
}
