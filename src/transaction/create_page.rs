use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::Session,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    session::SessionController,
    timezone::local_now,
    transaction::{
        TransactionType,
        form::{FieldSuggestions, TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed to render the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn new_transaction_view(
    nav_bar: Markup,
    defaults: &TransactionFormDefaults<'_>,
    suggestions: &FieldSuggestions,
) -> Markup {
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                form
                    hx-post=(endpoints::TRANSACTIONS_API)
                    hx-disabled-elt="find button[type=submit]"
                    class="w-full space-y-4"
                {
                    (transaction_form_fields(defaults, suggestions))

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add transaction" }
                }
            }
        }
    };

    base("New Transaction", &[], &content)
}

/// Renders the page for creating a transaction.
///
/// The date defaults to the current time in the server's local timezone.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(session): Extension<Session>,
    Extension(controller): Extension<Arc<SessionController>>,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let suggestions = FieldSuggestions::load(controller.api()).await;
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW, &session.username).into_html();

    let defaults = TransactionFormDefaults {
        transaction_type: TransactionType::Out,
        amount: None,
        date: now,
        category: None,
        bank_cash: None,
        remark: None,
    };

    Ok(new_transaction_view(nav_bar, &defaults, &suggestions).into_response())
}
