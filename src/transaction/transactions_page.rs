//! The transactions page: filters, summary, charts and the paged table.

use std::sync::Arc;

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::Session,
    dashboard::charts_head_elements,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    session::SessionController,
    transaction::{
        FilterSet, TransactionType, WILDCARD, form::FieldSuggestions, format_filter_date,
        view::{VIEW_TARGET, transactions_view_partial},
    },
};

/// Display the transactions page for the session's current filters.
///
/// The bank and category lists only populate the filter controls, so the
/// page still renders if either request fails.
pub async fn get_transactions_page(
    Extension(session): Extension<Session>,
    Extension(controller): Extension<Arc<SessionController>>,
) -> Result<Response, Error> {
    let (refreshed, suggestions) =
        tokio::join!(controller.refresh(), FieldSuggestions::load(controller.api()));

    refreshed.inspect_err(|error| tracing::error!("Could not load transactions: {error}"))?;

    let view = controller.snapshot();
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, &session.username).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-screen-xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "New transaction" }
                        a href=(endpoints::EXPORT) class=(LINK_STYLE) download { "Export CSV" }
                    }
                }

                (filter_form(&view.filters, &suggestions))

                (transactions_view_partial(&view))
            }
        }
    };

    Ok(base("Transactions", &charts_head_elements(), &content).into_response())
}

/// `names` with `selected` appended if the backend no longer lists it.
fn options_with_selected<'a>(names: &'a [String], selected: Option<&'a str>) -> Vec<&'a str> {
    let mut options: Vec<&str> = names.iter().map(String::as_str).collect();

    if let Some(selected) = selected {
        if !options.contains(&selected) {
            options.push(selected);
        }
    }

    options
}

fn name_select(name: &str, label: &str, names: &[String], selected: Option<&str>) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value=(WILDCARD) selected[selected.is_none()] { "All" }

                @for option in options_with_selected(names, selected) {
                    option value=(option) selected[selected == Some(option)] { (option) }
                }
            }
        }
    }
}

/// The filter controls. Changing any control applies the filters.
fn filter_form(filters: &FilterSet, suggestions: &FieldSuggestions) -> Markup {
    let start_date = filters.start_date.map(format_filter_date);
    let end_date = filters.end_date.map(format_filter_date);

    html! {
        form
            id="filter-form"
            hx-post=(endpoints::FILTER_TRANSACTIONS)
            hx-trigger="change, submit"
            hx-target=(VIEW_TARGET)
            hx-swap="outerHTML"
            class="grid grid-cols-2 lg:grid-cols-6 gap-4 items-end w-full"
        {
            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(WILDCARD) selected[filters.transaction_type.is_none()] { "All" }

                    @for transaction_type in [TransactionType::In, TransactionType::Out] {
                        option
                            value=(transaction_type)
                            selected[filters.transaction_type == Some(transaction_type)]
                        {
                            (transaction_type)
                        }
                    }
                }
            }

            (name_select("bank", "Bank/Cash", &suggestions.banks, filters.bank.as_deref()))
            (name_select("category", "Category", &suggestions.categories, filters.category.as_deref()))

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}
