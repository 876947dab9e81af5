//! Dashboard HTTP handler and view rendering.

use std::sync::Arc;

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::Session,
    dashboard::{
        cards::{bank_list, summary_cards, wealth_rate_card},
        charts::{DashboardChart, charts_head_elements, charts_view},
    },
    endpoints,
    html::{base, link},
    navigation::NavBar,
    session::SessionController,
    transaction::TransactionView,
};

/// Display a page with the totals, wealth rate, balances and expense breakdown.
///
/// The figures cover the transactions matching the filters last applied on
/// the transactions page.
pub async fn get_dashboard_page(
    Extension(session): Extension<Session>,
    Extension(controller): Extension<Arc<SessionController>>,
) -> Result<Response, Error> {
    controller
        .refresh()
        .await
        .inspect_err(|error| tracing::error!("Could not load the dashboard: {error}"))?;

    let view = controller.snapshot();
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, &session.username);

    if view.filtered_count == 0 && view.filters.is_unconstrained() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &view).into_response())
}

/// Renders the dashboard page when the user has no transactions.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "manually");
    let import_transaction_link = link(endpoints::IMPORT_VIEW, "importing");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "Your summary will show up here once you add some transactions. \
                You can add transactions " (new_transaction_link) " or \
                by " (import_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(nav_bar: NavBar, view: &TransactionView) -> Markup {
    let nav_bar = nav_bar.into_html();
    let dashboard = &view.dashboard;
    let charts = DashboardChart::standard_pair(&dashboard.expense_chart, &dashboard.bank_chart);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-4 px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if !view.filters.is_unconstrained() {
                p id="filter-notice" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Showing transactions that match the filters on the "
                    (link(endpoints::TRANSACTIONS_VIEW, "transactions page"))
                    "."
                }
            }

            (summary_cards(&dashboard.summary))

            div class="grid grid-cols-1 lg:grid-cols-2 gap-4 w-full"
            {
                (wealth_rate_card(&dashboard.summary))
                (bank_list(&dashboard.bank_chart))
            }

            (charts_view(&charts))
        }
    );

    base("Dashboard", &charts_head_elements(), &content)
}
