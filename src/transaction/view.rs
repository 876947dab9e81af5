//! HTML rendering for the transactions page and its htmx partials.
//!
//! The page is split into nested swap targets so each interaction only
//! re-renders what it changes:
//! - `#transactions-view`: summary, charts and table, replaced after loads
//!   and deletes;
//! - `#transactions-table`: the table and "Load more", replaced after
//!   paging and select-all;
//! - `#bulk-actions`: the bulk delete button, replaced after a row toggle.

use maud::{Markup, html};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    dashboard::{DashboardChart, charts_view, summary_cards},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_IN_STYLE, BADGE_OUT_STYLE, BUTTON_BULK_DELETE_STYLE, BUTTON_DELETE_STYLE,
        BUTTON_SECONDARY_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::{Transaction, TransactionType, TransactionView},
};

/// The max number of graphemes to display in the remark column before
/// truncating and displaying ellipses.
const MAX_REMARK_GRAPHEMES: usize = 32;

const ROW_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

pub(crate) const VIEW_TARGET: &str = "#transactions-view";
pub(crate) const TABLE_TARGET: &str = "#transactions-table";
pub(crate) const BULK_ACTIONS_TARGET: &str = "#bulk-actions";

fn format_row_date(date: PrimitiveDateTime) -> String {
    date.format(ROW_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Shorten `remark` for the table, returning the full text as a tooltip when cut.
fn format_remark(remark: &str) -> (String, Option<&str>) {
    if remark.graphemes(true).count() <= MAX_REMARK_GRAPHEMES {
        return (remark.to_owned(), None);
    }

    let truncated = remark
        .graphemes(true)
        .take(MAX_REMARK_GRAPHEMES - 3)
        .collect::<String>();

    (format!("{truncated}..."), Some(remark))
}

fn type_badge(transaction_type: TransactionType) -> Markup {
    let style = match transaction_type {
        TransactionType::In => BADGE_IN_STYLE,
        TransactionType::Out => BADGE_OUT_STYLE,
    };

    html! {
        span class=(style) data-type=(transaction_type) { (transaction_type) }
    }
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::In => "text-green-700 dark:text-green-300",
        TransactionType::Out => "text-red-700 dark:text-red-300",
    }
}

/// The summary cards, charts and table for `view`.
pub(crate) fn transactions_view_partial(view: &TransactionView) -> Markup {
    let charts = DashboardChart::standard_pair(
        &view.dashboard.expense_chart,
        &view.dashboard.bank_chart,
    );

    html! {
        div id="transactions-view" class="flex flex-col gap-4 w-full"
        {
            (summary_cards(&view.dashboard.summary))
            (charts_view(&charts))
            (table_section(view))
        }
    }
}

/// The bulk delete button. Disabled while nothing is selected.
pub(crate) fn bulk_action_bar(selected_count: usize) -> Markup {
    html! {
        div id="bulk-actions" class="flex justify-end"
        {
            button
                type="button"
                id="bulk-delete-button"
                class=(BUTTON_BULK_DELETE_STYLE)
                hx-post=(endpoints::BULK_DELETE_TRANSACTIONS)
                hx-target=(VIEW_TARGET)
                hx-swap="outerHTML"
                hx-confirm=(format!(
                    "Delete {selected_count} selected transaction(s)? This cannot be undone."
                ))
                disabled[selected_count == 0]
            {
                "Delete selected (" (selected_count) ")"
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, is_selected: bool) -> Markup {
    let transaction_id = transaction.transaction_id.as_str();
    let (remark, tooltip) = format_remark(&transaction.remark);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction_id);
    let confirm_message = format!(
        "Are you sure you want to delete the {} transaction of {}? This cannot be undone.",
        transaction.category,
        format_currency(transaction.amount),
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction_id)
        {
            td class="px-4 py-4"
            {
                input
                    type="checkbox"
                    name="selected"
                    value="true"
                    aria-label="Select transaction"
                    checked[is_selected]
                    hx-post=(format_endpoint(endpoints::SELECT_TRANSACTION, transaction_id))
                    hx-trigger="change"
                    hx-target=(BULK_ACTIONS_TARGET)
                    hx-swap="outerHTML";
            }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(format_row_date(transaction.date)) { (format_row_date(transaction.date)) }
            }
            td class=(TABLE_CELL_STYLE) { (type_badge(transaction.transaction_type)) }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(transaction.transaction_type)) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (transaction.bank_cash) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] data-remark
            {
                @if remark.is_empty() {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                } @else {
                    (remark)
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target=(VIEW_TARGET)
                        hx-swap="outerHTML"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// The header checkbox that selects every shown row.
///
/// Set `out_of_band` to replace the checkbox alongside another swap, e.g.
/// after a single row is toggled.
pub(crate) fn select_all_checkbox(view: &TransactionView, out_of_band: bool) -> Markup {
    html! {
        input
            type="checkbox"
            id="select-all"
            name="selected"
            value="true"
            aria-label="Select all shown transactions"
            checked[view.all_rows_selected()]
            disabled[view.rows.is_empty()]
            hx-post=(endpoints::SELECT_ALL_TRANSACTIONS)
            hx-trigger="change"
            hx-target=(TABLE_TARGET)
            hx-swap="outerHTML"
            hx-swap-oob=[out_of_band.then_some("true")];
    }
}

/// The table of shown rows with the selection controls and "Load more".
pub(crate) fn table_section(view: &TransactionView) -> Markup {
    html! {
        section id="transactions-table" class="w-full space-y-2"
        {
            div class="flex justify-between items-center"
            {
                p id="row-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Showing " (view.rows.len()) " of " (view.filtered_count) " transactions"
                }

                (bulk_action_bar(view.selected_ids.len()))
            }

            div class="overflow-x-auto rounded"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-4 py-3" { (select_all_checkbox(view, false)) }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Bank/Cash" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Remark" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in &view.rows {
                            (transaction_row(transaction, view.is_selected(&transaction.transaction_id)))
                        }

                        @if view.rows.is_empty() {
                            tr
                            {
                                td colspan="8" data-empty-state="true" class="px-6 py-4 text-center"
                                {
                                    "No transactions found."
                                }
                            }
                        }
                    }
                }
            }

            button
                type="button"
                id="load-more"
                class=(BUTTON_SECONDARY_STYLE)
                hx-post=(endpoints::LOAD_MORE_TRANSACTIONS)
                hx-target=(TABLE_TARGET)
                hx-swap="outerHTML"
                disabled[!view.has_more()]
            {
                "Load more"
            }
        }
    }
}
