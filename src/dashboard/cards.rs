//! Card components for the totals, the wealth rate and the per-wallet balances.

use maud::{Markup, html};

use crate::{
    api::{BankBalance, DashboardSummary},
    html::format_currency,
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

fn summary_card(key: &str, title: &str, amount: f64, amount_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-summary=(key)
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold tabular-nums " (amount_class) }
            {
                (format_currency(amount))
            }
        }
    }
}

/// The four summary cards: income, real expenses, wealth added and current balance.
pub(crate) fn summary_cards(summary: &DashboardSummary) -> Markup {
    let balance_class = if summary.current_balance < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        section id="summary-cards" class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full"
        {
            (summary_card("income", "Total Income", summary.total_income,
                "text-green-700 dark:text-green-300"))
            (summary_card("real-expenses", "Real Expenses", summary.real_expenses,
                "text-red-700 dark:text-red-300"))
            (summary_card("wealth-added", "Wealth Added", summary.wealth_added,
                "text-blue-700 dark:text-blue-300"))
            (summary_card("current-balance", "Current Balance", summary.current_balance,
                balance_class))
        }
    }
}

/// The width of the wealth rate bar as a percentage.
fn progress_width(wealth_rate: i64) -> i64 {
    wealth_rate.clamp(0, 100)
}

/// The share of income kept, as a number and a progress bar.
pub(super) fn wealth_rate_card(summary: &DashboardSummary) -> Markup {
    let wealth_rate = summary.wealth_rate();
    let width = progress_width(wealth_rate);

    html! {
        div id="wealth-rate" class=(CARD_STYLE)
        {
            div class="flex justify-between items-baseline mb-2"
            {
                h3 class="text-lg font-semibold" { "Wealth Rate" }
                span id="wealth-rate-value" class="text-2xl font-bold tabular-nums"
                {
                    (wealth_rate) "%"
                }
            }

            div
                class="w-full h-3 bg-gray-200 rounded-full dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(width)
            {
                div
                    id="wealth-rate-bar"
                    class="h-3 bg-blue-600 rounded-full"
                    style=(format!("width: {width}%"))
                {}
            }

            p class="mt-2 text-sm text-gray-600 dark:text-gray-400"
            {
                "Share of income kept after real expenses."
            }
        }
    }
}

/// A signed amount: "+" for zero and above, "-" below.
fn format_signed_amount(amount: f64) -> String {
    let formatted = format_currency(amount);

    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{formatted}")
    }
}

/// The balance held in each wallet or bank.
pub(super) fn bank_list(banks: &[BankBalance]) -> Markup {
    html! {
        div id="bank-list" class=(CARD_STYLE)
        {
            h3 class="text-lg font-semibold mb-2" { "Banks & Cash" }

            @if banks.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "No balances yet." }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for bank in banks {
                        @let amount_class = if bank.amount < 0.0 {
                            "text-red-700 dark:text-red-300"
                        } else {
                            "text-green-700 dark:text-green-300"
                        };

                        li class="flex justify-between py-2" data-bank=(bank.bank_cash)
                        {
                            span { (bank.bank_cash) }
                            span class={ "tabular-nums " (amount_class) }
                            {
                                (format_signed_amount(bank.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}
