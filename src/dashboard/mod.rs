//! The dashboard page: totals, wealth rate, balances and the expense breakdown.

mod cards;
mod charts;
mod handlers;

pub(crate) use cards::summary_cards;
pub(crate) use charts::{DashboardChart, charts_head_elements, charts_view};
pub use handlers::get_dashboard_page;
