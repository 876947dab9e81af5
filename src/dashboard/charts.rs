//! Chart generation and rendering for the dashboard and transactions pages.
//!
//! Charts are ECharts options generated with charming and stored on their
//! container as JSON. A small script (re)initialises every chart container
//! on page load and after each htmx swap, disposing any previous instance
//! bound to the element first.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    api::{BankBalance, CategoryAmount},
    html::HeadElement,
};

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone)]
pub(crate) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    /// The expense doughnut and the bank balance chart.
    pub(crate) fn standard_pair(
        expenses: &[CategoryAmount],
        banks: &[BankBalance],
    ) -> [DashboardChart; 2] {
        [
            DashboardChart {
                id: "expense-chart",
                options: expense_chart(expenses).to_string(),
            },
            DashboardChart {
                id: "bank-chart",
                options: bank_chart(banks).to_string(),
            },
        ]
    }
}

const CHART_INIT_SCRIPT: &str = r#"
(function () {
    const darkMode = window.matchMedia('(prefers-color-scheme: dark)');

    function renderCharts() {
        if (typeof echarts === 'undefined') {
            return;
        }

        document.querySelectorAll('[data-chart-options]').forEach((element) => {
            const existing = echarts.getInstanceByDom(element);
            if (existing) {
                existing.dispose();
            }

            const chart = echarts.init(element, darkMode.matches ? 'dark' : null);
            chart.setOption(JSON.parse(element.dataset.chartOptions));
        });
    }

    document.addEventListener('DOMContentLoaded', renderCharts);
    document.addEventListener('htmx:afterSwap', renderCharts);
    darkMode.addEventListener('change', renderCharts);
    window.addEventListener('resize', () => {
        document.querySelectorAll('[data-chart-options]').forEach((element) => {
            const chart = echarts.getInstanceByDom(element);
            if (chart) {
                chart.resize();
            }
        });
    });
})();
"#;

/// The ECharts library and the script that keeps one chart alive per container.
pub(crate) fn charts_head_elements() -> [HeadElement; 2] {
    [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        HeadElement::ScriptSource(PreEscaped(CHART_INIT_SCRIPT.to_owned())),
    ]
}

/// Renders the HTML containers for `charts`.
pub(crate) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart-options=(chart.options)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// `expenses` ordered by amount, largest first.
fn sorted_expenses(expenses: &[CategoryAmount]) -> Vec<CategoryAmount> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted
}

/// A doughnut of spending per category, largest first.
pub(crate) fn expense_chart(expenses: &[CategoryAmount]) -> Chart {
    let sorted = sorted_expenses(expenses);
    let data = sorted
        .iter()
        .map(|expense| (expense.amount, expense.category.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Expenses by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter("{b}: ₹{c} ({d}%)"),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// A bar per wallet or bank showing its balance.
pub(crate) fn bank_chart(banks: &[BankBalance]) -> Chart {
    let labels = banks
        .iter()
        .map(|bank| bank.bank_cash.clone())
        .collect::<Vec<_>>();
    let values = banks.iter().map(|bank| bank.amount).collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Bank & Cash Balances"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter("₹{value}")),
        )
        .series(Bar::new().name("Balance").data(values))
}
