//! The fields shared by the new and edit transaction forms, and their parsing.

use maud::{Markup, html};
use serde::Deserialize;
use time::PrimitiveDateTime;

use crate::{
    Error,
    api::CashbookApi,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{TransactionFields, TransactionType, format_date_time_local, parse_date_time},
};

/// The values a transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: PrimitiveDateTime,
    pub category: Option<&'a str>,
    pub bank_cash: Option<&'a str>,
    pub remark: Option<&'a str>,
}

/// The names offered as suggestions for the free-text fields.
#[derive(Debug, Default)]
pub struct FieldSuggestions {
    pub banks: Vec<String>,
    pub categories: Vec<String>,
}

impl FieldSuggestions {
    /// Fetch the bank and category names in use.
    ///
    /// The lists are only hints, so a failed request yields an empty list.
    pub async fn load<A: CashbookApi>(api: &A) -> Self {
        let (banks, categories) = tokio::join!(api.banks(), api.categories());

        Self {
            banks: banks.unwrap_or_else(|error| {
                tracing::warn!("Could not load the bank list: {error}");
                Vec::new()
            }),
            categories: categories.unwrap_or_else(|error| {
                tracing::warn!("Could not load the category list: {error}");
                Vec::new()
            }),
        }
    }
}

fn type_radio(transaction_type: TransactionType, checked: bool, label: &str) -> Markup {
    let id = format!("transaction-type-{}", transaction_type.as_str().to_lowercase());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(transaction_type)
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

fn text_input_with_suggestions(
    name: &str,
    label: &str,
    value: Option<&str>,
    suggestions: &[String],
) -> Markup {
    let list_id = format!("{name}-suggestions");

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="text"
                list=(list_id)
                value=[value]
                required
                autocomplete="off"
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id=(list_id)
            {
                @for suggestion in suggestions {
                    option value=(suggestion) {}
                }
            }
        }
    }
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    suggestions: &FieldSuggestions,
) -> Markup {
    let is_income = defaults.transaction_type == TransactionType::In;
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));
    let date_str = format_date_time_local(defaults.date).unwrap_or_default();

    html! {
        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="datetime-local"
                value=(date_str)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (type_radio(TransactionType::In, is_income, "Cash in"))
                (type_radio(TransactionType::Out, !is_income, "Cash out"))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0"
                placeholder="0.00"
                value=[amount_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (text_input_with_suggestions("category", "Category", defaults.category, &suggestions.categories))
        (text_input_with_suggestions("bank_cash", "Bank/Cash", defaults.bank_cash, &suggestions.banks))

        div
        {
            label for="remark" class=(FORM_LABEL_STYLE) { "Remark (optional)" }

            input
                name="remark"
                id="remark"
                type="text"
                value=[defaults.remark]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The raw form data for creating or editing a transaction.
///
/// Fields are read as text and validated by [TransactionForm::into_fields]
/// so that bad input becomes an alert rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub bank_cash: String,
    #[serde(default)]
    pub remark: String,
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::InvalidTransaction(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

impl TransactionForm {
    /// Validate the form.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransaction] naming the first bad field.
    pub fn into_fields(self) -> Result<TransactionFields, Error> {
        let date = parse_date_time(required(&self.date, "Date")?)
            .map_err(|_| Error::InvalidTransaction(format!("invalid date \"{}\"", self.date)))?;

        let transaction_type = TransactionType::parse(required(&self.transaction_type, "Type")?)
            .ok_or_else(|| {
                Error::InvalidTransaction(format!(
                    "unknown transaction type \"{}\"",
                    self.transaction_type
                ))
            })?;

        let amount = required(&self.amount, "Amount")?
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .ok_or_else(|| {
                Error::InvalidTransaction(format!(
                    "amount must be a non-negative number, got \"{}\"",
                    self.amount
                ))
            })?;

        Ok(TransactionFields {
            date,
            transaction_type,
            amount,
            category: required(&self.category, "Category")?.to_owned(),
            bank_cash: required(&self.bank_cash, "Bank/Cash")?.to_owned(),
            remark: self.remark.trim().to_owned(),
        })
    }
}
