//! The filter controls shared by the transaction table and the dashboard summary.

use serde::Deserialize;
use time::{
    Date, PrimitiveDateTime,
    format_description::BorrowedFormatItem,
    macros::{format_description, time},
};

use crate::transaction::{Transaction, TransactionType};

/// The value the filter controls use for "no constraint".
pub const WILDCARD: &str = "ALL";

const FILTER_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A conjunction of constraints over transaction fields.
///
/// `None` means the field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Only transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only transactions against this wallet or bank.
    pub bank: Option<String>,
    /// Only transactions with this category.
    pub category: Option<String>,
    /// Only transactions on or after the start of this day.
    pub start_date: Option<Date>,
    /// Only transactions on or before 23:59:59 of this day.
    pub end_date: Option<Date>,
}

impl FilterSet {
    /// Whether `transaction` satisfies every constraint in this filter set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let type_matches = self
            .transaction_type
            .is_none_or(|transaction_type| transaction.transaction_type == transaction_type);
        let bank_matches = self
            .bank
            .as_ref()
            .is_none_or(|bank| &transaction.bank_cash == bank);
        let category_matches = self
            .category
            .as_ref()
            .is_none_or(|category| &transaction.category == category);
        let after_start = self
            .start_date
            .is_none_or(|start_date| transaction.date >= start_date.midnight());
        let before_end = self
            .end_date
            .is_none_or(|end_date| transaction.date <= end_of_day(end_date));

        type_matches && bank_matches && category_matches && after_start && before_end
    }

    /// The query string parameters the backend expects for these filters.
    ///
    /// Unconstrained fields are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(transaction_type) = self.transaction_type {
            pairs.push(("type", transaction_type.as_str().to_owned()));
        }
        if let Some(bank) = &self.bank {
            pairs.push(("bank", bank.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(start_date) = self.start_date {
            pairs.push(("startDate", format_filter_date(start_date)));
        }
        if let Some(end_date) = self.end_date {
            pairs.push(("endDate", format_filter_date(end_date)));
        }

        pairs
    }

    /// Whether no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self == &FilterSet::default()
    }
}

/// The last instant that an inclusive end date covers.
fn end_of_day(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time!(23:59:59))
}

/// Format a date for a filter query parameter or a `date` input, e.g. "2025-01-31".
pub fn format_filter_date(date: Date) -> String {
    date.format(FILTER_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The raw filter controls as submitted by the browser.
///
/// Every field is a string so that "ALL" and empty inputs can be read as
/// wildcards rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterForm {
    /// "IN", "OUT", "ALL" or empty.
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    /// A bank name, "ALL" or empty.
    #[serde(default)]
    pub bank: String,
    /// A category name, "ALL" or empty.
    #[serde(default)]
    pub category: String,
    /// A date in the format "YYYY-MM-DD" or empty.
    #[serde(default)]
    pub start_date: String,
    /// A date in the format "YYYY-MM-DD" or empty.
    #[serde(default)]
    pub end_date: String,
}

/// The filter form contained a value that is neither a wildcard nor valid.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterError {
    /// The type was not "IN", "OUT" or a wildcard.
    #[error("unknown transaction type \"{0}\"")]
    InvalidType(String),
    /// A date could not be parsed.
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl TryFrom<FilterForm> for FilterSet {
    type Error = FilterError;

    fn try_from(form: FilterForm) -> Result<Self, Self::Error> {
        let transaction_type = match non_wildcard(&form.transaction_type) {
            Some(text) => Some(
                TransactionType::parse(text)
                    .ok_or_else(|| FilterError::InvalidType(text.to_owned()))?,
            ),
            None => None,
        };

        Ok(FilterSet {
            transaction_type,
            bank: non_wildcard(&form.bank).map(str::to_owned),
            category: non_wildcard(&form.category).map(str::to_owned),
            start_date: parse_optional_date(&form.start_date)?,
            end_date: parse_optional_date(&form.end_date)?,
        })
    }
}

fn non_wildcard(value: &str) -> Option<&str> {
    let value = value.trim();

    if value.is_empty() || value.eq_ignore_ascii_case(WILDCARD) {
        None
    } else {
        Some(value)
    }
}

fn parse_optional_date(value: &str) -> Result<Option<Date>, FilterError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    Date::parse(value, FILTER_DATE_FORMAT)
        .map(Some)
        .map_err(|_| FilterError::InvalidDate(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::{FilterError, FilterForm, FilterSet};
    use crate::transaction::{Transaction, TransactionType};

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction::build("1", TransactionType::In, 5000.0)
                .category("Salary")
                .bank_cash("HDFC")
                .date(datetime!(2025-01-01 09:00))
                .finalise(),
            Transaction::build("2", TransactionType::Out, 120.0)
                .category("Food")
                .bank_cash("Cash")
                .date(datetime!(2025-01-15 23:59:59))
                .finalise(),
            Transaction::build("3", TransactionType::Out, 900.0)
                .category("Rent")
                .bank_cash("HDFC")
                .date(datetime!(2025-01-16 00:00))
                .finalise(),
            Transaction::build("4", TransactionType::Out, 45.5)
                .category("Food")
                .bank_cash("HDFC")
                .date(datetime!(2025-02-01 12:30))
                .finalise(),
        ]
    }

    fn matching_ids(filters: &FilterSet) -> Vec<String> {
        sample_transactions()
            .iter()
            .filter(|transaction| filters.matches(transaction))
            .map(|transaction| transaction.transaction_id.to_string())
            .collect()
    }

    #[test]
    fn default_filters_match_everything() {
        assert_eq!(matching_ids(&FilterSet::default()), ["1", "2", "3", "4"]);
    }

    #[test]
    fn filters_are_a_conjunction() {
        let filters = FilterSet {
            transaction_type: Some(TransactionType::Out),
            bank: Some("HDFC".to_owned()),
            category: Some("Food".to_owned()),
            ..Default::default()
        };

        assert_eq!(matching_ids(&filters), ["4"]);
    }

    #[test]
    fn end_date_includes_the_whole_day() {
        let filters = FilterSet {
            end_date: Some(date!(2025 - 01 - 15)),
            ..Default::default()
        };

        assert_eq!(matching_ids(&filters), ["1", "2"]);
    }

    #[test]
    fn start_date_includes_midnight() {
        let filters = FilterSet {
            start_date: Some(date!(2025 - 01 - 16)),
            ..Default::default()
        };

        assert_eq!(matching_ids(&filters), ["3", "4"]);
    }

    #[test]
    fn inverted_date_range_matches_nothing() {
        let filters = FilterSet {
            start_date: Some(date!(2025 - 02 - 01)),
            end_date: Some(date!(2025 - 01 - 01)),
            ..Default::default()
        };

        assert!(matching_ids(&filters).is_empty());
    }

    #[test]
    fn form_wildcards_become_unconstrained() {
        let form = FilterForm {
            transaction_type: "ALL".to_owned(),
            bank: "ALL".to_owned(),
            category: String::new(),
            start_date: String::new(),
            end_date: "  ".to_owned(),
        };

        let filters = FilterSet::try_from(form).unwrap();

        assert!(filters.is_unconstrained());
    }

    #[test]
    fn submitted_form_with_missing_fields_is_unconstrained() {
        let form: FilterForm = serde_html_form::from_str("type=ALL&category=").unwrap();

        let filters = FilterSet::try_from(form).unwrap();

        assert!(filters.is_unconstrained());
    }

    #[test]
    fn form_with_values_is_parsed() {
        let form = FilterForm {
            transaction_type: "out".to_owned(),
            bank: "SBI".to_owned(),
            category: "Travel".to_owned(),
            start_date: "2025-01-01".to_owned(),
            end_date: "2025-01-31".to_owned(),
        };

        let filters = FilterSet::try_from(form).unwrap();

        assert_eq!(
            filters,
            FilterSet {
                transaction_type: Some(TransactionType::Out),
                bank: Some("SBI".to_owned()),
                category: Some("Travel".to_owned()),
                start_date: Some(date!(2025 - 01 - 01)),
                end_date: Some(date!(2025 - 01 - 31)),
            }
        );
    }

    #[test]
    fn form_rejects_invalid_values() {
        let bad_type = FilterForm {
            transaction_type: "SIDEWAYS".to_owned(),
            ..Default::default()
        };
        let bad_date = FilterForm {
            start_date: "31/01/2025".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            FilterSet::try_from(bad_type),
            Err(FilterError::InvalidType("SIDEWAYS".to_owned()))
        );
        assert_eq!(
            FilterSet::try_from(bad_date),
            Err(FilterError::InvalidDate("31/01/2025".to_owned()))
        );
    }

    #[test]
    fn query_pairs_skip_wildcards() {
        let filters = FilterSet {
            transaction_type: Some(TransactionType::In),
            start_date: Some(date!(2025 - 01 - 01)),
            end_date: Some(date!(2025 - 01 - 31)),
            ..Default::default()
        };

        assert_eq!(
            filters.query_pairs(),
            vec![
                ("type", "IN".to_owned()),
                ("startDate", "2025-01-01".to_owned()),
                ("endDate", "2025-01-31".to_owned()),
            ]
        );
        assert!(FilterSet::default().query_pairs().is_empty());
    }
}
