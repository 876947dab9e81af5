//! Defines the core data models for transactions held by the cash-book backend.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

// ============================================================================
// MODELS
// ============================================================================

/// The backend's identifier for a transaction.
///
/// The backend hands out UUID strings, but the front end treats the ID as an
/// opaque value that is only ever compared and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a raw ID string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw ID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether money came into or went out of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Cash inflow.
    #[serde(rename = "IN")]
    In,
    /// Cash outflow.
    #[serde(rename = "OUT")]
    Out,
}

impl TransactionType {
    /// The wire value, "IN" or "OUT".
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }

    /// Parse the wire value, ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("IN") {
            Some(TransactionType::In)
        } else if text.eq_ignore_ascii_case("OUT") {
            Some(TransactionType::Out)
        } else {
            None
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the cash book as returned by the backend.
///
/// The front end only ever holds a cached copy: every change goes through the
/// backend and the cache is then re-fetched wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub transaction_id: TransactionId,
    /// The owner of the transaction, if the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Whether this is an inflow or outflow.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The non-negative amount of money moved.
    pub amount: f64,
    /// A free-text label such as "Food" or "Salary".
    pub category: String,
    /// Which wallet or bank account the transaction affects.
    pub bank_cash: String,
    /// An optional note.
    #[serde(default, deserialize_with = "nullable_string::deserialize")]
    pub remark: String,
    /// When the transaction happened.
    #[serde(with = "datetime_format")]
    pub date: PrimitiveDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_id: &str,
        transaction_type: TransactionType,
        amount: f64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_id: TransactionId::new(transaction_id),
            transaction_type,
            amount,
            category: "General".to_owned(),
            bank_cash: "Cash".to_owned(),
            remark: String::new(),
            date: time::macros::datetime!(2025-01-01 12:00),
        }
    }

    /// The editable fields of this transaction.
    pub fn fields(&self) -> TransactionFields {
        TransactionFields {
            date: self.date,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category.clone(),
            bank_cash: self.bank_cash.clone(),
            remark: self.remark.clone(),
        }
    }
}

/// A builder for [Transaction] values with defaults for the fields a test
/// does not care about.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    transaction_id: TransactionId,
    transaction_type: TransactionType,
    amount: f64,
    category: String,
    bank_cash: String,
    remark: String,
    date: PrimitiveDateTime,
}

impl TransactionBuilder {
    /// Set the category label.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the wallet or bank label.
    pub fn bank_cash(mut self, bank_cash: &str) -> Self {
        bank_cash.clone_into(&mut self.bank_cash);
        self
    }

    /// Set the note.
    pub fn remark(mut self, remark: &str) -> Self {
        remark.clone_into(&mut self.remark);
        self
    }

    /// Set when the transaction happened.
    pub fn date(mut self, date: PrimitiveDateTime) -> Self {
        self.date = date;
        self
    }

    /// Build the transaction.
    pub fn finalise(self) -> Transaction {
        Transaction {
            transaction_id: self.transaction_id,
            user_id: None,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category,
            bank_cash: self.bank_cash,
            remark: self.remark,
            date: self.date,
        }
    }
}

/// The body sent to the backend when creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFields {
    /// When the transaction happened.
    #[serde(with = "datetime_format")]
    pub date: PrimitiveDateTime,
    /// Whether this is an inflow or outflow.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The non-negative amount of money moved.
    pub amount: f64,
    /// A free-text label such as "Food" or "Salary".
    pub category: String,
    /// Which wallet or bank account the transaction affects.
    pub bank_cash: String,
    /// An optional note.
    #[serde(default)]
    pub remark: String,
}

impl TransactionFields {
    /// Attach an ID to these fields, e.g. to build the expected state after an update.
    pub fn into_transaction(self, transaction_id: TransactionId) -> Transaction {
        Transaction {
            transaction_id,
            user_id: None,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category,
            bank_cash: self.bank_cash,
            remark: self.remark,
            date: self.date,
        }
    }
}

/// Parse the date-time formats the backend and browsers produce.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` with an optional fraction, the
/// `datetime-local` input format `YYYY-MM-DDTHH:MM`, and a bare date, which
/// is read as midnight. A trailing `Z` is ignored.
pub fn parse_date_time(text: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let text = text.trim().trim_end_matches('Z');

    PrimitiveDateTime::parse(text, datetime_format::DATE_TIME_SUBSECOND_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, datetime_format::DATE_TIME_FORMAT))
        .or_else(|_| PrimitiveDateTime::parse(text, datetime_format::DATE_TIME_MINUTE_FORMAT))
        .or_else(|_| Date::parse(text, datetime_format::DATE_FORMAT).map(Date::midnight))
}

/// Format a date-time the way the backend expects it, e.g. "2025-01-31T09:05:00".
pub fn format_date_time(date_time: PrimitiveDateTime) -> Result<String, time::error::Format> {
    date_time.format(datetime_format::DATE_TIME_FORMAT)
}

/// Format a date-time for a `datetime-local` input, e.g. "2025-01-31T09:05".
pub fn format_date_time_local(date_time: PrimitiveDateTime) -> Result<String, time::error::Format> {
    date_time.format(datetime_format::DATE_TIME_MINUTE_FORMAT)
}

pub(crate) mod datetime_format {
    //! Serializes a [time::PrimitiveDateTime] as an ISO 8601 string without
    //! an offset, and deserializes any of the formats accepted by
    //! [super::parse_date_time].
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    pub(crate) const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    pub(crate) const DATE_TIME_SUBSECOND_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    pub(crate) const DATE_TIME_MINUTE_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]");
    pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date_time: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date_time
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date_time(&text).map_err(serde::de::Error::custom)
    }
}

mod nullable_string {
    use serde::{Deserialize, Deserializer};

    /// The backend sends `null` for remarks that were never set.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{
        Transaction, TransactionFields, TransactionId, TransactionType, format_date_time,
        parse_date_time,
    };

    #[test]
    fn deserialize_backend_transaction() {
        let json = r#"{
            "transaction_id": "5f0c7d2e",
            "user_id": "ZIYAD",
            "type": "OUT",
            "amount": 250.75,
            "category": "Food",
            "remark": null,
            "bank_cash": "HDFC",
            "date": "2025-03-04T18:22:10.123456"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.transaction_id, TransactionId::new("5f0c7d2e"));
        assert_eq!(transaction.user_id.as_deref(), Some("ZIYAD"));
        assert_eq!(transaction.transaction_type, TransactionType::Out);
        assert_eq!(transaction.amount, 250.75);
        assert_eq!(transaction.remark, "");
        assert_eq!(
            transaction.date,
            datetime!(2025-03-04 18:22:10.123456)
        );
    }

    #[test]
    fn parse_accepted_date_time_formats() {
        let cases = [
            ("2025-03-04T18:22:10", datetime!(2025-03-04 18:22:10)),
            ("2025-03-04T18:22:10.5", datetime!(2025-03-04 18:22:10.5)),
            ("2025-03-04T18:22", datetime!(2025-03-04 18:22)),
            ("2025-03-04T18:22:10Z", datetime!(2025-03-04 18:22:10)),
            ("2025-03-04", datetime!(2025-03-04 0:00)),
        ];

        for (text, want) in cases {
            let got = parse_date_time(text);
            assert_eq!(got.ok(), Some(want), "parsing {text:?}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("04/03/2025").is_err());
    }

    #[test]
    fn serialize_fields_uses_backend_names() {
        let fields = TransactionFields {
            date: datetime!(2025-01-31 09:05),
            transaction_type: TransactionType::In,
            amount: 1000.0,
            category: "Salary".to_owned(),
            bank_cash: "SBI".to_owned(),
            remark: "January".to_owned(),
        };

        let json = serde_json::to_value(&fields).unwrap();

        assert_eq!(json["type"], "IN");
        assert_eq!(json["date"], "2025-01-31T09:05:00");
        assert_eq!(json["bank_cash"], "SBI");
        assert_eq!(
            format_date_time(fields.date).unwrap(),
            "2025-01-31T09:05:00"
        );
    }

    #[test]
    fn transaction_type_parse_ignores_case() {
        assert_eq!(TransactionType::parse("in"), Some(TransactionType::In));
        assert_eq!(TransactionType::parse("OUT"), Some(TransactionType::Out));
        assert_eq!(TransactionType::parse("ALL"), None);
    }
}
