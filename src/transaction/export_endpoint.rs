//! Downloads every transaction as a CSV file.
use std::sync::Arc;

use axum::{
    Extension,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api::CashbookApi,
    session::SessionController,
    transaction::{FilterSet, Transaction, format_date_time},
};

/// The name the browser saves the export as.
pub const EXPORT_FILE_NAME: &str = "cashbook_export.csv";

const EXPORT_HEADER: [&str; 6] = ["Date", "Type", "Amount", "Category", "Remark", "Bank/Cash"];

fn write_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for transaction in transactions {
        let date = format_date_time(transaction.date)
            .map_err(|error| Error::ExportError(error.to_string()))?;
        let amount = transaction.amount.to_string();

        writer
            .write_record([
                date.as_str(),
                transaction.transaction_type.as_str(),
                amount.as_str(),
                transaction.category.as_str(),
                transaction.remark.as_str(),
                transaction.bank_cash.as_str(),
            ])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}

/// A route handler that downloads all of the user's transactions, ignoring
/// the filters on the transactions page.
pub async fn export_transactions_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
) -> Result<Response, Error> {
    let transactions = controller
        .api()
        .transactions(&FilterSet::default())
        .await
        .inspect_err(|error| tracing::error!("Could not fetch transactions for export: {error}"))?;

    let body = write_csv(&transactions)?;
    tracing::info!("Exported {} transactions", transactions.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod export_tests {
    use std::sync::Arc;

    use axum::{Extension, http::StatusCode};
    use time::macros::datetime;

    use crate::{
        Error,
        pagination::PaginationConfig,
        test_utils::{FakeBackend, assert_content_type, get_header},
        transaction::{FilterSet, Transaction, TransactionType, TransactionViewController},
    };

    use super::{export_transactions_endpoint, write_csv};

    #[test]
    fn csv_has_header_and_quotes_fields() {
        let transactions = vec![
            Transaction::build("t1", TransactionType::Out, 1234.5)
                .category("Food")
                .bank_cash("Cash")
                .remark("Dinner, with \"friends\"")
                .date(datetime!(2025-01-05 18:30))
                .finalise(),
        ];

        let csv = String::from_utf8(write_csv(&transactions).unwrap()).unwrap();

        assert_eq!(
            csv,
            "Date,Type,Amount,Category,Remark,Bank/Cash\n\
            2025-01-05T18:30:00,OUT,1234.5,Food,\"Dinner, with \"\"friends\"\"\",Cash\n"
        );
    }

    #[tokio::test]
    async fn export_ignores_active_filters() {
        let backend = FakeBackend::start().await;
        let controller = Arc::new(TransactionViewController::new(
            backend.api(),
            PaginationConfig::default(),
        ));
        controller
            .apply_filter(FilterSet {
                transaction_type: Some(TransactionType::In),
                ..Default::default()
            })
            .await
            .unwrap();

        let response = export_transactions_endpoint(Extension(controller))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"cashbook_export.csv\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let lines = String::from_utf8_lossy(&body).lines().count();
        assert_eq!(lines, 4);
    }

    #[tokio::test]
    async fn export_with_rejected_token_requires_log_in() {
        let backend = FakeBackend::start().await;
        let controller = Arc::new(TransactionViewController::new(
            backend.api().with_token("stale-token"),
            PaginationConfig::default(),
        ));

        let error = export_transactions_endpoint(Extension(controller))
            .await
            .unwrap_err();

        assert_eq!(error, Error::SessionExpired);
    }
}
