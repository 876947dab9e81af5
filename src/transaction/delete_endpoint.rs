use std::sync::Arc;

use axum::{
    Extension,
    extract::Path,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    session::SessionController,
    transaction::{TransactionId, view::transactions_view_partial},
};

/// A route handler for deleting a single transaction.
///
/// Responds with the refreshed summary, charts and table, or an alert if the
/// backend refused the delete.
pub async fn delete_transaction_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);

    if let Err(error) = controller.delete_transaction(&transaction_id).await {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return Error::from(error).into_alert_response();
    }

    transactions_view_partial(&controller.snapshot()).into_response()
}

#[cfg(test)]
mod delete_endpoint_tests {
    use std::sync::Arc;

    use axum::{Extension, extract::Path, http::StatusCode};
    use scraper::Selector;

    use crate::{
        pagination::PaginationConfig,
        test_utils::{FakeBackend, parse_html_fragment},
        transaction::{TransactionId, TransactionViewController},
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn delete_removes_row_from_view() {
        let backend = FakeBackend::start().await;
        let controller = Arc::new(TransactionViewController::new(
            backend.api(),
            PaginationConfig::default(),
        ));
        controller.refresh().await.unwrap();

        let response =
            delete_transaction_endpoint(Extension(controller.clone()), Path("t2".to_owned()))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.store().deleted_ids(), [TransactionId::new("t2")]);
        let html = parse_html_fragment(response).await;
        let ids = html
            .select(&Selector::parse("tr[data-transaction-id]").unwrap())
            .filter_map(|row| row.value().attr("data-transaction-id"))
            .collect::<Vec<_>>();
        assert_eq!(ids, ["t1", "t3"]);
    }

    #[tokio::test]
    async fn delete_of_missing_transaction_shows_alert() {
        let backend = FakeBackend::start().await;
        let controller = Arc::new(TransactionViewController::new(
            backend.api(),
            PaginationConfig::default(),
        ));

        let response =
            delete_transaction_endpoint(Extension(controller), Path("missing".to_owned())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        assert!(
            alert
                .text()
                .collect::<String>()
                .contains("Transaction not found")
        );
    }
}
