use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use time::macros::datetime;

use crate::{
    api::{ApiError, CashbookApi, HttpCashbookApi},
    transaction::{
        FilterForm, FilterSet, Transaction, TransactionFields, TransactionId, TransactionType,
    },
};

use super::FakeApi;

#[derive(Clone)]
struct BackendState {
    store: FakeApi,
    queries: Arc<Mutex<Vec<String>>>,
}

/// A stand-in for the cash-book REST backend, served on an ephemeral port.
///
/// Storage and failure injection are delegated to a [FakeApi] so tests can
/// reach behind the HTTP layer via [FakeBackend::store].
pub(crate) struct FakeBackend {
    address: SocketAddr,
    state: BackendState,
}

impl FakeBackend {
    pub(crate) const USERNAME: &'static str = "alice";
    pub(crate) const PASSWORD: &'static str = "correct horse";
    pub(crate) const TOKEN: &'static str = "fake-access-token";

    /// Start a backend seeded with a few transactions.
    pub(crate) async fn start() -> Self {
        Self::start_with(seed_transactions()).await
    }

    pub(crate) async fn start_with(transactions: Vec<Transaction>) -> Self {
        let state = BackendState {
            store: FakeApi::with_transactions(transactions),
            queries: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/api/login", post(log_in))
            .route("/api/dashboard", get(dashboard))
            .route(
                "/api/transactions",
                get(list_transactions).post(create_transaction),
            )
            .route(
                "/api/transactions/{id}",
                put(update_transaction).delete(delete_transaction),
            )
            .route("/api/banks", get(banks))
            .route("/api/categories", get(categories))
            .route("/api/import", post(import))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake backend");
        let address = listener
            .local_addr()
            .expect("Could not get fake backend address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fake backend stopped unexpectedly");
        });

        Self { address, state }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}/api", self.address)
    }

    /// A client that is already logged in.
    pub(crate) fn api(&self) -> HttpCashbookApi {
        HttpCashbookApi::new(reqwest::Client::new(), &self.base_url()).with_token(Self::TOKEN)
    }

    pub(crate) fn store(&self) -> &FakeApi {
        &self.state.store
    }

    /// The raw query strings of the GET requests to `/transactions` and `/dashboard`.
    pub(crate) fn received_queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }
}

fn seed_transactions() -> Vec<Transaction> {
    vec![
        Transaction::build("t1", TransactionType::In, 50000.0)
            .category("Salary")
            .bank_cash("HDFC")
            .date(datetime!(2025-01-01 09:00))
            .finalise(),
        Transaction::build("t2", TransactionType::Out, 1234.5)
            .category("Food")
            .bank_cash("Cash")
            .remark("Groceries")
            .date(datetime!(2025-01-05 18:30))
            .finalise(),
        Transaction::build("t3", TransactionType::Out, 15000.0)
            .category("Rent")
            .bank_cash("HDFC")
            .date(datetime!(2025-01-10 10:00))
            .finalise(),
    ]
}

fn error_response(error: ApiError) -> Response {
    match error {
        ApiError::Unauthorized(message) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "msg": message }))).into_response()
        }
        ApiError::Status { status, message } => {
            (status, Json(json!({ "error": message }))).into_response()
        }
        error => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

fn check_token(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", FakeBackend::TOKEN);

    match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(error_response(ApiError::Unauthorized(
            "Token has expired".to_owned(),
        ))),
        None => Err(error_response(ApiError::Unauthorized(
            "Missing Authorization Header".to_owned(),
        ))),
    }
}

fn parse_filters(query: &HashMap<String, String>) -> FilterSet {
    let field = |name: &str| query.get(name).cloned().unwrap_or_default();
    let form = FilterForm {
        transaction_type: field("type"),
        bank: field("bank"),
        category: field("category"),
        start_date: field("startDate"),
        end_date: field("endDate"),
    };

    FilterSet::try_from(form).unwrap_or_default()
}

async fn log_in(Json(body): Json<serde_json::Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if username.eq_ignore_ascii_case(FakeBackend::USERNAME) && password == FakeBackend::PASSWORD {
        Json(json!({
            "access_token": FakeBackend::TOKEN,
            "username": FakeBackend::USERNAME,
            "message": "Login successful",
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn dashboard(
    State(state): State<BackendState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }
    state
        .queries
        .lock()
        .unwrap()
        .push(raw_query.unwrap_or_default());

    match state.store.dashboard(&parse_filters(&query)).await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(error) => error_response(error),
    }
}

async fn list_transactions(
    State(state): State<BackendState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }
    state
        .queries
        .lock()
        .unwrap()
        .push(raw_query.unwrap_or_default());

    match state.store.transactions(&parse_filters(&query)).await {
        Ok(transactions) => Json(json!({ "transactions": transactions })).into_response(),
        Err(error) => error_response(error),
    }
}

async fn create_transaction(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(fields): Json<TransactionFields>,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    match state.store.create_transaction(&fields).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Transaction added" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_transaction(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(fields): Json<TransactionFields>,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    match state
        .store
        .update_transaction(&TransactionId::new(id), &fields)
        .await
    {
        Ok(()) => Json(json!({ "message": "Transaction updated" })).into_response(),
        Err(error) => error_response(error),
    }
}

async fn delete_transaction(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    match state.store.delete_transaction(&TransactionId::new(id)).await {
        Ok(()) => Json(json!({ "message": "Transaction deleted" })).into_response(),
        Err(error) => error_response(error),
    }
}

async fn banks(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    match state.store.banks().await {
        Ok(banks) => Json(banks).into_response(),
        Err(error) => error_response(error),
    }
}

async fn categories(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    match state.store.categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error_response(error),
    }
}

async fn import(
    State(state): State<BackendState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = check_token(&headers) {
        return response;
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let contents = match field.bytes().await {
            Ok(contents) => contents.to_vec(),
            Err(error) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": error.to_string() })),
                )
                    .into_response();
            }
        };

        return match state.store.import_file(&file_name, contents).await {
            Ok(message) => Json(json!({ "message": message })).into_response(),
            Err(error) => error_response(error),
        };
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file part" })),
    )
        .into_response()
}
