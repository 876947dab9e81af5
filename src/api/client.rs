//! A [CashbookApi] implementation that talks to the backend over HTTP.

use reqwest::{
    Client as HttpClient, RequestBuilder, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

use crate::{
    api::{
        ApiError, CashbookApi,
        models::{
            DashboardResponse, ErrorResponse, LogInRequest, LogInResponse, MessageResponse,
            TransactionsResponse,
        },
    },
    endpoints::format_endpoint,
    transaction::{FilterSet, Transaction, TransactionFields, TransactionId},
};

/// The backend path of a single transaction.
const TRANSACTION_PATH: &str = "/transactions/{transaction_id}";

/// The message shown when an import is attempted without a file.
pub const NO_FILE_SELECTED: &str = "Select a file first";

/// Cash-book REST API client.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpCashbookApi {
    http_client: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl HttpCashbookApi {
    /// The base URL used when none is configured.
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000/api";

    /// Create a client without a session token, e.g. for logging in.
    ///
    /// `base_url` is the API root, e.g. "https://example.com/api".
    pub fn new(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    /// A copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_owned()),
        }
    }

    /// POST /login
    ///
    /// Exchanges a username and password for a bearer token.
    ///
    /// # Errors
    /// Returns [ApiError::Unauthorized] for wrong credentials, or another
    /// [ApiError] if the backend could not be reached or rejected the request.
    pub async fn log_in(&self, username: &str, password: &str) -> Result<LogInResponse, ApiError> {
        let body = LogInRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let request = self.http_client.post(self.url("/login")).json(&body);
        let response = self.send(request).await?;

        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Transaction ids are opaque, so they are percent-encoded as one path segment.
    fn transaction_url(&self, transaction_id: &TransactionId) -> String {
        self.url(&format_endpoint(TRANSACTION_PATH, transaction_id.as_str()))
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &self.token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
                ApiError::Precondition(format!("Invalid session token: {error}"))
            })?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.headers(self.create_headers()?).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(handle_error_response(response).await)
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let request = self.http_client.get(self.url(path)).query(query);
        let response = self.send(request).await?;

        decode(response).await
    }
}

/// Parse an error response based on its HTTP status code.
async fn handle_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body_text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&body_text)
        .ok()
        .and_then(|body| body.error.or(body.msg).or(body.message))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned()
        });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        status => {
            if status.is_server_error() {
                tracing::warn!("Backend error {status}: {body_text}");
            }

            ApiError::Status { status, message }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::Decode(error.to_string()))
}

impl CashbookApi for HttpCashbookApi {
    async fn dashboard(&self, filters: &FilterSet) -> Result<DashboardResponse, ApiError> {
        self.get("/dashboard", &filters.query_pairs()).await
    }

    async fn transactions(&self, filters: &FilterSet) -> Result<Vec<Transaction>, ApiError> {
        let response: TransactionsResponse =
            self.get("/transactions", &filters.query_pairs()).await?;

        Ok(response.transactions)
    }

    async fn create_transaction(&self, fields: &TransactionFields) -> Result<(), ApiError> {
        let request = self.http_client.post(self.url("/transactions")).json(fields);
        self.send(request).await?;

        Ok(())
    }

    async fn update_transaction(
        &self,
        transaction_id: &TransactionId,
        fields: &TransactionFields,
    ) -> Result<(), ApiError> {
        let request = self
            .http_client
            .put(self.transaction_url(transaction_id))
            .json(fields);
        self.send(request).await?;

        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &TransactionId) -> Result<(), ApiError> {
        let request = self
            .http_client
            .delete(self.transaction_url(transaction_id));
        self.send(request).await?;

        Ok(())
    }

    async fn banks(&self) -> Result<Vec<String>, ApiError> {
        self.get("/banks", &[]).await
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.get("/categories", &[]).await
    }

    async fn import_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String, ApiError> {
        if contents.is_empty() {
            return Err(ApiError::Precondition(NO_FILE_SELECTED.to_owned()));
        }

        let part = Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let request = self
            .http_client
            .post(self.url("/import"))
            .multipart(Form::new().part("file", part));
        let response = self.send(request).await?;
        let body: MessageResponse = decode(response).await?;

        Ok(body.message)
    }
}
