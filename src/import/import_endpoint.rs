//! Forwards an uploaded CSV file to the backend.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{Multipart, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    api::{ApiError, CashbookApi},
    import::import_page::FILE_FIELD,
    session::SessionController,
};

/// An uploaded file.
struct Upload {
    file_name: String,
    contents: Vec<u8>,
}

async fn read_upload(field: Field<'_>) -> Result<Upload, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let contents = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{file_name}' that is {} bytes", contents.len());

    Ok(Upload {
        file_name,
        contents: contents.to_vec(),
    })
}

/// Find the file field in the form, skipping any other fields.
async fn find_upload(multipart: &mut Multipart) -> Result<Option<Upload>, Error> {
    loop {
        let field = multipart.next_field().await.map_err(|error| {
            tracing::error!("Could not parse multipart form: {error}");
            Error::MultipartError(error.body_text())
        })?;

        match field {
            Some(field) if field.name() == Some(FILE_FIELD) => {
                return read_upload(field).await.map(Some);
            }
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

/// A route handler that sends a CSV file to the backend for importing.
///
/// Shows the backend's message on success and reloads the transactions so the
/// new rows appear on the next visit to the transactions page.
pub async fn import_endpoint(
    Extension(controller): Extension<Arc<SessionController>>,
    mut multipart: Multipart,
) -> Response {
    let upload = match find_upload(&mut multipart).await {
        Ok(Some(upload)) if !upload.contents.is_empty() => upload,
        Ok(_) => return Error::NoFileSelected.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    };

    let message = match controller
        .api()
        .import_file(&upload.file_name, upload.contents)
        .await
    {
        Ok(message) => message,
        Err(ApiError::Precondition(_)) => return Error::NoFileSelected.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not import '{}': {error}", upload.file_name);
            return Error::from(error).into_alert_response();
        }
    };

    tracing::info!("Imported '{}': {message}", upload.file_name);

    if let Err(error) = controller.refresh().await {
        tracing::warn!("Could not reload transactions after import: {error}");
    }

    (
        StatusCode::CREATED,
        Alert::Success {
            message,
            details: String::new(),
        }
        .into_html(),
    )
        .into_response()
}
