//! Works out where to send a user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Reduce `raw_url` to a local path and query, rejecting anything that could
/// send the user to another site or back to the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    let is_local = path_and_query.starts_with('/') && !path_and_query.starts_with("//");
    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    (is_local && path != endpoints::LOG_IN_VIEW).then(|| path_and_query.to_owned())
}

/// The page the user was on when their session was found to be missing.
///
/// htmx requests to `/api` routes report the page they came from in the
/// `HX-Current-URL` header. Other requests are for the page itself.
fn redirect_target(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with("/api") {
        return request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()));
    }

    let current_url = request
        .headers()
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok());

    match current_url {
        Some(current_url) => {
            let target = normalize_redirect_url(current_url);
            if target.is_none() {
                tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
            }
            target
        }
        None => {
            tracing::debug!("No HX-Current-URL header for {}", request.uri().path());
            None
        }
    }
}

/// The log-in URL, carrying the page to return to when there is one.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    redirect_target(request)
        .and_then(|target| {
            serde_urlencoded::to_string([("redirect_url", target.as_str())])
                .inspect_err(|error| {
                    tracing::error!("Could not encode redirect URL {target}: {error}")
                })
                .ok()
        })
        .map(|query| format!("{}?{}", endpoints::LOG_IN_VIEW, query))
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
}
