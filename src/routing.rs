//! Application router configuration with protected and unprotected route definitions.

use std::path::Path;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::get_dashboard_page,
    endpoints,
    import::{get_import_page, import_endpoint},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        bulk_delete_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        edit_transaction_endpoint, export_transactions_endpoint, filter_transactions_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transactions_page,
        load_more_endpoint, select_all_transactions_endpoint, select_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Files under `static_dir` are served from [endpoints::STATIC].
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // The export is a plain download link, so it is guarded like a page.
    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(endpoints::EXPORT, get(export_transactions_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx and need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::FILTER_TRANSACTIONS,
                post(filter_transactions_endpoint),
            )
            .route(endpoints::LOAD_MORE_TRANSACTIONS, post(load_more_endpoint))
            .route(
                endpoints::SELECT_ALL_TRANSACTIONS,
                post(select_all_transactions_endpoint),
            )
            .route(
                endpoints::SELECT_TRANSACTION,
                post(select_transaction_endpoint),
            )
            .route(
                endpoints::BULK_DELETE_TRANSACTIONS,
                post(bulk_delete_endpoint),
            )
            .route(endpoints::IMPORT, post(import_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
