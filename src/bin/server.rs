use std::{
    env,
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use cashbook::{
    AppState, HttpCashbookApi, PaginationConfig, build_router, graceful_shutdown,
    logging_middleware,
};

/// The web front end for a cash-book backend.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the backend REST API.
    #[arg(long, env = "CASHBOOK_BACKEND_URL", default_value = HttpCashbookApi::DEFAULT_BASE_URL)]
    backend_url: String,

    /// The port to serve the front end from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The number of transactions shown after loading or filtering.
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// The number of extra transactions shown by "Load more".
    #[arg(long, default_value_t = 10)]
    page_increment: usize,

    /// The canonical name of the local timezone, e.g. "Asia/Kolkata".
    #[arg(long, env = "CASHBOOK_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// The directory with the static files, e.g. the stylesheet and scripts.
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Directory with an SSL certificate `cert.pem` and key `key.pem`.
    /// Serves plain HTTP when not set.
    #[arg(long)]
    cert_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let Ok(secret) = env::var("SECRET") else {
        tracing::error!("The environment variable 'SECRET' must be set");
        return ExitCode::FAILURE;
    };

    let api = HttpCashbookApi::new(reqwest::Client::new(), &args.backend_url);
    let pagination_config = PaginationConfig {
        initial_page_size: args.page_size,
        page_increment: args.page_increment,
    };
    let state = match AppState::new(api, &secret, &args.timezone, pagination_config) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state, &args.static_dir).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("Using backend at {}", args.backend_url);

    let result = match args.cert_path {
        Some(cert_path) => {
            let tls_config = match RustlsConfig::from_pem_file(
                cert_path.join("cert.pem"),
                cert_path.join("key.pem"),
            )
            .await
            {
                Ok(tls_config) => tls_config,
                Err(error) => {
                    tracing::error!("Could not open TLS certificates: {error}");
                    return ExitCode::FAILURE;
                }
            };

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
    };

    if let Err(error) = result {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(filter::LevelFilter::INFO);

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .inspect_err(|error| eprintln!("Could not open debug.log, logging to stdout only: {error}"))
        .ok()
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        });

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Handlers log their own errors, so skip the default 5xx logging.
        .on_failure(());

    router.layer(tracing_layer)
}
