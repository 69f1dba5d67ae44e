use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salebook::{AppState, build_router, graceful_shutdown, initialize_db, user::seed_default_admin};

/// The REST API server for salebook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// File path that filter results are exported to as CSV.
    #[arg(long, default_value = "data/filter_results.csv")]
    export_path: PathBuf,

    /// How long issued access tokens stay valid, in minutes.
    #[arg(long, default_value_t = 30)]
    token_ttl_minutes: i64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    // Refuse to start with a missing or empty secret rather than signing
    // tokens with a placeholder value.
    let secret = match env::var("SECRET_KEY") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::error!(
                "The environment variable 'SECRET_KEY' must be set to a non-empty value"
            );
            std::process::exit(1);
        }
    };

    let connection = Connection::open(&args.db_path).expect("Could not open the database file");
    initialize_db(&connection).expect("Could not initialize the database");
    seed_default_admin(&connection).expect("Could not seed the default admin user");

    let state = AppState::new(
        Arc::new(Mutex::new(connection)),
        &secret,
        Duration::minutes(args.token_ttl_minutes),
        args.export_path,
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
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
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
