//! Classifier Service: Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and metrics.

use anyhow::Context as _;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use light_classifier::api::{self, AppState};
use light_classifier::config::config_dir_from_env;
use light_classifier::handle::{start_hot_reload_thread, ClassifierHandle};
use light_classifier::metrics::Metrics;
use light_classifier::{Classifier, ClassifierConfig};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CLASSIFIER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("CLASSIFIER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("classifier=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let dir = config_dir_from_env();
    let config = ClassifierConfig::load_dir(&dir).context("loading classifier config")?;
    let classifier = Classifier::new(config).context("validating classifier config")?;
    let handle = ClassifierHandle::new(classifier);

    start_hot_reload_thread(handle.clone(), dir);

    let metrics = Metrics::init()?;

    let state = AppState { classifier: handle };
    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
