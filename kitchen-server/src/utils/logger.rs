//! Logging infrastructure
//!
//! Human readable lines on stdout for development, JSON lines for
//! production, plus an optional daily rolling file.

use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Initialize the logger with defaults (info, text, stdout only)
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger
///
/// `RUST_LOG`, when set, overrides `log_level`. Calling this twice is a
/// no-op for the second call.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let json = json.unwrap_or(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},kitchen_server={level},tower_http={level},sqlx=warn"
        ))
    });

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(if json {
        fmt::layer().json().with_current_span(false).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    });

    if let Some(dir) = log_dir {
        let path = Path::new(dir);
        match std::fs::create_dir_all(path) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(path, "kitchen-server.log");
                layers.push(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(appender)
                        .boxed(),
                );
            }
            Err(e) => eprintln!("Log directory {dir} unavailable, file logging disabled: {e}"),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init();
}
