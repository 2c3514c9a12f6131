use std::error::Error;
use std::io::stdout;

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use application::infrastructure_config::Config;

/// `RUST_LOG` wins if set; otherwise the level comes from `logLevel`.
pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_tracing_level()));

    let formatting_layer = BunyanFormattingLayer::new("paintboard".to_string(), stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .init();

    Ok(())
}
