use clap::{Args, ValueEnum};
use eyre::Result;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding `--log-level` with a full filter directive.
const LOG_ENV: &str = "KTBUILD_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Log filter used when KTBUILD_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Initialize the tracing subscriber. Logs go to stderr so compiler
/// diagnostics on stdout stay machine readable.
pub fn init(args: &LogArgs) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let (text_layer, json_layer) = match args.log_format {
        LogFormat::Text => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    Registry::default()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ktbuild starting");
    Ok(())
}
