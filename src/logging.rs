//! Tracing subscriber setup for the CLI

use tracing::subscriber::set_global_default;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, SweepError};

pub struct Logging {
    verbosity: u8,
    color: bool,
}

impl Logging {
    pub fn new(verbosity: u8, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn log_level(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. `RUST_LOG`, when set, overrides `-v`.
    pub fn start(self) -> Result<()> {
        let filter = match std::env::var_os("RUST_LOG") {
            Some(_) => EnvFilter::from_default_env(),
            None => EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                Self::log_level(self.verbosity)
            )),
        };

        let fmt = fmt::layer()
            .with_ansi(self.color)
            .with_writer(std::io::stderr)
            .with_target(self.verbosity >= 2);

        let registry = tracing_subscriber::registry().with(filter).with(fmt);
        set_global_default(registry)
            .map_err(|e| SweepError::internal(format!("Failed to install logger: {}", e)))
    }
}
