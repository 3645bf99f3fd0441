use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Events from the replwire crates at `level`; dependencies never below warn.
fn targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    Targets::new()
        .with_target("replwire", level)
        .with_default(level.min(LevelFilter::WARN))
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    let registry = tracing_subscriber::registry().with(targets(level));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = registry.with(layer).try_init();
        }
        LogFormat::Json => {
            let _ = registry.with(layer.json()).try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_capped_at_warn() {
        let filter = targets(LogLevel::Trace);
        assert!(filter.would_enable("replwire_client::correlator", &tracing::Level::TRACE));
        assert!(!filter.would_enable("tokio::net", &tracing::Level::DEBUG));
        assert!(filter.would_enable("tokio::net", &tracing::Level::WARN));

        let quiet = targets(LogLevel::Error);
        assert!(!quiet.would_enable("tokio::net", &tracing::Level::WARN));
        assert!(!quiet.would_enable("replwire_codec", &tracing::Level::INFO));
    }
}
