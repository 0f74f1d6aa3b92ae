//! Sets up the tracing subscriber used by the binaries.

use std::{fs::OpenOptions, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{Error, config::LogConfig};

/// Install the global tracing subscriber.
///
/// Logs go to stderr, filtered by `config.filter`. If `config.file` is set,
/// everything at debug level and above is also appended to that file.
///
/// # Errors
/// Returns [Error::LoggingError] if the filter is invalid, the log file cannot
/// be opened or a subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> Result<(), Error> {
    let env_filter = EnvFilter::try_new(&config.filter).map_err(|error| {
        Error::LoggingError(format!("invalid log filter \"{}\": {error}", config.filter))
    })?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let debug_log = match &config.file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| {
                    Error::LoggingError(format!(
                        "could not open log file {}: {error}",
                        path.display()
                    ))
                })?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init()
        .map_err(|error| Error::LoggingError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{Error, config::LogConfig, logging::setup_logging};

    #[test]
    fn invalid_filter_is_rejected() {
        let config = LogConfig {
            filter: "finrecords=loud".to_owned(),
            file: None,
        };

        let result = setup_logging(&config);

        assert!(matches!(result, Err(Error::LoggingError(_))));
    }
}
