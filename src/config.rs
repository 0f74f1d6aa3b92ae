//! Runtime configuration shared by the binaries.

use std::path::PathBuf;

use crate::{Error, record::UserId};

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// The log filter used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// An `EnvFilter` directive for the terminal log, e.g. "info" or
    /// "finrecords=debug".
    pub filter: String,
    /// A file that receives a debug level log in addition to the terminal.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
            file: None,
        }
    }
}

/// The validated configuration of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The SQLite database holding the records. Records are kept in memory
    /// when this is `None`.
    pub db_path: Option<PathBuf>,
    /// The user whose records are managed.
    pub user: UserId,
    /// The symbol amounts are prefixed with.
    pub currency_symbol: String,
    /// The logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Validate the raw configuration values.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::EmptyUserId] if `user` is empty,
    /// - [Error::InvalidConfig] if `db_path` is given but empty, or if
    ///   `currency_symbol` is empty.
    pub fn new(
        db_path: Option<PathBuf>,
        user: &str,
        currency_symbol: &str,
        log: LogConfig,
    ) -> Result<Self, Error> {
        if db_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(Error::InvalidConfig(
                "the database path cannot be empty".to_owned(),
            ));
        }

        let currency_symbol = currency_symbol.trim();
        if currency_symbol.is_empty() {
            return Err(Error::InvalidConfig(
                "the currency symbol cannot be empty".to_owned(),
            ));
        }

        Ok(Self {
            db_path,
            user: UserId::new(user)?,
            currency_symbol: currency_symbol.to_owned(),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        Error,
        config::{Config, DEFAULT_CURRENCY_SYMBOL, LogConfig},
        record::UserId,
    };

    #[test]
    fn new_accepts_valid_values() {
        let config = Config::new(
            Some(PathBuf::from("records.db")),
            "alice",
            DEFAULT_CURRENCY_SYMBOL,
            LogConfig::default(),
        )
        .unwrap();

        assert_eq!(config.user, UserId::new("alice").unwrap());
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn new_rejects_empty_user() {
        let result = Config::new(None, "", "$", LogConfig::default());

        assert_eq!(result, Err(Error::EmptyUserId));
    }

    #[test]
    fn new_rejects_empty_db_path() {
        let result = Config::new(Some(PathBuf::new()), "alice", "$", LogConfig::default());

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn new_rejects_empty_currency_symbol() {
        let result = Config::new(None, "alice", " ", LogConfig::default());

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
