//! Provider configuration.
//!
//! Values come from the environment (`STOCKKEEP_*`) with defaults suitable for
//! tests: an in-memory database under the default authority.

use stockkeep_products::contract::CONTENT_AUTHORITY;

pub const ENV_AUTHORITY: &str = "STOCKKEEP_AUTHORITY";
pub const ENV_DATABASE_URL: &str = "STOCKKEEP_DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "STOCKKEEP_MAX_CONNECTIONS";

pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Authority the locator matcher answers for.
    pub authority: String,
    /// SQLite connection URL (`sqlite://path/to/stock.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Pool size for file-backed databases. In-memory databases always use one
    /// connection, since each connection would otherwise see its own database.
    pub max_connections: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            database_url: IN_MEMORY_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ProviderConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or unusable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let authority = lookup(ENV_AUTHORITY)
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(defaults.authority);

        let database_url = lookup(ENV_DATABASE_URL)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.database_url);

        let max_connections = match lookup(ENV_MAX_CONNECTIONS) {
            None => defaults.max_connections,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "{ENV_MAX_CONNECTIONS} is not a positive integer; using {}",
                        defaults.max_connections
                    );
                    defaults.max_connections
                }
            },
        };

        Self {
            authority,
            database_url,
            max_connections,
        }
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}
