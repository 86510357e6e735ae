use catalog_products::COLLECTION;

const DEFAULT_API_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STORE_PORT: u16 = 9700;
const DEFAULT_DATABASE: &str = "catalog";
const DEFAULT_POOL_SIZE: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where product documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-process store; contents are lost on exit.
    Embedded,
    /// A `catalog-server` reached over TCP.
    Remote { host: String, port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_addr: String,
    pub store: StoreConfig,
    pub database: String,
    pub pool_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_addr = lookup("CATALOG_API_ADDR").unwrap_or_else(|| DEFAULT_API_ADDR.into());
        let database = lookup("CATALOG_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into());

        let port = parse_var(&lookup, "CATALOG_STORE_PORT", DEFAULT_STORE_PORT)?;
        let store = match lookup("CATALOG_STORE_HOST") {
            Some(host) if !host.is_empty() => StoreConfig::Remote { host, port },
            _ => StoreConfig::Embedded,
        };

        let pool_size = parse_var(&lookup, "CATALOG_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError {
                var: "CATALOG_POOL_SIZE",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Config {
            api_addr,
            store,
            database,
            pool_size,
        })
    }

    /// Fully qualified collection name, `<database>.product`.
    pub fn collection(&self) -> String {
        format!("{}.{}", self.database, COLLECTION)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
