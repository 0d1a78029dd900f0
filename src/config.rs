//! Connection configuration and URL parsing
//!
//! Connection URLs have the form
//! `quarry:<protocol>:<database>[;key=value]*`, for example:
//! - `quarry:mem:test`
//! - `quarry:file:/var/lib/app/db;default_schema=true`
//! - `quarry:res:/seed/catalog;time_zone=+02:00;fetch_size=500`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::types::temporal::parse_offset;

/// URL scheme prefix
pub const URL_PREFIX: &str = "quarry:";

/// Default fetch size hint (0 lets the engine decide)
pub const DEFAULT_FETCH_SIZE: u32 = 0;

/// How the engine stores the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// In-memory database
    #[default]
    Mem,
    /// Database files on disk
    File,
    /// Read-only database packaged as a resource
    Res,
}

impl Protocol {
    /// URL keyword for this protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Mem => "mem",
            Protocol::File => "file",
            Protocol::Res => "res",
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mem" => Ok(Protocol::Mem),
            "file" => Ok(Protocol::File),
            "res" => Ok(Protocol::Res),
            other => Err(Error::InvalidConnectionString(format!(
                "unknown protocol: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection configuration.
///
/// # Examples
///
/// ## From a URL
///
/// ```rust
/// use quarry_client::Config;
///
/// let config: Config = "quarry:mem:test;default_schema=true".parse().unwrap();
/// assert!(config.default_schema);
/// ```
///
/// ## With the builder
///
/// ```rust
/// use chrono::FixedOffset;
/// use quarry_client::config::{Config, Protocol};
///
/// let config = Config::new(Protocol::File, "/var/lib/app/db")
///     .with_credentials("SA", "")
///     .with_default_schema(true)
///     .with_time_zone(FixedOffset::east_opt(2 * 3600).unwrap());
/// assert_eq!(config.url(), "quarry:file:/var/lib/app/db");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage protocol
    pub protocol: Protocol,
    /// Database name or path
    pub database: String,
    /// User name
    pub username: String,
    /// Password (not shown by `Display`)
    password: String,
    /// Replace empty-string schema and catalog arguments of metadata calls
    /// with the session's default schema and catalog
    pub default_schema: bool,
    /// Offset used when converting between zoned and unzoned date-times
    pub time_zone: FixedOffset,
    /// Fetch size hint for new statements
    pub fetch_size: u32,
    /// Log filter directive, e.g. `debug` or `quarry_client=trace`
    pub log_level: Option<String>,
    /// Log to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Properties not interpreted by the client, passed through to the engine
    pub properties: IndexMap<String, String>,
}

impl Config {
    /// Create a new configuration
    pub fn new(protocol: Protocol, database: impl Into<String>) -> Self {
        Self {
            protocol,
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the user name and password
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Enable or disable default schema translation
    pub fn with_default_schema(mut self, enabled: bool) -> Self {
        self.default_schema = enabled;
        self
    }

    /// Set the offset used for zone-less conversions
    pub fn with_time_zone(mut self, zone: FixedOffset) -> Self {
        self.time_zone = zone;
        self
    }

    /// Set the fetch size hint
    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    /// Set the log filter directive
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Log to a file instead of stderr
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Add an engine property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The password, for [`Session`](crate::Session) implementations that
    /// authenticate
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Set the password
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Set the username
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Connection URL without properties
    pub fn url(&self) -> String {
        format!("{}{}:{}", URL_PREFIX, self.protocol, self.database)
    }

    /// Apply one `key=value` property from a URL
    fn apply_property(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |what: &str| Error::InvalidConnectionString(format!("invalid {}: {}", what, value));
        match key.to_ascii_lowercase().as_str() {
            "user" => self.username = value.to_string(),
            "password" => self.password = value.to_string(),
            "default_schema" => {
                self.default_schema = value.parse::<bool>().map_err(|_| invalid("default_schema"))?
            }
            "time_zone" => {
                self.time_zone = match value {
                    "Z" | "UTC" => Utc.fix(),
                    _ => parse_offset(value).ok_or_else(|| invalid("time_zone"))?,
                }
            }
            "fetch_size" => self.fetch_size = value.parse().map_err(|_| invalid("fetch_size"))?,
            "log_level" => self.log_level = Some(value.to_string()),
            "log_file" => self.log_file = Some(PathBuf::from(value)),
            _ => {
                self.properties.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: Protocol::Mem,
            database: String::new(),
            username: "SA".to_string(),
            password: String::new(),
            default_schema: false,
            time_zone: Utc.fix(),
            fetch_size: DEFAULT_FETCH_SIZE,
            log_level: None,
            log_file: None,
            properties: IndexMap::new(),
        }
    }
}

/// Parse a connection URL
///
/// Format: `quarry:<protocol>:<database>[;key=value]*`. Recognised keys are
/// `user`, `password`, `default_schema`, `time_zone`, `fetch_size`,
/// `log_level` and `log_file`; other keys are kept in
/// [`Config::properties`].
impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidConnectionString(
                "empty connection string".to_string(),
            ));
        }

        let rest = s
            .strip_prefix(URL_PREFIX)
            .ok_or_else(|| Error::InvalidConnectionString(format!("URL must start with {}", URL_PREFIX)))?;

        let mut segments = rest.split(';');
        let location = segments.next().unwrap_or_default();
        let (protocol, database) = location.split_once(':').ok_or_else(|| {
            Error::InvalidConnectionString("expected <protocol>:<database>".to_string())
        })?;

        let mut config = Config::new(protocol.parse()?, database);

        for segment in segments.filter(|seg| !seg.trim().is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                Error::InvalidConnectionString(format!("property without value: {}", segment))
            })?;
            config.apply_property(key.trim(), value.trim())?;
        }

        Ok(config)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())?;
        if self.default_schema {
            write!(f, ";default_schema=true")?;
        }
        if self.time_zone.local_minus_utc() != 0 {
            write!(f, ";time_zone={}", self.time_zone)?;
        }
        for (key, value) in &self.properties {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}
