//! Layered configuration for the pedidos service.
//!
//! Values merge in this order, later sources overriding earlier ones:
//!
//! 1. compiled defaults;
//! 2. `pedidos.toml` in the working directory (or an explicit path);
//! 3. `PEDIDOS_*` environment variables.
//!
//! Environment keys map onto sections by prefix, so
//! `PEDIDOS_PRODUCTION_WEEKLY_GOAL` sets `production.weekly_goal` and
//! `PEDIDOS_REPORT_LABELS_UNIT_PLURAL` sets `report.labels.unit_plural`.

use crate::production::{
    BoardSettings, DashboardSettings, ReferenceMarker, ReportLabels, ReportSettings,
};
use chrono_tz::Tz;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// File read from the working directory by [`load_config`].
pub const DEFAULT_CONFIG_FILE: &str = "pedidos.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PEDIDOS_";

const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong shape.
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),
    /// The configured timezone is not an IANA name.
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
    /// A numeric setting must be positive.
    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),
    /// The database URL is required but missing.
    #[error("no database URL configured; set `database.url` or PEDIDOS_DATABASE_URL")]
    MissingDatabaseUrl,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Full service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PedidosConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Dashboard and ranking settings.
    pub production: ProductionConfig,
    /// Activity report settings.
    pub report: ReportConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 8,
        }
    }
}

impl DatabaseConfig {
    /// Returns the configured URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no URL is set.
    pub fn require_url(&self) -> ConfigResult<&str> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

/// Dashboard and ranking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// IANA name of the timezone defining local days.
    pub timezone: String,
    /// Weekly machine goal.
    pub weekly_goal: u32,
    /// Size of the active work set.
    pub priority_slots: usize,
    /// Entries shown per secondary board list.
    pub list_preview_limit: usize,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_owned(),
            weekly_goal: crate::production::metrics::DEFAULT_WEEKLY_GOAL,
            priority_slots: 4,
            list_preview_limit: 5,
        }
    }
}

/// Activity report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Reference substring splitting marked orders from the rest.
    pub marker: String,
    /// Bucket line wording.
    pub labels: ReportLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            marker: ReferenceMarker::DEFAULT.to_owned(),
            labels: ReportLabels::default(),
        }
    }
}

impl PedidosConfig {
    /// Checks values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] for an unrecognised timezone
    /// and [`ConfigError::NotPositive`] for zero-sized limits.
    pub fn validate(&self) -> ConfigResult<()> {
        self.timezone()?;
        if self.production.weekly_goal == 0 {
            return Err(ConfigError::NotPositive("production.weekly_goal"));
        }
        if self.production.priority_slots == 0 {
            return Err(ConfigError::NotPositive("production.priority_slots"));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::NotPositive("database.pool_size"));
        }
        Ok(())
    }

    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] when the name is not known.
    pub fn timezone(&self) -> ConfigResult<Tz> {
        let name = self.production.timezone.trim();
        name.parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(name.to_owned()))
    }

    /// Returns the reference marker.
    #[must_use]
    pub fn marker(&self) -> ReferenceMarker {
        ReferenceMarker::new(self.report.marker.as_str())
    }

    /// Builds dashboard settings from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] when the timezone is invalid.
    pub fn dashboard_settings(&self) -> ConfigResult<DashboardSettings> {
        Ok(DashboardSettings {
            timezone: self.timezone()?,
            weekly_goal: self.production.weekly_goal,
            board: BoardSettings {
                priority_slots: self.production.priority_slots,
                preview_limit: self.production.list_preview_limit,
                marker: self.marker(),
            },
        })
    }

    /// Builds report settings from this configuration.
    #[must_use]
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            marker: self.marker(),
            labels: self.report.labels.clone(),
        }
    }
}

/// Loads `pedidos.toml` from the working directory with env overrides.
///
/// A missing file is not an error; defaults apply.
///
/// # Errors
///
/// Returns a [`ConfigError`] when a source is malformed or validation fails.
pub fn load_config() -> ConfigResult<PedidosConfig> {
    extract(build_figment(Path::new(DEFAULT_CONFIG_FILE)))
}

/// Loads configuration from `path` with env overrides.
///
/// # Errors
///
/// Returns a [`ConfigError`] when a source is malformed or validation fails.
pub fn load_config_from_path(path: &Path) -> ConfigResult<PedidosConfig> {
    extract(build_figment(path))
}

/// Loads configuration from TOML text over the defaults, ignoring the
/// environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the text is malformed or validation fails.
pub fn load_config_from_str(toml_content: &str) -> ConfigResult<PedidosConfig> {
    extract(
        Figment::new()
            .merge(Serialized::defaults(PedidosConfig::default()))
            .merge(Toml::string(toml_content)),
    )
}

/// Builds the layered figment before extraction.
#[must_use]
pub fn build_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PedidosConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
}

fn extract(figment: Figment) -> ConfigResult<PedidosConfig> {
    let config: PedidosConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).filter_map(|key| env_key_path(key.as_str()).map(Into::into))
}

const ENV_SECTIONS: [&str; 4] = ["report_labels", "database", "production", "report"];

/// Maps a prefix-stripped env key onto a dotted config path.
///
/// Keys arrive in the case they were exported with and are matched
/// case-insensitively. Only the section separators become dots; underscores inside field names
/// are kept. Keys outside a known section, such as
/// `PEDIDOS_TEST_DATABASE_URL`, are ignored.
pub(crate) fn env_key_path(key: &str) -> Option<String> {
    let lowered = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().find_map(|section| {
        lowered
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|field| !field.is_empty())
            .map(|field| format!("{}.{field}", section.replace('_', ".")))
    })
}
