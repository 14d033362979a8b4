//! `edgepage.toml` manifest: application name, dev-server address and per-adapter logging.
//!
//! ```toml
//! [app]
//! name = "my-cool-site"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8787
//!
//! [logging.axum]
//! level = "debug"
//!
//! [adapters.cloudflare.logging]
//! level = "warn"
//! ```

use std::collections::BTreeMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid manifest: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Clone, Debug)]
pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, ManifestError> {
        let mut manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        manifest.finalize();
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Manifest {
    #[serde(default)]
    #[validate(nested)]
    pub app: ManifestApp,
    #[serde(default)]
    #[validate(nested)]
    pub server: ManifestServer,
    #[serde(default)]
    #[validate(nested)]
    pub adapters: BTreeMap<String, ManifestAdapter>,
    #[serde(default)]
    #[validate(nested)]
    pub logging: ManifestLogging,
    #[serde(skip)]
    logging_resolved: BTreeMap<String, ResolvedLoggingConfig>,
}

impl Manifest {
    pub fn app_name(&self) -> Option<&str> {
        self.app.name.as_deref()
    }

    pub fn logging_for(&self, adapter: &str) -> Option<&ResolvedLoggingConfig> {
        self.logging_resolved.get(&adapter.to_ascii_lowercase())
    }

    pub fn logging_or_default(&self, adapter: &str) -> ResolvedLoggingConfig {
        self.logging_for(adapter).cloned().unwrap_or_default()
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.server.host.unwrap_or(DEFAULT_HOST),
            self.server.port.unwrap_or(DEFAULT_PORT),
        )
    }

    // Adapter-level tables take precedence over the shared `[logging.<adapter>]` tables.
    fn finalize(&mut self) {
        let mut resolved = BTreeMap::new();

        for (adapter, cfg) in &self.adapters {
            if cfg.logging.is_specified() {
                resolved.insert(
                    adapter.to_ascii_lowercase(),
                    ResolvedLoggingConfig::from_manifest(&cfg.logging),
                );
            }
        }

        for (adapter, cfg) in &self.logging.adapters {
            resolved
                .entry(adapter.to_ascii_lowercase())
                .or_insert_with(|| ResolvedLoggingConfig::from_manifest(cfg));
        }

        self.logging_resolved = resolved;
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestApp {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestServer {
    #[serde(default)]
    pub host: Option<IpAddr>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestAdapter {
    #[serde(default)]
    #[validate(nested)]
    pub logging: ManifestLoggingConfig,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestLogging {
    #[serde(flatten)]
    #[validate(nested)]
    pub adapters: BTreeMap<String, ManifestLoggingConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ManifestLoggingConfig {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default)]
    pub echo_stdout: Option<bool>,
}

impl ManifestLoggingConfig {
    fn is_specified(&self) -> bool {
        self.level.is_some() || self.echo_stdout.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLoggingConfig {
    pub level: LogLevel,
    pub echo_stdout: bool,
}

impl Default for ResolvedLoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            echo_stdout: true,
        }
    }
}

impl ResolvedLoggingConfig {
    fn from_manifest(cfg: &ManifestLoggingConfig) -> Self {
        let defaults = Self::default();
        Self {
            level: cfg.level.unwrap_or(defaults.level),
            echo_stdout: cfg.echo_stdout.unwrap_or(defaults.echo_stdout),
        }
    }

    /// Effective filter: `Off` when stdout echo is disabled.
    pub fn level_filter(&self) -> LevelFilter {
        if self.echo_stdout {
            self.level.into()
        } else {
            LevelFilter::Off
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "off" => Ok(Self::Off),
            other => Err(serde::de::Error::custom(format!(
                "logging level must be trace, debug, info, warn, error, or off (got `{}`)",
                other
            ))),
        }
    }
}
