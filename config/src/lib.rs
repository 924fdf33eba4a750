//! Configuration loading for veriscope.
//!
//! Reads `~/.veriscope/config.toml` (or an explicit path). A missing file
//! yields the defaults. A file that exists but cannot be read or parsed is
//! an error, so a typo never silently falls back to defaults.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use veriscope_lsp::VerifierConfig;
use veriscope_render::RenderSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Language id of documents the view decorates.
    pub language_id: String,
    /// Directory of gutter icon images.
    pub icon_dir: PathBuf,
    /// Hold time for flicker-prone updates, in milliseconds.
    pub delay_ms: u64,
    /// Animation frame period, in milliseconds.
    pub animation_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let render = RenderSettings::default();
        Self {
            language_id: "dafny".to_string(),
            icon_dir: render.icon_dir,
            delay_ms: render.delay.as_millis() as u64,
            animation_ms: render.animation_period.as_millis() as u64,
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            delay: Duration::from_millis(self.delay_ms),
            animation_period: Duration::from_millis(self.animation_ms.max(1)),
            icon_dir: self.icon_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VeriscopeConfig {
    pub verifier: VerifierConfig,
    pub display: DisplayConfig,
}

impl VeriscopeConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(config_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            tracing::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };
        Self::parse(&content).map_err(|err| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
            ConfigError::Parse { path, source: err }
        })
    }

    /// Parse TOML text and expand `${VAR}` references in the verifier launch settings.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.verifier.command = expand_env_vars(&config.verifier.command);
        config.verifier.server_path = config
            .verifier
            .server_path
            .map(|p| PathBuf::from(expand_env_vars(&p.to_string_lossy())));
        Ok(config)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".veriscope").join("config.toml"))
}

/// Replace `${VAR}` with the value of `VAR`, or nothing when it is unset.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &after[..close];
        if !name.is_empty()
            && let Some(replacement) = lookup(name)
        {
            out.push_str(&replacement);
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
