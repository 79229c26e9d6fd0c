//! TOML configuration.
//!
//! Resolution: `--config <path>` > `SHAKECAT_CONFIG` > built-in defaults.
//! A path that was named but cannot be read is an error.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use serde::Deserialize;
use shakecat_core::{PredictionCatalog, SessionConfig, ShareTemplate};

pub const CONFIG_ENV: &str = "SHAKECAT_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    messages: Option<Vec<String>>,
    seed: Option<u64>,
    share: ShareSection,
    haptics: HapticsSection,
    fallback: FallbackSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ShareSection {
    title: Option<String>,
    template: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HapticsSection {
    enabled: bool,
}

impl Default for HapticsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FallbackSection {
    debounce: bool,
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self { debounce: true }
    }
}

/// Effective configuration after validation.
#[derive(Debug, Clone)]
pub struct Config {
    pub session: SessionConfig,
    pub seed: Option<u64>,
    pub haptics_enabled: bool,
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            seed: None,
            haptics_enabled: true,
            source: None,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text).context("invalid config TOML")?;

        let catalog = match file.messages {
            Some(messages) => PredictionCatalog::from_messages(messages)
                .context("invalid `messages` in config")?,
            None => PredictionCatalog::default(),
        };

        let defaults = ShareTemplate::default();
        let share = match (file.share.title, file.share.template) {
            (None, None) => defaults,
            (title, template) => ShareTemplate::new(
                title.as_deref().unwrap_or(defaults.title()),
                template
                    .as_deref()
                    .unwrap_or(shakecat_core::share::DEFAULT_TEMPLATE),
            )
            .context("invalid [share] section in config")?,
        };

        Ok(Self {
            session: SessionConfig {
                catalog,
                share,
                debounce_taps: file.fallback.debounce,
            },
            seed: file.seed,
            haptics_enabled: file.haptics.enabled,
            source: None,
        })
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve and load. `explicit` wins over the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakecat_core::DEFAULT_MESSAGES;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.session.catalog.len(), DEFAULT_MESSAGES.len());
        assert!(config.session.debounce_taps);
        assert!(config.haptics_enabled);
        assert_eq!(config.seed, None);
        assert_eq!(config.session.share, ShareTemplate::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            messages = ["one", "two"]
            seed = 7

            [share]
            template = "I got: {message}"

            [haptics]
            enabled = false

            [fallback]
            debounce = false
            "#,
        )
        .unwrap();
        assert_eq!(config.session.catalog.messages(), ["one", "two"]);
        assert_eq!(config.seed, Some(7));
        assert!(!config.haptics_enabled);
        assert!(!config.session.debounce_taps);
        assert_eq!(config.session.share.title(), "Котик с подарками");
        assert_eq!(config.session.share.render("x").text, "I got: x");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse("messages = []").is_err());
        assert!(Config::parse(r#"messages = ["ok", ""]"#).is_err());
        assert!(Config::parse("[share]\ntemplate = \"no slot\"").is_err());
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn test_load_file_records_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shakecat.toml");
        fs::write(&path, "seed = 3\n").unwrap();
        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }
}
