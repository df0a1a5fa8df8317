//! Command-line options and persisted settings
//!
//! Startup options come from the command line (with environment fallbacks);
//! the theme and playback preferences live in `settings.toml` so changes made in
//! the settings screen survive restarts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogLocation;
use crate::session::SessionConfig;
use crate::theme::Theme;

const APP_DIR: &str = "lessons-rs";
const SETTINGS_FILE: &str = "settings.toml";
const FAVORITES_FILE: &str = "favorites.json";

pub const DEFAULT_SKIP_SECONDS: u64 = 10;

#[derive(Parser, Debug, Clone)]
#[command(name = "lessons-rs", version, about = "Audio lesson player for the terminal")]
pub struct Cli {
    /// Lesson catalog: an http(s) URL or a path to lessons.json
    #[arg(long, env = "LESSONS_CATALOG", default_value = "assets/lessons.json")]
    pub catalog: String,

    /// Directory for settings.toml and favorites.json
    #[arg(long, env = "LESSONS_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Skip increment in seconds (overrides settings.toml)
    #[arg(long)]
    pub skip_seconds: Option<u64>,

    /// Seconds before a lesson still loading is reported unavailable
    #[arg(long, default_value_t = 15)]
    pub load_timeout_secs: u64,

    /// Do not open the audio device
    #[arg(long)]
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub skip_seconds: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_seconds: DEFAULT_SKIP_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub playback: PlaybackSettings,
}

impl Settings {
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Settings saved");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub settings: PathBuf,
    pub favorites: PathBuf,
}

impl AppPaths {
    /// An explicit directory holds everything; otherwise the platform config
    /// and data directories are used.
    pub fn resolve(config_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = config_dir {
            return Ok(Self::in_dir(dir));
        }
        let config = dirs::config_dir()
            .context("no config directory on this platform")?
            .join(APP_DIR);
        let data = dirs::data_dir()
            .context("no data directory on this platform")?
            .join(APP_DIR);
        Ok(Self {
            settings: config.join(SETTINGS_FILE),
            favorites: data.join(FAVORITES_FILE),
        })
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            settings: dir.join(SETTINGS_FILE),
            favorites: dir.join(FAVORITES_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogLocation,
    pub paths: AppPaths,
    pub settings: Settings,
    pub session: SessionConfig,
    pub skip: Duration,
    pub silent: bool,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let catalog = CatalogLocation::parse(&cli.catalog)
            .with_context(|| format!("invalid catalog location {:?}", cli.catalog))?;
        let paths = AppPaths::resolve(cli.config_dir.as_deref())?;
        let settings = Settings::load_from_path(&paths.settings)?;

        let skip_seconds = cli.skip_seconds.unwrap_or(settings.playback.skip_seconds).max(1);
        let session = SessionConfig {
            load_timeout: Duration::from_secs(cli.load_timeout_secs.max(1)),
            ..SessionConfig::default()
        };

        Ok(Self {
            catalog,
            paths,
            settings,
            session,
            skip: Duration::from_secs(skip_seconds),
            silent: cli.silent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::AccentColor;

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from_path(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.theme.dark_mode);
        assert_eq!(settings.playback.skip_seconds, DEFAULT_SKIP_SECONDS);
    }

    #[test]
    fn settings_survive_a_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            theme: Theme {
                dark_mode: false,
                accent: AccentColor::Rose,
            },
            playback: PlaybackSettings { skip_seconds: 30 },
        };

        settings.save_to_path(&path).unwrap();
        assert_eq!(Settings::load_from_path(&path).unwrap(), settings);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[theme]\naccent = \"amber\"\n").unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.theme.accent, AccentColor::Amber);
        assert!(settings.theme.dark_mode);
        assert_eq!(settings.playback.skip_seconds, DEFAULT_SKIP_SECONDS);
    }

    #[test]
    fn malformed_settings_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[theme\naccent = ").unwrap();
        assert!(Settings::load_from_path(&path).is_err());
    }

    #[test]
    fn cli_overrides_skip_increment() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "lessons-rs",
            "--catalog",
            "https://example.org/lessons.json",
            "--config-dir",
            dir.path().to_str().unwrap(),
            "--skip-seconds",
            "30",
            "--silent",
        ])
        .unwrap();

        let config = AppConfig::from_cli(cli).unwrap();
        assert!(matches!(config.catalog, CatalogLocation::Remote(_)));
        assert_eq!(config.skip, Duration::from_secs(30));
        assert_eq!(config.session.load_timeout, Duration::from_secs(15));
        assert_eq!(config.paths, AppPaths::in_dir(dir.path()));
        assert!(config.silent);
    }
}
