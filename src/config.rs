// Runtime configuration
//
// Precedence: JSON file, then UDL_* environment variables, then CLI flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::downloader::command::DEFAULT_FRAGMENT_WORKERS;
use crate::downloader::errors::DownloadError;
use crate::downloader::utils::default_download_dir;

pub const ENV_TOOLS_DIR: &str = "UDL_TOOLS_DIR";
pub const ENV_OUTPUT_DIR: &str = "UDL_OUTPUT_DIR";
pub const ENV_LANG: &str = "UDL_LANG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding bundled yt-dlp / spotdl / ffmpeg
    pub tools_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Forced UI language; detected from the locale when unset
    pub language: Option<String>,
    pub fallback_language: String,
    /// Locale or language subtag -> catalog tag, e.g. "zh" -> "zh_TW"
    pub language_aliases: BTreeMap<String, String>,
    pub fragment_workers: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tools_dir: None,
            output_dir: default_download_dir(),
            language: None,
            fallback_language: "en".to_string(),
            language_aliases: BTreeMap::new(),
            fragment_workers: DEFAULT_FRAGMENT_WORKERS,
        }
    }
}

impl AppConfig {
    /// `<config dir>/universal-downloader/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("universal-downloader").join("config.json"))
    }

    /// Read a config file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, DownloadError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[Config] No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&text)
            .map_err(|e| DownloadError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    /// Apply UDL_* overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_TOOLS_DIR) {
            self.tools_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(lang) = get(ENV_LANG) {
            self.language = Some(lang);
        }
    }
}
