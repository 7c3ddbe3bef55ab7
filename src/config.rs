use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "fifidesk.toml";
pub const CONFIG_ENV: &str = "FIFIDESK_CONFIG";
const LETTERS_FILE: &str = "customLetters.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub pet: PetConfig,
    pub background: BackgroundConfig,
    pub photos: PhotosConfig,
    pub letters: LettersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            title: "Desktop 💕".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    pub name: String,
    /// Fixed RNG seed; random when unset.
    pub seed: Option<u64>,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            name: "Fifi".to_string(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub refresh_interval_secs: u64,
    pub default_image: String,
    pub local_photos: Vec<String>,
    pub direct_urls: Vec<String>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
            default_image: "media/bg.jpg".to_string(),
            local_photos: Vec::new(),
            direct_urls: Vec::new(),
        }
    }
}

impl BackgroundConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    pub enabled: bool,
    pub access_token: String,
    pub album_id: Option<String>,
    pub endpoint: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub cache_secs: u64,
    /// How many photos to add to the rotation.
    pub count: usize,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: String::new(),
            album_id: None,
            endpoint: "https://photoslibrary.googleapis.com/v1".to_string(),
            page_size: 50,
            max_pages: 4,
            cache_secs: 3600,
            count: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LettersConfig {
    /// Defaults to the platform data dir.
    pub store_path: Option<PathBuf>,
}

impl LettersConfig {
    pub fn resolved_store_path(&self) -> PathBuf {
        if let Some(p) = &self.store_path {
            return p.clone();
        }
        match ProjectDirs::from("ro", "fifidesk", "fifidesk") {
            Some(dirs) => dirs.data_local_dir().join(LETTERS_FILE),
            None => PathBuf::from(LETTERS_FILE),
        }
    }
}

impl Config {
    /// Read `path`. A missing file means defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// First CLI argument, then the environment, then the default file name.
pub fn config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
