use directories::{ProjectDirs, UserDirs};
use eyre::{eyre, Result};
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::CLI_NAME;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_va_name")]
    pub va_name: String,

    #[serde(default)]
    pub library: Library,
    #[serde(default)]
    pub musicbrainz: MusicBrainz,
    #[serde(default)]
    pub import: Import,
    #[serde(default, rename = "match")]
    pub matching: Match,
    #[serde(default)]
    pub embedart: EmbedArt,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            va_name: default_va_name(),
            library: Library::default(),
            musicbrainz: MusicBrainz::default(),
            import: Import::default(),
            matching: Match::default(),
            embedart: EmbedArt::default(),
        }
    }
}

fn default_va_name() -> String {
    "Various Artists".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default = "get_library")]
    pub path: PathBuf,
    #[serde(default = "default_art_name")]
    pub art_name: String,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            path: get_library(),
            art_name: default_art_name(),
        }
    }
}

fn get_library() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.audio_dir().map(|audio| audio.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("/music"))
}

fn default_art_name() -> String {
    "cover".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicBrainz {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_true")]
    pub https: bool,
    /// Number of requests allowed per `ratelimit_interval` seconds.
    #[serde(default = "default_ratelimit")]
    pub ratelimit: u32,
    #[serde(default = "default_ratelimit_interval")]
    pub ratelimit_interval: f64,
    #[serde(default = "default_searchlimit")]
    pub searchlimit: u32,
    #[serde(default)]
    pub genres: bool,
}

impl Default for MusicBrainz {
    fn default() -> Self {
        Self {
            host: default_host(),
            https: default_true(),
            ratelimit: default_ratelimit(),
            ratelimit_interval: default_ratelimit_interval(),
            searchlimit: default_searchlimit(),
            genres: false,
        }
    }
}

fn default_host() -> String {
    "musicbrainz.org".to_string()
}

fn default_ratelimit() -> u32 {
    1
}

fn default_ratelimit_interval() -> f64 {
    1.0
}

fn default_searchlimit() -> u32 {
    5
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Preferred alias locales, most preferred first.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub ignored_alias_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub ignored_media: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_data_tracks: bool,
    #[serde(default = "default_true")]
    pub ignore_video_tracks: bool,
    #[serde(default)]
    pub preferred: Preferred,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            ignored_media: Vec::new(),
            ignore_data_tracks: default_true(),
            ignore_video_tracks: default_true(),
            preferred: Preferred::default(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferred {
    /// ISO 3166-1 country codes, most preferred first.
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedArt {
    /// Embed the album art into every item once an album is imported.
    #[serde(default = "default_true")]
    pub auto: bool,
}

impl Default for EmbedArt {
    fn default() -> Self {
        Self {
            auto: default_true(),
        }
    }
}

pub fn load(path: Option<PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(p) => p,
        None => {
            let dirs = ProjectDirs::from("com", "github", CLI_NAME)
                .ok_or(eyre!("Could not locate program directories"))?;
            dirs.config_dir().join(PathBuf::from("config.toml"))
        }
    };
    tracing::info! {?path, "Loading config file"};
    let content = fs::read_to_string(path).unwrap_or_else(|_| "".to_string());
    let set = parse(content.as_str())?;
    tracing::trace! {settings = ?set, "Loaded settings"};
    Ok(set)
}

pub fn parse(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| eyre!(e))
}
