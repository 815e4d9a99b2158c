use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Application ID (reverse domain notation)
pub const APP_ID: &str = "dev.myyc.startpage";

/// Application name
pub const APP_NAME: &str = "startpage";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent string for outgoing requests (weather, favicons)
pub const USER_AGENT: &str = concat!("startpage/", env!("CARGO_PKG_VERSION"));

/// Config file name inside the XDG config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Record store filename inside the XDG data directory
pub const RECORDS_DB: &str = "records.db";

// ============================================================================
// Records
// ============================================================================

/// Record key holding the settings
pub const SETTINGS_RECORD: &str = "settings";

/// Record key holding the ordered link list
pub const LINKS_RECORD: &str = "links";

/// Days a record is retained after its last write
pub const DEFAULT_RETENTION_DAYS: u32 = 365;

// ============================================================================
// Search Engines
// ============================================================================

/// A search engine entry. `url_template` has one `{}` for the encoded query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    pub id: &'static str,
    pub name: &'static str,
    pub url_template: &'static str,
}

/// Available search engines
pub const SEARCH_ENGINES: &[SearchEngine] = &[
    SearchEngine {
        id: "google",
        name: "Google",
        url_template: "https://www.google.com/search?q={}",
    },
    SearchEngine {
        id: "duckduckgo",
        name: "DuckDuckGo",
        url_template: "https://duckduckgo.com/?q={}",
    },
    SearchEngine {
        id: "bing",
        name: "Bing",
        url_template: "https://www.bing.com/search?q={}",
    },
];

/// Look up a search engine by id
pub fn search_engine(id: &str) -> Option<&'static SearchEngine> {
    SEARCH_ENGINES.iter().find(|engine| engine.id == id)
}

/// Default search engine id
pub const DEFAULT_SEARCH_ENGINE: &str = "google";

// ============================================================================
// Appearance
// ============================================================================

/// Default background image
pub const DEFAULT_BACKGROUND_URL: &str =
    "https://images.unsplash.com/photo-1501854140801-50d01698950b?q=80&w=2400&auto=format&fit=crop";

/// Default background blur in pixels
pub const DEFAULT_BLUR: f64 = 10.0;

/// Default card opacity
pub const DEFAULT_OPACITY: f64 = 0.1;

/// Upper bound offered by the blur slider
pub const MAX_BLUR: f64 = 40.0;

// ============================================================================
// Links
// ============================================================================

/// Favicon lookup service, `{}` is replaced by the domain
pub const FAVICON_SERVICE_URL: &str = "https://www.google.com/s2/favicons?domain={}&sz=64";

/// Icon used when a link URL cannot be parsed
pub const FALLBACK_ICON_URL: &str =
    "https://raw.githubusercontent.com/icons8/liquid-glass-icons/main/flat-windows-11/SVG/link.svg";

/// Scheme prefixes accepted as-is when adding a link
pub const RECOGNIZED_SCHEMES: &[&str] = &["http://", "https://", "file://"];

/// Scheme prepended to links entered without one
pub const DEFAULT_SCHEME: &str = "https://";

/// Links shown before the user saved any: (name, url)
pub const DEFAULT_LINKS: &[(&str, &str)] = &[
    ("Gmail", "https://mail.google.com"),
    ("GitHub", "https://github.com"),
    ("YouTube", "https://youtube.com"),
];

// ============================================================================
// Widgets
// ============================================================================

/// Open-Meteo current weather endpoint
pub const WEATHER_API_URL: &str =
    "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&current_weather=true";

/// Clock refresh interval (seconds)
pub const CLOCK_INTERVAL_SECS: u32 = 60;

// ============================================================================
// Config file
// ============================================================================

/// Error type for config file loading
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Fixed location used for the weather widget
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Startup options read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Keep records in memory only
    pub ephemeral: bool,
    pub retention_days: u32,
    pub favicon_service: String,
    pub weather: Option<WeatherLocation>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ephemeral: false,
            retention_days: DEFAULT_RETENTION_DAYS,
            favicon_service: FAVICON_SERVICE_URL.to_string(),
            weather: None,
        }
    }
}

impl AppConfig {
    /// Parse a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load from the XDG config directory, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                log::debug!("Config loaded from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "myyc", APP_NAME)
}

/// XDG config directory (~/.config/startpage)
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// XDG data directory (~/.local/share/startpage)
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
