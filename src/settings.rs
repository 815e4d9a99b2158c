//! User preferences shown in the settings panel.

use crate::config::{self, SearchEngine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Error type for search URL construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The stored engine id has no entry in the engine table
    UnknownEngine(String),
    InvalidUrl(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::UnknownEngine(id) => write!(f, "Unknown search engine: {}", id),
            SearchError::InvalidUrl(url) => write!(f, "Invalid search URL: {}", url),
        }
    }
}

impl std::error::Error for SearchError {}

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// A single field update coming from the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    Theme(Theme),
    SearchEngine(String),
    BackgroundUrl(String),
    Blur(f64),
    Opacity(f64),
}

/// The persisted preference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub search_engine: String,
    pub background_url: String,
    pub blur: f64,
    pub opacity: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            search_engine: config::DEFAULT_SEARCH_ENGINE.to_string(),
            background_url: config::DEFAULT_BACKGROUND_URL.to_string(),
            blur: config::DEFAULT_BLUR,
            opacity: config::DEFAULT_OPACITY,
        }
    }
}

impl Settings {
    /// Overlay a stored record onto the defaults, one field at a time.
    ///
    /// Unknown keys are ignored. A known key whose value has the wrong type
    /// keeps its default. Ranges are not checked.
    pub fn merged_with_defaults(stored: &Value) -> Self {
        let mut settings = Self::default();

        let Some(fields) = stored.as_object() else {
            log::warn!("Stored settings are not an object, using defaults");
            return settings;
        };

        for (key, value) in fields {
            match key.as_str() {
                "theme" => merge_field(&mut settings.theme, key, value),
                "searchEngine" => merge_field(&mut settings.search_engine, key, value),
                "backgroundUrl" => merge_field(&mut settings.background_url, key, value),
                "blur" => merge_number(&mut settings.blur, key, value),
                "opacity" => merge_number(&mut settings.opacity, key, value),
                _ => log::debug!("Ignoring unknown settings field '{}'", key),
            }
        }

        settings
    }

    /// Apply one field update (last write wins)
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::Theme(theme) => self.theme = theme,
            SettingChange::SearchEngine(id) => self.search_engine = id,
            SettingChange::BackgroundUrl(url) => self.background_url = url,
            SettingChange::Blur(blur) => self.blur = blur,
            SettingChange::Opacity(opacity) => self.opacity = opacity,
        }
    }

    /// Whether applying `change` would leave the record as it is
    pub fn is_current(&self, change: &SettingChange) -> bool {
        match change {
            SettingChange::Theme(theme) => self.theme == *theme,
            SettingChange::SearchEngine(id) => self.search_engine == *id,
            SettingChange::BackgroundUrl(url) => self.background_url == *url,
            SettingChange::Blur(blur) => self.blur == *blur,
            SettingChange::Opacity(opacity) => self.opacity == *opacity,
        }
    }

    /// Resolve the configured engine. Unknown ids are an integrity error.
    pub fn engine(&self) -> Result<&'static SearchEngine, SearchError> {
        config::search_engine(&self.search_engine)
            .ok_or_else(|| SearchError::UnknownEngine(self.search_engine.clone()))
    }

    /// Build the navigation target for a search. Blank queries yield `None`.
    pub fn search_url(&self, query: &str) -> Result<Option<Url>, SearchError> {
        let engine = self.engine()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let encoded = urlencoding::encode(query);
        let url_str = engine.url_template.replace("{}", &encoded);
        Url::parse(&url_str)
            .map(Some)
            .map_err(|_| SearchError::InvalidUrl(url_str))
    }

    /// Placeholder for the search entry
    pub fn search_placeholder(&self) -> Result<String, SearchError> {
        Ok(format!("Search with {}", self.engine()?.name))
    }
}

fn merge_field<T: serde::de::DeserializeOwned>(slot: &mut T, key: &str, value: &Value) {
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => log::warn!("Keeping default for settings field '{}': {}", key, e),
    }
}

/// Numbers may come back as strings from older records (slider values)
fn merge_number(slot: &mut f64, key: &str, value: &Value) {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    match parsed {
        Some(n) => *slot = n,
        None => log::warn!("Keeping default for settings field '{}': not a number", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_field_ignored() {
        let settings = Settings::merged_with_defaults(&json!({"foo": "bar"}));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_record_overrides_present_fields() {
        let settings = Settings::merged_with_defaults(&json!({
            "theme": "light",
            "blur": 3,
        }));
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.blur, 3.0);
        assert_eq!(settings.search_engine, config::DEFAULT_SEARCH_ENGINE);
        assert_eq!(settings.opacity, config::DEFAULT_OPACITY);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        let settings = Settings::merged_with_defaults(&json!({"opacity": 1.7, "blur": -2}));
        assert_eq!(settings.opacity, 1.7);
        assert_eq!(settings.blur, -2.0);
    }

    #[test]
    fn test_string_numbers_accepted() {
        let settings = Settings::merged_with_defaults(&json!({"blur": "14", "opacity": "0.35"}));
        assert_eq!(settings.blur, 14.0);
        assert_eq!(settings.opacity, 0.35);
    }

    #[test]
    fn test_wrong_types_keep_defaults() {
        let settings = Settings::merged_with_defaults(&json!({
            "theme": "sepia",
            "blur": [1, 2],
            "backgroundUrl": 42,
        }));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_non_object_record() {
        assert_eq!(
            Settings::merged_with_defaults(&json!([1, 2, 3])),
            Settings::default()
        );
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ["theme", "searchEngine", "backgroundUrl", "blur", "opacity"] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object["theme"], "dark");
    }

    #[test]
    fn test_round_trip_through_merge() {
        let mut settings = Settings::default();
        settings.apply(SettingChange::Theme(Theme::Light));
        settings.apply(SettingChange::SearchEngine("bing".into()));
        settings.apply(SettingChange::Blur(4.5));
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(Settings::merged_with_defaults(&value), settings);
    }

    #[test]
    fn test_search_url_google() {
        let settings = Settings::default();
        let url = settings.search_url("cats").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://www.google.com/search?q=cats");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let mut settings = Settings::default();
        settings.apply(SettingChange::SearchEngine("duckduckgo".into()));
        let url = settings.search_url("  rust & gtk ").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://duckduckgo.com/?q=rust%20%26%20gtk");
    }

    #[test]
    fn test_blank_search_does_nothing() {
        assert_eq!(Settings::default().search_url("   ").unwrap(), None);
    }

    #[test]
    fn test_unknown_engine_fails() {
        let mut settings = Settings::default();
        settings.apply(SettingChange::SearchEngine("altavista".into()));
        assert_eq!(
            settings.search_url("cats"),
            Err(SearchError::UnknownEngine("altavista".into()))
        );
        assert!(settings.search_placeholder().is_err());
    }

    #[test]
    fn test_placeholder() {
        let mut settings = Settings::default();
        assert_eq!(settings.search_placeholder().unwrap(), "Search with Google");
        settings.apply(SettingChange::SearchEngine("duckduckgo".into()));
        assert_eq!(settings.search_placeholder().unwrap(), "Search with DuckDuckGo");
    }

    #[test]
    fn test_is_current_only_for_unchanged_values() {
        let mut settings = Settings::default();
        let same = SettingChange::BackgroundUrl(config::DEFAULT_BACKGROUND_URL.to_string());
        let edited = SettingChange::BackgroundUrl("https://img.example/new.jpg".into());

        assert!(settings.is_current(&same));
        assert!(!settings.is_current(&edited));
        assert!(settings.is_current(&SettingChange::Theme(Theme::Dark)));
        assert!(!settings.is_current(&SettingChange::Blur(config::DEFAULT_BLUR + 1.0)));

        settings.apply(edited.clone());
        assert!(settings.is_current(&edited));
        assert!(!settings.is_current(&same));
    }
}
