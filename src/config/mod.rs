//! Configuration module for the CITC portal client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

/// System colour-scheme preference, the fallback used before any theme is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ColorScheme::Light),
            "dark" => Some(ColorScheme::Dark),
            _ => None,
        }
    }

    /// Interpret the `COLORFGBG` terminal convention (`"fg;bg"`).
    ///
    /// Background indices 0-6 and 8 are the dark half of the basic palette.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            0..=6 | 8 => Some(ColorScheme::Dark),
            _ => Some(ColorScheme::Light),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub api_url: String,
    /// Path to the JSON file holding persisted client state (theme, token, user)
    pub state_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Detected system colour-scheme preference
    pub color_scheme: Option<ColorScheme>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("CITC_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid CITC_API_URL {:?}: expected an http(s) URL",
                api_url
            )));
        }

        let state_path = env::var("CITC_STATE_PATH")
            .unwrap_or_else(|_| "./data/client-state.json".to_string())
            .into();

        let log_level = env::var("CITC_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let color_scheme = env::var("CITC_COLOR_SCHEME")
            .ok()
            .and_then(|v| ColorScheme::parse(&v))
            .or_else(|| {
                env::var("COLORFGBG")
                    .ok()
                    .and_then(|v| ColorScheme::from_colorfgbg(&v))
            });

        Ok(Self {
            api_url,
            state_path,
            log_level,
            color_scheme,
        })
    }

    /// Whether the system asks for a dark presentation.
    pub fn prefers_dark(&self) -> bool {
        self.color_scheme == Some(ColorScheme::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test touching the process environment to avoid races between tests
        env::remove_var("CITC_API_URL");
        env::remove_var("CITC_STATE_PATH");
        env::remove_var("CITC_LOG_LEVEL");
        env::remove_var("CITC_COLOR_SCHEME");
        env::remove_var("COLORFGBG");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.state_path, PathBuf::from("./data/client-state.json"));
        assert_eq!(config.log_level, "warn");
        assert!(config.color_scheme.is_none());
        assert!(!config.prefers_dark());

        env::set_var("CITC_API_URL", "https://club.example.org/api/");
        env::set_var("CITC_COLOR_SCHEME", "Dark");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_url, "https://club.example.org/api");
        assert!(config.prefers_dark());

        env::set_var("CITC_API_URL", "club.example.org");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        env::remove_var("CITC_API_URL");
        env::remove_var("CITC_COLOR_SCHEME");
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(ColorScheme::from_colorfgbg("15;0"), Some(ColorScheme::Dark));
        assert_eq!(ColorScheme::from_colorfgbg("0;15"), Some(ColorScheme::Light));
        assert_eq!(ColorScheme::from_colorfgbg("15;default;8"), Some(ColorScheme::Dark));
        assert_eq!(ColorScheme::from_colorfgbg("garbage"), None);
    }
}
