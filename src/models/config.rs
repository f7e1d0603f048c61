//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::EntityType;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST backend settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dashboard behavior
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Card icon/gradient bindings
    #[serde(default = "defaults::card_styles")]
    pub card_styles: Vec<CardStyle>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::config(format!("api.base_url is invalid: {e}")))?;
        self.dashboard.default_entity.parse::<EntityType>()?;
        if let Some(style) = self.card_styles.iter().find(|s| s.card_id.trim().is_empty()) {
            return Err(AppError::config(format!(
                "card style with icon '{}' has no card_id",
                style.icon
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
            card_styles: defaults::card_styles(),
        }
    }
}

/// REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API (e.g., "http://localhost:8080/api/")
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn, error
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Dashboard behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Entity type shown when none is requested
    #[serde(default = "defaults::default_entity")]
    pub default_entity: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_entity: defaults::default_entity(),
        }
    }
}

/// Presentation binding for one card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardStyle {
    pub card_id: String,
    pub icon: String,
    pub gradient: String,
}

pub(crate) fn default_card_styles() -> Vec<CardStyle> {
    defaults::card_styles()
}

mod defaults {
    use super::CardStyle;

    // Api defaults
    pub fn base_url() -> String {
        "http://localhost:8080/api/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; UniDashboard/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }

    // Dashboard defaults
    pub fn default_entity() -> String {
        "students".into()
    }

    fn style(card_id: &str, icon: &str, gradient: &str) -> CardStyle {
        CardStyle {
            card_id: card_id.to_string(),
            icon: icon.to_string(),
            gradient: gradient.to_string(),
        }
    }

    pub fn card_styles() -> Vec<CardStyle> {
        vec![
            style("total", "users", "from-blue-500 to-blue-700"),
            style("active", "user-check", "from-green-500 to-green-700"),
            style("graduated", "graduation-cap", "from-purple-500 to-purple-700"),
            style("top", "award", "from-amber-500 to-amber-700"),
            style("rating", "star", "from-yellow-400 to-orange-500"),
            style("departments", "building", "from-teal-500 to-teal-700"),
            style("fulltime", "briefcase", "from-indigo-500 to-indigo-700"),
        ]
    }
}
