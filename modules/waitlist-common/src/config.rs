use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MissingConfig;

pub const DEFAULT_BRAND_NAME: &str = "Your Brand";
pub const DEFAULT_PROJECT_NAME: &str = "landing-waitlist-template";
pub const DEFAULT_SITE_CONFIG_PATH: &str = "components.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Icon set the landing page renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconLibrary {
    #[default]
    Lucide,
    TablerIcons,
    Hugeicons,
    PhosphorIcons,
}

impl IconLibrary {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lucide" => Some(IconLibrary::Lucide),
            "tabler-icons" => Some(IconLibrary::TablerIcons),
            "hugeicons" => Some(IconLibrary::Hugeicons),
            "phosphor-icons" => Some(IconLibrary::PhosphorIcons),
            _ => None,
        }
    }
}

/// Site identity served to the frontend. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub brand_name: String,
    pub project_name: String,
    pub icon_library: IconLibrary,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            icon_library: IconLibrary::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentsFile {
    #[serde(rename = "iconLibrary")]
    icon_library: Option<String>,
}

impl SiteConfig {
    /// Read `iconLibrary` from a `components.json`-shaped file. A missing,
    /// unreadable or unrecognised value falls back to lucide.
    pub fn icon_library_from_file(path: &Path) -> IconLibrary {
        let parsed = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<ComponentsFile>(&raw).ok());
        match parsed.and_then(|f| f.icon_library) {
            Some(name) => IconLibrary::parse(&name).unwrap_or_else(|| {
                tracing::warn!(icon_library = %name, "Unknown icon library, using lucide");
                IconLibrary::default()
            }),
            None => IconLibrary::default(),
        }
    }
}

/// A value still holding its `{{placeholder}}` has not been templated yet.
fn templated_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !(v.starts_with("{{") && v.ends_with("}}")) => v,
        _ => default.to_string(),
    }
}

/// Application configuration loaded from environment variables.
/// Missing Resend settings are not errors: the endpoints degrade instead.
#[derive(Debug, Clone)]
pub struct Config {
    // Resend
    pub resend_api_key: Option<String>,
    pub resend_audience_id: Option<String>,
    pub resend_base_url: Option<String>,

    pub environment: Environment,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    pub site: SiteConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let web_port = match get("API_PORT").or_else(|| get("WEB_PORT")) {
            Some(port) => port
                .parse()
                .with_context(|| format!("port must be a number, got {port:?}"))?,
            None => 3000,
        };

        let site_config_path = get("SITE_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_CONFIG_PATH));

        Ok(Self {
            resend_api_key: get("RESEND_API_KEY"),
            resend_audience_id: get("RESEND_AUDIENCE_ID"),
            resend_base_url: get("RESEND_BASE_URL"),
            environment: get("APP_ENV")
                .or_else(|| get("NODE_ENV"))
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            web_host: get("API_HOST")
                .or_else(|| get("WEB_HOST"))
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
            site: SiteConfig {
                brand_name: templated_or(get("BRAND_NAME"), DEFAULT_BRAND_NAME),
                project_name: templated_or(get("PROJECT_NAME"), DEFAULT_PROJECT_NAME),
                icon_library: SiteConfig::icon_library_from_file(&site_config_path),
            },
        })
    }

    /// First missing piece of Resend configuration, credential before audience.
    pub fn missing_resend_config(&self) -> Option<MissingConfig> {
        if self.resend_api_key.is_none() {
            Some(MissingConfig::Credential)
        } else if self.resend_audience_id.is_none() {
            Some(MissingConfig::Audience)
        } else {
            None
        }
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let head: String = v.chars().take(5).collect();
                    format!("{}...({} chars)", head, v.len())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  RESEND_API_KEY: {}", preview_opt(&self.resend_api_key));
        tracing::info!("  RESEND_AUDIENCE_ID: {}", preview_opt(&self.resend_audience_id));
        tracing::info!(
            "  RESEND_BASE_URL: {}",
            self.resend_base_url.as_deref().unwrap_or("<default>")
        );
        tracing::info!("  environment: {:?}", self.environment);
        tracing::info!("  brand: {}", self.site.brand_name);
    }
}
