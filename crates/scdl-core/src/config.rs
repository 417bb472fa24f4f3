use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_BASE;
use crate::http::HttpOptions;
use crate::page::DEFAULT_WEB_BASE;

/// Transport settings (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-request limit; also bounds the media GET.
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 300,
            user_agent: None,
        }
    }
}

/// Where the site and its API live (optional `[endpoints]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub api_base: String,
    /// Page whose scripts carry the client id.
    pub web_base: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/scdl/config.toml`.
///
/// No key holds the session token; it only comes from the cookie jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScdlConfig {
    /// Send the signed-in session and prefer high-quality renditions.
    #[serde(default)]
    pub high_quality: bool,
    /// Replace existing files instead of adding a ` (n)` suffix.
    #[serde(default)]
    pub overwrite: bool,
    /// Save directory; the current directory when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Netscape cookie jar holding the `oauth_token` session cookie.
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,
    /// Fixed client id; skips scraping it from the site's scripts.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
    #[serde(default)]
    pub endpoints: Option<EndpointsConfig>,
}

impl Default for ScdlConfig {
    fn default() -> Self {
        Self {
            high_quality: false,
            overwrite: false,
            download_dir: None,
            cookie_file: None,
            client_id: None,
            http: None,
            endpoints: None,
        }
    }
}

impl ScdlConfig {
    pub fn http_options(&self) -> HttpOptions {
        let cfg = self.http.clone().unwrap_or_default();
        let mut opts = HttpOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            ..HttpOptions::default()
        };
        if let Some(ua) = cfg.user_agent {
            opts.user_agent = ua;
        }
        opts
    }

    pub fn endpoints(&self) -> EndpointsConfig {
        self.endpoints.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("scdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScdlConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<ScdlConfig> {
    if !path.exists() {
        let default_cfg = ScdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: ScdlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
