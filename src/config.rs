use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    pub database_url: String,
    pub template_dir: PathBuf,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    pub admin: AdminConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub password: String,

    /// At least 64 bytes. A random key is generated when absent, which logs
    /// every admin out on restart.
    pub session_secret: Option<String>,

    #[serde(default = "default_session_days")]
    pub session_days: i64,

    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: i64,

    #[serde(default = "default_home_posts")]
    pub home_posts: i64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            posts_per_page: default_posts_per_page(),
            home_posts: default_home_posts(),
        }
    }
}

impl BlogConfig {
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let mut config = Self::from_toml(&raw)?;
        if let Ok(password) = std::env::var(crate::ADMIN_PASSWORD_VAR) {
            config.admin.password = password;
        }
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, anyhow::Error> {
        let config: BlogConfig = toml::from_str(raw).context("parsing config")?;
        if config.admin.password.is_empty() {
            anyhow::bail!("admin.password must not be empty");
        }
        Ok(config)
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_bind_address() -> String {
    crate::DEFAULT_BIND_ADDRESS.into()
}

fn default_max_upload_bytes() -> usize {
    crate::DEFAULT_MAX_UPLOAD_BYTES
}

fn default_session_days() -> i64 {
    crate::DEFAULT_SESSION_DAYS
}

fn default_site_name() -> String {
    "inkpost".into()
}

fn default_posts_per_page() -> i64 {
    crate::DEFAULT_POSTS_PER_PAGE
}

fn default_home_posts() -> i64 {
    crate::DEFAULT_HOME_POSTS
}
