use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::client::ClientConfig;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientSection {
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub proxy: Option<String>,
    pub nameserver: Option<String>,
}

/// Values given on the command line; they win over env vars and the file.
#[derive(Default)]
pub struct ClientOverrides<'a> {
    pub url: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub timeout_secs: Option<u64>,
    pub proxy: Option<&'a str>,
    pub nameserver: Option<&'a str>,
}

impl Config {
    pub fn load() -> Result<Self> {
        for path in config_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Invalid config: {:?}", path))
    }

    pub fn build_client_config(&self, overrides: ClientOverrides) -> Result<ClientConfig> {
        self.build_client_config_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::build_client_config`], reading `HASHLOOKUP_*`
    /// variables through `env`.
    pub fn build_client_config_with_env<F>(
        &self,
        overrides: ClientOverrides,
        env: F,
    ) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = &self.client;
        let mut config = ClientConfig::default();

        if let Some(url) = overrides.url.map(String::from)
            .or_else(|| env("HASHLOOKUP_URL"))
            .or_else(|| section.url.clone())
        {
            config = config.with_base_url(url);
        }

        if let Some(user_agent) = overrides.user_agent.map(String::from)
            .or_else(|| env("HASHLOOKUP_USER_AGENT"))
            .or_else(|| section.user_agent.clone())
        {
            config = config.with_user_agent(user_agent);
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => match env("HASHLOOKUP_TIMEOUT") {
                Some(raw) => Some(raw.parse::<u64>().with_context(|| {
                    format!("HASHLOOKUP_TIMEOUT must be a number of seconds, got '{}'", raw)
                })?),
                None => section.timeout_secs,
            },
        };
        if let Some(secs) = timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Some(proxy) = overrides.proxy.map(String::from)
            .or_else(|| env("HASHLOOKUP_PROXY"))
            .or_else(|| section.proxy.clone())
        {
            config = config.with_proxy(proxy);
        }

        if let Some(nameserver) = overrides.nameserver.map(String::from)
            .or_else(|| env("HASHLOOKUP_NAMESERVER"))
            .or_else(|| section.nameserver.clone())
        {
            config = config.with_nameserver(parse_nameserver(&nameserver)?);
        }

        Ok(config)
    }
}

/// `1.1.1.1` or `1.1.1.1:53`.
pub fn parse_nameserver(raw: &str) -> Result<SocketAddr> {
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let ip = raw
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid nameserver address: '{}'", raw))?;
    Ok(SocketAddr::new(ip, 53))
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".hashlookup.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("hashlookup").join("config.toml"));
    }

    paths
}
