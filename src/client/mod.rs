mod dispatch;
mod dns;
mod rest;

pub use dns::{presentation_text, query_name, HickoryResolver, TxtResolver, DNS_ZONE};
pub use rest::Page;

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Proxy;

use crate::error::{Error, Result};

pub const DEFAULT_URL: &str = "https://hashlookup.circl.lu/";

pub fn default_user_agent() -> String {
    format!("Hashlookup-rs / {}", env!("CARGO_PKG_VERSION"))
}

/// Whether `url` starts with `<scheme>://`.
fn has_scheme(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Ensures a scheme (`http://` when none is given) and a single trailing slash.
pub fn normalize_base_url(url: &str) -> String {
    let mut url = if has_scheme(url) {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    while url.ends_with("//") && !url.ends_with("://") {
        url.pop();
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Settings for a [`Hashlookup`] client. Immutable once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    pub user_agent: String,
    /// Applied to HTTP requests and DNS queries. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    /// Resolver for TXT lookups; the system configuration when unset.
    pub nameserver: Option<SocketAddr>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: None,
            proxy: None,
            nameserver: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_nameserver(mut self, nameserver: SocketAddr) -> Self {
        self.nameserver = Some(nameserver);
        self
    }
}

/// Client for a hashlookup instance.
///
/// The HTTP session is reused across calls. Response status codes are not
/// inspected: any body that parses as JSON is returned as-is, so the
/// service's error documents (e.g. an unknown hash) come back as regular
/// results.
pub struct Hashlookup {
    config: ClientConfig,
    http: Client,
    resolver: Box<dyn TxtResolver>,
}

impl Hashlookup {
    /// Client for the public instance.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let resolver = HickoryResolver::new(config.nameserver, config.timeout);
        Self::with_resolver(config, resolver)
    }

    /// Uses `resolver` for the DNS bindings instead of the system resolver.
    pub fn with_resolver(config: ClientConfig, resolver: impl TxtResolver + 'static) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            config,
            http,
            resolver: Box::new(resolver),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client> {
    let http_error = |source: reqwest::Error| Error::Http {
        url: config.base_url().to_string(),
        source,
    };

    let user_agent =
        HeaderValue::from_str(&config.user_agent).map_err(|source| Error::InvalidUserAgent {
            user_agent: config.user_agent.clone(),
            source,
        })?;
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, user_agent);

    // reqwest's blocking client defaults to 30s; `None` here lifts that limit
    let mut builder = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout);

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str()).map_err(http_error)?);
    }

    builder.build().map_err(http_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme_and_slash() {
        assert_eq!(
            normalize_base_url("hashlookup.circl.lu"),
            "http://hashlookup.circl.lu/"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(
            normalize_base_url("https://hashlookup.circl.lu"),
            "https://hashlookup.circl.lu/"
        );
        assert_eq!(
            normalize_base_url("https://hashlookup.circl.lu/"),
            "https://hashlookup.circl.lu/"
        );
    }

    #[test]
    fn test_normalize_single_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/api//"),
            "http://localhost:5000/api/"
        );
        assert_eq!(normalize_base_url("localhost:5000"), "http://localhost:5000/");
    }

    #[test]
    fn test_normalize_scheme_only_as_prefix() {
        assert_eq!(
            normalize_base_url("host/path?next=http://x"),
            "http://host/path?next=http://x/"
        );
        assert_eq!(
            normalize_base_url("svn+ssh://host"),
            "svn+ssh://host/"
        );
        assert_eq!(normalize_base_url("://host"), "http://://host/");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), DEFAULT_URL);
        assert!(config.user_agent.starts_with("Hashlookup-rs / "));
        assert!(config.user_agent.ends_with(env!("CARGO_PKG_VERSION")));
        assert!(config.timeout.is_none());
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = ClientConfig::new("example.org")
            .with_user_agent("custom/1.0")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url(), "http://example.org/");
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_client_without_scheme() {
        let client = Hashlookup::with_config(ClientConfig::new("hashlookup.circl.lu")).unwrap();
        assert_eq!(client.base_url(), "http://hashlookup.circl.lu/");
        assert_eq!(
            client.url("lookup/md5/abc"),
            "http://hashlookup.circl.lu/lookup/md5/abc"
        );
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = ClientConfig::default().with_user_agent("dfir\nbox");
        let err = Hashlookup::with_config(config).err().unwrap();
        assert!(matches!(err, Error::InvalidUserAgent { .. }));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_invalid_proxy_is_http_error() {
        let config = ClientConfig::default().with_proxy("not a proxy url ::");
        let err = Hashlookup::with_config(config).err().unwrap();
        assert!(matches!(err, Error::Http { .. }));
    }
}
