use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::{system_conf, Resolver};
use serde_json::Value;
use tracing::debug;

use super::Hashlookup;
use crate::error::{DecodeStage, Error, Result};
use crate::hash::{hash_len, HashKind};

pub const DNS_ZONE: &str = "dns.hashlookup.circl.lu";

/// DNS transport for the TXT bindings.
pub trait TxtResolver: Send + Sync {
    /// Character-strings of the first TXT answer for `name`, joined.
    /// `Ok(None)` when the name has no TXT record.
    fn first_txt(&self, name: &str) -> std::result::Result<Option<Vec<u8>>, ResolveError>;
}

/// [`TxtResolver`] backed by hickory's blocking resolver. The underlying
/// resolver is only built on the first query.
pub struct HickoryResolver {
    nameserver: Option<SocketAddr>,
    timeout: Option<Duration>,
    inner: OnceLock<Resolver>,
}

impl HickoryResolver {
    pub fn new(nameserver: Option<SocketAddr>, timeout: Option<Duration>) -> Self {
        Self {
            nameserver,
            timeout,
            inner: OnceLock::new(),
        }
    }

    fn resolver(&self) -> std::result::Result<&Resolver, ResolveError> {
        if let Some(resolver) = self.inner.get() {
            return Ok(resolver);
        }

        let (config, mut opts) = match self.nameserver {
            Some(addr) => {
                let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
                (
                    ResolverConfig::from_parts(None, vec![], group),
                    ResolverOpts::default(),
                )
            }
            None => system_conf::read_system_conf()?,
        };
        if let Some(timeout) = self.timeout {
            opts.timeout = timeout;
        }

        let resolver = Resolver::new(config, opts)?;
        Ok(self.inner.get_or_init(|| resolver))
    }
}

impl TxtResolver for HickoryResolver {
    fn first_txt(&self, name: &str) -> std::result::Result<Option<Vec<u8>>, ResolveError> {
        let lookup = match self.resolver()?.txt_lookup(name) {
            Ok(lookup) => lookup,
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(lookup.iter().next().map(|txt| txt.txt_data().concat()))
    }
}

/// Fully qualified record name for a hash or the `info` label.
pub fn query_name(label: &str) -> String {
    format!("{}.{}", label.to_lowercase(), DNS_ZONE)
}

/// TXT payload in zone-file presentation form: one quoted string with `"`
/// and `\` escaped.
pub fn presentation_text(payload: &str) -> String {
    let mut text = String::with_capacity(payload.len() + 2);
    text.push('"');
    for c in payload.chars() {
        if c == '"' || c == '\\' {
            text.push('\\');
        }
        text.push(c);
    }
    text.push('"');
    text
}

/// The answer text is a JSON string literal wrapping the JSON document.
pub(crate) fn decode_answer(name: &str, text: &str) -> Result<Value> {
    let inner: String = serde_json::from_str(text).map_err(|source| Error::DnsDecode {
        name: name.to_string(),
        stage: DecodeStage::StringLiteral,
        source,
    })?;

    serde_json::from_str(&inner).map_err(|source| Error::DnsDecode {
        name: name.to_string(),
        stage: DecodeStage::Document,
        source,
    })
}

impl Hashlookup {
    pub fn info_over_dns(&self) -> Result<Value> {
        self.txt_json(&query_name("info"))
    }

    /// The hash is lower-cased before building the record name.
    pub fn md5_lookup_over_dns(&self, md5: &str) -> Result<Value> {
        self.txt_json(&query_name(md5))
    }

    /// The hash is lower-cased before building the record name.
    pub fn sha1_lookup_over_dns(&self, sha1: &str) -> Result<Value> {
        self.txt_json(&query_name(sha1))
    }

    /// Routes a single MD5 or SHA1 to its DNS binding.
    pub fn lookup_over_dns(&self, hash: &str) -> Result<Value> {
        match HashKind::classify(hash) {
            Some(HashKind::Md5) => self.md5_lookup_over_dns(hash),
            Some(HashKind::Sha1) => self.sha1_lookup_over_dns(hash),
            _ => Err(Error::UnsupportedDnsHashKind { len: hash_len(hash) }),
        }
    }

    fn txt_json(&self, name: &str) -> Result<Value> {
        debug!(name, "hashlookup TXT query");

        let payload = self
            .resolver
            .first_txt(name)
            .map_err(|source| Error::Dns {
                name: name.to_string(),
                source,
            })?
            .ok_or_else(|| Error::DnsNoAnswer {
                name: name.to_string(),
            })?;

        let payload = String::from_utf8(payload).map_err(|_| Error::DnsMalformed {
            name: name.to_string(),
        })?;

        decode_answer(name, &presentation_text(&payload))
    }
}
