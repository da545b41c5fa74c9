use std::fmt;

use hickory_resolver::error::ResolveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which half of the nested TXT payload failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// The TXT text as a JSON string literal.
    StringLiteral,
    /// The unwrapped string as a JSON document.
    Document,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::StringLiteral => f.write_str("string literal"),
            DecodeStage::Document => f.write_str("JSON document"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Only (list of) MD5, SHA1 or SHA256 are supported at this time")]
    UnsupportedInput,

    #[error("The hash must be either MD5, SHA1 or SHA256 (got {len} characters)")]
    UnsupportedHashKind { len: usize },

    #[error("The hashes must be either all MD5 or all SHA1")]
    UnsupportedBulkKind,

    #[error("Only MD5 and SHA1 can be looked up over DNS (got {len} characters)")]
    UnsupportedDnsHashKind { len: usize },

    #[error("Invalid User-Agent header: {user_agent:?}")]
    InvalidUserAgent {
        user_agent: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid JSON")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("TXT query for {name} failed")]
    Dns {
        name: String,
        #[source]
        source: ResolveError,
    },

    #[error("No TXT answer for {name}")]
    DnsNoAnswer { name: String },

    #[error("TXT answer for {name} is not valid UTF-8")]
    DnsMalformed { name: String },

    #[error("Failed to decode TXT answer for {name} as {stage}")]
    DnsDecode {
        name: String,
        stage: DecodeStage,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Network, session or response-body failures, as opposed to rejected input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http { .. } | Error::InvalidJson { .. } | Error::Dns { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_not_transport() {
        assert!(!Error::UnsupportedInput.is_transport());
        assert!(!Error::UnsupportedHashKind { len: 3 }.is_transport());
        assert!(!Error::UnsupportedBulkKind.is_transport());
        assert!(!Error::DnsNoAnswer { name: "x".into() }.is_transport());
    }

    #[test]
    fn test_messages_name_supported_kinds() {
        let single = Error::UnsupportedHashKind { len: 3 }.to_string();
        assert!(single.contains("MD5, SHA1 or SHA256"));
        assert!(single.contains('3'));

        let bulk = Error::UnsupportedBulkKind.to_string();
        assert!(bulk.contains("MD5 or SHA1"));
        assert!(!bulk.contains("SHA256"));
    }

    #[test]
    fn test_decode_error_names_stage() {
        let source = serde_json::from_str::<String>("nope").unwrap_err();
        let err = Error::DnsDecode {
            name: "info.dns.hashlookup.circl.lu".into(),
            stage: DecodeStage::Document,
            source,
        };
        assert!(err.to_string().contains("JSON document"));
    }
}
