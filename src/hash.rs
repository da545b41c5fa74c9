use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};

/// Hash kind, inferred from the length of its hex string only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Md5,
    Sha1,
    Sha256,
}

impl HashKind {
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(HashKind::Md5),
            40 => Some(HashKind::Sha1),
            64 => Some(HashKind::Sha256),
            _ => None,
        }
    }

    pub fn classify(hash: &str) -> Option<Self> {
        Self::from_len(hash_len(hash))
    }

    /// Path segment used by the REST endpoints.
    pub fn name(&self) -> &'static str {
        match self {
            HashKind::Md5 => "md5",
            HashKind::Sha1 => "sha1",
            HashKind::Sha256 => "sha256",
        }
    }

    pub fn hex_len(&self) -> usize {
        match self {
            HashKind::Md5 => 32,
            HashKind::Sha1 => 40,
            HashKind::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Length in characters, not bytes.
pub fn hash_len(hash: &str) -> usize {
    hash.chars().count()
}

/// Input to [`crate::Hashlookup::lookup`], disambiguated before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Single(String),
    Bulk(Vec<String>),
}

impl Query {
    /// Adapter for dynamically shaped input: a string, or an array of strings.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(hash) => Ok(Query::Single(hash.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(String::from).ok_or(Error::UnsupportedInput))
                .collect::<Result<Vec<_>>>()
                .map(Query::Bulk),
            _ => Err(Error::UnsupportedInput),
        }
    }

    /// One argument is a single lookup, several are a bulk lookup.
    pub fn from_args(mut hashes: Vec<String>) -> Result<Self> {
        match hashes.len() {
            0 => Err(Error::UnsupportedInput),
            1 => Ok(Query::Single(hashes.remove(0))),
            _ => Ok(Query::Bulk(hashes)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Query::Single(_) => 1,
            Query::Bulk(hashes) => hashes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Query {
    fn from(hash: &str) -> Self {
        Query::Single(hash.to_string())
    }
}

impl From<String> for Query {
    fn from(hash: String) -> Self {
        Query::Single(hash)
    }
}

impl From<Vec<String>> for Query {
    fn from(hashes: Vec<String>) -> Self {
        Query::Bulk(hashes)
    }
}

impl From<&[&str]> for Query {
    fn from(hashes: &[&str]) -> Self {
        Query::Bulk(hashes.iter().map(|h| h.to_string()).collect())
    }
}

/// Kind shared by every hash of a bulk request. Only MD5 and SHA1 have bulk
/// endpoints; an empty or mixed list has no kind.
pub fn bulk_kind<S: AsRef<str>>(hashes: &[S]) -> Result<HashKind> {
    if hashes.is_empty() {
        return Err(Error::UnsupportedBulkKind);
    }

    [HashKind::Md5, HashKind::Sha1]
        .into_iter()
        .find(|kind| hashes.iter().all(|h| hash_len(h.as_ref()) == kind.hex_len()))
        .ok_or(Error::UnsupportedBulkKind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_by_length() {
        assert_eq!(HashKind::classify(&"a".repeat(32)), Some(HashKind::Md5));
        assert_eq!(HashKind::classify(&"a".repeat(40)), Some(HashKind::Sha1));
        assert_eq!(HashKind::classify(&"a".repeat(64)), Some(HashKind::Sha256));
        assert_eq!(HashKind::classify("foo"), None);
        assert_eq!(HashKind::classify(""), None);
        assert_eq!(HashKind::classify(&"a".repeat(128)), None);
    }

    #[test]
    fn test_classify_ignores_content() {
        // no hex validation, only length
        assert_eq!(HashKind::classify(&"z".repeat(32)), Some(HashKind::Md5));
        assert_eq!(HashKind::classify(&"-".repeat(40)), Some(HashKind::Sha1));
    }

    #[test]
    fn test_classify_counts_characters() {
        assert_eq!(hash_len(&"é".repeat(16)), 16);
        assert_eq!(HashKind::classify(&"é".repeat(16)), None);
        assert_eq!(HashKind::classify(&"é".repeat(32)), Some(HashKind::Md5));
        assert_eq!(bulk_kind(&["é".repeat(40)]).unwrap(), HashKind::Sha1);
    }

    #[test]
    fn test_bulk_kind() {
        let md5s = vec!["A".repeat(32), "B".repeat(32)];
        let sha1s = vec!["A".repeat(40), "B".repeat(40)];
        assert_eq!(bulk_kind(&md5s).unwrap(), HashKind::Md5);
        assert_eq!(bulk_kind(&sha1s).unwrap(), HashKind::Sha1);
    }

    #[test]
    fn test_bulk_kind_rejects_mixed_and_sha256() {
        let mixed = vec!["A".repeat(32), "B".repeat(40)];
        let sha256s = vec!["A".repeat(64), "B".repeat(64)];
        let short = vec!["bar", "baz"];
        let empty: Vec<String> = Vec::new();

        assert!(matches!(bulk_kind(&mixed), Err(Error::UnsupportedBulkKind)));
        assert!(matches!(bulk_kind(&sha256s), Err(Error::UnsupportedBulkKind)));
        assert!(matches!(bulk_kind(&short), Err(Error::UnsupportedBulkKind)));
        assert!(matches!(bulk_kind(&empty), Err(Error::UnsupportedBulkKind)));
    }

    #[test]
    fn test_query_from_json() {
        assert_eq!(
            Query::from_json(&json!("abc")).unwrap(),
            Query::Single("abc".into())
        );
        assert_eq!(
            Query::from_json(&json!(["a", "b"])).unwrap(),
            Query::Bulk(vec!["a".into(), "b".into()])
        );
        assert!(matches!(Query::from_json(&json!(1)), Err(Error::UnsupportedInput)));
        assert!(matches!(Query::from_json(&json!(null)), Err(Error::UnsupportedInput)));
        assert!(matches!(
            Query::from_json(&json!({"hash": "a"})),
            Err(Error::UnsupportedInput)
        ));
        assert!(matches!(
            Query::from_json(&json!(["a", 2])),
            Err(Error::UnsupportedInput)
        ));
    }

    #[test]
    fn test_query_from_args() {
        assert_eq!(
            Query::from_args(vec!["a".into()]).unwrap(),
            Query::Single("a".into())
        );
        assert_eq!(
            Query::from_args(vec!["a".into(), "b".into()]).unwrap(),
            Query::Bulk(vec!["a".into(), "b".into()])
        );
        assert!(matches!(Query::from_args(vec![]), Err(Error::UnsupportedInput)));
    }

    #[test]
    fn test_query_len() {
        assert_eq!(Query::from("a").len(), 1);
        assert_eq!(Query::from(vec!["a".to_string(), "b".to_string()]).len(), 2);
        assert!(Query::Bulk(vec![]).is_empty());
    }
}
