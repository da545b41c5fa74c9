use serde_json::Value;
use tracing::debug;

use super::Hashlookup;
use crate::error::{Error, Result};
use crate::hash::{bulk_kind, hash_len, HashKind, Query};

impl Hashlookup {
    /// Looks up one hash or a list of hashes of the same kind.
    ///
    /// A single hash is routed by length to the MD5, SHA1 or SHA256 endpoint.
    /// A list must be all MD5 or all SHA1; there is no SHA256 bulk endpoint.
    /// Hashes are sent with the case they were given in.
    pub fn lookup(&self, query: impl Into<Query>) -> Result<Value> {
        match query.into() {
            Query::Single(hash) => {
                let kind = HashKind::classify(&hash)
                    .ok_or(Error::UnsupportedHashKind { len: hash_len(&hash) })?;
                debug!(%kind, "single lookup");

                match kind {
                    HashKind::Md5 => self.md5_lookup(&hash),
                    HashKind::Sha1 => self.sha1_lookup(&hash),
                    HashKind::Sha256 => self.sha256_lookup(&hash),
                }
            }
            Query::Bulk(hashes) => {
                let kind = bulk_kind(&hashes)?;
                debug!(%kind, count = hashes.len(), "bulk lookup");

                match kind {
                    HashKind::Md5 => self.md5_bulk_lookup(&hashes),
                    HashKind::Sha1 => self.sha1_bulk_lookup(&hashes),
                    HashKind::Sha256 => Err(Error::UnsupportedBulkKind),
                }
            }
        }
    }

    /// [`Hashlookup::lookup`] for input whose shape is only known at runtime.
    pub fn lookup_json(&self, input: &Value) -> Result<Value> {
        self.lookup(Query::from_json(input)?)
    }
}
