use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::Hashlookup;
use crate::error::{Error, Result};

/// Window over the children or parents of a SHA1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub count: u32,
    pub cursor: String,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            count: 100,
            cursor: "0".to_string(),
        }
    }
}

impl Page {
    pub fn new(count: u32, cursor: impl Into<String>) -> Self {
        Self {
            count,
            cursor: cursor.into(),
        }
    }
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    hashes: Vec<&'a str>,
}

impl<'a> BulkRequest<'a> {
    fn new<S: AsRef<str>>(hashes: &'a [S]) -> Self {
        Self {
            hashes: hashes.iter().map(|h| h.as_ref()).collect(),
        }
    }
}

impl Hashlookup {
    /// Information about the database (NSRL version, record counts, ...).
    pub fn info(&self) -> Result<Value> {
        self.get("info")
    }

    /// Most requested hashes and misses.
    pub fn top(&self) -> Result<Value> {
        self.get("stats/top")
    }

    pub fn md5_lookup(&self, md5: &str) -> Result<Value> {
        self.get(&format!("lookup/md5/{}", md5))
    }

    pub fn sha1_lookup(&self, sha1: &str) -> Result<Value> {
        self.get(&format!("lookup/sha1/{}", sha1))
    }

    pub fn sha256_lookup(&self, sha256: &str) -> Result<Value> {
        self.get(&format!("lookup/sha256/{}", sha256))
    }

    /// One result per hash, in the order given.
    pub fn md5_bulk_lookup<S: AsRef<str>>(&self, md5s: &[S]) -> Result<Value> {
        self.post("bulk/md5", &BulkRequest::new(md5s))
    }

    /// One result per hash, in the order given.
    pub fn sha1_bulk_lookup<S: AsRef<str>>(&self, sha1s: &[S]) -> Result<Value> {
        self.post("bulk/sha1", &BulkRequest::new(sha1s))
    }

    pub fn sha1_children(&self, sha1: &str, page: &Page) -> Result<Value> {
        self.get(&format!("children/{}/{}/{}", sha1, page.count, page.cursor))
    }

    pub fn sha1_parents(&self, sha1: &str, page: &Page) -> Result<Value> {
        self.get(&format!("parents/{}/{}/{}", sha1, page.count, page.cursor))
    }

    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "hashlookup request");

        let response = self.http.get(&url).send();
        read_json(url, response)
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Value> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "hashlookup request");

        let response = self.http.post(&url).json(body).send();
        read_json(url, response)
    }
}

// Status codes are not checked; error documents are returned as results.
fn read_json(
    url: String,
    response: reqwest::Result<reqwest::blocking::Response>,
) -> Result<Value> {
    let response = match response {
        Ok(response) => response,
        Err(source) => return Err(Error::Http { url, source }),
    };

    debug!(url = %url, status = %response.status(), "hashlookup response");

    let body = match response.text() {
        Ok(body) => body,
        Err(source) => return Err(Error::Http { url, source }),
    };

    serde_json::from_str(&body).map_err(|source| Error::InvalidJson { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.count, 100);
        assert_eq!(page.cursor, "0");
    }

    #[test]
    fn test_bulk_request_body() {
        let hashes = vec!["AAA".to_string(), "BBB".to_string()];
        let body = serde_json::to_value(BulkRequest::new(&hashes)).unwrap();
        assert_eq!(body, serde_json::json!({"hashes": ["AAA", "BBB"]}));

        let borrowed = ["x", "y", "z"];
        let body = serde_json::to_string(&BulkRequest::new(&borrowed)).unwrap();
        assert_eq!(body, r#"{"hashes":["x","y","z"]}"#);
    }
}
