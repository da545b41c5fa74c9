use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;

use crate::client::{Hashlookup, Page};
use crate::hash::Query;
use crate::output;
use crate::status;

#[derive(Args)]
pub struct PageArgs {
    /// Number of entries for --children/--parents
    #[arg(long, default_value_t = 100)]
    pub count: u32,

    /// Cursor for --children/--parents, as returned by the previous page
    #[arg(long, default_value = "0")]
    pub cursor: String,
}

impl PageArgs {
    pub fn to_page(&self) -> Page {
        Page::new(self.count, self.cursor.as_str())
    }
}

pub fn run(client: &Hashlookup, hashes: Vec<String>, over_dns: bool) -> Result<()> {
    let query = Query::from_args(hashes)?;

    let response = match (&query, over_dns) {
        (Query::Single(hash), true) => client.lookup_over_dns(hash)?,
        (Query::Bulk(_), true) => bail!("Bulk lookups are not available over DNS"),
        (_, false) => client.lookup(query.clone())?,
    };

    output::print_json(&response)?;

    if let Query::Bulk(ref hashes) = query {
        status!("{} of {} hashes returned a record", records_found(&response), hashes.len());
    }

    Ok(())
}

pub fn run_children(client: &Hashlookup, sha1: &str, page: &PageArgs) -> Result<()> {
    let response = client.sha1_children(sha1, &page.to_page())?;
    output::print_json(&response)?;
    report_cursor(&response);
    Ok(())
}

pub fn run_parents(client: &Hashlookup, sha1: &str, page: &PageArgs) -> Result<()> {
    let response = client.sha1_parents(sha1, &page.to_page())?;
    output::print_json(&response)?;
    report_cursor(&response);
    Ok(())
}

/// Entries of a bulk response that are records rather than error documents.
fn records_found(response: &Value) -> usize {
    response
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry.is_object() && entry.get("message").is_none())
                .count()
        })
        .unwrap_or(0)
}

fn report_cursor(response: &Value) {
    if let Some(cursor) = next_cursor(response) {
        status!("More entries available: --cursor {}", cursor);
    }
}

fn next_cursor(response: &Value) -> Option<&str> {
    response
        .get("cursor")
        .and_then(Value::as_str)
        .filter(|cursor| *cursor != "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_found_skips_error_documents() {
        let response = json!([
            {"MD5": "8ED4B4ED952526D89899E723F3488DE4", "CRC32": "7A5407CA"},
            {"message": "Non existing MD5", "query": "00000000000000000000000000000000"},
            {"MD5": "6E2F8616A01725DCB37BED0A2495AEB2", "CRC32": "E774FD92"},
        ]);
        assert_eq!(records_found(&response), 2);
        assert_eq!(records_found(&json!({"message": "error"})), 0);
        assert_eq!(records_found(&json!([])), 0);
    }

    #[test]
    fn test_next_cursor() {
        assert_eq!(next_cursor(&json!({"cursor": "1234", "total": 5})), Some("1234"));
        assert_eq!(next_cursor(&json!({"cursor": "0"})), None);
        assert_eq!(next_cursor(&json!({"message": "not found"})), None);
        assert_eq!(next_cursor(&json!([])), None);
    }
}
