use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use serde_json::Value;

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Writes `value` as JSON indented by two spaces, followed by a newline.
pub fn write_json<W: Write>(mut out: W, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_json(value: &Value) -> Result<()> {
    write_json(std::io::stdout().lock(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_indents_two_spaces() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"nx": 1})).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\n  \"nx\": 1\n}\n");
    }

    #[test]
    fn test_write_json_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"SHA-1":"a","CRC32":"b","MD5":"c"}"#).unwrap();
        let mut buffer = Vec::new();
        write_json(&mut buffer, &value).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let sha1 = text.find("SHA-1").unwrap();
        let crc = text.find("CRC32").unwrap();
        let md5 = text.find("MD5").unwrap();
        assert!(sha1 < crc && crc < md5);
    }
}
