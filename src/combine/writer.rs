//! Combined artifact format and lossy decoding
//!
//! The artifact is line oriented: a three line header, one record per file
//! and a footer. Records are appended in traversal order and never revisited.

use crate::config::DecodePolicy;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

pub const CONTENT_START: &str = "# --- START OF COMBINED CONTENT ---";
pub const CONTENT_END: &str = "# --- END OF COMBINED CONTENT ---";

/// Start marker line for a record, without the trailing newline
pub fn start_marker(relative: &str) -> String {
    format!("--- START FILE: {relative} ---")
}

/// End marker line for a record, without the trailing newline
pub fn end_marker(relative: &str) -> String {
    format!("--- END FILE: {relative} ---")
}

/// Decode file bytes as UTF-8 without ever failing.
///
/// Valid input is borrowed untouched. Otherwise every maximal invalid byte
/// sequence is replaced by U+FFFD or removed, depending on `policy`. The
/// flag is true when anything had to be substituted.
pub fn decode_content(bytes: &[u8], policy: DecodePolicy) -> (Cow<'_, str>, bool) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (Cow::Borrowed(text), false);
    }

    let decoded = match policy {
        DecodePolicy::Replace => String::from_utf8_lossy(bytes).into_owned(),
        DecodePolicy::Drop => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    };
    (Cow::Owned(decoded), true)
}

/// Writes the combined artifact to any sink
pub struct CombinedWriter<W: Write> {
    inner: W,
    bytes_written: u64,
}

impl<W: Write> CombinedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Header naming the scanned root and the artifact itself
    pub fn write_header(&mut self, root: &Path, output: &Path) -> Result<()> {
        self.write_str(&format!(
            "# Combined content from directory: {}\n# Output file: {}\n{}\n\n",
            root.display(),
            output.display(),
            CONTENT_START
        ))
    }

    /// Append one file record, returning the bytes it took
    pub fn write_record(&mut self, relative: &str, content: &str) -> Result<u64> {
        let before = self.bytes_written;
        self.write_str(&start_marker(relative))?;
        self.write_str("\n")?;
        self.write_str(content)?;
        self.write_str(&format!("\n{}\n\n", end_marker(relative)))?;
        Ok(self.bytes_written - before)
    }

    pub fn write_footer(&mut self) -> Result<()> {
        self.write_str(&format!("{CONTENT_END}\n"))
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush().context("Failed to flush output file")?;
        Ok(self.inner)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .context("Failed to write to output file")?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_is_borrowed() {
        let (text, lossy) = decode_content("héllo".as_bytes(), DecodePolicy::Replace);
        assert!(matches!(text, Cow::Borrowed("héllo")));
        assert!(!lossy);
    }

    #[test]
    fn test_replace_policy_substitutes() {
        let bytes = b"ab\xffcd\xe2\x82";
        let (text, lossy) = decode_content(bytes, DecodePolicy::Replace);
        assert_eq!(text, "ab\u{FFFD}cd\u{FFFD}");
        assert!(lossy);
    }

    #[test]
    fn test_drop_policy_removes_invalid_bytes() {
        let bytes = b"ab\xffcd\xe2\x82";
        let (text, lossy) = decode_content(bytes, DecodePolicy::Drop);
        assert_eq!(text, "abcd");
        assert!(lossy);
    }

    #[test]
    fn test_document_layout() {
        let mut writer = CombinedWriter::new(Vec::new());
        writer
            .write_header(Path::new("/src/project"), Path::new("/src/out.txt"))
            .unwrap();
        let record_bytes = writer.write_record("a.txt", "hello").unwrap();
        writer.write_record("dir/b.rs", "fn b() {}\n").unwrap();
        writer.write_footer().unwrap();
        let total = writer.bytes_written();
        let buffer = writer.finish().unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "# Combined content from directory: /src/project\n\
                        # Output file: /src/out.txt\n\
                        # --- START OF COMBINED CONTENT ---\n\
                        \n\
                        --- START FILE: a.txt ---\n\
                        hello\n\
                        --- END FILE: a.txt ---\n\
                        \n\
                        --- START FILE: dir/b.rs ---\n\
                        fn b() {}\n\
                        \n\
                        --- END FILE: dir/b.rs ---\n\
                        \n\
                        # --- END OF COMBINED CONTENT ---\n";
        assert_eq!(text, expected);
        assert_eq!(total, expected.len() as u64);
        assert_eq!(
            record_bytes,
            "--- START FILE: a.txt ---\nhello\n--- END FILE: a.txt ---\n\n".len() as u64
        );
    }
}
