//! Log sanitization for patient identifiers.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before they
//! reach stderr or the log file. Patterns cover the identifiers a clinic
//! deployment is likely to see in free text:
//! - UUIDs (record IDs)
//! - Medical record numbers (`MRN: 1234567`)
//! - CCC numbers (`12345-67890`)
//! - National ID numbers given with a label
//! - Phone numbers and email addresses
//!
//! Input is capped at `ART_INSIGHT_SANITIZE_MAX_BYTES` (default 16 KiB) per call.

use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{DEFAULT_SANITIZE_MAX_BYTES, SANITIZE_MAX_BYTES_ENV};

const RULES: [(&str, &str); 6] = [
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (r"(?i)\bMRN[:#\s]*\d{5,10}\b", "[REDACTED-MRN]"),
    (r"\b\d{5}-\d{5}\b", "[REDACTED-CCC]"),
    (
        r"(?i)\b(?:national[_\s-]?id|id[_\s-]?(?:no|number))[:#=\s]*\d{6,10}\b",
        "[REDACTED-NATIONAL-ID]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"(?:\+\d{1,3}[-.\s]?)?\b0?\d{3}[-.\s]?\d{3}[-.\s]?\d{3,4}\b",
        "[REDACTED-PHONE]",
    ),
];

struct Patterns {
    set: RegexSet,
    rules: Vec<(Regex, &'static str)>,
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

/// `None` only if a rule fails to compile; callers then redact whole lines.
fn patterns() -> Option<&'static Patterns> {
    PATTERNS
        .get_or_init(|| {
            let set = RegexSet::new(RULES.iter().map(|(p, _)| *p)).ok()?;
            let rules = RULES
                .iter()
                .map(|(p, r)| Regex::new(p).ok().map(|re| (re, *r)))
                .collect::<Option<Vec<_>>>()?;
            Some(Patterns { set, rules })
        })
        .as_ref()
}

fn max_sanitize_bytes() -> usize {
    std::env::var(SANITIZE_MAX_BYTES_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replace every recognised identifier in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut out = match patterns() {
        None => "[REDACTED]".to_string(),
        Some(p) => {
            let mut text = prefix.to_string();
            for idx in p.set.matches(prefix).into_iter() {
                let (re, replacement) = &p.rules[idx];
                text = re.replace_all(&text, *replacement).into_owned();
            }
            text
        }
    };

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// Whether `input` contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    patterns().map_or(true, |p| p.set.is_match(prefix))
}

/// Wraps a `MakeWriter` so every formatted line is sanitized before writing.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line longer than the cap is flushed early instead of buffering forever.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.drain_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_sanitize_uuid() {
        let out = sanitize("record 550e8400-e29b-41d4-a716-446655440000 assessed");
        assert!(out.contains("[REDACTED-UUID]"));
        assert!(!out.contains("550e8400"));
    }

    #[test]
    fn test_sanitize_mrn_and_ccc() {
        let out = sanitize("MRN: 1234567, CCC 13939-00123");
        assert!(out.contains("[REDACTED-MRN]"));
        assert!(out.contains("[REDACTED-CCC]"));
        assert!(!out.contains("13939"));
    }

    #[test]
    fn test_sanitize_national_id_and_email() {
        let out = sanitize("national_id=27654321 contact nurse@clinic.org");
        assert!(out.contains("[REDACTED-NATIONAL-ID]"));
        assert!(out.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_sanitize_phone() {
        let out = sanitize("caregiver +254 712 345 678");
        assert!(out.contains("[REDACTED-PHONE]"));
        assert!(!out.contains("345"));
    }

    #[test]
    fn test_clinical_values_survive() {
        let line = "n_features=14 label=Adherent cd4=450 viral_load=5000";
        assert!(!contains_pii(line));
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let out = sanitize_with_limit("aaaaaaaaaaaaaaaaaaaaaaaa", 8);
        assert_eq!(out, "aaaaaaaa [TRUNCATED]");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let (prefix, truncated) = truncate_to_char_boundary("ééé", 3);
        assert_eq!(prefix, "é");
        assert!(truncated);
    }

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let sink = Sink::default();
        let make = SanitizingMakeWriter::new({
            let sink = sink.clone();
            move || sink.clone()
        });

        let mut w = make.make_writer();
        w.write_all(b"loaded MRN:99887766\npartial ").expect("write");
        w.write_all(b"line\n").expect("write");
        w.flush().expect("flush");

        let written = String::from_utf8(sink.0.lock().expect("lock").clone()).expect("utf8");
        assert_eq!(written, "loaded [REDACTED-MRN]\npartial line\n");
    }
}
