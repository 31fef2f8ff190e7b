//! Single-line extraction of `name value [unit] [min-max]` tuples.
//!
//! Three patterns are tried in priority order, most specific first. The
//! name is the leading run without digits or whitespace, the value is the
//! first number after it. A row number in front of the name (`3 PLT ...`,
//! `12. HGB ...`) is skipped. Lines that fit none of the patterns are noise
//! and yield nothing.

use std::sync::LazyLock;

use regex::Regex;

use super::types::RawLine;

/// Priority-ordered line patterns:
/// name + value + unit + range, name + value + unit, name + value.
///
/// A unit never starts with `.`, so the fraction of `5.6` is never read
/// as a unit. The optional row number must be followed by whitespace or
/// one of `.`, `)`, `、`, so a date such as `2024-05-01` never parses.
static LINE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    const ROW: &str = r"^(?:\d+(?:[.)、]\s*|\s+))?";
    [
        Regex::new(&format!(
            r"{ROW}([^\d\s]+)\s*([\d.]+)\s*([^\d\s.][^\d\s]*)\s*([\d.]+-[\d. ]+)"
        ))
        .unwrap(),
        Regex::new(&format!(r"{ROW}([^\d\s]+)\s*([\d.]+)\s*([^\d\s.][^\d\s]*)")).unwrap(),
        Regex::new(&format!(r"{ROW}([^\d\s]+)\s*([\d.]+)")).unwrap(),
    ]
});

/// Parse one line of recognized text.
///
/// The first pattern that matches *and* whose value parses as a finite
/// number wins; a match with an unparseable value (`1.2.3`) falls through
/// to the next pattern.
pub fn parse_line(line: &str) -> Option<RawLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    LINE_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(line)?;
        let value = caps
            .get(2)?
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())?;

        Some(RawLine {
            name: caps.get(1)?.as_str().trim().to_string(),
            value,
            unit: caps.get(3).map(|m| m.as_str().trim().to_string()),
            range: caps.get(4).map(|m| m.as_str().trim().to_string()),
        })
    })
}
