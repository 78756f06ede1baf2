//! Zero-allocation BED field parsing.
//!
//! Lines arrive as raw bytes from the reader; these helpers find the first
//! three columns without splitting into a Vec or validating UTF-8 up front.

use memchr::memchr;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters, or
/// does not fit in a u64.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parsed BED3 prefix of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bed3Fields<'a> {
    pub chrom: &'a [u8],
    pub start: u64,
    pub end: u64,
    /// Byte index where column 4 begins, if the line has more columns.
    pub rest: Option<usize>,
}

/// Reason a line failed to parse as BED3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    MissingColumns,
    BadStart,
    BadEnd,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            FieldError::MissingColumns => "expected at least 3 tab-separated fields",
            FieldError::BadStart => "invalid start position",
            FieldError::BadEnd => "invalid end position",
        }
    }
}

/// Parse the chrom/start/end columns of a line using memchr.
///
/// The line must already be stripped of its trailing newline.
#[inline]
pub fn parse_bed3_fields(line: &[u8]) -> Result<Bed3Fields<'_>, FieldError> {
    let tab1 = memchr(b'\t', line).ok_or(FieldError::MissingColumns)?;
    let chrom = &line[..tab1];

    let rest1 = &line[tab1 + 1..];
    let tab2 = memchr(b'\t', rest1).ok_or(FieldError::MissingColumns)?;
    let start = parse_u64_fast(&rest1[..tab2]).ok_or(FieldError::BadStart)?;

    let rest2 = &rest1[tab2 + 1..];
    let tab3 = memchr(b'\t', rest2);
    let end_len = tab3.unwrap_or(rest2.len());
    let end = parse_u64_fast(&rest2[..end_len]).ok_or(FieldError::BadEnd)?;

    let rest = tab3.map(|t| tab1 + 1 + tab2 + 1 + t + 1);

    Ok(Bed3Fields {
        chrom,
        start,
        end,
        rest,
    })
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}

/// Strip a trailing `\n` or `\r\n`.
#[inline(always)]
pub fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
