//! HTTP `Range` headers for fetching only the parts of a remote ZIP that
//! hold its Central Directory.
//!
//! A caller that knows the total size first requests the tail window with
//! [`zip_tail_range_header`], then passes the returned bytes to
//! [`zip_cd_range_header`] to learn exactly which bytes to request next.
//! Nothing here performs I/O.

use std::fmt;

use super::parser::{find_eocd_signature, tail_start};

/// A single `Range` request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeHeader {
    start: u64,
    end: Option<u64>,
    value: String,
}

impl RangeHeader {
    pub const NAME: &'static str = "Range";

    /// Range from `start` to the end of the resource.
    pub fn from_offset(start: u64) -> Self {
        Self {
            start,
            end: None,
            value: format!("bytes={start}-"),
        }
    }

    /// Inclusive range `[start, end]`.
    pub fn inclusive(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
            value: format!("bytes={start}-{end}"),
        }
    }

    /// Number of bytes a server must return for this range on a resource
    /// of `size` bytes.
    pub fn expected_len(&self, size: u64) -> u64 {
        let stop = match self.end {
            Some(end) => end.saturating_add(1).min(size),
            None => size,
        };
        stop.saturating_sub(self.start)
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RangeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::NAME, self.value)
    }
}

/// Header requesting the last `min(size, 65535 + 22)` bytes of a ZIP.
pub fn zip_tail_range_header(size: u64) -> RangeHeader {
    RangeHeader::from_offset(tail_start(size))
}

/// Header requesting exactly the Central Directory located via `tail_data`.
///
/// Returns the declared record count alongside the header, or `None` when
/// the tail holds no EOCD record.
///
/// The range is `[cd_offset, cd_end)` written inclusively. An empty Central
/// Directory would give `bytes=X-(X-1)`, which servers reject, so it is
/// clamped to `bytes=X-X`; the one extra byte belongs to the EOCD record and
/// parses to no entries.
pub fn zip_cd_range_header(tail_data: &[u8]) -> Option<(u16, RangeHeader)> {
    let eocd = find_eocd_signature(tail_data)?;
    let last = eocd.cd_end.saturating_sub(1).max(eocd.cd_offset);
    Some((
        eocd.total_records,
        RangeHeader::inclusive(eocd.cd_offset, last),
    ))
}
