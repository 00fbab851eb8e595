//! Size and content hash of a downloaded file.
//!
//! The strategy is picked from the first four bytes and the caller's
//! declared format:
//!
//! | signature    | format   | strategy                                      |
//! |--------------|----------|-----------------------------------------------|
//! | `PK\x03\x04` | `xlsx`   | cell content MD5, else CRC sum, else MD5      |
//! | `PK\x03\x04` | other    | CRC sum from the Central Directory, else MD5  |
//! | anything     | any      | MD5 of the whole file                         |
//!
//! Every branch ends in plain MD5, so a readable file always gets a hash.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::xlsx::hash_excel_buffer;
use crate::zip::{LFH_SIGNATURE, crc_zip_buffer, crc_zip_stream};

/// Lowercase hex MD5 of `data`.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Hash a workbook held in memory, falling back from cell content to the
/// ZIP CRC sum to plain MD5.
///
/// The CRC step covers files that are ZIPs but not workbooks, and workbooks
/// whose cells cannot be read but whose Central Directory is intact.
pub fn hash_xlsx_with_fallback(buffer: &[u8]) -> String {
    let hash = hash_excel_buffer(buffer);
    if !hash.is_empty() {
        return hash;
    }

    debug!("xlsx content hash unavailable, trying CRC sum");
    let hash = crc_zip_buffer(buffer);
    if !hash.is_empty() {
        return hash;
    }

    debug!("CRC sum unavailable, using MD5");
    md5_hex(buffer)
}

/// Return the size and hash of the file at `path`.
///
/// `file_format` is the format the caller expects (`"zip"`, `"xlsx"`,
/// `"shp"`...); it is compared case-insensitively and only matters for
/// files that start with a ZIP signature.
///
/// # Errors
///
/// Fails only if the file cannot be opened or read.
pub fn size_and_hash(path: impl AsRef<Path>, file_format: &str) -> Result<(u64, String)> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    debug!(path = %path.display(), file_format, "hashing file");
    size_and_hash_reader(&mut file, file_format)
}

/// [`size_and_hash`] over any seekable source.
///
/// The size is taken by seeking to the end; hashing starts from offset 0.
pub fn size_and_hash_reader<R: Read + Seek>(
    reader: &mut R,
    file_format: &str,
) -> Result<(u64, String)> {
    let size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut signature = Vec::with_capacity(LFH_SIGNATURE.len());
    reader
        .by_ref()
        .take(LFH_SIGNATURE.len() as u64)
        .read_to_end(&mut signature)?;

    if signature == LFH_SIGNATURE {
        if file_format.eq_ignore_ascii_case("xlsx") {
            let mut buffer = signature;
            reader.read_to_end(&mut buffer)?;
            return Ok((size, hash_xlsx_with_fallback(&buffer)));
        }

        let crc_sum = crc_zip_stream(reader)?;
        if !crc_sum.is_empty() {
            return Ok((size, crc_sum));
        }

        debug!(size, "no CRC sum for ZIP signature, using MD5");
        reader.seek(SeekFrom::Start(signature.len() as u64))?;
    }

    // The signature bytes are already consumed; seed the digest with them.
    let mut md5hash = md5::Context::new();
    md5hash.consume(&signature);
    io::copy(reader, &mut md5hash)?;
    Ok((size, format!("{:x}", md5hash.compute())))
}
