use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
pub const MAX_COMMENT_SIZE: u64 = 65535;

/// Local File Header signature, the first four bytes of a non-empty ZIP file.
pub const LFH_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// Location of the Central Directory recovered from the EOCD record.
///
/// `cd_end` is exclusive: the Central Directory spans `[cd_offset, cd_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EocdDescriptor {
    pub total_records: u16,
    pub cd_offset: u64,
    pub cd_end: u64,
}

impl EocdDescriptor {
    /// Size of the Central Directory in bytes.
    pub fn cd_size(&self) -> u64 {
        self.cd_end - self.cd_offset
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
///
/// Multi-disk fields and the comment length are skipped over.
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Decode the fixed record at the start of `data`.
    ///
    /// Returns `None` if fewer than [`Self::SIZE`] bytes are available or the
    /// signature does not match.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let record = data.get(..Self::SIZE)?;
        if &record[0..4] != Self::SIGNATURE {
            return None;
        }

        let mut cursor = Cursor::new(&record[4..]);
        let _disk_number = cursor.read_u16::<LittleEndian>().ok()?;
        let _disk_with_cd = cursor.read_u16::<LittleEndian>().ok()?;
        let _disk_entries = cursor.read_u16::<LittleEndian>().ok()?;
        let total_entries = cursor.read_u16::<LittleEndian>().ok()?;
        let cd_size = cursor.read_u32::<LittleEndian>().ok()?;
        let cd_offset = cursor.read_u32::<LittleEndian>().ok()?;

        Some(Self {
            total_entries,
            cd_size,
            cd_offset,
        })
    }

    pub fn descriptor(&self) -> EocdDescriptor {
        let cd_offset = self.cd_offset as u64;
        EocdDescriptor {
            total_records: self.total_entries,
            cd_offset,
            cd_end: cd_offset + self.cd_size as u64,
        }
    }
}

/// Fixed part of a Central Directory File Header - 46 bytes
///
/// Only the fields needed to identify an entry and step over its variable
/// length tail are kept.
#[derive(Debug, Clone, Copy)]
pub struct CentralDirectoryHeader {
    pub crc32: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_comment_length: u16,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: &'static [u8; 4] = b"PK\x01\x02";
    pub const SIZE: usize = 46;

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let header = data.get(..Self::SIZE)?;
        if &header[0..4] != Self::SIGNATURE {
            return None;
        }

        // crc32 sits after version made by, version needed, flags,
        // compression method, mod time and mod date.
        let mut cursor = Cursor::new(&header[16..]);
        let crc32 = cursor.read_u32::<LittleEndian>().ok()?;
        let _compressed_size = cursor.read_u32::<LittleEndian>().ok()?;
        let _uncompressed_size = cursor.read_u32::<LittleEndian>().ok()?;
        let file_name_length = cursor.read_u16::<LittleEndian>().ok()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>().ok()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>().ok()?;

        Some(Self {
            crc32,
            file_name_length,
            extra_field_length,
            file_comment_length,
        })
    }

    /// Total length of this record including its variable-length fields.
    pub fn record_len(&self) -> usize {
        Self::SIZE
            + self.file_name_length as usize
            + self.extra_field_length as usize
            + self.file_comment_length as usize
    }
}
