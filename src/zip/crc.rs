//! Order-independent aggregation of entry CRCs.
//!
//! The per-entry CRC32 values are XORed together. XOR is commutative, so the
//! result does not depend on where entries sit in the archive, and rebuilding
//! a ZIP with the same files gives the same sum even when timestamps or
//! compression change.
//!
//! The sum cannot see two entries swapping CRCs, nor a pair of entries whose
//! CRCs cancel being added or removed together. Stored sums depend on this
//! exact combiner, so it must stay XOR.

use std::io::{self, Read, Seek};

use super::parser::{ZipCrcs, zip_crcs_from_buffer, zip_crcs_from_stream};

/// XOR all CRCs into one 8-digit lowercase hex string.
///
/// An empty map, or CRCs that cancel out to zero, give `""`, meaning no
/// ZIP identity is available.
pub fn crc_sum(file_crcs: &ZipCrcs) -> String {
    let sum = file_crcs.values().fold(0u32, |acc, crc| acc ^ crc);
    if sum == 0 {
        return String::new();
    }
    format!("{sum:08x}")
}

/// CRC sum of a ZIP held in memory.
pub fn crc_zip_buffer(buffer: &[u8]) -> String {
    crc_sum(&zip_crcs_from_buffer(buffer))
}

/// CRC sum of a ZIP read from a seekable stream.
pub fn crc_zip_stream<R: Read + Seek>(reader: &mut R) -> io::Result<String> {
    Ok(crc_sum(&zip_crcs_from_stream(reader)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapefile_crcs() -> Vec<(&'static str, u32)> {
        vec![
            ("GHSL2_0_MWD_L1_tile_schema_land.cpg", 243350608),
            ("GHSL2_0_MWD_L1_tile_schema_land.dbf", 3146933286),
            ("GHSL2_0_MWD_L1_tile_schema_land.prj", 3172151860),
            ("GHSL2_0_MWD_L1_tile_schema_land.shp", 2238079868),
            ("GHSL2_0_MWD_L1_tile_schema_land.shx", 1240292293),
            ("GHSL2_0_MWD_L1_tile_schema_land_Readme.txt", 1146324287),
            ("GHSL_Data_Package_2022_light.pdf", 2982083443),
        ]
    }

    fn to_map<'a>(pairs: impl IntoIterator<Item = &'a (&'static str, u32)>) -> ZipCrcs {
        let mut map = ZipCrcs::new();
        for (path, crc) in pairs {
            map.insert(path.to_string(), *crc);
        }
        map
    }

    #[test]
    fn test_crc_sum_known_archive() {
        assert_eq!(crc_sum(&to_map(&shapefile_crcs())), "31662cb7");
    }

    #[test]
    fn test_crc_sum_independent_of_insertion_order() {
        let pairs = shapefile_crcs();
        let forward = crc_sum(&to_map(&pairs));
        let reverse = crc_sum(&to_map(pairs.iter().rev()));
        let mut rotated = pairs.clone();
        rotated.rotate_left(3);
        assert_eq!(forward, reverse);
        assert_eq!(forward, crc_sum(&to_map(&rotated)));
    }

    #[test]
    fn test_crc_sum_empty_and_cancelling() {
        assert_eq!(crc_sum(&ZipCrcs::new()), "");

        let cancelling = to_map(&[("a", 0x1234_5678), ("b", 0x1234_5678)]);
        assert_eq!(crc_sum(&cancelling), "");
    }

    #[test]
    fn test_crc_sum_is_zero_padded() {
        assert_eq!(crc_sum(&to_map(&[("a", 0xff)])), "000000ff");
    }

    #[test]
    fn test_crc_zip_buffer_not_a_zip() {
        assert_eq!(crc_zip_buffer(b""), "");
        assert_eq!(crc_zip_buffer(b"plain text, no archive here"), "");
    }
}
