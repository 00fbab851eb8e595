//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// How an archive is packaged; none of this should affect its CRC sum.
#[derive(Clone, Copy)]
pub struct Packaging {
    pub method: CompressionMethod,
    pub year: u16,
}

impl Default for Packaging {
    fn default() -> Self {
        Self {
            method: CompressionMethod::Deflated,
            year: 2022,
        }
    }
}

impl Packaging {
    fn options(&self) -> SimpleFileOptions {
        let modified = DateTime::from_date_and_time(self.year, 6, 15, 12, 30, 0).unwrap();
        SimpleFileOptions::default()
            .compression_method(self.method)
            .last_modified_time(modified)
    }
}

/// Build a ZIP from `(name, content)` pairs; names ending in `/` become
/// directory entries.
pub fn build_zip(entries: &[(&str, &[u8])], packaging: Packaging, comment: Option<&str>) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = packaging.options();

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    if let Some(comment) = comment {
        writer.set_comment(comment);
    }

    writer.finish().unwrap().into_inner()
}

/// CRCs as reported by an independent ZIP reader, directories excluded.
pub fn reference_crcs(data: &[u8]) -> HashMap<String, u32> {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    let mut crcs = HashMap::new();
    for i in 0..archive.len() {
        let file = archive.by_index(i).unwrap();
        if !file.is_dir() {
            crcs.insert(file.name().to_string(), file.crc32());
        }
    }
    crcs
}

/// A zipped shapefile bundle.
pub fn shapefile_entries() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("boundaries/", b"".as_slice()),
        ("boundaries/adm1.cpg", b"UTF-8".as_slice()),
        ("boundaries/adm1.dbf", b"\x03\x7a\x01\x0f\x02\x00\x00\x00dbf rows".as_slice()),
        ("boundaries/adm1.prj", b"GEOGCS[\"GCS_WGS_1984\"]".as_slice()),
        ("boundaries/adm1.shp", b"\x00\x00\x27\x0a shape records".as_slice()),
        ("boundaries/adm1.shx", b"\x00\x00\x27\x0a shape index".as_slice()),
        ("README.txt", b"Administrative boundaries, level 1.".as_slice()),
    ]
}

/// One worksheet: name and the XML of its `<sheetData>` children.
pub struct SheetSpec<'a> {
    pub name: &'a str,
    pub rows_xml: &'a str,
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Cell formats for [`build_styled_xlsx`]: style 1 is a date (numFmtId 14),
/// style 2 a time of day (numFmtId 21), style 3 an elapsed-hours duration.
pub const DATE_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="[h]:mm:ss"/></numFmts><cellXfs count="4"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="21" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

/// Build a minimal XLSX package.
///
/// With `omit_sheet_parts` the workbook still lists its sheets but their
/// parts are missing, leaving a valid ZIP whose cells cannot be read.
pub fn build_xlsx(sheets: &[SheetSpec<'_>], packaging: Packaging, omit_sheet_parts: bool) -> Vec<u8> {
    xlsx_package(sheets, packaging, omit_sheet_parts, None)
}

/// Build a minimal XLSX package with an `xl/styles.xml` part.
pub fn build_styled_xlsx(sheets: &[SheetSpec<'_>], styles_xml: &str) -> Vec<u8> {
    xlsx_package(sheets, Packaging::default(), false, Some(styles_xml))
}

fn xlsx_package(
    sheets: &[SheetSpec<'_>],
    packaging: Packaging,
    omit_sheet_parts: bool,
    styles_xml: Option<&str>,
) -> Vec<u8> {
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut parts: Vec<(String, String)> = Vec::new();

    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            sheet.name
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
        parts.push((
            format!("xl/worksheets/sheet{n}.xml"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                sheet.rows_xml
            ),
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let mut entries: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), CONTENT_TYPES.to_string()),
        ("_rels/.rels".to_string(), ROOT_RELS.to_string()),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), rels),
    ];
    if let Some(styles) = styles_xml {
        entries.push(("xl/styles.xml".to_string(), styles.to_string()));
    }
    if !omit_sheet_parts {
        entries.extend(parts);
    }

    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, xml)| (name.as_str(), xml.as_bytes()))
        .collect();
    build_zip(&borrowed, packaging, None)
}

/// Inline string cell.
pub fn text_cell(reference: &str, text: &str) -> String {
    format!(r#"<c r="{reference}" t="inlineStr"><is><t>{text}</t></is></c>"#)
}

/// Numeric cell.
pub fn number_cell(reference: &str, value: &str) -> String {
    format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
}

/// Numeric cell rendered through cell format `style`.
pub fn styled_number_cell(reference: &str, value: &str, style: u32) -> String {
    format!(r#"<c r="{reference}" s="{style}"><v>{value}</v></c>"#)
}

/// Boolean cell.
pub fn bool_cell(reference: &str, value: bool) -> String {
    format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(value))
}

pub fn row(index: u32, cells: &[String]) -> String {
    format!(r#"<row r="{index}">{}</row>"#, cells.concat())
}

/// MD5 of the concatenated pieces, as the workbook hash feeds them.
pub fn md5_of(pieces: &[&str]) -> String {
    archash::md5_hex(pieces.concat().as_bytes())
}
