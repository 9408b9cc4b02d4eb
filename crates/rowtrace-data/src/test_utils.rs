//! Shared test utilities for rowtrace crates
//!
//! Writes minimal but valid XLSX workbooks so tests do not depend on
//! checked-in binary fixtures. Text cells are written as inline strings,
//! numbers as plain numeric cells and dates as serial numbers styled with
//! the built-in short date format (`numFmtId` 14).

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A cell for a generated test workbook
#[derive(Debug, Clone)]
pub enum TestCell {
    Text(String),
    Number(f64),
    /// Excel serial date (1900 system), e.g. `45306.0` for 2024-01-15
    Date(f64),
    Empty,
}

impl From<&str> for TestCell {
    fn from(s: &str) -> Self {
        TestCell::Text(s.to_string())
    }
}

impl From<f64> for TestCell {
    fn from(n: f64) -> Self {
        TestCell::Number(n)
    }
}

/// Builder for in-memory XLSX workbooks
#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<(String, Vec<Vec<TestCell>>)>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet; the first row is the header row
    pub fn sheet(mut self, name: &str, rows: Vec<Vec<TestCell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    /// Write the workbook to disk, creating parent directories
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)
    }

    /// Serialize the workbook into XLSX bytes
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        )?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(self.workbook_rels().as_bytes())?;

        for (idx, (_, rows)) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
            zip.write_all(Self::sheet_xml(rows).as_bytes())?;
        }

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES_XML.as_bytes())?;

        zip.finish()?;
        Ok(buffer.into_inner())
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
"#,
        );
        for idx in 1..=self.sheets.len() {
            xml.push_str(&format!(
                "  <Override PartName=\"/xl/worksheets/sheet{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n",
                idx
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
"#,
        );
        for (idx, (name, _)) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(
                "    <sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
                escape(name),
                idx + 1,
                idx + 1
            ));
        }
        xml.push_str("  </sheets>\n</workbook>");
        xml
    }

    fn workbook_rels(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        for idx in 1..=self.sheets.len() {
            xml.push_str(&format!(
                "  <Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>\n",
                idx, idx
            ));
        }
        xml.push_str(&format!(
            "  <Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\n",
            self.sheets.len() + 1
        ));
        xml.push_str("</Relationships>");
        xml
    }

    fn sheet_xml(rows: &[Vec<TestCell>]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
"#,
        );
        for (row_idx, row) in rows.iter().enumerate() {
            let row_num = row_idx + 1;
            xml.push_str(&format!("    <row r=\"{}\">", row_num));
            for (col_idx, cell) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", column_letters(col_idx), row_num);
                match cell {
                    TestCell::Text(s) => xml.push_str(&format!(
                        "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        cell_ref,
                        escape(s)
                    )),
                    TestCell::Number(n) => {
                        xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", cell_ref, n))
                    }
                    TestCell::Date(serial) => xml.push_str(&format!(
                        "<c r=\"{}\" s=\"1\"><v>{}</v></c>",
                        cell_ref, serial
                    )),
                    TestCell::Empty => {}
                }
            }
            xml.push_str("</row>\n");
        }
        xml.push_str("  </sheetData>\n</worksheet>");
        xml
    }
}

/// Style 0 is the default, style 1 the built-in short date format
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#;

/// Convert a 0-indexed column number to letters (0 = A, 26 = AA)
fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
