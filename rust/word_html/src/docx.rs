use crate::error::Result;
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CHUNK_PART: &str = "word/afchunk.htm";
const CHUNK_ID: &str = "htmlChunk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

// Twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
            header: 708,
            footer: 708,
            gutter: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocxOptions {
    pub orientation: Orientation,
    pub margins: PageMargins,
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="htm" ContentType="text/html"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn word_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="{CHUNK_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/aFChunk" Target="/{CHUNK_PART}"/>
</Relationships>"#
    )
}

fn document_xml(options: &DocxOptions) -> String {
    // US Letter.
    let (w, h, orient) = match options.orientation {
        Orientation::Portrait => (12240, 15840, ""),
        Orientation::Landscape => (15840, 12240, r#" w:orient="landscape""#),
    };
    let m = options.margins;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
 xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:altChunk r:id="{CHUNK_ID}"/>
    <w:sectPr>
      <w:pgSz w:w="{w}" w:h="{h}"{orient}/>
      <w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="{}"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
        m.top, m.right, m.bottom, m.left, m.header, m.footer, m.gutter
    )
}

pub fn write_docx<W: Write + Seek>(writer: W, html: &str, options: &DocxOptions) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", opt)?;
    zip.write_all(content_types_xml().as_bytes())?;

    zip.add_directory("_rels/", opt)?;
    zip.start_file("_rels/.rels", opt)?;
    zip.write_all(rels_xml().as_bytes())?;

    zip.add_directory("word/", opt)?;
    zip.add_directory("word/_rels/", opt)?;

    zip.start_file("word/document.xml", opt)?;
    zip.write_all(document_xml(options).as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", opt)?;
    zip.write_all(word_rels_xml().as_bytes())?;

    zip.start_file(CHUNK_PART, opt)?;
    zip.write_all(html.as_bytes())?;

    let inner = zip.finish()?;
    log::debug!("packaged {} bytes of html into docx", html.len());
    Ok(inner)
}

pub fn docx_bytes(html: &str, options: &DocxOptions) -> Result<Vec<u8>> {
    let cursor = write_docx(Cursor::new(Vec::new()), html, options)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn package_embeds_html_as_alt_chunk() {
        let html = "<!DOCTYPE html>\n<html><body><p>ü</p></body></html>";
        let bytes = docx_bytes(html, &DocxOptions::default()).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        assert_eq!(read_part(&bytes, CHUNK_PART), html);
        let doc = read_part(&bytes, "word/document.xml");
        assert!(doc.contains(r#"<w:altChunk r:id="htmlChunk"/>"#));
        assert!(doc.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
        assert!(read_part(&bytes, "word/_rels/document.xml.rels").contains("aFChunk"));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("text/html"));
    }

    #[test]
    fn landscape_swaps_page_size() {
        let options = DocxOptions {
            orientation: Orientation::Landscape,
            margins: PageMargins {
                top: 720,
                ..PageMargins::default()
            },
        };
        let bytes = docx_bytes("<p>x</p>", &options).unwrap();
        let doc = read_part(&bytes, "word/document.xml");
        assert!(doc.contains(r#"<w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/>"#));
        assert!(doc.contains(r#"w:top="720""#));
    }
}
