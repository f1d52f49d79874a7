//! Resume text extraction from uploaded files.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Texts shorter than this are treated as a failed extraction.
pub const MIN_RESUME_CHARS: usize = 10;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?\d{1,4}\)?[-\s.]?\(?\d{1,4}\)?[-\s.]?\d{3,6}[-\s.]?\d{4,6}").unwrap()
});

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file type '{0}' (expected .pdf, .docx, .txt or .md)")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("text file is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("extracted text is too short or empty")]
    TooShort,
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    PlainText,
    Markdown,
}

impl ResumeFormat {
    pub fn from_filename(filename: &str) -> Result<Self, ParseError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::PlainText),
            "md" => Ok(Self::Markdown),
            _ => Err(ParseError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "txt",
            Self::Markdown => "md",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::PlainText => "text/plain; charset=utf-8",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Extracts cleaned text from an uploaded file.
pub fn extract_text(format: ResumeFormat, bytes: &[u8]) -> Result<String, ParseError> {
    let raw = match format {
        ResumeFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?
        }
        ResumeFormat::Docx => docx_text(bytes)?,
        ResumeFormat::PlainText | ResumeFormat::Markdown => String::from_utf8(bytes.to_vec())?,
    };

    let text = clean_text(&raw);
    if text.chars().count() < MIN_RESUME_CHARS {
        return Err(ParseError::TooShort);
    }
    Ok(text)
}

/// Paragraph text of `word/document.xml`, one line per `<w:p>`.
fn docx_text(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ParseError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParseError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let chunk = t.unescape().map_err(|e| ParseError::Docx(e.to_string()))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Docx(e.to_string())),
            _ => {}
        }
    }
    Ok(text)
}

/// Collapses all whitespace runs to single spaces and trims.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// First email address and phone number found in the text.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(text).map(|m| m.as_str().trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        use std::io::Write;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_extracted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:t>Rust &amp; Go engineer</w:t></w:r></w:p>
    <w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract_text(ResumeFormat::Docx, &docx_bytes(xml)).unwrap();
        assert_eq!(text, "Jane Doe Senior Rust & Go engineer jane@example.com");
    }

    #[test]
    fn test_docx_without_document_part_rejected() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::FileOptions::default())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(
            extract_text(ResumeFormat::Docx, &bytes),
            Err(ParseError::Docx(_))
        ));
    }

    #[test]
    fn test_non_zip_docx_rejected() {
        assert!(matches!(
            extract_text(ResumeFormat::Docx, b"plain text pretending to be docx"),
            Err(ParseError::Docx(_))
        ));
    }

    #[test]
    fn test_docx_format_metadata() {
        let format = ResumeFormat::from_filename("Resume.DOCX").unwrap();
        assert_eq!(format, ResumeFormat::Docx);
        assert_eq!(format.extension(), "docx");
        assert!(format.content_type().contains("wordprocessingml"));
    }

    #[test]
    fn test_format_from_extension_case_insensitive() {
        assert_eq!(ResumeFormat::from_filename("CV.PDF").unwrap(), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_filename("notes.md").unwrap(), ResumeFormat::Markdown);
        assert_eq!(ResumeFormat::from_filename("a.b.txt").unwrap(), ResumeFormat::PlainText);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        assert!(matches!(
            ResumeFormat::from_filename("resume.odt"),
            Err(ParseError::UnsupportedFormat(_))
        ));
        assert!(ResumeFormat::from_filename("resume").is_err());
    }

    #[test]
    fn test_plain_text_cleaned() {
        let text = extract_text(ResumeFormat::PlainText, b"  Jane Doe\n\n\tRust   engineer  ").unwrap();
        assert_eq!(text, "Jane Doe Rust engineer");
    }

    #[test]
    fn test_short_text_rejected() {
        assert!(matches!(
            extract_text(ResumeFormat::PlainText, b"  hi \n"),
            Err(ParseError::TooShort)
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(matches!(
            extract_text(ResumeFormat::PlainText, &[0xff, 0xfe, 0xfd]),
            Err(ParseError::Encoding(_))
        ));
    }

    #[test]
    fn test_garbage_pdf_is_pdf_error() {
        assert!(matches!(
            extract_text(ResumeFormat::Pdf, b"definitely not a pdf"),
            Err(ParseError::Pdf(_))
        ));
    }

    #[test]
    fn test_contact_info_extraction() {
        let info = extract_contact_info("Jane Doe | jane.doe@example.com | +1 415 555 0199 | SF");
        assert_eq!(info.email.as_deref(), Some("jane.doe@example.com"));
        assert!(info.phone.is_some());
    }

    #[test]
    fn test_contact_info_absent() {
        assert_eq!(extract_contact_info("No contact here"), ContactInfo::default());
    }
}
