//! Content sniffing for uploaded documents.
//!
//! Types are decided from magic numbers only; the client-supplied filename
//! and content type are never trusted.

use crate::models::DocumentKind;

const PDF_MAGIC: &[u8] = b"%PDF";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";
const ZIP_CENTRAL_HEADER: &[u8] = b"PK\x01\x02";

const ZIP_LOCAL_HEADER_LEN: usize = 30;
const ZIP_CENTRAL_HEADER_LEN: usize = 46;

/// Identifies a supported document type from its bytes.
pub fn detect(data: &[u8]) -> Option<DocumentKind> {
    if data.starts_with(PDF_MAGIC) {
        return Some(DocumentKind::Pdf);
    }
    if data.starts_with(OLE2_MAGIC) {
        return detect_compound(data);
    }
    if data.starts_with(ZIP_LOCAL_HEADER) {
        return detect_ooxml(data);
    }
    None
}

/// Short label for logging what a rejected upload looked like.
pub fn describe(data: &[u8]) -> &'static str {
    if let Some(kind) = detect(data) {
        return kind.extension();
    }
    if data.is_empty() {
        "empty"
    } else if data.starts_with(OLE2_MAGIC) {
        "ole2"
    } else if data.starts_with(ZIP_LOCAL_HEADER) {
        "zip"
    } else if data.starts_with(b"\x89PNG") {
        "png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpeg"
    } else if data.starts_with(b"GIF8") {
        "gif"
    } else {
        "unknown"
    }
}

// Legacy Office files are OLE2 containers; the stream directory names tell
// Word and PowerPoint apart.
fn detect_compound(data: &[u8]) -> Option<DocumentKind> {
    if contains(data, &utf16le("PowerPoint Document")) {
        Some(DocumentKind::Ppt)
    } else if contains(data, &utf16le("WordDocument")) {
        Some(DocumentKind::Doc)
    } else {
        None
    }
}

fn detect_ooxml(data: &[u8]) -> Option<DocumentKind> {
    let mut has_content_types = false;
    let mut kind = None;

    for name in zip_entry_names(data) {
        if name == b"[Content_Types].xml" {
            has_content_types = true;
        } else if kind.is_none() {
            if name.starts_with(b"word/") {
                kind = Some(DocumentKind::Docx);
            } else if name.starts_with(b"ppt/") {
                kind = Some(DocumentKind::Pptx);
            }
        }
        if has_content_types && kind.is_some() {
            return kind;
        }
    }
    None
}

/// Entry names from every local and central directory header in the buffer.
fn zip_entry_names(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    (0..data.len().saturating_sub(3)).filter_map(move |offset| {
        let signature = &data[offset..offset + 4];
        let (len_at, name_at) = if signature == ZIP_LOCAL_HEADER {
            (offset + 26, offset + ZIP_LOCAL_HEADER_LEN)
        } else if signature == ZIP_CENTRAL_HEADER {
            (offset + 28, offset + ZIP_CENTRAL_HEADER_LEN)
        } else {
            return None;
        };
        let len_bytes = data.get(len_at..len_at + 2)?;
        let name_len = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
        data.get(name_at..name_at + name_len)
    })
}

fn utf16le(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}
