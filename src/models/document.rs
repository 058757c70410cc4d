use bytes::Bytes;

use crate::error::{AppError, AppResult};

/// Content types accepted for combining, identified from file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Ppt,
    Pptx,
}

impl DocumentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
            DocumentKind::Ppt => "ppt",
            DocumentKind::Pptx => "pptx",
        }
    }

    pub fn needs_conversion(&self) -> bool {
        !matches!(self, DocumentKind::Pdf)
    }
}

/// One uploaded file, held in memory for the lifetime of a request.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub data: Bytes,
}

impl Document {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Swaps in the converter's PDF output.
    pub fn mark_converted(&mut self, pdf: Bytes) {
        self.name.push_str(".pdf");
        self.data = pdf;
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
    }
}

/// Upload-ordered documents of one combine request.
#[derive(Debug)]
pub struct Batch {
    documents: Vec<Document>,
    max_files: usize,
}

impl Batch {
    pub fn new(max_files: usize) -> Self {
        Self {
            documents: Vec::new(),
            max_files,
        }
    }

    pub fn push(&mut self, document: Document) -> AppResult<()> {
        if self.documents.len() >= self.max_files {
            return Err(AppError::TooManyFiles {
                count: self.documents.len() + 1,
                limit: self.max_files,
            });
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.documents.iter().map(Document::size).sum()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

/// Merge-order file name for the document at `index` in a batch of `total`.
///
/// Three digits at minimum, wider for larger batches, so that lexical order
/// always equals upload order.
pub fn ordered_name(index: usize, total: usize) -> String {
    let digits = total.saturating_sub(1).to_string().len();
    let width = digits.max(3);
    format!("{:0width$}.pdf", index, width = width)
}
