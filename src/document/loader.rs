use std::path::Path;
use thiserror::Error;

use super::Document;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Failed to extract text from {path}: {message}")]
    Extraction { path: String, message: String },
    #[error("Document contains no extractable text: {0}")]
    Empty(String),
}

/// Turns a file on disk into page-level documents.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError>;
}

#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    fn pages_to_documents(source: &str, pages: Vec<String>) -> Result<Vec<Document>, DocumentError> {
        let documents: Vec<Document> = pages
            .into_iter()
            .enumerate()
            .filter_map(|(page, text)| {
                if text.trim().is_empty() {
                    log::debug!("Skipping empty page {} of {}", page, source);
                    return None;
                }
                Some(Document::new(text, source, page))
            })
            .collect();

        if documents.is_empty() {
            return Err(DocumentError::Empty(source.to_string()));
        }

        Ok(documents)
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let source = path.display().to_string();
        if !path.is_file() {
            return Err(DocumentError::NotFound(source));
        }

        log::info!("Extracting text from {}", source);
        let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| DocumentError::Extraction {
            path: source.clone(),
            message: e.to_string(),
        })?;

        let documents = Self::pages_to_documents(&source, pages)?;
        log::info!("Loaded {} pages from {}", documents.len(), source);
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = PdfLoader::new()
            .load(Path::new("definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn blank_pages_are_dropped_but_keep_numbering() {
        let pages = vec![
            "Cover".to_string(),
            "   \n".to_string(),
            "Payment is due in 30 days.".to_string(),
        ];
        let docs = PdfLoader::pages_to_documents("contract.pdf", pages).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page, 0);
        assert_eq!(docs[1].page, 2);
        assert_eq!(docs[1].source, "contract.pdf");
    }

    #[test]
    fn all_blank_pages_is_an_error() {
        let err = PdfLoader::pages_to_documents("blank.pdf", vec![String::new()]).unwrap_err();
        assert!(matches!(err, DocumentError::Empty(_)));
    }
}
