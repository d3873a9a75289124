mod chunker;
mod loader;

pub use chunker::create_chunks;
pub use loader::{DocumentError, DocumentLoader, PdfLoader};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece of the source document together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source: String,
    /// Zero-based page number, as reported by the page-level loader.
    pub page: usize,
    pub chunk_index: usize,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, page: usize) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            page,
            chunk_index: 0,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (page {}, chunk {})", self.source, self.page, self.chunk_index)
    }
}
