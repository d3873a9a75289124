use super::Document;

/// Split page documents into windows of at most `chunk_size` words.
///
/// Pages that already fit are passed through untouched. Chunk indices are
/// numbered across the whole document so `(page, chunk_index)` is unique.
pub fn create_chunks(documents: &[Document], chunk_size: usize) -> Vec<Document> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut chunk_idx = 0;

    for doc in documents {
        let words: Vec<&str> = doc.content.split_whitespace().collect();
        if words.len() <= chunk_size {
            chunks.push(Document {
                chunk_index: chunk_idx,
                ..doc.clone()
            });
            chunk_idx += 1;
            continue;
        }

        let mut start = 0;
        while start < words.len() {
            let end = (start + chunk_size).min(words.len());
            chunks.push(Document {
                content: words[start..end].join(" "),
                source: doc.source.clone(),
                page: doc.page,
                chunk_index: chunk_idx,
            });
            chunk_idx += 1;
            start = end;
        }
    }

    chunks
}
