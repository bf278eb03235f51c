//! Best-effort text sources for recommendations. Sources are tried in order
//! until one yields text; extraction failures are logged and skipped.

use bytes::Bytes;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum TextSource {
    /// An uploaded PDF. Parsed on the blocking pool.
    Document(Bytes),
    /// Skills typed by the user.
    Typed(String),
}

impl TextSource {
    pub fn name(&self) -> &'static str {
        match self {
            TextSource::Document(_) => "document",
            TextSource::Typed(_) => "typed",
        }
    }

    async fn extract(self) -> Option<String> {
        let text = match self {
            TextSource::Document(bytes) => extract_pdf_text(bytes).await?,
            TextSource::Typed(text) => text,
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Returns the text of the first source that yields any, or an empty string.
pub async fn first_available_text(sources: Vec<TextSource>) -> String {
    for source in sources {
        let name = source.name();
        if let Some(text) = source.extract().await {
            debug!(source = name, chars = text.len(), "Using recommendation text source");
            return text;
        }
        debug!(source = name, "Text source yielded nothing, trying next");
    }
    String::new()
}

async fn extract_pdf_text(bytes: Bytes) -> Option<String> {
    let size = bytes.len();
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!(size, "PDF text extraction failed: {e:?}");
            None
        }
        Err(e) => {
            warn!(size, "PDF text extraction aborted: {e}");
            None
        }
    }
}
