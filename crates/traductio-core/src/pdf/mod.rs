mod document;
mod page_index;
mod text;

pub use document::PdfDocument;
pub use page_index::PageIndex;
pub use text::{TextExtractor, TextLine, extract_text, join_lines, join_pages};
