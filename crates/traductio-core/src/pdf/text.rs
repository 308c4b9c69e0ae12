use mupdf::TextPageOptions;

use super::document::PdfDocument;
use super::page_index::PageIndex;
use crate::error::{Error, Result};

/// Lines whose baselines differ by less than this (in points) are treated as
/// one visual line.
const BASELINE_TOLERANCE: f32 = 0.5;

/// One line of text as mupdf reports it, with its baseline position
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub baseline: f32,
    pub text: String,
}

/// Plain text extraction from PDF pages
pub struct TextExtractor<'a> {
    doc: &'a PdfDocument,
}

impl<'a> TextExtractor<'a> {
    pub const fn new(doc: &'a PdfDocument) -> Self {
        Self { doc }
    }

    /// Lines of a page in reading order, as mupdf groups them.
    pub fn page_lines(&self, page_num: usize) -> Result<Vec<TextLine>> {
        let page_index = PageIndex::try_from_page_num(page_num, self.doc.page_count())?;

        let doc = self.doc.open_document()?;
        let page = doc
            .load_page(page_index.into())
            .map_err(|e| Error::PdfTextExtraction {
                page: page_num,
                reason: format!("Failed to load page: {e}"),
            })?;

        let text_page = page
            .to_text_page(TextPageOptions::empty())
            .map_err(|e| Error::PdfTextExtraction {
                page: page_num,
                reason: format!("Failed to get text page: {e}"),
            })?;

        let mut lines = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let mut text = String::new();
                let mut baseline = None;

                for text_char in line.chars() {
                    if let Some(c) = text_char.char() {
                        text.push(c);
                    }
                    if baseline.is_none() {
                        let quad = text_char.quad();
                        baseline = Some(quad.ll.y.max(quad.lr.y));
                    }
                }

                if let Some(baseline) = baseline {
                    lines.push(TextLine { baseline, text });
                }
            }
        }

        Ok(lines)
    }

    /// Text of a single page.
    pub fn page_text(&self, page_num: usize) -> Result<String> {
        Ok(join_lines(&self.page_lines(page_num)?))
    }

    /// Text of every page, one string per page.
    pub fn all_pages(&self) -> Result<Vec<String>> {
        (0..self.doc.page_count())
            .map(|page_num| self.page_text(page_num))
            .collect()
    }
}

/// Join lines into page text: fragments sharing a baseline are separated by
/// a space, a baseline change starts a new line.
pub fn join_lines(lines: &[TextLine]) -> String {
    let mut text = String::new();
    let mut last_baseline: Option<f32> = None;

    for line in lines {
        let fragment = line.text.trim();
        if fragment.is_empty() {
            continue;
        }

        match last_baseline {
            Some(previous) if (previous - line.baseline).abs() < BASELINE_TOLERANCE => {
                text.push(' ');
            }
            Some(_) => text.push('\n'),
            None => {}
        }
        text.push_str(fragment);
        last_baseline = Some(line.baseline);
    }

    text
}

/// Join page texts with a blank line between pages.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extract the text of every page of a PDF held in memory.
pub fn extract_text(bytes: impl Into<Vec<u8>>) -> Result<Vec<String>> {
    let doc = PdfDocument::from_bytes(bytes)?;
    TextExtractor::new(&doc).all_pages()
}
