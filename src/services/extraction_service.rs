use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use zip::ZipArchive;

use crate::{
    errors::{AppError, AppResult},
    models::domain::DocumentKind,
};

const DOCX_BODY_ENTRY: &str = "word/document.xml";

static XML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w.:-]*)[^>]*?(/?)>").expect("XML tag pattern is valid")
});

static XML_CHAR_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("char ref pattern is valid"));

/// Turns uploaded documents into plain text for prompting.
pub struct ExtractionService;

impl ExtractionService {
    /// Extract plain text from `content`, dispatching on the extension of
    /// `file_name`.
    pub fn extract(content: &[u8], file_name: &str) -> AppResult<String> {
        let kind = DocumentKind::from_file_name(file_name)?;
        Self::extract_kind(content, kind)
    }

    pub fn extract_kind(content: &[u8], kind: DocumentKind) -> AppResult<String> {
        match kind {
            DocumentKind::Txt => Self::extract_txt(content),
            DocumentKind::Docx => Self::extract_docx(content),
            DocumentKind::Pdf => Self::extract_pdf(content),
        }
    }

    fn extract_txt(content: &[u8]) -> AppResult<String> {
        Ok(String::from_utf8(content.to_vec())?)
    }

    fn extract_docx(content: &[u8]) -> AppResult<String> {
        let mut archive = ZipArchive::new(Cursor::new(content))?;
        let mut entry = archive.by_name(DOCX_BODY_ENTRY).map_err(|_| {
            AppError::MalformedDocument(format!("{} is missing", DOCX_BODY_ENTRY))
        })?;

        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|e| {
            AppError::MalformedDocument(format!("failed to read {}: {}", DOCX_BODY_ENTRY, e))
        })?;

        Ok(Self::docx_paragraphs(&xml).join("\n"))
    }

    /// Text of every paragraph directly under `w:body`, in document order.
    /// Paragraphs without text are kept as empty strings.
    ///
    /// Only the paragraph's own runs contribute, including runs wrapped in a
    /// `w:hyperlink`. Anything nested deeper inside a run (drawings, text
    /// boxes, `mc:AlternateContent`) is skipped.
    fn docx_paragraphs(xml: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Option<String> = None;
        let mut depth = 0usize;
        let mut body_depth: Option<usize> = None;
        let mut hyperlink_depth: Option<usize> = None;
        let mut run_depth: Option<usize> = None;
        let mut in_text = false;
        let mut last_end = 0usize;

        for caps in XML_TAG.captures_iter(xml) {
            let (start, end) = match caps.get(0) {
                Some(m) => (m.start(), m.end()),
                None => continue,
            };
            if in_text {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&decode_xml_entities(&xml[last_end..start]));
                }
            }
            last_end = end;

            let closing = !caps[1].is_empty();
            let self_closing = !caps[3].is_empty();
            let name = &caps[2];
            let paragraph_depth = body_depth.filter(|_| current.is_some());
            let in_run_child = run_depth.map(|run| run + 1) == Some(depth);

            if closing {
                depth = depth.saturating_sub(1);
                match name {
                    "w:t" if run_depth.map(|run| run + 1) == Some(depth) => in_text = false,
                    "w:r" if run_depth == Some(depth) => run_depth = None,
                    "w:hyperlink" if hyperlink_depth == Some(depth) => hyperlink_depth = None,
                    "w:p" if Some(depth) == body_depth => {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    "w:body" => body_depth = None,
                    _ => {}
                }
            } else if self_closing {
                match (name, current.as_mut()) {
                    ("w:p", None) if Some(depth) == body_depth => paragraphs.push(String::new()),
                    ("w:tab", Some(paragraph)) if in_run_child => paragraph.push('\t'),
                    ("w:br" | "w:cr", Some(paragraph)) if in_run_child => paragraph.push('\n'),
                    _ => {}
                }
            } else {
                match name {
                    "w:body" => body_depth = Some(depth + 1),
                    "w:p" if current.is_none() && Some(depth) == body_depth => {
                        current = Some(String::new())
                    }
                    "w:hyperlink" if paragraph_depth.map(|p| p + 1) == Some(depth) => {
                        hyperlink_depth = Some(depth)
                    }
                    "w:r" if run_depth.is_none()
                        && is_paragraph_run(depth, paragraph_depth, hyperlink_depth) =>
                    {
                        run_depth = Some(depth)
                    }
                    "w:t" if in_run_child => in_text = true,
                    _ => {}
                }
                depth += 1;
            }
        }

        paragraphs
    }

    fn extract_pdf(content: &[u8]) -> AppResult<String> {
        let document = lopdf::Document::load_mem(content)?;

        let pages = document
            .get_pages()
            .into_keys()
            .map(|page_number| match document.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Could not extract text from PDF page {}: {}", page_number, e);
                    String::new()
                }
            });

        Ok(Self::join_pdf_pages(pages))
    }

    /// Pages without text are dropped rather than kept as blank lines,
    /// unlike empty `.docx` paragraphs.
    pub fn join_pdf_pages<I>(pages: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        pages
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| text.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A run belongs to the paragraph when it is a direct child of it or of one of
/// its hyperlinks.
fn is_paragraph_run(
    depth: usize,
    paragraph_depth: Option<usize>,
    hyperlink_depth: Option<usize>,
) -> bool {
    paragraph_depth.map(|p| p + 1) == Some(depth)
        || hyperlink_depth.map(|h| h + 1) == Some(depth)
}

fn decode_xml_entities(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    XML_CHAR_REF
        .replace_all(&named, |caps: &Captures| {
            let reference = &caps[1];
            let code = match reference.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => reference.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .replace("&amp;", "&")
}
