use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Txt,
    Docx,
    Pdf,
}

impl DocumentKind {
    /// Resolve the kind from the file name's extension, ignoring case.
    /// The byte content is never inspected.
    pub fn from_file_name(file_name: &str) -> AppResult<Self> {
        let extension = extension_of(file_name);
        match extension.as_str() {
            "txt" => Ok(DocumentKind::Txt),
            "docx" => Ok(DocumentKind::Docx),
            "pdf" => Ok(DocumentKind::Pdf),
            _ => Err(AppError::UnsupportedFormat(extension)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Txt => "txt",
            DocumentKind::Docx => "docx",
            DocumentKind::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions_are_case_insensitive() {
        assert_eq!(DocumentKind::from_file_name("notes.txt"), Ok(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_file_name("Report.DOCX"), Ok(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("paper.Pdf"), Ok(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_file_name("archive.tar.pdf"),
            Ok(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_unknown_extension_carries_original_extension() {
        assert_eq!(
            DocumentKind::from_file_name("notes.RTF"),
            Err(AppError::UnsupportedFormat("rtf".to_string()))
        );
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        assert_eq!(
            DocumentKind::from_file_name("README"),
            Err(AppError::UnsupportedFormat(String::new()))
        );
        assert!(DocumentKind::from_file_name("pdf").is_err());
        // Suffix match: a bare ".pdf" name still counts as a PDF.
        assert_eq!(DocumentKind::from_file_name(".pdf"), Ok(DocumentKind::Pdf));
    }
}
