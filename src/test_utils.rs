#[cfg(test)]
pub mod channels {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::DocumentUpload,
        services::channel::{DocumentSource, OutboundChannel},
    };

    /// Records every reply in send order.
    #[derive(Default)]
    pub struct RecordingOutbound {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingOutbound {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn sent(&self) -> Vec<String> {
            self.sent.lock().await.clone()
        }

        pub async fn last(&self) -> Option<String> {
            self.sent.lock().await.last().cloned()
        }

        pub async fn clear(&self) {
            self.sent.lock().await.clear();
        }
    }

    #[async_trait]
    impl OutboundChannel for RecordingOutbound {
        async fn send_text(&self, text: &str) -> AppResult<()> {
            self.sent.lock().await.push(text.to_string());
            Ok(())
        }
    }

    pub struct FailingOutbound;

    #[async_trait]
    impl OutboundChannel for FailingOutbound {
        async fn send_text(&self, _text: &str) -> AppResult<()> {
            Err(AppError::TransportError("chat not found".to_string()))
        }
    }

    /// Document held in memory; counts how often its bytes were fetched.
    #[derive(Clone)]
    pub struct InMemoryDocument {
        content: Result<Vec<u8>, String>,
        fetches: Arc<AtomicUsize>,
    }

    impl InMemoryDocument {
        pub fn new(content: Vec<u8>) -> Self {
            Self {
                content: Ok(content),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn failing(reason: &str) -> Self {
            Self {
                content: Err(reason.to_string()),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn upload(&self, file_name: &str) -> DocumentUpload {
            DocumentUpload::new(file_name, Box::new(self.clone()))
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for InMemoryDocument {
        async fn fetch(&self) -> AppResult<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.content.clone().map_err(AppError::DownloadError)
        }
    }
}

#[cfg(test)]
pub mod documents {
    use std::io::{Cursor, Write};

    use lopdf::{
        content::{Content, Operation},
        dictionary, Document, Object, Stream,
    };
    use zip::{write::FileOptions, ZipWriter};

    const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    /// Wraps raw `w:body` children into a complete `word/document.xml`.
    pub fn docx_document_xml(body_children: &[&str]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body_children.concat()
        )
    }

    /// Builds a `.docx` with one paragraph per entry; empty entries become
    /// empty paragraphs.
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: Vec<String> = paragraphs
            .iter()
            .map(|text| {
                if text.is_empty() {
                    "<w:p/>".to_string()
                } else {
                    format!(
                        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                        escape_xml_text(text)
                    )
                }
            })
            .collect();
        let body: Vec<&str> = body.iter().map(String::as_str).collect();
        let xml = docx_document_xml(&body);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", FileOptions::default())
            .unwrap();
        writer.write_all(CONTENT_TYPES_XML.as_bytes()).unwrap();
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a PDF with one page per entry; empty entries become pages with
    /// no text at all.
    pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn escape_xml_text(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

#[cfg(test)]
mod tests {
    use super::channels::*;
    use super::documents::*;
    use crate::services::channel::{DocumentSource, OutboundChannel};

    #[tokio::test]
    async fn test_recording_outbound_keeps_order() {
        let outbound = RecordingOutbound::new();
        outbound.send_text("first").await.unwrap();
        outbound.send_text("second").await.unwrap();

        assert_eq!(outbound.sent().await, vec!["first", "second"]);
        assert_eq!(outbound.last().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_in_memory_document_counts_fetches() {
        let document = InMemoryDocument::new(b"abc".to_vec());
        let upload = document.upload("a.txt");

        assert_eq!(document.fetch_count(), 0);
        assert_eq!(upload.source.fetch().await.unwrap(), b"abc".to_vec());
        assert_eq!(document.fetch_count(), 1);
    }

    #[test]
    fn test_docx_fixture_is_a_zip() {
        let bytes = docx_bytes(&["hello"]);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_pdf_fixture_has_header() {
        let bytes = pdf_bytes(&["hello"]);
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
