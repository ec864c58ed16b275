//! Plain-text extraction from PDF documents.
//!
//! Extraction is best effort. A document that cannot be parsed at all is an error, but pages
//! whose content streams fail to decode (scanned images, exotic fonts, broken streams) simply
//! contribute no text. Callers should expect partial or garbled output for complex layouts.

use lopdf::Document;
use std::path::Path;
use thiserror::Error;

/// Errors raised while recovering text from a PDF.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Bytes could not be parsed as a PDF document.
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
    /// Document is encrypted and the empty user password does not open it.
    #[error("PDF is encrypted and cannot be read")]
    Encrypted,
    /// Stored upload could not be read back from disk.
    #[error("Failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),
    /// Blocking extraction worker panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extract all recoverable text from `bytes`, one line group per page in page order.
///
/// Pages without text are skipped; the remaining page texts are joined with a single newline.
/// Returns an empty string when no page yields text.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut document =
        Document::load_mem(bytes).map_err(|error| ExtractionError::Parse(error.to_string()))?;
    // Many "encrypted" PDFs only restrict permissions and open with an empty user password.
    if document.is_encrypted() {
        document.decrypt("").map_err(|error| {
            tracing::debug!(%error, "Empty user password did not open PDF");
            ExtractionError::Encrypted
        })?;
    }

    let pages = document.get_pages();
    let page_count = pages.len();
    let mut page_texts = Vec::with_capacity(page_count);

    // `get_pages` is keyed by page number, so iteration follows document order.
    for page_number in pages.keys().copied() {
        match document.extract_text(&[page_number]) {
            Ok(text) => {
                let text = text.trim_end();
                if !text.trim().is_empty() {
                    page_texts.push(text.to_string());
                }
            }
            Err(error) => {
                tracing::debug!(page = page_number, %error, "Skipping page without extractable text");
            }
        }
    }

    tracing::debug!(
        pages = page_count,
        text_pages = page_texts.len(),
        "Extracted PDF text"
    );
    Ok(page_texts.join("\n"))
}

/// Extract text off the async runtime; parsing large documents is CPU bound.
pub async fn extract_text_blocking(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|error| ExtractionError::Task(error.to_string()))?
}

/// Read a stored PDF from `path` and extract its text.
pub async fn extract_text_from_path(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path).await?;
    extract_text_blocking(bytes).await
}

#[cfg(test)]
pub(crate) mod test_pdf {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, StringFormat, dictionary, encryption};

    /// Build an in-memory PDF with one page per entry; `None` produces a page with no text.
    pub(crate) fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
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

        let mut kids = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }

    /// Like [`build_pdf`], but RC4-encrypted (V1/R2). With `user_check` set the /U entry is
    /// filled with bytes that no password matches, so opening it requires a real password.
    pub(crate) fn build_encrypted_pdf(
        pages: &[Option<&str>],
        user_check: Option<&[u8]>,
    ) -> Vec<u8> {
        let mut doc = Document::load_mem(&build_pdf(pages)).expect("reload pdf");
        let mut encrypt = dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::String(vec![0x5a; 32], StringFormat::Hexadecimal),
            "P" => -4,
        };
        if let Some(check) = user_check {
            encrypt.set("U", Object::String(check.to_vec(), StringFormat::Hexadecimal));
        }
        let encrypt_id = doc.add_object(encrypt);
        doc.trailer.set("Encrypt", encrypt_id);
        let file_id = Object::String(b"rustysum-fixture".to_vec(), StringFormat::Hexadecimal);
        doc.trailer.set("ID", vec![file_id.clone(), file_id]);

        let key = encryption::get_encryption_key(&doc, "", false).expect("encryption key");
        for (&id, object) in doc.objects.iter_mut() {
            if id == encrypt_id || !matches!(object, Object::Stream(_)) {
                continue;
            }
            // RC4 is symmetric: running the decryptor over plaintext encrypts it.
            let ciphertext = encryption::decrypt_object(&key, id, object).expect("encrypt stream");
            if let Object::Stream(stream) = object {
                stream.set_content(ciphertext);
            }
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }
}
