//! Object-key rules for uploaded documents and attachments.
//!
//! Keys look like `{prefix}/{uuid}-{sanitized-file-name}`. The uuid keeps
//! two uploads of `contrato.pdf` apart; the sanitized name keeps the key
//! readable in the bucket browser.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::CoreError;

/// Key prefix for documents.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Key prefix for attachments; the owner type and id follow it.
pub const ATTACHMENTS_PREFIX: &str = "attachments";

/// Longest sanitized file name kept in a key.
pub const MAX_FILE_NAME_LEN: usize = 120;

/// Fallback content type when neither the upload nor the extension says.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Reduce an uploaded file name to `[A-Za-z0-9._-]`.
///
/// Directory components are dropped, whitespace becomes `-`, accented and
/// other characters are removed, and the extension is lowercased. An empty
/// result becomes `"file"`.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();

    let mut cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect();

    while cleaned.starts_with('.') {
        cleaned.remove(0);
    }

    if let Some(dot) = cleaned.rfind('.') {
        let (stem, ext) = cleaned.split_at(dot);
        cleaned = format!("{stem}{}", ext.to_ascii_lowercase());
    }

    if cleaned.len() > MAX_FILE_NAME_LEN {
        cleaned = cleaned[cleaned.len() - MAX_FILE_NAME_LEN..].to_string();
    }

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Build a unique key for a document upload.
pub fn document_key(file_name: &str) -> String {
    format!(
        "{DOCUMENTS_PREFIX}/{}-{}",
        Uuid::now_v7(),
        sanitize_file_name(file_name)
    )
}

/// Build a unique key for an attachment upload under its owner.
pub fn attachment_key(owner_type: &str, owner_id: i64, file_name: &str) -> String {
    format!(
        "{ATTACHMENTS_PREFIX}/{owner_type}/{owner_id}/{}-{}",
        Uuid::now_v7(),
        sanitize_file_name(file_name)
    )
}

/// Reject keys that could escape the bucket root or the storage directory.
pub fn validate_object_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(CoreError::Validation(format!("Invalid object key '{key}'")));
    }
    Ok(())
}

/// Lowercase hex SHA-256 of an uploaded file, stored next to documents.
pub fn content_checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Best-effort content type from the file extension.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_symbols() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\Contrato Final.PDF"), "Contrato-Final.pdf");
        assert_eq!(sanitize_file_name("recibo nº 12 (março).pdf"), "recibo-n-12-maro.pdf");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name("???"), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn sanitize_caps_length_keeping_extension() {
        let long = format!("{}.wav", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), MAX_FILE_NAME_LEN);
        assert!(cleaned.ends_with(".wav"));
    }

    #[test]
    fn keys_are_prefixed_and_valid() {
        let key = document_key("capa.png");
        assert!(key.starts_with("documents/"));
        assert!(key.ends_with("-capa.png"));
        assert!(validate_object_key(&key).is_ok());

        let key = attachment_key("payment", 7, "nota fiscal.pdf");
        assert!(key.starts_with("attachments/payment/7/"));
        assert!(key.ends_with("-nota-fiscal.pdf"));
        assert!(validate_object_key(&key).is_ok());
    }

    #[test]
    fn two_keys_for_same_name_differ() {
        assert_ne!(document_key("a.pdf"), document_key("a.pdf"));
    }

    #[test]
    fn escaping_keys_are_rejected() {
        for key in ["", "/abs", "a/../b", "a//b", "./a", "a\\b", "a/"] {
            assert!(validate_object_key(key).is_err(), "{key}");
        }
    }

    #[test]
    fn checksum_is_hex_sha256() {
        assert_eq!(
            content_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_checksum(b"contrato").len(), 64);
    }

    #[test]
    fn mime_guessing() {
        assert_eq!(guess_mime_type("x.PDF"), "application/pdf");
        assert_eq!(guess_mime_type("cover.jpeg"), "image/jpeg");
        assert_eq!(guess_mime_type("noext"), DEFAULT_MIME_TYPE);
    }
}
