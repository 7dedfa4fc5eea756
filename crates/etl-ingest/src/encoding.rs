//! Text decoding with an ordered encoding-fallback list.
//!
//! The fallback list is injected configuration, not a constant: corpora in
//! other locales extend it (e.g. `shift_jis`, `iso-8859-1`) without code
//! changes. The first encoding that decodes the input without replacement
//! errors wins.

use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::error::IngestError;

/// Decode `bytes` with the first encoding label that succeeds.
///
/// Labels are resolved through `encoding_rs`; an unrecognized label is a
/// configuration error and fails immediately. When every configured
/// encoding produces replacement characters, the file is undecodable and
/// the caller records it as a failure.
pub fn decode_with_fallback(
    path: &Path,
    bytes: &[u8],
    labels: &[String],
) -> Result<String, IngestError> {
    let mut tried = Vec::new();
    for label in labels {
        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            IngestError::UnknownEncoding {
                label: label.clone(),
            }
        })?;
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            if !tried.is_empty() {
                debug!(
                    path = %path.display(),
                    encoding = label.as_str(),
                    fallback_position = tried.len(),
                    "decoded with fallback encoding"
                );
            }
            return Ok(text.into_owned());
        }
        warn!(
            path = %path.display(),
            encoding = label.as_str(),
            "encoding failed, trying next"
        );
        tried.push(label.clone());
    }
    Err(IngestError::Decode {
        path: path.to_path_buf(),
        tried,
    })
}
