//! Versioned armoring for encrypted containers
//!
//! Provides base64url encoding with a version prefix for encrypted data.
//! The armored format is:
//! - Free of whitespace (including newlines)
//! - Safe to embed in URLs
//! - Safe to pass unescaped in a POSIX shell
//!
//! The version prefix is what allows a future change of KDF parameters or
//! cipher without breaking existing encrypted files. The raw container
//! format itself carries no algorithm identifiers.

use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Magic prefix for all zkbox versions
const MAGIC_PREFIX: &str = "zkbox";

/// Version 1 magic marker
const V1_MAGIC: &str = "zkbox1:";

/// Returns true if the input looks like armored zkbox data of any version.
pub fn is_armored(data: &[u8]) -> bool {
    data.starts_with(MAGIC_PREFIX.as_bytes())
}

/// Wrap bytes in armor, returning the armored string
///
/// Format: zkbox1:{base64url-no-padding}
pub fn wrap(body: &[u8]) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(body);
    format!("{}{}", V1_MAGIC, encoded)
}

/// Unwrap an armored string, returning the original bytes
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    if armored.len() < V1_MAGIC.len() {
        return Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::ArmoringInvalid,
            "input size smaller than magic marker; likely truncated",
        ));
    }

    if let Some(encoded) = armored.strip_prefix(V1_MAGIC) {
        let body = URL_SAFE_NO_PAD.decode(encoded).map_err(|e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::ArmoringDecode,
                format!("base64 decoding failed: {}", e),
                e,
            )
        })?;
        Ok(body)
    } else if armored.starts_with(MAGIC_PREFIX) {
        Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::ArmoringFromFuture,
            "input claims to be zkbox, but not a version we support",
        ))
    } else {
        Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::ArmoringInvalid,
            "input unrecognized as zkbox data",
        ))
    }
}
