//! File encryption/decryption operations
//!
//! High-level operations for encrypting and decrypting whole files and
//! in-memory blobs. Encryption also produces a metadata envelope
//! describing the source file; the envelope is NOT encrypted and callers
//! must not assume any confidentiality for it.

use crate::armor;
use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};
use crate::passcrypt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Content type recorded when the caller does not know a better one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Unencrypted metadata produced alongside an encrypted artifact
///
/// Carries what a consumer needs to restore the file after decryption:
/// original name, size, and content type, plus the size of the encrypted
/// output. None of this is protected by the encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub original_name: String,
    pub original_size: u64,
    pub original_type: String,
    pub encrypted_size: u64,
}

/// Encrypt an in-memory blob, returning the raw container and metadata
///
/// The container is the binary salt+nonce+sealed format, suitable for
/// handing to any transport or storage. Callers that want the textual
/// armored representation should pass the container to `armor::wrap`.
pub fn encrypt_blob(
    plaintext: &[u8],
    original_name: &str,
    content_type: Option<&str>,
    password: &[u8],
) -> Result<(Vec<u8>, FileMetadata)> {
    let container = passcrypt::encrypt(password, plaintext)
        .map_err(|e| e.with_context("encryption failed"))?;
    let metadata = FileMetadata {
        original_name: original_name.to_string(),
        original_size: plaintext.len() as u64,
        original_type: content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
        encrypted_size: container.len() as u64,
    };
    Ok((container, metadata))
}

/// Decrypt an in-memory blob in either armored or raw container form
///
/// Armored input is detected by its magic prefix; anything else is
/// treated as a raw headerless container, so data produced by encoders
/// that never armored remains decryptable.
pub fn decrypt_blob(data: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    let container = if armor::is_armored(data) {
        let armored = std::str::from_utf8(data).map_err(|e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::ArmoringInvalid,
                "armored input is not valid UTF-8",
                e,
            )
        })?;
        armor::unwrap(armored).map_err(|e| e.with_context("failed to unarmor"))?
    } else {
        data.to_vec()
    };
    passcrypt::decrypt(password, &container).map_err(|e| e.with_context("failed to decrypt"))
}

/// Encrypt a file with a password
///
/// Reads plaintext from `input_path`, encrypts it, and writes the armored
/// ciphertext to `output_path`. Returns the metadata envelope;
/// `encrypted_size` reflects the armored bytes written to disk.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    content_type: Option<&str>,
    password: &[u8],
) -> Result<FileMetadata> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let original_name = file_label(input_path);
    let (container, mut metadata) =
        encrypt_blob(&plaintext, &original_name, content_type, password)?;
    let armored = armor::wrap(&container);
    metadata.encrypted_size = armored.len() as u64;
    write_file_secure(output_path, armored.as_bytes())
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    Ok(metadata)
}

/// Decrypt a file with a password
///
/// Reads armored or raw ciphertext from `input_path`, decrypts it, and
/// writes the plaintext to `output_path`.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(input_path: &Path, output_path: &Path, password: &[u8]) -> Result<()> {
    let data = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let plaintext = decrypt_blob(&data, password)?;
    write_file_secure(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    Ok(())
}

/// Display name of a file for prompts and metadata
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                ZkboxError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> ZkboxError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    ZkboxError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
