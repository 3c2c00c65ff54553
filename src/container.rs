//! Container layout for encrypted data
//!
//! The binary format is self-describing by fixed offsets:
//! - salt: 16 bytes
//! - nonce: 12 bytes (96 bits, GCM)
//! - sealed data: variable length (ciphertext plus 16-byte GCM tag)
//!
//! No length prefixes are needed: salt and nonce have fixed, known
//! lengths and everything after them is the sealed data. A decoder needs
//! no metadata beyond the bytes themselves.

use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended to the ciphertext
pub const TAG_LEN: usize = 16;

/// Fixed header size preceding the sealed data
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Concatenate salt, nonce, and sealed data into a container.
///
/// `sealed` must already include the trailing authentication tag.
pub fn pack(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Vec<u8> {
    let mut container = Vec::with_capacity(HEADER_LEN + sealed.len());
    container.extend_from_slice(salt);
    container.extend_from_slice(nonce);
    container.extend_from_slice(sealed);
    container
}

/// Split a container into salt, nonce, and sealed data by fixed offsets.
///
/// Fails if the input is shorter than the fixed header; there would be no
/// ciphertext to decrypt. Integrity of the sealed data is not checked
/// here - that happens inside the AEAD open during decryption.
pub fn unpack(container: &[u8]) -> Result<([u8; SALT_LEN], [u8; NONCE_LEN], &[u8])> {
    if container.len() < HEADER_LEN {
        return Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedContainer,
            "input shorter than salt and nonce header; likely truncated",
        ));
    }

    let salt: [u8; SALT_LEN] = container[..SALT_LEN]
        .try_into()
        .map_err(|_| internal_invariant("failed to read salt"))?;
    let nonce: [u8; NONCE_LEN] = container[SALT_LEN..HEADER_LEN]
        .try_into()
        .map_err(|_| internal_invariant("failed to read nonce"))?;
    let sealed = &container[HEADER_LEN..];

    Ok((salt, nonce, sealed))
}

fn internal_invariant(msg: &str) -> ZkboxError {
    ZkboxError::with_kind(ErrorCategory::Internal, ErrorKind::MalformedContainer, msg)
}
