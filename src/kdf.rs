//! Key derivation from passwords
//!
//! Derives a 256-bit AES key from a password and salt using
//! PBKDF2-HMAC-SHA256 at 100,000 iterations. The derivation is
//! deterministic: the same (password, salt) pair always yields the same
//! key, which is what allows decryption with the correct password.

use crate::container::SALT_LEN;
use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of the derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count. Deliberately expensive; a derivation is
/// expected to take a noticeable fraction of a second.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and salt.
///
/// The returned key is wrapped in `Zeroizing` and wiped from memory when
/// dropped. Never fails due to password content (empty passwords are
/// accepted here; minimum length is enforced by the password workflow).
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, PBKDF2_ITERATIONS, key.as_mut_slice()).map_err(
        |e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::KeyDerivation,
                "PBKDF2 key derivation failed",
                e,
            )
        },
    )?;
    Ok(key)
}
