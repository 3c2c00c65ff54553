//! Encryption/decryption using PBKDF2 + AES-256-GCM
//!
//! This module implements password-based authenticated encryption using:
//! - PBKDF2-HMAC-SHA256 for key derivation from the password
//! - AES-256-GCM for authenticated encryption
//!
//! The binary format is:
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - sealed data: variable length (includes 16-byte GCM tag)
//!
//! Each call is a pure, self-contained operation. A fresh salt is drawn
//! for every encryption, so the derived key is never shared across
//! messages even when the password is; the fresh 96-bit random nonce is
//! the secondary defense against (key, nonce) reuse.

use crate::container::{self, NONCE_LEN, SALT_LEN};
use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};
use crate::kdf;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

fn cipher_for(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Aes256Gcm> {
    let key = kdf::derive_key(password, salt)?;
    Aes256Gcm::new_from_slice(key.as_slice()).map_err(|e| {
        ZkboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::CipherPrimitive,
            "failed to initialize AES-256-GCM",
            e,
        )
    })
}

/// Encrypt plaintext with a password using random salt and nonce
///
/// Returns the binary format: salt(16) + nonce(12) + sealed data(variable).
/// Output length is always plaintext length + 44. Two calls with identical
/// inputs never produce identical output.
pub fn encrypt(password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    encrypt_with_params(password, plaintext, &salt, &nonce)
}

/// Encrypt plaintext with a password using provided salt and nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates random salt/nonce.
pub fn encrypt_with_params(
    password: &[u8],
    plaintext: &[u8],
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    let cipher = cipher_for(password, salt)?;

    let sealed = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| {
            ZkboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::CipherPrimitive,
                "AES-256-GCM encryption failed",
            )
        })?;

    Ok(container::pack(salt, nonce, &sealed))
}

/// Decrypt a container with a password
///
/// A GCM tag verification failure is reported as `AuthenticationFailed`.
/// A wrong password and corrupted or tampered-with data are genuinely
/// indistinguishable at this layer, so the error says so rather than
/// claiming certainty about the cause.
pub fn decrypt(password: &[u8], container: &[u8]) -> Result<Vec<u8>> {
    let (salt, nonce, sealed) = container::unpack(container)?;

    let cipher = cipher_for(password, &salt)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), sealed)
        .map_err(|_| {
            ZkboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::AuthenticationFailed,
                "wrong password, or corrupt or tampered-with input",
            )
        })?;

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{HEADER_LEN, TAG_LEN};

    #[test]
    fn test_empty_plaintext() {
        let password = "test";
        let plaintext = b"";

        let ciphertext = encrypt(password.as_bytes(), plaintext).unwrap();
        assert_eq!(ciphertext.len(), HEADER_LEN + TAG_LEN);

        let decrypted = decrypt(password.as_bytes(), &ciphertext).unwrap();
        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_small_plaintext() {
        let password = "test";
        let plaintext = b"hello";

        let ciphertext = encrypt(password.as_bytes(), plaintext).unwrap();
        let decrypted = decrypt(password.as_bytes(), &ciphertext).unwrap();

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_output_length() {
        let plaintext = vec![7u8; 123];
        let ciphertext = encrypt(b"test", &plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + HEADER_LEN + TAG_LEN);
    }

    #[test]
    fn test_encrypt_never_repeats() {
        let password = b"test";
        let plaintext = b"hello world";

        let ct1 = encrypt(password, plaintext).unwrap();
        let ct2 = encrypt(password, plaintext).unwrap();

        // Fresh salt and nonce each call
        assert_ne!(ct1, ct2);

        let pt1 = decrypt(password, &ct1).unwrap();
        let pt2 = decrypt(password, &ct2).unwrap();
        assert_eq!(plaintext, &pt1[..]);
        assert_eq!(plaintext, &pt2[..]);
    }

    #[test]
    fn test_deterministic_encryption() {
        let password = "test";
        let plaintext = b"hello world";
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];

        let ct1 = encrypt_with_params(password.as_bytes(), plaintext, &salt, &nonce).unwrap();
        let ct2 = encrypt_with_params(password.as_bytes(), plaintext, &salt, &nonce).unwrap();

        // Same salt/nonce produces identical ciphertext
        assert_eq!(ct1, ct2);

        let pt1 = decrypt(password.as_bytes(), &ct1).unwrap();
        assert_eq!(plaintext, &pt1[..]);
    }

    #[test]
    fn test_different_nonce_different_ciphertext() {
        let password = "test";
        let plaintext = b"hello world";
        let salt = [1u8; SALT_LEN];
        let nonce1 = [2u8; NONCE_LEN];
        let nonce2 = [3u8; NONCE_LEN];

        let ct1 = encrypt_with_params(password.as_bytes(), plaintext, &salt, &nonce1).unwrap();
        let ct2 = encrypt_with_params(password.as_bytes(), plaintext, &salt, &nonce2).unwrap();

        assert_ne!(ct1, ct2);

        let pt1 = decrypt(password.as_bytes(), &ct1).unwrap();
        let pt2 = decrypt(password.as_bytes(), &ct2).unwrap();
        assert_eq!(plaintext, &pt1[..]);
        assert_eq!(plaintext, &pt2[..]);
    }

    #[test]
    fn test_wrong_password() {
        let plaintext = b"hello world";

        let ciphertext = encrypt(b"correct-password", plaintext).unwrap();
        let decrypted = decrypt(b"correct-password", &ciphertext).unwrap();
        assert_eq!(plaintext, &decrypted[..]);

        let err = decrypt(b"wrong-password", &ciphertext).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        assert!(
            err.to_string()
                .contains("wrong password, or corrupt or tampered-with input")
        );
    }

    #[test]
    fn test_truncated_container() {
        for len in [0, 3, SALT_LEN, HEADER_LEN - 1] {
            let err = decrypt(b"test", &vec![0u8; len]).expect_err("expected malformed error");
            assert_eq!(err.kind, Some(ErrorKind::MalformedContainer));
        }
    }

    #[test]
    fn test_header_only_container() {
        // Exactly 28 bytes unpacks fine but has no tag to verify
        let err = decrypt(b"test", &[0u8; HEADER_LEN]).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let password = b"test";
        let mut ciphertext = encrypt(password, b"hello world").unwrap();

        // Flip one bit in the first ciphertext byte
        ciphertext[HEADER_LEN] ^= 0x01;
        let err = decrypt(password, &ciphertext).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_tampered_tag() {
        let password = b"test";
        let mut ciphertext = encrypt(password, b"hello world").unwrap();

        // Flip one bit in the last tag byte
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x80;
        let err = decrypt(password, &ciphertext).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_tampered_salt() {
        // Corrupting the salt derives a different key; still an auth failure
        let password = b"test";
        let mut ciphertext = encrypt(password, b"hello world").unwrap();

        ciphertext[0] ^= 0x01;
        let err = decrypt(password, &ciphertext).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_all_zero_bytes() {
        let password = b"test";
        let plaintext = vec![0u8; 100];

        let ciphertext = encrypt(password, &plaintext).unwrap();
        let decrypted = decrypt(password, &ciphertext).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_all_byte_values() {
        let password = b"test";
        let plaintext: Vec<u8> = (0..=255).collect();

        let ciphertext = encrypt(password, &plaintext).unwrap();
        let decrypted = decrypt(password, &ciphertext).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_large_plaintext() {
        let password = b"test";
        let plaintext = vec![0x42u8; 128 * 1024]; // 128KB

        let ciphertext = encrypt(password, &plaintext).unwrap();
        let decrypted = decrypt(password, &ciphertext).unwrap();

        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_non_utf8_password() {
        let password: &[u8] = &[0xff, 0xfe, 0x00, 0x01];
        let plaintext = b"secret data";

        let ciphertext = encrypt(password, plaintext).unwrap();
        let decrypted = decrypt(password, &ciphertext).unwrap();

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_known_vector() {
        // Known-answer vector for the full PBKDF2 + AES-256-GCM pipeline,
        // computed with an independent implementation. Also present in
        // testdata/golden-vectors.json.
        let password = b"test";
        let plaintext = b"test payload";

        let salt = [0x42u8; SALT_LEN];
        let nonce = [0x24u8; NONCE_LEN];

        let ciphertext = encrypt_with_params(password, plaintext, &salt, &nonce).unwrap();

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42,
            0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42,
            0x24, 0x24, 0x24, 0x24, 0x24, 0x24, 0x24, 0x24,
            0x24, 0x24, 0x24, 0x24, 0xfe, 0x39, 0xb2, 0xde,
            0xfa, 0x67, 0x2b, 0x38, 0x0e, 0x0e, 0x1e, 0xd1,
            0x01, 0xfb, 0x40, 0x97, 0x9f, 0x72, 0x43, 0xa8,
            0xc7, 0x33, 0xed, 0xf7, 0xfa, 0xb6, 0xdf, 0x5e,
        ];

        assert_eq!(ciphertext, expected);

        let decrypted = decrypt(password, &ciphertext).unwrap();
        assert_eq!(plaintext, &decrypted[..]);
    }
}
