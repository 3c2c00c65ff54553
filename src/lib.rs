//! zkbox - Password-based file encryption using AES-256-GCM and PBKDF2
//!
//! Files are encrypted with a key derived from a user-supplied password.
//! Nobody without the password can recover the plaintext - not the party
//! storing the encrypted bytes, not any intermediary.

#![forbid(unsafe_code)]

pub mod armor;
pub mod container;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod passcrypt;
pub mod password;
