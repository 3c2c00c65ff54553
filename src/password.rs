//! Password collection workflow
//!
//! Encryption asks for a password plus a confirmation; decryption asks for
//! a single entry. Prompting is abstracted behind a trait so the workflow
//! can be driven by a terminal, a script, or a test without change.
//!
//! Cancelled input is modeled as `None`, distinct from an error: for
//! decryption it is a legitimate outcome and the caller decides whether to
//! abort the attempt.

use crate::error::{ErrorCategory, ErrorKind, Result, ZkboxError};
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Minimum password length in characters.
///
/// Deliberately permissive; no complexity rules are enforced beyond this.
/// That is a usability tradeoff, not a security claim.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Trait for asking the human one question at a time
pub trait PasswordPrompt {
    /// Present `message` and return the entered text without echo.
    ///
    /// Returns `Ok(None)` when the user cancels the entry (EOF, ^D). The
    /// returned text is wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn prompt(&mut self, message: &str) -> Result<Option<Zeroizing<String>>>;
}

/// Prompts on the controlling terminal with no echo
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordPrompt for TerminalPrompt {
    /// Prompt on stderr, read from stdin without echo.
    ///
    /// Note: Terminal input is limited to UTF-8 due to rpassword library
    /// constraints. For non-UTF-8 passwords, use --password-stdin instead.
    fn prompt(&mut self, message: &str) -> Result<Option<Zeroizing<String>>> {
        if !io::stdin().is_terminal() {
            return Err(ZkboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::PasswordUnavailable,
                "cannot read password from terminal - stdin is not a terminal",
            ));
        }

        io::stderr()
            .write_all(format!("{} ", message).as_bytes())
            .map_err(|e| {
                ZkboxError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to write prompt: {}", e),
                    e,
                )
            })?;
        io::stderr().flush().map_err(|e| {
            ZkboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to flush prompt: {}", e),
                e,
            )
        })?;

        // Read password *without echo*
        match rpassword::read_password() {
            Ok(password) => Ok(Some(Zeroizing::new(password))),
            // ^D before any input means the user cancelled, not a failure
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(ZkboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PasswordUnavailable,
                format!("failure reading password: {}", e),
                e,
            )),
        }
    }
}

/// Replays a fixed sequence of responses (for testing and scripting)
///
/// Each call to `prompt` consumes the next queued response. A `None`
/// entry simulates a cancelled prompt. Running out of responses is an
/// error rather than a hang.
pub struct ScriptedPrompt {
    responses: VecDeque<Option<Zeroizing<String>>>,
}

impl ScriptedPrompt {
    pub fn new(responses: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|r| r.map(Zeroizing::new))
                .collect(),
        }
    }
}

impl PasswordPrompt for ScriptedPrompt {
    fn prompt(&mut self, _message: &str) -> Result<Option<Zeroizing<String>>> {
        self.responses.pop_front().ok_or_else(|| {
            ZkboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::PasswordUnavailable,
                "no scripted response left for prompt",
            )
        })
    }
}

/// Read a password as arbitrary bytes from any io::Read source
///
/// Used for non-interactive password entry (stdin piping). Unlike the
/// terminal prompt this accepts non-UTF-8 passwords. No confirmation
/// round is possible here, but the minimum length is still enforced by
/// callers that encrypt.
pub fn read_password_from(reader: &mut dyn Read) -> Result<Zeroizing<Vec<u8>>> {
    let mut data = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut data).map_err(|e| {
        ZkboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("error reading password: {}", e),
            e,
        )
    })?;
    Ok(data)
}

/// Check the minimum-length rule shared by all encryption-side entry paths.
pub fn validate_password_length(password: &[u8]) -> Result<()> {
    // Measured in characters when valid UTF-8, bytes otherwise
    let length = match std::str::from_utf8(password) {
        Ok(text) => text.chars().count(),
        Err(_) => password.len(),
    };
    if length < MIN_PASSWORD_LEN {
        return Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PasswordTooShort,
            format!(
                "password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ),
        ));
    }
    Ok(())
}

/// Collect a password for encryption: entry plus confirmation
///
/// Validates the minimum length and that password and confirmation match
/// byte-for-byte (case-sensitive). Either check failing aborts with a
/// distinct error; re-prompting is the caller's decision. A cancelled
/// first entry is an error here - unlike decryption, there is nothing
/// sensible to do with a half-collected encryption password.
pub fn collect_for_encryption(
    prompt: &mut dyn PasswordPrompt,
    file_label: &str,
) -> Result<Zeroizing<String>> {
    let message = format!(
        "Enter a password to encrypt \"{}\". Files cannot be recovered if the password is lost.",
        file_label
    );
    let password = prompt.prompt(&message)?.ok_or_else(|| {
        ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PasswordUnavailable,
            "password entry cancelled",
        )
    })?;

    validate_password_length(password.as_bytes())?;

    let confirmation = prompt.prompt("Confirm password:")?;
    match confirmation {
        Some(confirmation) if confirmation.as_bytes() == password.as_bytes() => Ok(password),
        _ => Err(ZkboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PasswordMismatch,
            "passwords do not match",
        )),
    }
}

/// Collect a password for decryption: single entry, no confirmation
///
/// Returns `Ok(None)` when the entry is cancelled or empty; that is a
/// legitimate outcome, and the caller decides whether to abort the
/// decryption attempt.
pub fn collect_for_decryption(
    prompt: &mut dyn PasswordPrompt,
    file_label: &str,
) -> Result<Option<Zeroizing<String>>> {
    let message = format!("Enter password to decrypt \"{}\":", file_label);
    match prompt.prompt(&message)? {
        Some(password) if !password.is_empty() => Ok(Some(password)),
        _ => Ok(None),
    }
}
