//! Access key validation utilities

use thiserror::Error;

/// Alphabet keys are drawn from
pub const KEY_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur during access key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyValidationError {
    #[error("Access key cannot be empty")]
    Empty,

    #[error("Access key length {actual} is outside the allowed range {min}..={max}")]
    LengthOutOfRange { actual: usize, min: usize, max: usize },

    #[error("Access key contains invalid character: '{0}'. Only A-Z and 0-9 are allowed")]
    InvalidCharacter(char),
}

/// Validate an access key
///
/// Rules:
/// - Cannot be empty
/// - Length within `min_length..=max_length`
/// - Only uppercase ASCII letters and digits
pub fn validate_key(
    key: &str,
    min_length: usize,
    max_length: usize,
) -> Result<(), KeyValidationError> {
    if key.is_empty() {
        return Err(KeyValidationError::Empty);
    }

    if let Some(c) = key
        .chars()
        .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit())
    {
        return Err(KeyValidationError::InvalidCharacter(c));
    }

    let len = key.len();

    if len < min_length || len > max_length {
        return Err(KeyValidationError::LengthOutOfRange {
            actual: len,
            min: min_length,
            max: max_length,
        });
    }

    Ok(())
}
