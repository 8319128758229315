//! Error types for scilog-types.

use thiserror::Error;

/// Errors that can occur when parsing device-produced text.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// String does not match the on-device filename grammar.
    #[error("'{0}' does not match the cycle filename grammar")]
    FilenameMismatch(String),

    /// Filename matched the grammar but encodes an impossible calendar date.
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Four-digit year from the filename.
        year: i32,
        /// Month component (1-12 expected).
        month: u8,
        /// Day component (1-31 expected).
        day: u8,
    },
}
