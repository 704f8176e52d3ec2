//! Error types for HTTP/3 frame decoding.
//!
//! The decoder reports every structural failure through a single [`Error`]
//! value: a coarse [`ErrorCode`] plus a free-text detail. Callers tell
//! failures apart by the detail message; the code only selects how the
//! stream or connection gets closed.

use std::fmt;
use thiserror::Error;

/// Result type for frame decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Decoder-level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// No error has occurred.
    #[default]
    NoError,

    /// A declared frame length exceeds the ceiling for its frame type.
    ///
    /// Maps to HTTP/3 `H3_EXCESSIVE_LOAD` (0x0107).
    HttpFrameTooLarge,

    /// A frame payload is malformed: truncated or trailing varints,
    /// sub-fields overrunning the declared length, and the like.
    ///
    /// Maps to HTTP/3 `H3_FRAME_ERROR` (0x0106).
    HttpFrameError,
}

impl ErrorCode {
    /// Human-readable name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "HTTP_NO_ERROR",
            ErrorCode::HttpFrameTooLarge => "HTTP_FRAME_TOO_LARGE",
            ErrorCode::HttpFrameError => "HTTP_FRAME_ERROR",
        }
    }

    /// HTTP/3 application error code to close the stream or connection with.
    pub fn h3_code(&self) -> u64 {
        match self {
            ErrorCode::NoError => 0x0100,
            ErrorCode::HttpFrameError => 0x0106,
            ErrorCode::HttpFrameTooLarge => 0x0107,
        }
    }

    pub fn is_error(&self) -> bool {
        *self != ErrorCode::NoError
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural decoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {detail}")]
pub struct Error {
    code: ErrorCode,
    detail: String,
}

impl Error {
    /// Creates an error with the given code and detail message.
    pub fn protocol(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// Shorthand for an [`ErrorCode::HttpFrameError`].
    pub fn frame(detail: impl Into<String>) -> Self {
        Self::protocol(ErrorCode::HttpFrameError, detail)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::NoError.h3_code(), 0x0100);
        assert_eq!(ErrorCode::HttpFrameError.h3_code(), 0x0106);
        assert_eq!(ErrorCode::HttpFrameTooLarge.h3_code(), 0x0107);
        assert!(!ErrorCode::default().is_error());
        assert!(ErrorCode::HttpFrameError.is_error());
    }

    #[test]
    fn test_display() {
        let err = Error::frame("Unable to read GOAWAY ID.");
        assert_eq!(err.code(), ErrorCode::HttpFrameError);
        assert_eq!(err.detail(), "Unable to read GOAWAY ID.");
        assert_eq!(err.to_string(), "HTTP_FRAME_ERROR: Unable to read GOAWAY ID.");
    }
}
