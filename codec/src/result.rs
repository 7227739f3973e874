//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur while framing chat lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    ///
    /// Contains the error kind and a description of what operation failed.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// An inbound frame grew past the configured maximum length without a terminator.
    LineTooLong {
        /// The configured maximum frame length in bytes
        limit: usize,
    },

    /// An outbound line contained a `\n` or `\r`.
    EmbeddedLineBreak,
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
            CodecError::LineTooLong { limit } => {
                write!(f, "line exceeds maximum length of {} bytes", limit)
            }
            CodecError::EmbeddedLineBreak => {
                write!(f, "outbound line contains an embedded line break")
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err = CodecError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        ));
        assert_eq!(
            err,
            CodecError::IOError {
                kind: std::io::ErrorKind::ConnectionReset,
                operation: "reset by peer".to_string(),
            }
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CodecError::LineTooLong { limit: 16 }.to_string(),
            "line exceeds maximum length of 16 bytes"
        );
        assert_eq!(
            CodecError::EmbeddedLineBreak.to_string(),
            "outbound line contains an embedded line break"
        );
    }
}
