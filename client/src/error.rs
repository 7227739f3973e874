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

//! Client error types

use chatter_codec::CodecError;
use std::io;
use thiserror::Error;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial TCP connect failed
    #[error("Failed to connect to {address}: {source}")]
    Connection {
        /// The `host:port` that was dialed
        address: String,
        /// Underlying socket error
        #[source]
        source: io::Error,
    },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Framing error from the codec layer
    #[error("Codec error: {0}")]
    Codec(CodecError),

    /// The connection has already been closed
    #[error("Connection closed")]
    ConnectionClosed,
}

impl ClientError {
    /// Check if the error concerns the transport rather than a rejected line
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ClientError::Connection { .. } | ClientError::Io(_) | ClientError::ConnectionClosed
        )
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::IOError { kind, operation } => Self::Io(io::Error::new(kind, operation)),
            other => Self::Codec(other),
        }
    }
}
