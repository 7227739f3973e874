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

use crate::{CodecError, CodecResult};
use std::fmt;

/// A single outbound line, guaranteed free of `\n` and `\r`.
///
/// The terminator is added by the encoder, never stored here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutboundLine(String);

impl OutboundLine {
    /// Validate `text` as an outbound line.
    pub fn new(text: impl Into<String>) -> CodecResult<Self> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(CodecError::EmbeddedLineBreak);
        }
        Ok(Self(text))
    }

    /// Build a line from the text before the first line break, dropping the rest.
    ///
    /// Returns the line and whether anything was dropped.
    pub fn truncated(text: &str) -> (Self, bool) {
        match text.find(['\n', '\r']) {
            Some(idx) => (Self(text[..idx].to_string()), true),
            None => (Self(text.to_string()), false),
        }
    }

    /// The line text, without terminator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the line, returning its text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for OutboundLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutboundLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OutboundLine {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OutboundLine::new(value)
    }
}

impl TryFrom<&str> for OutboundLine {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        OutboundLine::new(value)
    }
}
