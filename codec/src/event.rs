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

use crate::consts;

///
/// `InboundEvent` is the typed form of one server frame.
///
/// Frames are classified by fixed prefix in the order `SUBMITNAME`, `NAMEACCEPTED`,
/// `SYSTEM`, `MESSAGE`; the first match wins. Because matching is by prefix, a chat
/// text that itself starts with one of these tokens is classified by the token.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Server wants a (new) screen name
    SubmitNameRequest,
    /// Server accepted the screen name
    NameAccepted {
        /// The name as echoed back by the server
        display_name: String,
    },
    /// Server notice
    SystemNotice {
        /// Notice text
        text: String,
    },
    /// Broadcast chat message
    ChatMessage {
        /// Message text
        text: String,
    },
    /// Any frame that matched no known prefix, or was too short for its payload offset
    Unrecognized {
        /// The complete frame
        raw: String,
    },
}

impl InboundEvent {
    /// Classify a single frame (without its terminator).
    ///
    /// A frame that carries a known prefix but is too short to reach its payload
    /// offset, or whose offset falls inside a multi-byte character, is reported as
    /// [`InboundEvent::Unrecognized`].
    pub fn classify(line: &str) -> InboundEvent {
        if line.starts_with(consts::SUBMITNAME) {
            InboundEvent::SubmitNameRequest
        } else if line.starts_with(consts::NAMEACCEPTED) {
            match payload(line, consts::NAMEACCEPTED_OFFSET) {
                Some(name) => InboundEvent::NameAccepted {
                    display_name: name.to_string(),
                },
                None => InboundEvent::unrecognized(line),
            }
        } else if line.starts_with(consts::SYSTEM) {
            match payload(line, consts::SYSTEM_OFFSET) {
                Some(text) => InboundEvent::SystemNotice {
                    text: text.to_string(),
                },
                None => InboundEvent::unrecognized(line),
            }
        } else if line.starts_with(consts::MESSAGE) {
            match payload(line, consts::MESSAGE_OFFSET) {
                Some(text) => InboundEvent::ChatMessage {
                    text: text.to_string(),
                },
                None => InboundEvent::unrecognized(line),
            }
        } else {
            InboundEvent::unrecognized(line)
        }
    }

    /// Returns `true` for frames the session never sees.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, InboundEvent::Unrecognized { .. })
    }

    fn unrecognized(line: &str) -> InboundEvent {
        InboundEvent::Unrecognized {
            raw: line.to_string(),
        }
    }
}

fn payload(line: &str, offset: usize) -> Option<&str> {
    line.get(offset..)
}
