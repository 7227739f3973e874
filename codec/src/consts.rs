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

//! Protocol tokens and framing constants

/// Default TCP port of the chat server
pub const DEFAULT_PORT: u16 = 59001;

/// Frame terminator
pub const LF: u8 = b'\n';

/// Carriage return, stripped when it precedes [`LF`]
pub const CR: u8 = b'\r';

/// Server asks the client for a screen name
pub const SUBMITNAME: &str = "SUBMITNAME";

/// Server accepted the submitted screen name
pub const NAMEACCEPTED: &str = "NAMEACCEPTED";

/// Server notice
pub const SYSTEM: &str = "SYSTEM";

/// Broadcast chat message
pub const MESSAGE: &str = "MESSAGE";

/// Byte offset of the accepted name in a `NAMEACCEPTED` frame (token plus one space)
pub const NAMEACCEPTED_OFFSET: usize = 13;

/// Byte offset of the text in a `SYSTEM` frame
pub const SYSTEM_OFFSET: usize = 7;

/// Byte offset of the text in a `MESSAGE` frame
pub const MESSAGE_OFFSET: usize = 8;
