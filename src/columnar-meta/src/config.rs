// Copyright 2023 Greptime Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};

/// Default capacity of the buffer in front of the file handle.
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// Options of [`FooterWriter`](crate::writer::FooterWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Capacity of the write buffer in bytes.
    pub write_buffer_size: usize,
    /// Whether to `fdatasync` the file after the trailer is written.
    pub sync_on_finish: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            sync_on_finish: true,
        }
    }
}
