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

use crate::format::proto::{CompressionCodec, CompressionDescriptor};

/// Codec recorded for every chunk.
pub const DEFAULT_CODEC: CompressionCodec = CompressionCodec::Snappy;

/// Returns the compression descriptor attached to every chunk.
///
/// Sizes stay zero until the encoding stage reports them.
pub fn default_compression() -> CompressionDescriptor {
    CompressionDescriptor {
        codec: DEFAULT_CODEC as i32,
        compressed_size: 0,
        uncompressed_size: 0,
    }
}
