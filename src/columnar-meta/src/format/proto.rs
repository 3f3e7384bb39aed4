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

//! Protobuf messages of the footer.
//!
//! Tags are part of the on-disk contract: never reuse or renumber one.

use prost::Message;
use serde::{Deserialize, Serialize};

/// Codec nominally used for a chunk's pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum CompressionCodec {
    Snappy = 0,
}

/// Whether a dimension column is stored in global sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SortState {
    /// Stored order differs from sort order, a row-id page restores it.
    Native = 0,
    /// Stored pre-sorted.
    Explicit = 1,
}

/// State of a field that depends on the column catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ResolutionState {
    /// Catalog not wired yet, the accompanying list is empty.
    Unresolved = 0,
    Resolved = 1,
}

/// Byte range of a page inside the data file.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Message)]
pub struct PageLocation {
    #[prost(uint64, tag = "1")]
    pub offset: u64,
    #[prost(uint64, tag = "2")]
    pub length: u64,
}

impl PageLocation {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct CompressionDescriptor {
    #[prost(enumeration = "CompressionCodec", tag = "1")]
    pub codec: i32,
    #[prost(uint64, tag = "2")]
    pub compressed_size: u64,
    #[prost(uint64, tag = "3")]
    pub uncompressed_size: u64,
}

/// Location and properties of one column's pages in one block.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct ChunkDescriptor {
    #[prost(message, optional, tag = "1")]
    pub compression: Option<CompressionDescriptor>,
    /// Pages are column-major when false.
    #[prost(bool, tag = "2")]
    pub row_major: bool,
    #[prost(int32, repeated, tag = "3")]
    pub column_ids: Vec<i32>,
    #[prost(enumeration = "ResolutionState", tag = "4")]
    pub column_ids_state: i32,
    #[prost(message, optional, tag = "5")]
    pub data_page: Option<PageLocation>,
    /// Run-length data index map, dimensions only.
    #[prost(message, optional, tag = "6")]
    pub rle_page: Option<PageLocation>,
    /// Inverted row-id mapping, only for dimensions that are not pre-sorted.
    #[prost(message, optional, tag = "7")]
    pub row_id_page: Option<PageLocation>,
    /// Absent for measures.
    #[prost(enumeration = "SortState", optional, tag = "8")]
    pub sort_state: Option<i32>,
}

/// Pruning information of one block.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct BlockIndexEntry {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub min_values: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub max_values: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "3")]
    pub start_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub end_key: Vec<u8>,
}

/// Index entries in block write order.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct FileIndex {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<BlockIndexEntry>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SegmentDescriptor {
    #[prost(uint32, tag = "1")]
    pub num_cols: u32,
    /// Zero means unknown or not applicable.
    #[prost(uint32, repeated, tag = "2")]
    pub cardinalities: Vec<u32>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct BlockInfo {
    #[prost(uint64, tag = "1")]
    pub row_count: u64,
    #[prost(message, repeated, tag = "2")]
    pub dimension_chunks: Vec<ChunkDescriptor>,
    #[prost(message, repeated, tag = "3")]
    pub measure_chunks: Vec<ChunkDescriptor>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ColumnSchema {
    #[prost(int32, tag = "1")]
    pub column_id: i32,
    #[prost(string, tag = "2")]
    pub column_name: String,
}

/// The footer of a data file.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct FooterRecord {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    /// Sum of [`BlockInfo::row_count`] over `blocks`.
    #[prost(uint64, tag = "2")]
    pub row_count: u64,
    #[prost(message, optional, tag = "3")]
    pub segment: Option<SegmentDescriptor>,
    #[prost(message, optional, tag = "4")]
    pub index: Option<FileIndex>,
    /// Positionally aligned with `index.entries`.
    #[prost(message, repeated, tag = "5")]
    pub blocks: Vec<BlockInfo>,
    #[prost(message, repeated, tag = "6")]
    pub table_columns: Vec<ColumnSchema>,
    #[prost(enumeration = "ResolutionState", tag = "7")]
    pub table_columns_state: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_sort_state_stays_absent() {
        let chunk = ChunkDescriptor {
            data_page: Some(PageLocation::new(10, 20)),
            ..Default::default()
        };
        let decoded = ChunkDescriptor::decode(chunk.encode_to_vec().as_slice()).unwrap();
        assert_eq!(None, decoded.sort_state);
        assert_eq!(None, decoded.row_id_page);
        assert_eq!(ResolutionState::Unresolved, decoded.column_ids_state());
    }

    #[test]
    fn test_native_sort_state_is_kept() {
        // Native is the zero value, presence must survive encoding.
        let chunk = ChunkDescriptor {
            sort_state: Some(SortState::Native as i32),
            ..Default::default()
        };
        let decoded = ChunkDescriptor::decode(chunk.encode_to_vec().as_slice()).unwrap();
        assert_eq!(Some(SortState::Native as i32), decoded.sort_state);
        assert_eq!(SortState::Native, decoded.sort_state());
    }
}
