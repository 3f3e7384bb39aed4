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

//! Per-block facts reported by the data-page producer.

use serde::{Deserialize, Serialize};

pub use crate::format::proto::PageLocation;

/// Physical layout of one written block.
///
/// Offsets are absolute positions in the data file. Dimension vectors are
/// indexed by column, except `row_id_pages`, which holds one page per
/// dimension column that is not pre-sorted, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockLayout {
    pub row_count: u64,
    pub dimension_pages: Vec<PageLocation>,
    pub sorted_dimensions: Vec<bool>,
    /// Either empty or one optional page per dimension column.
    #[serde(default)]
    pub rle_pages: Vec<Option<PageLocation>>,
    #[serde(default)]
    pub row_id_pages: Vec<PageLocation>,
    #[serde(default)]
    pub measure_pages: Vec<PageLocation>,
}

impl BlockLayout {
    /// Number of dimension columns that are not pre-sorted.
    pub fn num_unsorted_dimensions(&self) -> usize {
        self.sorted_dimensions.iter().filter(|sorted| !**sorted).count()
    }
}

/// Boundary statistics of one written block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockBoundaryStats {
    /// One encoded value per column.
    pub column_min_max: Vec<Vec<u8>>,
    pub start_key: Vec<u8>,
    pub end_key: Vec<u8>,
}

/// A written block as handed over for footer assembly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub layout: BlockLayout,
    pub stats: BlockBoundaryStats,
}
