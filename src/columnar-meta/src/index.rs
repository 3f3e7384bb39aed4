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

use crate::format::proto::{BlockIndexEntry, FileIndex};
use crate::layout::BlockBoundaryStats;

/// Builds the file index, one entry per block in the given order.
pub fn build_index<'a, I>(stats: I) -> FileIndex
where
    I: IntoIterator<Item = &'a BlockBoundaryStats>,
{
    FileIndex {
        entries: stats.into_iter().map(index_entry).collect(),
    }
}

fn index_entry(stats: &BlockBoundaryStats) -> BlockIndexEntry {
    // Min and max are not tracked apart yet, both take the block's value.
    BlockIndexEntry {
        min_values: stats.column_min_max.clone(),
        max_values: stats.column_min_max.clone(),
        start_key: stats.start_key.clone(),
        end_key: stats.end_key.clone(),
    }
}
