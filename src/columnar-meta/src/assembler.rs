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

use common_telemetry::{debug, warn};

use crate::chunk::{build_chunks, BlockChunks};
use crate::error::Result;
use crate::format::proto::{BlockInfo, FooterRecord, ResolutionState, SegmentDescriptor};
use crate::format::FORMAT_VERSION;
use crate::index::build_index;
use crate::layout::{Block, BlockLayout};

/// Assembles the footer of a file from its blocks, in write order.
///
/// `num_cols` and `cardinalities` are recorded as given. A length mismatch
/// between them is logged, not rejected, so readers see exactly what the
/// catalog reported.
pub fn assemble(blocks: &[Block], num_cols: u32, cardinalities: &[u32]) -> Result<FooterRecord> {
    if cardinalities.len() != num_cols as usize {
        warn!(
            "Column count {} differs from the number of cardinalities {}",
            num_cols,
            cardinalities.len()
        );
    }

    let index = build_index(blocks.iter().map(|block| &block.stats));
    let block_infos = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let info = block_info(&block.layout)?;
            debug!(
                "Assembled block {}, rows: {}, dimension chunks: {}, measure chunks: {}",
                i,
                info.row_count,
                info.dimension_chunks.len(),
                info.measure_chunks.len()
            );
            Ok(info)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FooterRecord {
        version: FORMAT_VERSION,
        row_count: total_row_count(blocks),
        segment: Some(SegmentDescriptor {
            num_cols,
            cardinalities: cardinalities.to_vec(),
        }),
        index: Some(index),
        blocks: block_infos,
        table_columns: Vec::new(),
        table_columns_state: ResolutionState::Unresolved as i32,
    })
}

fn total_row_count(blocks: &[Block]) -> u64 {
    blocks.iter().map(|block| block.layout.row_count).sum()
}

fn block_info(layout: &BlockLayout) -> Result<BlockInfo> {
    let BlockChunks {
        dimensions,
        measures,
    } = build_chunks(layout)?;

    Ok(BlockInfo {
        row_count: layout.row_count,
        dimension_chunks: dimensions,
        measure_chunks: measures,
    })
}
