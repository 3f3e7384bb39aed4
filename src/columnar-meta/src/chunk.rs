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

//! Builds the chunk descriptors of one block.
//!
//! Dimension column `i` reads `dimension_pages[i]`, `sorted_dimensions[i]` and
//! `rle_pages[i]`, but its row-id page is the next unclaimed entry of
//! `row_id_pages`: the slot cursor only advances on columns that are not
//! pre-sorted. Pre-sorted columns carry no row-id page.

use common_telemetry::debug;
use snafu::{ensure, OptionExt};

use crate::compression::default_compression;
use crate::error::{
    Error, InvalidBlockLayoutSnafu, Result, RowIdSlotExhaustedSnafu, UnusedRowIdSlotsSnafu,
};
use crate::format::proto::{ChunkDescriptor, PageLocation, ResolutionState, SortState};
use crate::layout::BlockLayout;

/// Chunk descriptors of one block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockChunks {
    pub dimensions: Vec<ChunkDescriptor>,
    pub measures: Vec<ChunkDescriptor>,
}

/// Cursor handing out row-id pages to unsorted dimension columns in order.
#[derive(Debug)]
pub struct RowIdSlots<'a> {
    pages: &'a [PageLocation],
    claimed: usize,
}

impl<'a> RowIdSlots<'a> {
    pub fn new(pages: &'a [PageLocation]) -> Self {
        Self { pages, claimed: 0 }
    }

    /// Claims the next row-id page for dimension `column`.
    pub fn claim(&mut self, column: usize) -> Result<PageLocation> {
        let page = self
            .pages
            .get(self.claimed)
            .copied()
            .context(RowIdSlotExhaustedSnafu {
                column,
                available: self.pages.len(),
            })?;
        self.claimed += 1;
        Ok(page)
    }

    /// Ensures every row-id page has been claimed.
    pub fn finish(self) -> Result<()> {
        ensure!(
            self.claimed == self.pages.len(),
            UnusedRowIdSlotsSnafu {
                used: self.claimed,
                total: self.pages.len(),
            }
        );
        Ok(())
    }
}

/// Builds the dimension and measure chunk descriptors of `layout`.
pub fn build_chunks(layout: &BlockLayout) -> Result<BlockChunks> {
    let dimensions = build_dimension_chunks(layout)?;
    let measures = layout
        .measure_pages
        .iter()
        .map(|page| column_chunk(*page))
        .collect();

    Ok(BlockChunks {
        dimensions,
        measures,
    })
}

fn build_dimension_chunks(layout: &BlockLayout) -> Result<Vec<ChunkDescriptor>> {
    let num_dimensions = layout.dimension_pages.len();
    ensure!(
        layout.sorted_dimensions.len() == num_dimensions,
        InvalidBlockLayoutSnafu {
            reason: format!(
                "{} dimension pages but {} sortedness flags",
                num_dimensions,
                layout.sorted_dimensions.len()
            ),
        }
    );
    ensure!(
        layout.rle_pages.is_empty() || layout.rle_pages.len() == num_dimensions,
        InvalidBlockLayoutSnafu {
            reason: format!(
                "{} dimension pages but {} rle pages",
                num_dimensions,
                layout.rle_pages.len()
            ),
        }
    );

    let (chunks, slots) = layout
        .dimension_pages
        .iter()
        .zip(&layout.sorted_dimensions)
        .enumerate()
        .try_fold(
            (
                Vec::with_capacity(num_dimensions),
                RowIdSlots::new(&layout.row_id_pages),
            ),
            |(mut chunks, mut slots), (column, (page, &sorted))| {
                let row_id_page = if sorted {
                    None
                } else {
                    Some(slots.claim(column)?)
                };
                let rle_page = layout.rle_pages.get(column).copied().flatten();
                chunks.push(dimension_chunk(*page, sorted, rle_page, row_id_page));
                Ok::<_, Error>((chunks, slots))
            },
        )?;
    slots.finish()?;

    debug!(
        "Built {} dimension chunks, {} with row-id pages",
        chunks.len(),
        layout.row_id_pages.len()
    );

    Ok(chunks)
}

fn dimension_chunk(
    data_page: PageLocation,
    sorted: bool,
    rle_page: Option<PageLocation>,
    row_id_page: Option<PageLocation>,
) -> ChunkDescriptor {
    let sort_state = if sorted {
        SortState::Explicit
    } else {
        SortState::Native
    };

    ChunkDescriptor {
        rle_page,
        row_id_page,
        sort_state: Some(sort_state as i32),
        ..column_chunk(data_page)
    }
}

/// Chunk fields shared by dimensions and measures.
fn column_chunk(data_page: PageLocation) -> ChunkDescriptor {
    ChunkDescriptor {
        compression: Some(default_compression()),
        row_major: false,
        column_ids: Vec::new(),
        column_ids_state: ResolutionState::Unresolved as i32,
        data_page: Some(data_page),
        rle_page: None,
        row_id_page: None,
        sort_state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::proto::CompressionCodec;

    fn page(offset: u64, length: u64) -> PageLocation {
        PageLocation::new(offset, length)
    }

    fn new_layout(sorted: &[bool], row_id_pages: Vec<PageLocation>) -> BlockLayout {
        BlockLayout {
            row_count: 100,
            dimension_pages: (0..sorted.len() as u64)
                .map(|i| page(i * 100, 50))
                .collect(),
            sorted_dimensions: sorted.to_vec(),
            rle_pages: vec![],
            row_id_pages,
            measure_pages: vec![page(10_000, 64)],
        }
    }

    #[test]
    fn test_build_chunks_basic() {
        let layout = new_layout(&[true, false], vec![page(500, 8)]);
        let chunks = build_chunks(&layout).unwrap();

        assert_eq!(2, chunks.dimensions.len());
        assert_eq!(1, chunks.measures.len());

        let sorted = &chunks.dimensions[0];
        assert_eq!(Some(page(0, 50)), sorted.data_page);
        assert_eq!(SortState::Explicit, sorted.sort_state());
        assert_eq!(None, sorted.row_id_page);

        let unsorted = &chunks.dimensions[1];
        assert_eq!(Some(page(100, 50)), unsorted.data_page);
        assert_eq!(SortState::Native, unsorted.sort_state());
        assert_eq!(Some(page(500, 8)), unsorted.row_id_page);

        let measure = &chunks.measures[0];
        assert_eq!(Some(page(10_000, 64)), measure.data_page);
        assert_eq!(None, measure.sort_state);
        assert_eq!(None, measure.row_id_page);
        assert_eq!(None, measure.rle_page);
    }

    #[test]
    fn test_row_id_slots_follow_unsorted_columns() {
        let sorted = [false, true, true, false, true, false];
        let row_id_pages = vec![page(1000, 1), page(2000, 2), page(3000, 3)];
        let layout = new_layout(&sorted, row_id_pages.clone());
        let chunks = build_chunks(&layout).unwrap();

        let assigned = chunks
            .dimensions
            .iter()
            .map(|chunk| chunk.row_id_page)
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                Some(row_id_pages[0]),
                None,
                None,
                Some(row_id_pages[1]),
                None,
                Some(row_id_pages[2]),
            ],
            assigned
        );
        assert_eq!(
            layout.num_unsorted_dimensions(),
            assigned.iter().flatten().count()
        );
    }

    #[test]
    fn test_all_chunks_are_column_major_and_unresolved() {
        let layout = new_layout(&[false, true], vec![page(900, 4)]);
        let chunks = build_chunks(&layout).unwrap();

        for chunk in chunks.dimensions.iter().chain(&chunks.measures) {
            assert!(!chunk.row_major);
            assert!(chunk.column_ids.is_empty());
            assert_eq!(ResolutionState::Unresolved, chunk.column_ids_state());
        }
    }

    #[test]
    fn test_compression_placeholder_ignores_page_length() {
        let mut layout = new_layout(&[true], vec![]);
        layout.dimension_pages[0].length = u32::MAX as u64 * 4;
        layout.measure_pages[0].length = 1 << 40;
        let chunks = build_chunks(&layout).unwrap();

        for chunk in chunks.dimensions.iter().chain(&chunks.measures) {
            let compression = chunk.compression.unwrap();
            assert_eq!(CompressionCodec::Snappy, compression.codec());
            assert_eq!(0, compression.compressed_size);
            assert_eq!(0, compression.uncompressed_size);
        }
    }

    #[test]
    fn test_rle_pages_indexed_by_column() {
        let mut layout = new_layout(&[false, true, false], vec![page(700, 7), page(800, 8)]);
        layout.rle_pages = vec![None, Some(page(600, 6)), Some(page(650, 5))];
        let chunks = build_chunks(&layout).unwrap();

        assert_eq!(None, chunks.dimensions[0].rle_page);
        assert_eq!(Some(page(600, 6)), chunks.dimensions[1].rle_page);
        assert_eq!(Some(page(650, 5)), chunks.dimensions[2].rle_page);
        assert_eq!(Some(page(800, 8)), chunks.dimensions[2].row_id_page);
    }

    #[test]
    fn test_empty_block() {
        let layout = BlockLayout::default();
        let chunks = build_chunks(&layout).unwrap();
        assert_eq!(BlockChunks::default(), chunks);
    }

    #[test]
    fn test_row_id_slot_exhausted() {
        let layout = new_layout(&[false, false], vec![page(500, 8)]);
        let res = build_chunks(&layout);
        assert!(matches!(
            res,
            Err(Error::RowIdSlotExhausted {
                column: 1,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_unused_row_id_slots() {
        let layout = new_layout(&[true, false], vec![page(500, 8), page(508, 8)]);
        let res = build_chunks(&layout);
        assert!(matches!(
            res,
            Err(Error::UnusedRowIdSlots {
                used: 1,
                total: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_mismatched_dimension_arrays() {
        let mut layout = new_layout(&[true, true], vec![]);
        layout.sorted_dimensions.pop();
        assert!(matches!(
            build_chunks(&layout),
            Err(Error::InvalidBlockLayout { .. })
        ));

        let mut layout = new_layout(&[true, true], vec![]);
        layout.rle_pages = vec![None];
        assert!(matches!(
            build_chunks(&layout),
            Err(Error::InvalidBlockLayout { .. })
        ));
    }

    #[test]
    fn test_row_id_slots_cursor() {
        let pages = [page(1, 1), page(2, 2)];
        let mut slots = RowIdSlots::new(&pages);
        assert_eq!(page(1, 1), slots.claim(0).unwrap());
        assert_eq!(page(2, 2), slots.claim(3).unwrap());
        assert!(slots.claim(4).is_err());
        slots.finish().unwrap();
    }
}
