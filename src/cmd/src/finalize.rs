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

use std::fs;
use std::path::Path;

use clap::Parser;
use columnar_meta::{assemble, Block, FooterWriter, WriterOptions};
use common_telemetry::info;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{
    FinalizeSnafu, ParseManifestSnafu, ReadManifestSnafu, Result, StatDataFileSnafu,
};

/// Blocks of a data file and the catalog facts to record in its footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub num_cols: u32,
    #[serde(default)]
    pub cardinalities: Vec<u32>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Manifest {
    pub fn from_path(path: &str) -> Result<Self> {
        let content = fs::read(path).context(ReadManifestSnafu { path })?;
        serde_json::from_slice(&content).context(ParseManifestSnafu { path })
    }
}

/// Appends the footer described by a manifest to a data file.
#[derive(Debug, Clone, Parser)]
pub struct FinalizeCommand {
    /// Data file holding the blocks.
    #[clap(long)]
    pub file: String,

    /// JSON manifest of the blocks, in write order.
    #[clap(long)]
    pub manifest: String,

    /// Byte position right after the last block. Defaults to the current file length.
    #[clap(long)]
    pub footer_offset: Option<u64>,
}

/// Outcome of a finalize run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReport {
    pub footer_offset: u64,
    pub appended_bytes: u64,
    pub row_count: u64,
}

impl FinalizeCommand {
    pub fn run(&self, options: &WriterOptions) -> Result<FinalizeReport> {
        let manifest = Manifest::from_path(&self.manifest)?;
        let footer_offset = match self.footer_offset {
            Some(offset) => offset,
            None => data_file_len(&self.file)?,
        };

        let footer = assemble(&manifest.blocks, manifest.num_cols, &manifest.cardinalities)
            .context(FinalizeSnafu { path: &self.file })?;
        let appended_bytes = FooterWriter::new(&self.file, options.clone())
            .write_footer(&footer, footer_offset)
            .context(FinalizeSnafu { path: &self.file })?;

        info!(
            "Finalized {} with {} blocks from manifest {}",
            self.file,
            manifest.blocks.len(),
            self.manifest
        );

        Ok(FinalizeReport {
            footer_offset,
            appended_bytes,
            row_count: footer.row_count,
        })
    }
}

fn data_file_len(path: &str) -> Result<u64> {
    Path::new(path)
        .metadata()
        .map(|m| m.len())
        .context(StatDataFileSnafu { path })
}
