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

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use common_telemetry::info;
use prost::Message;
use snafu::ResultExt;

use crate::config::WriterOptions;
use crate::error::{
    EncodeFooterSnafu, FlushFooterSnafu, OpenFileSnafu, Result, SyncFileSnafu, WriteFooterSnafu,
};
use crate::format::encode_trailer;
use crate::format::proto::FooterRecord;

/// Appends the footer and trailer to a data file.
///
/// The caller must be the only writer of the file and must pass the exact
/// position right after the last flushed block as `footer_start_offset`.
#[derive(Debug, Clone)]
pub struct FooterWriter {
    path: PathBuf,
    options: WriterOptions,
}

impl FooterWriter {
    pub fn new(path: impl Into<PathBuf>, options: WriterOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `footer` followed by the trailer, returning the number of bytes appended.
    ///
    /// The file handle is released on every path. On failure the file may end
    /// with a partial footer and must be treated as incomplete.
    pub fn write_footer(&self, footer: &FooterRecord, footer_start_offset: u64) -> Result<u64> {
        let path = self.path.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(OpenFileSnafu { path: &path })?;

        let mut writer = BufWriter::with_capacity(self.options.write_buffer_size, file);
        let written = write_footer_to(&mut writer, footer, footer_start_offset)?;
        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .context(FlushFooterSnafu { path: &path })?;

        if self.options.sync_on_finish {
            file.sync_data().context(SyncFileSnafu { path: &path })?;
        }

        info!(
            "Footer written to {}, footer offset: {}, appended bytes: {}, blocks: {}, rows: {}",
            path,
            footer_start_offset,
            written,
            footer.blocks.len(),
            footer.row_count
        );

        Ok(written)
    }
}

/// Writes `footer` and the trailer to `writer`, returning the number of bytes written.
///
/// Nothing is written if `footer_start_offset` cannot be encoded in the trailer.
pub fn write_footer_to<W: Write>(
    writer: &mut W,
    footer: &FooterRecord,
    footer_start_offset: u64,
) -> Result<u64> {
    let trailer = encode_trailer(footer_start_offset)?;

    let mut payload = Vec::with_capacity(footer.encoded_len());
    footer.encode(&mut payload).context(EncodeFooterSnafu)?;

    writer.write_all(&payload).context(WriteFooterSnafu)?;
    writer.write_all(&trailer).context(WriteFooterSnafu)?;
    writer.flush().context(WriteFooterSnafu)?;

    Ok((payload.len() + trailer.len()) as u64)
}
