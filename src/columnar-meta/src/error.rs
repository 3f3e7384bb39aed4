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

use std::any::Any;
use std::fmt;

use common_error::ext::{stack_trace, ErrorExt, StackError};
use common_error::status_code::StatusCode;
use snafu::{Location, Snafu};

#[derive(Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to open file {} for appending", path))]
    OpenFile {
        path: String,
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to write footer"))]
    WriteFooter {
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to flush footer to {}", path))]
    FlushFooter {
        path: String,
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to sync file {}", path))]
    SyncFile {
        path: String,
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to encode footer"))]
    EncodeFooter {
        #[snafu(source)]
        error: prost::EncodeError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Footer offset {} does not fit in a signed 64-bit trailer", offset))]
    InvalidFooterOffset {
        offset: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid trailer: {}", reason))]
    InvalidTrailer {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid block layout: {}", reason))]
    InvalidBlockLayout {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "No row-id page left for unsorted dimension column {}, row-id pages: {}",
        column,
        available
    ))]
    RowIdSlotExhausted {
        column: usize,
        available: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Only {} of {} row-id pages are claimed by unsorted columns", used, total))]
    UnusedRowIdSlots {
        used: usize,
        total: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    fn location(&self) -> Location {
        use Error::*;

        match self {
            OpenFile { location, .. }
            | WriteFooter { location, .. }
            | FlushFooter { location, .. }
            | SyncFile { location, .. }
            | EncodeFooter { location, .. }
            | InvalidFooterOffset { location, .. }
            | InvalidTrailer { location, .. }
            | InvalidBlockLayout { location, .. }
            | RowIdSlotExhausted { location, .. }
            | UnusedRowIdSlots { location, .. } => *location,
        }
    }
}

impl StackError for Error {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
        buf.push(format!("{layer}: {self}, at {}", self.location()));
        if let Some(source) = std::error::Error::source(self) {
            buf.push(format!("{}: {source}", layer + 1));
        }
    }

    fn next(&self) -> Option<&dyn StackError> {
        None
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stack_trace(self))
    }
}

impl ErrorExt for Error {
    fn status_code(&self) -> StatusCode {
        use Error::*;

        match self {
            OpenFile { .. } | WriteFooter { .. } | FlushFooter { .. } | SyncFile { .. } => {
                StatusCode::StorageUnavailable
            }
            EncodeFooter { .. } => StatusCode::Unexpected,
            InvalidFooterOffset { .. }
            | InvalidTrailer { .. }
            | InvalidBlockLayout { .. }
            | RowIdSlotExhausted { .. }
            | UnusedRowIdSlots { .. } => StatusCode::InvalidArguments,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
