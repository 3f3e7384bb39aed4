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
    #[snafu(display("Failed to load layered config"))]
    LoadLayeredConfig {
        #[snafu(source)]
        error: config::ConfigError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to serialize options to json"))]
    SerdeJson {
        #[snafu(source)]
        error: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to serialize options to toml"))]
    TomlFormat {
        #[snafu(source)]
        error: toml::ser::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to read manifest {}", path))]
    ReadManifest {
        path: String,
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to parse manifest {}", path))]
    ParseManifest {
        path: String,
        #[snafu(source)]
        error: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to get length of data file {}", path))]
    StatDataFile {
        path: String,
        #[snafu(source)]
        error: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to finalize data file {}", path))]
    Finalize {
        path: String,
        source: columnar_meta::error::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    fn location(&self) -> Location {
        use Error::*;

        match self {
            LoadLayeredConfig { location, .. }
            | SerdeJson { location, .. }
            | TomlFormat { location, .. }
            | ReadManifest { location, .. }
            | ParseManifest { location, .. }
            | StatDataFile { location, .. }
            | Finalize { location, .. } => *location,
        }
    }
}

impl StackError for Error {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
        buf.push(format!("{layer}: {self}, at {}", self.location()));
        match self {
            Error::Finalize { source, .. } => source.debug_fmt(layer + 1, buf),
            _ => {
                if let Some(source) = std::error::Error::source(self) {
                    buf.push(format!("{}: {source}", layer + 1));
                }
            }
        }
    }

    fn next(&self) -> Option<&dyn StackError> {
        match self {
            Error::Finalize { source, .. } => Some(source),
            _ => None,
        }
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
            LoadLayeredConfig { .. } | ReadManifest { .. } | ParseManifest { .. } => {
                StatusCode::InvalidArguments
            }
            SerdeJson { .. } | TomlFormat { .. } => StatusCode::Unexpected,
            StatDataFile { .. } => StatusCode::StorageUnavailable,
            Finalize { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use snafu::IntoError;

    use super::*;

    #[test]
    fn test_finalize_error_status_code() {
        let source = columnar_meta::error::InvalidBlockLayoutSnafu {
            reason: "2 dimension pages but 1 sortedness flags",
        }
        .build();
        let err = FinalizeSnafu { path: "0.fact" }.into_error(source);

        assert_eq!(StatusCode::InvalidArguments, err.status_code());
        assert!(!err.status_code().should_log_error());
        assert!(err.next().is_some());
    }

    #[test]
    fn test_storage_error_is_logged() {
        let err = StatDataFileSnafu { path: "0.fact" }.into_error(io::Error::other("disk gone"));

        assert_eq!(StatusCode::StorageUnavailable, err.status_code());
        assert!(err.status_code().should_log_error());
    }
}
