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

pub use tempfile::{NamedTempFile, TempDir};

pub fn create_temp_dir(prefix: &str) -> TempDir {
    tempfile::Builder::new().prefix(prefix).tempdir().unwrap()
}

pub fn create_named_temp_file() -> NamedTempFile {
    NamedTempFile::new().unwrap()
}

/// Creates `name` under `dir` holding `content`, standing in for the data
/// blocks a writer has already flushed.
pub fn create_data_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Reads the whole file at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Vec<u8> {
    fs::read(path).unwrap()
}
