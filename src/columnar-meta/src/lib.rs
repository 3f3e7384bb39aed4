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

//! Footer assembly and persistence for columnar data files.
//!
//! Once every block of a file has been flushed, [`assemble`] turns the blocks'
//! layouts and boundary statistics into a [`FooterRecord`], and
//! [`FooterWriter`] appends it to the file followed by a fixed-width trailer
//! that points back at the footer. See [`format`] for the on-disk layout.

pub mod assembler;
pub mod chunk;
pub mod compression;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod layout;
pub mod writer;


pub use assembler::assemble;
pub use config::WriterOptions;
pub use format::proto::FooterRecord;
pub use layout::{Block, BlockBoundaryStats, BlockLayout, PageLocation};
pub use writer::FooterWriter;
