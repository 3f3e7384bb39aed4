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

use std::process::Command;

use columnar_meta::format::proto::FooterRecord;
use columnar_meta::format::{decode_trailer, TRAILER_SIZE};
use common_test_util::temp_dir::{create_data_file, create_temp_dir, read_file};
use prost::Message;

const MANIFEST: &str = r#"{
    "num_cols": 3,
    "cardinalities": [4, 9, 0],
    "blocks": [
        {
            "layout": {
                "row_count": 100,
                "dimension_pages": [{"offset": 0, "length": 8}, {"offset": 8, "length": 8}],
                "sorted_dimensions": [true, false],
                "row_id_pages": [{"offset": 16, "length": 4}],
                "measure_pages": [{"offset": 20, "length": 12}]
            },
            "stats": {
                "column_min_max": [[1], [2], [3]],
                "start_key": [0, 1],
                "end_key": [0, 9]
            }
        }
    ]
}"#;

#[test]
fn test_finalize_data_file() {
    let dir = create_temp_dir("test_finalize_data_file");
    let data = create_data_file(&dir, "0.fact", &[5; 32]);
    let manifest = create_data_file(&dir, "manifest.json", MANIFEST.as_bytes());

    let output = Command::new(env!("CARGO_BIN_EXE_footer-tool"))
        .env("FOOTER_TOOL__LOGGING__APPEND_STDOUT", "false")
        .env("FOOTER_TOOL__WRITER__SYNC_ON_FINISH", "false")
        .args([
            "finalize",
            "--file",
            data.to_str().unwrap(),
            "--manifest",
            manifest.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("footer_offset=32"), "{stdout}");
    assert!(stdout.contains("rows=100"), "{stdout}");

    let content = read_file(&data);
    let trailer_start = content.len() - TRAILER_SIZE as usize;
    let offset = decode_trailer(&content[trailer_start..]).unwrap();
    assert_eq!(32, offset);

    let footer = FooterRecord::decode(&content[offset as usize..trailer_start]).unwrap();
    assert_eq!(100, footer.row_count);
    assert_eq!(vec![4, 9, 0], footer.segment.unwrap().cardinalities);
    assert_eq!(1, footer.blocks.len());
    assert!(footer.blocks[0].dimension_chunks[1].row_id_page.is_some());
}

#[test]
fn test_finalize_missing_manifest() {
    let dir = create_temp_dir("test_finalize_missing_manifest");
    let data = create_data_file(&dir, "0.fact", &[5; 32]);

    let output = Command::new(env!("CARGO_BIN_EXE_footer-tool"))
        .env("FOOTER_TOOL__LOGGING__APPEND_STDOUT", "false")
        .args([
            "finalize",
            "--file",
            data.to_str().unwrap(),
            "--manifest",
            dir.path().join("missing.json").to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(32, read_file(&data).len());
}

#[test]
fn test_print_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_footer-tool"))
        .env("FOOTER_TOOL__LOGGING__APPEND_STDOUT", "false")
        .env("FOOTER_TOOL__WRITER__WRITE_BUFFER_SIZE", "1024")
        .arg("print-config")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("write_buffer_size = 1024"), "{stdout}");
}
