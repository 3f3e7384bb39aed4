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

//! # Footer format of columnar data files
//!
//! ## File structure
//!
//! `block₀ block₁ ... blockₙ footer trailer`
//!
//! - `blockᵢ`: column pages of one block, written by the data-page producer before the footer.
//! - `footer`: Protobuf-encoded [`FooterRecord`] describing every block.
//! - `trailer`: the byte offset at which `footer` starts, as a big-endian `i64` ([`TRAILER_SIZE`] bytes).
//!
//! A reader seeks to `file_len - TRAILER_SIZE`, decodes the offset, then decodes a
//! [`FooterRecord`] from `offset..file_len - TRAILER_SIZE`.
//!
//! ## Footer
//!
//! The footer holds the row total, the segment descriptor (column count and cardinalities),
//! the [`FileIndex`] with one entry per block and one [`BlockInfo`] per block listing
//! where each dimension and measure page lives. Readers branch on [`FooterRecord::version`].
//!
//! [`FooterRecord`]: proto::FooterRecord
//! [`FooterRecord::version`]: proto::FooterRecord::version
//! [`FileIndex`]: proto::FileIndex
//! [`BlockInfo`]: proto::BlockInfo

pub mod proto;

use snafu::{ensure, OptionExt};

use crate::error::{InvalidFooterOffsetSnafu, InvalidTrailerSnafu, Result};

/// Version of the footer layout written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Size in bytes of the trailer holding the footer start offset.
pub const TRAILER_SIZE: u64 = 8;

/// Encodes `footer_start_offset` as the fixed-width trailer.
pub fn encode_trailer(footer_start_offset: u64) -> Result<[u8; TRAILER_SIZE as usize]> {
    let offset = i64::try_from(footer_start_offset)
        .ok()
        .context(InvalidFooterOffsetSnafu {
            offset: footer_start_offset,
        })?;
    Ok(offset.to_be_bytes())
}

/// Decodes the footer start offset from the trailer bytes.
pub fn decode_trailer(bytes: &[u8]) -> Result<u64> {
    let bytes: [u8; TRAILER_SIZE as usize] =
        bytes.try_into().ok().context(InvalidTrailerSnafu {
            reason: format!("expect {} bytes, actual {}", TRAILER_SIZE, bytes.len()),
        })?;
    let offset = i64::from_be_bytes(bytes);
    ensure!(
        offset >= 0,
        InvalidTrailerSnafu {
            reason: format!("negative footer offset {offset}"),
        }
    );
    Ok(offset as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_trailer_is_big_endian() {
        let trailer = encode_trailer(0x0102).unwrap();
        assert_eq!([0, 0, 0, 0, 0, 0, 0x01, 0x02], trailer);
        assert_eq!(0x0102, decode_trailer(&trailer).unwrap());
    }

    #[test]
    fn test_trailer_offset_too_large() {
        let res = encode_trailer(i64::MAX as u64 + 1);
        assert!(matches!(res, Err(Error::InvalidFooterOffset { .. })));

        let trailer = encode_trailer(i64::MAX as u64).unwrap();
        assert_eq!(i64::MAX as u64, decode_trailer(&trailer).unwrap());
    }

    #[test]
    fn test_decode_malformed_trailer() {
        let res = decode_trailer(&[0; 4]);
        assert!(matches!(res, Err(Error::InvalidTrailer { .. })));

        let res = decode_trailer(&(-1i64).to_be_bytes());
        assert!(matches!(res, Err(Error::InvalidTrailer { .. })));
    }
}
