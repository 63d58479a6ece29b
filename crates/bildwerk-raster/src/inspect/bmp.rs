// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// BMP header view — fixed-offset fields from the 14-byte file header and the
// start of the 40-byte BITMAPINFOHEADER. Diagnostic only; never written back.

use bildwerk_core::error::{BildwerkError, Result};

/// Length of the BMP file header plus BITMAPINFOHEADER.
pub const BMP_HEADER_LEN: usize = 54;

/// Projection of the fields the header viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeaderView {
    /// Usually `b"BM"`; not validated.
    pub signature: [u8; 2],
    pub file_size: u32,
    pub data_offset: u32,
    pub width: i32,
    /// Negative for top-down row order. Kept as-is.
    pub height: i32,
    pub bits_per_pixel: u16,
    pub compression: u32,
}

impl BmpHeaderView {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < BMP_HEADER_LEN {
            return Err(BildwerkError::Format(format!(
                "BMP header needs {BMP_HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            signature: [bytes[0], bytes[1]],
            file_size: u32::from_le_bytes(field(bytes, 2)),
            data_offset: u32::from_le_bytes(field(bytes, 10)),
            width: i32::from_le_bytes(field(bytes, 18)),
            height: i32::from_le_bytes(field(bytes, 22)),
            bits_per_pixel: u16::from_le_bytes([bytes[28], bytes[29]]),
            compression: u32::from_le_bytes(field(bytes, 30)),
        })
    }
}

// Caller guarantees `bytes.len() >= BMP_HEADER_LEN`.
fn field(bytes: &[u8], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}
