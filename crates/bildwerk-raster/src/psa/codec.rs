// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PSA codec — whole-buffer encode/decode between PSA bytes and PixelBuffer.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::PixelBuffer;
use tracing::{debug, instrument, warn};

/// Fixed header length in bytes.
pub const HEADER_LEN: usize = 16;

/// Signature without padding.
pub const SIGNATURE: &[u8; 3] = b"PSA";

/// Byte used to pad the signature to four bytes.
pub const SIGNATURE_PAD: u8 = 0x20;

/// The 16-byte header at the start of every PSA file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsaHeader {
    /// Raw signature bytes as found in the file.
    pub signature: [u8; 4],
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl PsaHeader {
    /// Header describing `buffer`, with the standard padded signature.
    pub fn for_buffer(buffer: &PixelBuffer) -> Self {
        let mut signature = [SIGNATURE_PAD; 4];
        signature[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        Self {
            signature,
            width: buffer.width(),
            height: buffer.height(),
            channels: buffer.channels(),
        }
    }

    /// Parse the first 16 bytes of `bytes`. Does not check the signature or
    /// look at anything past the header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header: &[u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| {
                BildwerkError::Format(format!(
                    "PSA header needs {HEADER_LEN} bytes, got {}",
                    bytes.len()
                ))
            })?;

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&header[0..4]);
        Ok(Self {
            signature,
            width: read_u32_le(header, 4),
            height: read_u32_le(header, 8),
            channels: read_u32_le(header, 12),
        })
    }

    /// Signature with trailing whitespace and NUL bytes removed.
    pub fn trimmed_signature(&self) -> &[u8] {
        let end = self
            .signature
            .iter()
            .rposition(|b| !(b.is_ascii_whitespace() || *b == 0))
            .map_or(0, |i| i + 1);
        &self.signature[..end]
    }

    pub fn has_valid_signature(&self) -> bool {
        self.trimmed_signature() == SIGNATURE
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.signature);
        out[4..8].copy_from_slice(&self.width.to_le_bytes());
        out[8..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..16].copy_from_slice(&self.channels.to_le_bytes());
        out
    }
}

fn read_u32_le(header: &[u8; HEADER_LEN], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}

/// Encoder/decoder for the PSA container.
pub struct PsaCodec;

impl PsaCodec {
    /// Decode a complete PSA file.
    ///
    /// Fails with `Format` on a short or mis-signed header and with
    /// `TruncatedData` when the body holds fewer samples than the header
    /// declares. No buffer is built in either case.
    #[instrument(skip(bytes), fields(data_len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
        let header = PsaHeader::parse(bytes)?;
        if !header.has_valid_signature() {
            return Err(BildwerkError::Format(format!(
                "bad PSA signature {:?}",
                String::from_utf8_lossy(&header.signature)
            )));
        }

        let expected = PixelBuffer::sample_count(header.width, header.height, header.channels)
            .map_err(|err| BildwerkError::Format(format!("bad PSA dimensions: {err}")))?;

        let body = &bytes[HEADER_LEN..];
        if body.len() < expected {
            return Err(BildwerkError::TruncatedData {
                expected,
                available: body.len(),
            });
        }
        if body.len() > expected {
            warn!(
                trailing = body.len() - expected,
                "ignoring bytes after PSA pixel data"
            );
        }

        debug!(
            width = header.width,
            height = header.height,
            channels = header.channels,
            "PSA decoded"
        );
        PixelBuffer::new(
            header.width,
            header.height,
            header.channels,
            body[..expected].to_vec(),
        )
    }

    /// Encode `buffer` as header + raw samples. No compression, no checksum.
    #[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height(), channels = buffer.channels()))]
    pub fn encode(buffer: &PixelBuffer) -> Vec<u8> {
        let header = PsaHeader::for_buffer(buffer);
        let mut out = Vec::with_capacity(HEADER_LEN + buffer.samples().len());
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(buffer.samples());
        debug!(bytes = out.len(), "PSA encoded");
        out
    }
}
