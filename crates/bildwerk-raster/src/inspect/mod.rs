// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header inspection — decode fixed-size BMP and PSA headers into readable
// fields, plus a hex view of the leading bytes. Nothing here decodes pixels.

pub mod bmp;

use bildwerk_core::error::Result;
use bildwerk_core::types::ImageFormat;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::psa::codec::PsaHeader;

pub use bmp::BmpHeaderView;

/// One named header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

/// Ordered list of header fields, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    fields: Vec<HeaderField>,
}

impl HeaderInfo {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(HeaderField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read-only header decoder.
pub struct HeaderInspector;

impl HeaderInspector {
    /// Inspect `bytes` as a file of the given format.
    ///
    /// PNG and JPEG have no fixed header view; they yield a single `Info`
    /// field saying so rather than an error.
    pub fn inspect(bytes: &[u8], format: ImageFormat) -> Result<HeaderInfo> {
        match format {
            ImageFormat::Psa => Self::inspect_psa(bytes),
            ImageFormat::Bmp => Self::inspect_bmp(bytes),
            ImageFormat::Png | ImageFormat::Jpeg => {
                let mut info = HeaderInfo::default();
                info.push("Format", format.label());
                info.push("Info", "header view is only available for BMP and PSA");
                Ok(info)
            }
        }
    }

    /// Decode the 16-byte PSA header. The signature and the pixel payload
    /// are reported as found, not validated.
    #[instrument(skip(bytes), fields(data_len = bytes.len()))]
    pub fn inspect_psa(bytes: &[u8]) -> Result<HeaderInfo> {
        let header = PsaHeader::parse(bytes)?;
        let mut info = HeaderInfo::default();
        info.push("Format", ImageFormat::Psa.label());
        info.push(
            "Signature",
            String::from_utf8_lossy(header.trimmed_signature()),
        );
        info.push("Width", format!("{} pixels", header.width));
        info.push("Height", format!("{} pixels", header.height));
        info.push("Channels", header.channels.to_string());
        debug!(fields = info.len(), "PSA header inspected");
        Ok(info)
    }

    /// Decode the 54-byte BMP file + info header region.
    #[instrument(skip(bytes), fields(data_len = bytes.len()))]
    pub fn inspect_bmp(bytes: &[u8]) -> Result<HeaderInfo> {
        let view = BmpHeaderView::parse(bytes)?;
        let mut info = HeaderInfo::default();
        info.push("Format", ImageFormat::Bmp.label());
        info.push("Signature", String::from_utf8_lossy(&view.signature));
        info.push("File size", format!("{} bytes", view.file_size));
        info.push("Data offset", format!("{} bytes", view.data_offset));
        info.push("Width", format!("{} pixels", view.width));
        info.push("Height", format!("{} pixels", view.height));
        info.push("Bits per pixel", view.bits_per_pixel.to_string());
        info.push("Compression", view.compression.to_string());
        debug!(fields = info.len(), "BMP header inspected");
        Ok(info)
    }
}

/// Space-separated lowercase hex of at most the first `limit` bytes.
pub fn hex_dump(bytes: &[u8], limit: usize) -> String {
    let encoded = hex::encode(&bytes[..bytes.len().min(limit)]);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / 2);
    for (i, digit) in encoded.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }
    out
}
