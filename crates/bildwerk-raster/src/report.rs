// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image report — summary of the current image for the report view.

use bildwerk_core::types::{ImageFormat, PixelBuffer};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::inspect::{HeaderInfo, HeaderInspector};

/// Name shown in the "program" row of every report.
pub const PROGRAM_NAME: &str = "Bildwerk";

/// Author shown when the file carries no authorship metadata.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Everything the report view shows about an image.
///
/// Camera and GPS rows come from EXIF, which is read by a separate metadata
/// collaborator and is not part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    pub program: String,
    pub author: String,
    pub file_type: String,
    pub width: u32,
    pub height: u32,
    /// `"W × H"`.
    pub size: String,
    /// Integer mean of each channel, in buffer channel order.
    pub average_color: Vec<u8>,
    pub color_depth_bits: u32,
    pub header_size: Option<usize>,
    /// Decoded header fields, for BMP and PSA sources only.
    pub header: Option<HeaderInfo>,
}

impl ImageReport {
    /// Build a report for `buffer`, which was loaded from a file of `format`.
    ///
    /// `file_bytes` are the bytes of that file, used for the header section.
    /// A header that fails to parse is left out of the report rather than
    /// failing it.
    #[instrument(skip(buffer, file_bytes), fields(width = buffer.width(), height = buffer.height()))]
    pub fn build(buffer: &PixelBuffer, format: ImageFormat, file_bytes: Option<&[u8]>) -> Self {
        let header = match (format, file_bytes) {
            (ImageFormat::Bmp | ImageFormat::Psa, Some(bytes)) => {
                match HeaderInspector::inspect(bytes, format) {
                    Ok(info) => Some(info),
                    Err(err) => {
                        warn!(error = %err, "header could not be inspected for report");
                        None
                    }
                }
            }
            _ => None,
        };

        Self {
            program: PROGRAM_NAME.into(),
            author: UNKNOWN_AUTHOR.into(),
            file_type: format.label().into(),
            width: buffer.width(),
            height: buffer.height(),
            size: format!("{} × {}", buffer.width(), buffer.height()),
            average_color: buffer.mean_per_channel(),
            color_depth_bits: buffer.channels() * 8,
            header_size: format.header_size(),
            header,
        }
    }

    /// Rows for a two-column table view.
    pub fn rows(&self) -> Vec<(String, String)> {
        let average = self
            .average_color
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut rows = vec![
            ("Author".to_string(), self.author.clone()),
            ("Program".to_string(), self.program.clone()),
            ("File type".to_string(), self.file_type.clone()),
            (
                "Header size".to_string(),
                self.header_size
                    .map_or_else(|| "N/A".to_string(), |n| format!("{n} bytes ({})", self.file_type)),
            ),
            ("Image size".to_string(), format!("{} pixels", self.size)),
            ("Width".to_string(), format!("{} pixels", self.width)),
            ("Height".to_string(), format!("{} pixels", self.height)),
            ("Average color".to_string(), format!("({average})")),
            ("Color depth".to_string(), format!("{}-bit", self.color_depth_bits)),
        ];
        if let Some(header) = &self.header {
            rows.extend(
                header
                    .iter()
                    .map(|field| (format!("Header: {}", field.name), field.value.clone())),
            );
        }
        rows
    }
}
