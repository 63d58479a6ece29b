// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk: the in-memory raster and the file formats
// the editor knows about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Channel counts a `PixelBuffer` may carry: gray, RGB, RGBA.
pub const SUPPORTED_CHANNELS: [u32; 3] = [1, 3, 4];

/// In-memory raster with 8-bit samples.
///
/// Samples are stored row-major and channel-interleaved, so for a 3-channel
/// buffer the pixel at `(x, y)` occupies
/// `samples[(y * width + x) * 3 .. (y * width + x) * 3 + 3]`.
///
/// The length of `samples` always equals `width * height * channels`; every
/// constructor checks it and no method can break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap an existing sample vector, validating dimensions and length.
    pub fn new(width: u32, height: u32, channels: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = Self::sample_count(width, height, channels)?;
        if samples.len() != expected {
            return Err(BildwerkError::InvalidArgument(format!(
                "sample length {} does not match {width}x{height}x{channels} = {expected}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Create a buffer where every sample has the same value.
    pub fn filled(width: u32, height: u32, channels: u32, value: u8) -> Result<Self> {
        let len = Self::sample_count(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            samples: vec![value; len],
        })
    }

    /// Create a buffer by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn(
        width: u32,
        height: u32,
        channels: u32,
        mut f: impl FnMut(u32, u32, u32) -> u8,
    ) -> Result<Self> {
        let len = Self::sample_count(width, height, channels)?;
        let mut samples = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    samples.push(f(x, y, c));
                }
            }
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Number of samples a buffer of the given shape holds.
    ///
    /// Fails with `InvalidArgument` for zero dimensions, unsupported channel
    /// counts, or a shape whose size does not fit in memory.
    pub fn sample_count(width: u32, height: u32, channels: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(BildwerkError::InvalidArgument(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if !SUPPORTED_CHANNELS.contains(&channels) {
            return Err(BildwerkError::InvalidArgument(format!(
                "unsupported channel count {channels} (expected 1, 3 or 4)"
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| {
                BildwerkError::InvalidArgument(format!(
                    "image {width}x{height}x{channels} is too large"
                ))
            })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Borrow the raw interleaved samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Mutable access to the samples. The slice length is fixed, so the
    /// length invariant cannot be broken through it.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Consume the buffer and return the sample vector.
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// `width * height`.
    pub fn total_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples of the pixel at `(x, y)`. Panics when out of bounds, like
    /// slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.pixel_offset(x, y);
        &self.samples[start..start + self.channels as usize]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let start = self.pixel_offset(x, y);
        let channels = self.channels as usize;
        &mut self.samples[start..start + channels]
    }

    /// Integer mean of each channel over the whole image (truncating).
    pub fn mean_per_channel(&self) -> Vec<u8> {
        let channels = self.channels as usize;
        let mut sums = vec![0u64; channels];
        for pixel in self.samples.chunks_exact(channels) {
            for (sum, &value) in sums.iter_mut().zip(pixel) {
                *sum += value as u64;
            }
        }
        let total = self.total_pixels() as u64;
        sums.into_iter().map(|sum| (sum / total) as u8).collect()
    }

    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }
}

/// File formats the editor can open, save, or inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Bildwerk's own uncompressed container.
    Psa,
    Bmp,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Infer the format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "psa" => Some(Self::Psa),
            "bmp" => Some(Self::Bmp),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| BildwerkError::UnsupportedFormat(path.display().to_string()))
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Psa => "psa",
            Self::Bmp => "bmp",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Upper-case label used in reports and header views.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Psa => "PSA",
            Self::Bmp => "BMP",
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }

    /// Size of the fixed header, for formats that have one we can inspect.
    pub fn header_size(&self) -> Option<usize> {
        match self {
            Self::Psa => Some(16),
            Self::Bmp => Some(54),
            Self::Png | Self::Jpeg => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
