// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Median filter — per-channel windowed median with border replication.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::PixelBuffer;
use image::DynamicImage;
use imageproc::filter::median_filter;
use tracing::{debug, info, instrument};

use super::Transform;
use crate::raster::adapter::ImageAdapter;

/// Window edge length used when none is configured.
pub const DEFAULT_WINDOW: u32 = 5;

/// Median smoothing over a square `window x window` neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianFilter {
    window: u32,
}

impl MedianFilter {
    /// `window` must be odd and at least 3.
    pub fn new(window: u32) -> Result<Self> {
        validate_window(window)?;
        Ok(Self { window })
    }

    pub fn window(&self) -> u32 {
        self.window
    }
}

impl Default for MedianFilter {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl Transform for MedianFilter {
    fn name(&self) -> &'static str {
        "median"
    }

    fn apply(&mut self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        apply_median_filter(buffer, self.window)
    }
}

/// Replace every sample with the median of its `window x window`
/// neighbourhood in the same channel. Neighbours outside the image are taken
/// from the nearest edge pixel.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height(), channels = buffer.channels()))]
pub fn apply_median_filter(buffer: &PixelBuffer, window: u32) -> Result<PixelBuffer> {
    validate_window(window)?;
    info!(window, "Applying median filter");

    let radius = window / 2;
    let samples = match ImageAdapter::to_dynamic(buffer)? {
        DynamicImage::ImageLuma8(img) => median_filter(&img, radius, radius).into_raw(),
        DynamicImage::ImageRgb8(img) => median_filter(&img, radius, radius).into_raw(),
        DynamicImage::ImageRgba8(img) => median_filter(&img, radius, radius).into_raw(),
        other => {
            return Err(BildwerkError::InvalidArgument(format!(
                "median filter does not support {:?} pixels",
                other.color()
            )));
        }
    };

    debug!("Median filter complete");
    PixelBuffer::new(buffer.width(), buffer.height(), buffer.channels(), samples)
}

fn validate_window(window: u32) -> Result<()> {
    if window < 3 || window % 2 == 0 {
        return Err(BildwerkError::InvalidArgument(format!(
            "median window must be odd and >= 3, got {window}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::clamp_index;

    /// Straightforward sort-based median with clamped neighbours.
    fn reference_median(buffer: &PixelBuffer, window: u32) -> PixelBuffer {
        let r = (window / 2) as i64;
        let (w, h) = (buffer.width() as usize, buffer.height() as usize);
        PixelBuffer::from_fn(buffer.width(), buffer.height(), buffer.channels(), |x, y, c| {
            let mut values = Vec::new();
            for dy in -r..=r {
                for dx in -r..=r {
                    let sx = clamp_index(x as i64 + dx, w) as u32;
                    let sy = clamp_index(y as i64 + dy, h) as u32;
                    values.push(buffer.pixel(sx, sy)[c as usize]);
                }
            }
            values.sort_unstable();
            values[values.len() / 2]
        })
        .unwrap()
    }

    fn scrambled(width: u32, height: u32, channels: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, channels, |x, y, c| {
            ((x * 73 + y * 151 + c * 37).wrapping_mul(2_654_435_761) >> 24) as u8
        })
        .unwrap()
    }

    #[test]
    fn constant_image_is_unchanged() {
        let buf = PixelBuffer::filled(9, 7, 3, 42).unwrap();
        assert_eq!(apply_median_filter(&buf, 5).unwrap(), buf);
    }

    #[test]
    fn invalid_windows_are_rejected() {
        let buf = PixelBuffer::filled(4, 4, 1, 0).unwrap();
        for bad in [0, 1, 2, 4, 6] {
            let err = apply_median_filter(&buf, bad).unwrap_err();
            assert!(matches!(err, BildwerkError::InvalidArgument(_)), "window = {bad}");
        }
        assert!(MedianFilter::new(8).is_err());
    }

    #[test]
    fn isolated_salt_pixel_is_removed() {
        let mut buf = PixelBuffer::filled(5, 5, 1, 100).unwrap();
        buf.pixel_mut(2, 2)[0] = 255;
        let out = apply_median_filter(&buf, 3).unwrap();
        assert!(out.samples().iter().all(|&v| v == 100));
    }

    #[test]
    fn matches_sorting_reference_with_border_replication() {
        for (window, channels) in [(3, 1), (5, 3), (5, 4), (7, 1)] {
            let buf = scrambled(7, 5, channels);
            assert_eq!(
                apply_median_filter(&buf, window).unwrap(),
                reference_median(&buf, window),
                "window = {window}, channels = {channels}"
            );
        }
    }

    #[test]
    fn every_channel_layout_matches_reference() {
        for channels in [1, 3, 4] {
            let buf = scrambled(13, 9, channels);
            let out = apply_median_filter(&buf, 5).unwrap();
            assert_eq!(out.channels(), channels);
            assert_eq!(out, reference_median(&buf, 5), "channels = {channels}");
        }
    }

    #[test]
    fn window_larger_than_image() {
        let buf = scrambled(2, 2, 1);
        assert_eq!(
            apply_median_filter(&buf, 9).unwrap(),
            reference_median(&buf, 9)
        );
    }

    #[test]
    fn default_window_is_five() {
        let mut filter = MedianFilter::default();
        assert_eq!(filter.window(), 5);
        let buf = scrambled(6, 6, 3);
        assert_eq!(filter.apply(&buf).unwrap(), reference_median(&buf, 5));
    }
}
