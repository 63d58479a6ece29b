// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Laplacian edge contours — grayscale, 3x3 Laplacian convolution, global
// normalisation, and an inverted binary threshold (edges black on white).

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::PixelBuffer;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::Kernel;
use tracing::{debug, info, instrument};

use super::Transform;

/// Laplacian kernel applied to the intensity image, row-major 3x3.
pub const KERNEL: [f64; 9] = [
    1.0, -2.0, 1.0,
    -2.0, 4.0, -2.0,
    1.0, -2.0, 1.0,
];

/// Rec.601 luma weights for R, G, B.
const LUMA: [f64; 3] = [0.299, 0.587, 0.114];

/// Output for samples at or below the threshold.
const BACKGROUND: u8 = 255;
/// Output for samples above the threshold (edges).
const EDGE: u8 = 0;

/// Edge contour transform with a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDetector {
    threshold: u8,
}

impl EdgeDetector {
    /// `threshold` must lie within `0..=255`.
    pub fn new(threshold: i32) -> Result<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
        })
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl Transform for EdgeDetector {
    fn name(&self) -> &'static str {
        "laplacian"
    }

    fn apply(&mut self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        apply_laplacian(buffer, self.threshold as i32)
    }
}

/// Produce a black-on-white contour image.
///
/// The normalised edge strength (see [`edge_strength`]) is thresholded with
/// inverted polarity: values strictly above `threshold` become 0, all others
/// 255. Multi-channel input gets the same value in every channel (alpha
/// included), so the output keeps the input's shape.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height(), channels = buffer.channels()))]
pub fn apply_laplacian(buffer: &PixelBuffer, threshold: i32) -> Result<PixelBuffer> {
    let threshold = validate_threshold(threshold)?;
    info!(threshold, "Applying Laplacian contour");

    let channels = buffer.channels() as usize;
    let strength = edge_strength(buffer);

    let mut out = Vec::with_capacity(strength.len() * channels);
    for value in strength {
        let binary = if value > threshold { EDGE } else { BACKGROUND };
        out.extend(std::iter::repeat_n(binary, channels));
    }

    debug!("Laplacian contour complete");
    PixelBuffer::new(buffer.width(), buffer.height(), buffer.channels(), out)
}

/// Absolute Laplacian response of the intensity image, scaled so the
/// strongest response in the whole image maps to 255.
///
/// A flat image has no response anywhere and yields all zeros.
pub fn edge_strength(buffer: &PixelBuffer) -> Vec<u8> {
    let gray = to_intensity(buffer);
    let response = convolve_abs(&gray, buffer.width(), buffer.height());

    let max = response.iter().copied().fold(0.0f64, f64::max);
    if max == 0.0 {
        debug!("Flat image, no Laplacian response");
        return vec![0; response.len()];
    }
    response
        .into_iter()
        .map(|v| (255.0 * v / max).round() as u8)
        .collect()
}

/// Single-channel intensity. Gray input is returned as-is; colour input is
/// converted with Rec.601 weights (alpha ignored).
pub fn to_intensity(buffer: &PixelBuffer) -> Vec<u8> {
    let channels = buffer.channels() as usize;
    if channels == 1 {
        return buffer.samples().to_vec();
    }
    buffer
        .samples()
        .chunks_exact(channels)
        .map(|px| {
            let luma = LUMA[0] * px[0] as f64 + LUMA[1] * px[1] as f64 + LUMA[2] * px[2] as f64;
            luma.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// `|KERNEL * gray|` with border replication.
fn convolve_abs(gray: &[u8], width: u32, height: u32) -> Vec<f64> {
    let image = GrayImage::from_fn(width, height, |x, y| {
        Luma([gray[(y as usize * width as usize) + x as usize]])
    });
    let response: ImageBuffer<Luma<f64>, Vec<f64>> =
        Kernel::new(&KERNEL[..], 3, 3).filter(&image, |out, acc: f64| *out = acc.abs());
    response.into_raw()
}

fn validate_threshold(threshold: i32) -> Result<u8> {
    u8::try_from(threshold).map_err(|_| {
        BildwerkError::InvalidArgument(format!(
            "threshold must be within 0..=255, got {threshold}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 black image with one gray dot in the middle.
    fn dot() -> PixelBuffer {
        let mut buf = PixelBuffer::filled(5, 5, 1, 0).unwrap();
        buf.pixel_mut(2, 2)[0] = 100;
        buf
    }

    #[test]
    fn flat_image_is_white() {
        let buf = PixelBuffer::filled(3, 3, 1, 100).unwrap();
        let out = apply_laplacian(&buf, 10).unwrap();
        assert!(out.samples().iter().all(|&v| v == 255));
    }

    #[test]
    fn flat_image_has_zero_strength() {
        let buf = PixelBuffer::filled(6, 4, 3, 77).unwrap();
        assert!(edge_strength(&buf).iter().all(|&v| v == 0));
        for threshold in [0, 128, 255] {
            let out = apply_laplacian(&buf, threshold).unwrap();
            assert!(out.samples().iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn dot_response_is_normalised_globally() {
        let strength = edge_strength(&dot());
        // centre 4*100, orthogonal neighbours 2*100, diagonals 1*100
        assert_eq!(strength[2 * 5 + 2], 255);
        assert_eq!(strength[2 * 5 + 1], 128);
        assert_eq!(strength[5 + 2], 128);
        assert_eq!(strength[5 + 1], 64);
        assert_eq!(strength[0], 0);
    }

    #[test]
    fn corner_dot_uses_replicated_border() {
        let mut buf = PixelBuffer::filled(3, 3, 1, 0).unwrap();
        buf.pixel_mut(0, 0)[0] = 100;
        #[rustfmt::skip]
        let expected = vec![
            255, 255, 0,
            255, 255, 0,
            0, 0, 0,
        ];
        assert_eq!(edge_strength(&buf), expected);
    }

    #[test]
    fn threshold_polarity_is_inverted() {
        let out = apply_laplacian(&dot(), 100).unwrap();
        assert_eq!(out.pixel(2, 2), &[0]);
        assert_eq!(out.pixel(1, 2), &[0]);
        assert_eq!(out.pixel(1, 1), &[255]);
        assert_eq!(out.pixel(0, 0), &[255]);

        // 64 <= 64 stays white: only strictly greater values become edges.
        let out = apply_laplacian(&dot(), 64).unwrap();
        assert_eq!(out.pixel(1, 1), &[255]);
        let out = apply_laplacian(&dot(), 63).unwrap();
        assert_eq!(out.pixel(1, 1), &[0]);
    }

    #[test]
    fn colour_input_is_broadcast() {
        let mut buf = PixelBuffer::filled(5, 5, 4, 0).unwrap();
        buf.pixel_mut(2, 2).copy_from_slice(&[200, 100, 50, 255]);
        let out = apply_laplacian(&buf, 100).unwrap();
        assert_eq!(out.channels(), 4);
        assert_eq!(out.pixel(2, 2), &[0, 0, 0, 0]);
        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
        for px in out.samples().chunks_exact(4) {
            assert!(px.iter().all(|&v| v == px[0]));
        }
    }

    #[test]
    fn luma_weights() {
        let buf = PixelBuffer::new(3, 1, 3, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        assert_eq!(to_intensity(&buf), vec![76, 150, 29]);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let buf = PixelBuffer::filled(3, 3, 1, 0).unwrap();
        for bad in [-1, 256] {
            let err = apply_laplacian(&buf, bad).unwrap_err();
            assert!(matches!(err, BildwerkError::InvalidArgument(_)));
        }
        assert!(EdgeDetector::new(300).is_err());
    }
}
