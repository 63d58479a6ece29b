// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Height stretch — vertical bicubic resampling by an integer factor.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::PixelBuffer;
use tracing::{debug, info, instrument};

use super::{Transform, clamp_index};

/// Allowed stretch factors.
pub const FACTOR_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// Free parameter of the bicubic convolution kernel.
const CUBIC_A: f64 = -0.75;

/// Vertical stretch transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightResampler {
    factor: u32,
}

impl HeightResampler {
    /// `factor` must lie within `1..=10`.
    pub fn new(factor: i32) -> Result<Self> {
        Ok(Self {
            factor: validate_factor(factor)?,
        })
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }
}

impl Transform for HeightResampler {
    fn name(&self) -> &'static str {
        "stretch"
    }

    fn apply(&mut self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        stretch_height(buffer, self.factor as i32)
    }
}

/// Stretch `buffer` vertically to `height * factor` rows, keeping the width.
///
/// Each output row is a bicubic blend of four source rows around
/// `(dst + 0.5) / factor - 0.5`, with rows beyond the image replicated from
/// the edge. Output rows that land exactly on a source row (always the case
/// for factor 1) copy it unchanged.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn stretch_height(buffer: &PixelBuffer, factor: i32) -> Result<PixelBuffer> {
    let factor = validate_factor(factor)?;
    let new_height = buffer.height().checked_mul(factor).ok_or_else(|| {
        BildwerkError::InvalidArgument(format!(
            "stretched height {} x {factor} overflows",
            buffer.height()
        ))
    })?;
    info!(factor, new_height, "Stretching image height");

    let src_h = buffer.height() as usize;
    let stride = buffer.row_stride();
    let src = buffer.samples();
    let scale = 1.0 / factor as f64;

    let mut out = Vec::with_capacity(stride * new_height as usize);
    let mut row = vec![0u8; stride];
    for dy in 0..new_height as usize {
        let fy = (dy as f64 + 0.5) * scale - 0.5;
        let base = fy.floor();
        let weights = cubic_weights(fy - base);
        let base = base as i64;
        let taps: [usize; 4] = std::array::from_fn(|i| clamp_index(base - 1 + i as i64, src_h));

        for (i, value) in row.iter_mut().enumerate() {
            let acc: f64 = taps
                .iter()
                .zip(weights)
                .map(|(&sy, w)| w * src[sy * stride + i] as f64)
                .sum();
            *value = acc.round().clamp(0.0, 255.0) as u8;
        }
        out.extend_from_slice(&row);
    }

    let stretched = PixelBuffer::new(buffer.width(), new_height, buffer.channels(), out)?;
    if stretched.height() != new_height {
        return Err(BildwerkError::InvalidArgument(format!(
            "stretch produced {} rows instead of {new_height}",
            stretched.height()
        )));
    }
    debug!("Height stretch complete");
    Ok(stretched)
}

/// Kernel weights for the taps at offsets -1, 0, +1, +2 from the base row,
/// given the fractional position `t` in `[0, 1)`.
fn cubic_weights(t: f64) -> [f64; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let u = 1.0 - t;
    let w2 = ((a + 2.0) * u - (a + 3.0)) * u * u + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

fn validate_factor(factor: i32) -> Result<u32> {
    if !FACTOR_RANGE.contains(&factor) {
        return Err(BildwerkError::InvalidArgument(format!(
            "stretch factor must be within 1..=10, got {factor}"
        )));
    }
    Ok(factor as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32, channels: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, channels, |x, y, c| (y * 40 + x * 3 + c) as u8).unwrap()
    }

    #[test]
    fn factor_one_is_identity() {
        let buf = ramp(5, 6, 3);
        assert_eq!(stretch_height(&buf, 1).unwrap(), buf);
    }

    #[test]
    fn height_is_multiplied_and_width_kept() {
        let buf = ramp(4, 3, 1);
        for factor in [2, 3, 10] {
            let out = stretch_height(&buf, factor).unwrap();
            assert_eq!(out.width(), 4);
            assert_eq!(out.height(), 3 * factor as u32);
            assert_eq!(out.channels(), 1);
        }
    }

    #[test]
    fn constant_image_stays_constant() {
        let buf = PixelBuffer::filled(3, 4, 4, 173).unwrap();
        let out = stretch_height(&buf, 3).unwrap();
        assert!(out.samples().iter().all(|&v| v == 173));
    }

    #[test]
    fn single_row_is_repeated() {
        let buf = PixelBuffer::new(3, 1, 1, vec![10, 128, 250]).unwrap();
        let out = stretch_height(&buf, 4).unwrap();
        for y in 0..4 {
            assert_eq!(out.pixel(0, y), &[10]);
            assert_eq!(out.pixel(2, y), &[250]);
        }
    }

    #[test]
    fn ramp_stays_monotonic_inside() {
        // Column values 0, 40, 80, 120, 160: interior rows must be ordered.
        let buf = ramp(1, 5, 1);
        let out = stretch_height(&buf, 2).unwrap();
        let col: Vec<u8> = out.samples().to_vec();
        for pair in col[1..col.len() - 1].windows(2) {
            assert!(pair[0] <= pair[1], "{col:?}");
        }
    }

    #[test]
    fn factor_out_of_range_is_rejected() {
        let buf = ramp(2, 2, 1);
        for bad in [-1, 0, 11] {
            let err = stretch_height(&buf, bad).unwrap_err();
            assert!(matches!(err, BildwerkError::InvalidArgument(_)));
        }
        assert!(HeightResampler::new(0).is_err());
    }

    #[test]
    fn weights_sum_to_one() {
        for t in [0.0, 0.25, 0.5, 0.75] {
            let sum: f64 = cubic_weights(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(cubic_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }
}
