// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Salt-and-pepper noise. The random source is injected so tests (and users
// with a configured seed) get reproducible output.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::PixelBuffer;
use rand::Rng;
use tracing::{debug, info, instrument};

use super::Transform;

const SALT: u8 = 255;
const PEPPER: u8 = 0;

/// Noise transform carrying its own generator.
pub struct NoiseInjector<R> {
    percent: f64,
    rng: R,
}

impl<R: Rng> NoiseInjector<R> {
    /// `percent` must lie within `[0, 100]`.
    pub fn new(percent: f64, rng: R) -> Result<Self> {
        validate_percent(percent)?;
        Ok(Self { percent, rng })
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl<R: Rng> Transform for NoiseInjector<R> {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn apply(&mut self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        apply_noise(buffer, self.percent, &mut self.rng)
    }
}

/// Add salt-and-pepper noise to a copy of `buffer`.
///
/// `count = floor(percent / 100 * width * height)` coordinates are drawn with
/// replacement and set to 255 on every channel, then a second, independent
/// batch of `count` coordinates is set to 0. Where the batches overlap the
/// pepper pass wins.
///
/// Coordinates are drawn from `0 .. dim - 1`, so the last row and column are
/// never hit (unless the dimension is 1, where row/column 0 is used).
#[instrument(skip(buffer, rng), fields(width = buffer.width(), height = buffer.height()))]
pub fn apply_noise<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    percent: f64,
    rng: &mut R,
) -> Result<PixelBuffer> {
    validate_percent(percent)?;
    let count = (percent * buffer.total_pixels() as f64 / 100.0).floor() as usize;
    info!(percent, count, "Applying salt-and-pepper noise");

    let mut out = buffer.clone();
    scatter(&mut out, count, SALT, rng);
    scatter(&mut out, count, PEPPER, rng);

    debug!("Noise complete");
    Ok(out)
}

fn validate_percent(percent: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(BildwerkError::InvalidArgument(format!(
            "noise percent must be within 0..=100, got {percent}"
        )));
    }
    Ok(())
}

fn scatter<R: Rng + ?Sized>(buffer: &mut PixelBuffer, count: usize, value: u8, rng: &mut R) {
    let rows = sample_bound(buffer.height());
    let cols = sample_bound(buffer.width());
    for _ in 0..count {
        let y = rng.random_range(0..rows);
        let x = rng.random_range(0..cols);
        buffer.pixel_mut(x, y).fill(value);
    }
}

/// Exclusive upper bound for a random coordinate along a dimension.
fn sample_bound(dim: u32) -> u32 {
    dim.saturating_sub(1).max(1)
}
