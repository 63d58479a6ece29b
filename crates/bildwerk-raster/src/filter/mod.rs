// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter module — pixel-buffer transforms: salt-and-pepper noise, median
// smoothing, Laplacian edge contours, and height stretch.

pub mod laplacian;
pub mod median;
pub mod noise;
pub mod resample;

use bildwerk_core::error::Result;
use bildwerk_core::types::PixelBuffer;

/// A transform over a whole PixelBuffer.
///
/// Implementations validate their parameters when constructed and never
/// modify the input: they return a freshly allocated buffer, so a failed
/// transform leaves the caller's image exactly as it was.
pub trait Transform {
    /// Short name for logs and status messages.
    fn name(&self) -> &'static str;

    /// Produce the transformed image. `&mut self` lets stateful transforms
    /// (the noise generator) advance their state.
    fn apply(&mut self, buffer: &PixelBuffer) -> Result<PixelBuffer>;
}

/// Clamp a signed coordinate into `0..len` (border replication).
#[inline]
pub(crate) fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}
