// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — bridge between PixelBuffer and the `image` crate's codecs.

pub mod adapter;

pub use adapter::ImageAdapter;
