// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-raster — Raster processing for the Bildwerk editor.
//
// Provides the PSA container codec, read-only header inspection (BMP, PSA,
// hex view), an adapter onto the `image` crate for BMP/PNG/JPEG, the pixel
// transforms (salt-and-pepper noise, median filter, Laplacian edges, height
// stretch), and the image report.

pub mod filter;
pub mod inspect;
pub mod psa;
pub mod raster;
pub mod report;

// Re-export the primary structs so callers can use `bildwerk_raster::PsaCodec` etc.
pub use filter::laplacian::{EdgeDetector, apply_laplacian};
pub use filter::median::{MedianFilter, apply_median_filter};
pub use filter::noise::{NoiseInjector, apply_noise};
pub use filter::resample::{HeightResampler, stretch_height};
pub use filter::Transform;
pub use inspect::{HeaderInfo, HeaderInspector, hex_dump};
pub use psa::codec::{PsaCodec, PsaHeader};
pub use raster::adapter::ImageAdapter;
pub use report::ImageReport;
