// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PSA module — Bildwerk's uncompressed image container.
//
// Layout (all integers little-endian):
//
//   offset 0   4 bytes  signature "PSA" + one 0x20 pad byte
//   offset 4   u32      width
//   offset 8   u32      height
//   offset 12  u32      channels
//   offset 16  width*height*channels bytes, row-major, channel-interleaved

pub mod codec;

pub use codec::{PsaCodec, PsaHeader};
