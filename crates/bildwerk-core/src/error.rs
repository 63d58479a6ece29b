// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Container / header errors --
    #[error("malformed image header: {0}")]
    Format(String),

    #[error("pixel data truncated: expected {expected} bytes, only {available} available")]
    TruncatedData { expected: usize, available: usize },

    // -- Codec errors --
    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    // -- Transform parameters --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Session --
    #[error("no image loaded")]
    NoImage,

    #[error("source file path is unknown")]
    NoPath,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
