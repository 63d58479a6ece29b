// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface of the `bildwerk` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bildwerk", version, about = "Raster editor for BMP, PNG, JPEG and PSA images")]
pub struct Cli {
    /// JSON editor config; defaults are used when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// For editing commands a missing `output` writes `edited_<name>` next to
/// the input.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show decoded header fields and a hex dump of the file head.
    Inspect { file: PathBuf },

    /// Summarise an image.
    Report {
        file: PathBuf,
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Re-encode an image; formats follow the file extensions.
    Convert { input: PathBuf, output: PathBuf },

    /// Add salt-and-pepper noise.
    Noise {
        input: PathBuf,
        output: Option<PathBuf>,
        /// Share of pixels set to white, and again to black (0-100).
        #[arg(long)]
        percent: f64,
        /// Fixed RNG seed, overriding the config.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Square median filter.
    Median {
        input: PathBuf,
        output: Option<PathBuf>,
        /// Odd window size; the config value when omitted.
        #[arg(long)]
        window: Option<u32>,
    },

    /// Laplacian edge map, thresholded and inverted.
    Laplacian {
        input: PathBuf,
        output: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        threshold: i32,
    },

    /// Stretch the height by an integer factor (1-10).
    Stretch {
        input: PathBuf,
        output: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        factor: i32,
    },
}
