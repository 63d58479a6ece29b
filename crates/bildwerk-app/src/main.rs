// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — command-line raster editor
//
// Entry point. Initialises logging, loads the editor config, and runs one
// subcommand against an edit session.

mod cli;
mod session;

use std::path::Path;
use std::process::ExitCode;

use bildwerk_core::error::Result;
use bildwerk_core::human_errors::humanize_error;
use bildwerk_core::EditorConfig;
use bildwerk_raster::{EdgeDetector, HeightResampler, MedianFilter, NoiseInjector, Transform};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cli::{Cli, Command};
use session::EditSession;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Bildwerk starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{}", humanize_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => {
            let config = EditorConfig::load(path)?;
            tracing::info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(EditorConfig::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut session = EditSession::new(config);

    match cli.command {
        Command::Inspect { file } => {
            // The header view does not need decodable pixel data.
            if let Err(e) = session.open(&file) {
                tracing::warn!(error = %e, "image not decoded, showing header only");
            }
            let (header, dump) = match session.image() {
                Some(image) => {
                    println!(
                        "{} x {}, {} channel(s)",
                        image.width(),
                        image.height(),
                        image.channels()
                    );
                    (session.header_info()?, session.hex_dump()?)
                }
                None => (session.header_info_of(&file)?, session.hex_dump_of(&file)?),
            };
            for field in header.iter() {
                println!("{:<16} {}", field.name, field.value);
            }
            println!();
            println!("{dump}");
        }
        Command::Report { file, json } => {
            session.open(&file)?;
            let report = session.report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (name, value) in report.rows() {
                    println!("{name:<24} {value}");
                }
            }
        }
        Command::Convert { input, output } => {
            session.open(&input)?;
            session.save_as(&output)?;
            if let Some(path) = session.path() {
                println!("{}", path.display());
            }
        }
        Command::Noise {
            input,
            output,
            percent,
            seed,
        } => {
            let rng = match seed.or(session.config().noise_seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            edit(&mut session, &input, output.as_deref(), &mut NoiseInjector::new(percent, rng)?)?;
        }
        Command::Median {
            input,
            output,
            window,
        } => {
            let window = window.unwrap_or(session.config().median_window);
            edit(&mut session, &input, output.as_deref(), &mut MedianFilter::new(window)?)?;
        }
        Command::Laplacian {
            input,
            output,
            threshold,
        } => {
            edit(&mut session, &input, output.as_deref(), &mut EdgeDetector::new(threshold)?)?;
        }
        Command::Stretch {
            input,
            output,
            factor,
        } => {
            edit(&mut session, &input, output.as_deref(), &mut HeightResampler::new(factor)?)?;
        }
    }
    Ok(())
}

/// Open `input`, run `transform`, and write the result to `output` or to the
/// session's edited copy.
fn edit(
    session: &mut EditSession,
    input: &Path,
    output: Option<&Path>,
    transform: &mut dyn Transform,
) -> Result<()> {
    session.open(input)?;
    session.apply(transform)?;
    let written = match output {
        Some(path) => {
            session.save_as(path)?;
            path.to_path_buf()
        }
        None => session.save()?,
    };
    println!("{}", written.display());
    Ok(())
}
