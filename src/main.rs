//! Rename fonts to match their filenames
//!
//! Each font's family, style, full, and PostScript names are rewritten from the words of its
//! filename, e.g. `Roboto Mono Bold Italic.ttf` becomes family `Roboto`, style
//! `Mono Bold Italic`. Fonts are modified in place.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fontname::rename::{self, RenameOptions};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ttf or otf font files to rename.
    #[arg(required = true)]
    fonts: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );
    let args = Args::parse();

    match rename::rename_fonts(&args.fonts, &RenameOptions::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            for failure in &err.failures {
                eprintln!("error: {}", failure);
            }
            ExitCode::FAILURE
        }
    }
}
