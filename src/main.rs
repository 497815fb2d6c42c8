//! # binpak
//!
//! A command-line tool for inspecting and rescaling PAK binary dataset files.
//!
//! ## Usage
//!
//! ```bash
//! # Smooth every Y row with a Gaussian filter
//! binpak rescale sin_wave.pak52 smoothed.pak52 --transform gaussian --sigma 2 --channels y
//!
//! # Show the groups and datasets of a file
//! binpak info sin_wave.pak52
//! ```

use clap::Parser;

mod cli;

fn main() {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());

    if let Err(err) = cli::dispatch(cli) {
        eprintln!("[ERROR] {:#}", err);
        std::process::exit(1);
    }
}
