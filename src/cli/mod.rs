use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use binpak::session::ChannelSelection;

mod config;
mod info;
mod rescale;

pub use config::Config;

/// binpak - PAK binary dataset rescaler
#[derive(Parser)]
#[command(name = "binpak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Built-in transform selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransformArg {
    /// Copy values unchanged
    Identity,
    /// Gaussian smoothing (reflecting boundaries)
    Gaussian,
    /// First difference, one value shorter
    Diff,
    /// Keep values at or below a threshold
    Threshold,
    /// Replace values with a shortened index ramp
    Ramp,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a PAK file, transform every dataset and write the result
    Rescale {
        /// Input PAK file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PAK file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Transform to apply (default: gaussian)
        #[arg(short = 't', long, value_enum)]
        transform: Option<TransformArg>,

        /// Gaussian standard deviation in samples
        #[arg(long)]
        sigma: Option<f64>,

        /// Gaussian kernel half-width in standard deviations
        #[arg(long, hide = true)]
        truncate: Option<f64>,

        /// Upper bound kept by the threshold transform
        #[arg(long)]
        threshold: Option<f64>,

        /// Length reduction factor of the ramp transform
        #[arg(long)]
        divisor: Option<f64>,

        /// Channels passed through the transform, e.g. "y" or "x,y".
        /// Leave out z for transforms that change the length
        #[arg(long, value_name = "LIST")]
        channels: Option<ChannelSelection>,

        /// Accept datasets with more than one Y row
        #[arg(long)]
        allow_multi_row: bool,

        /// Write straight to OUTPUT instead of a temporary file moved into place
        #[arg(long)]
        direct: bool,
    },

    /// Display the structure of a PAK file
    Info {
        /// Input PAK file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Print every value of every dataset
        #[arg(long, conflicts_with = "json")]
        dump: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Rescale {
            input,
            output,
            config,
            transform,
            sigma,
            truncate,
            threshold,
            divisor,
            channels,
            allow_multi_row,
            direct,
        } => rescale::run(rescale::RescaleArgs {
            input,
            output,
            config,
            transform,
            sigma,
            truncate,
            threshold,
            divisor,
            channels,
            allow_multi_row,
            direct,
        }),
        Commands::Info { file, json, dump } => info::run(file, json, dump),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rescale() {
        let cli = Cli::try_parse_from([
            "binpak",
            "-vv",
            "rescale",
            "in.pak52",
            "out.pak52",
            "--transform",
            "gaussian",
            "--sigma",
            "3",
            "--channels",
            "y",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Rescale {
                transform,
                sigma,
                channels,
                ..
            } => {
                assert_eq!(transform, Some(TransformArg::Gaussian));
                assert_eq!(sigma, Some(3.0));
                assert_eq!(channels, Some(ChannelSelection::y_only()));
            }
            _ => panic!("expected rescale"),
        }
    }

    #[test]
    fn test_rescale_requires_output() {
        assert!(Cli::try_parse_from(["binpak", "rescale", "in.pak52"]).is_err());
    }

    #[test]
    fn test_bad_channel_list() {
        assert!(
            Cli::try_parse_from(["binpak", "rescale", "a", "b", "--channels", "x,w"]).is_err()
        );
    }

    #[test]
    fn test_info_json_and_dump_conflict() {
        assert!(Cli::try_parse_from(["binpak", "info", "a", "--json", "--dump"]).is_err());
    }
}
