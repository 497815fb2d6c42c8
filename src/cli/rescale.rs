use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use binpak::session::{run_files, ChannelSelection, SessionConfig};
use binpak::transform::{BelowThreshold, IndexRamp, TransformSpec};

use super::{Config, TransformArg};

/// Command-line arguments of the `rescale` subcommand
pub struct RescaleArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub transform: Option<TransformArg>,
    pub sigma: Option<f64>,
    pub truncate: Option<f64>,
    pub threshold: Option<f64>,
    pub divisor: Option<f64>,
    pub channels: Option<ChannelSelection>,
    pub allow_multi_row: bool,
    pub direct: bool,
}

pub fn run(args: RescaleArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    let session = resolve_session(config.session, &args);
    let transform = resolve_transform(config.transform, &args);
    transform
        .check()
        .map_err(|msg| anyhow!("Invalid transform {}: {}", transform, msg))?;

    println!("Rescaling {} -> {}", args.input.display(), args.output.display());
    println!("  Transform: {}", transform);
    println!("  Channels: {}", session.channels);

    let stats = run_files(&args.input, &args.output, &transform, session).with_context(|| {
        format!(
            "Failed to rescale {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    println!("{}", stats);
    Ok(())
}

/// Command-line flags win over the config file
fn resolve_session(mut session: SessionConfig, args: &RescaleArgs) -> SessionConfig {
    if let Some(channels) = args.channels {
        session = session.with_channels(channels);
    }
    if args.allow_multi_row {
        session = session.allow_multi_row();
    }
    if args.direct {
        session = session.direct_output();
    }
    session
}

fn resolve_transform(from_config: TransformSpec, args: &RescaleArgs) -> TransformSpec {
    let mut spec = match args.transform {
        None => from_config,
        Some(kind) if kind == kind_of(&from_config) => from_config,
        Some(kind) => default_for(kind),
    };

    match &mut spec {
        TransformSpec::Gaussian { sigma, truncate } => {
            if let Some(value) = args.sigma {
                *sigma = value;
            }
            if let Some(value) = args.truncate {
                *truncate = value;
            }
        }
        TransformSpec::Threshold { threshold } => {
            if let Some(value) = args.threshold {
                *threshold = value;
            }
        }
        TransformSpec::Ramp { divisor } => {
            if let Some(value) = args.divisor {
                *divisor = value;
            }
        }
        TransformSpec::Identity | TransformSpec::Diff => {}
    }

    let gaussian = matches!(spec, TransformSpec::Gaussian { .. });
    let ignored = [
        ("--sigma", args.sigma.is_some() && !gaussian),
        ("--truncate", args.truncate.is_some() && !gaussian),
        (
            "--threshold",
            args.threshold.is_some() && !matches!(spec, TransformSpec::Threshold { .. }),
        ),
        (
            "--divisor",
            args.divisor.is_some() && !matches!(spec, TransformSpec::Ramp { .. }),
        ),
    ];
    for (flag, _) in ignored.iter().filter(|(_, unused)| *unused) {
        warn!("{} has no effect on the {} transform", flag, spec);
    }

    spec
}

fn kind_of(spec: &TransformSpec) -> TransformArg {
    match spec {
        TransformSpec::Identity => TransformArg::Identity,
        TransformSpec::Gaussian { .. } => TransformArg::Gaussian,
        TransformSpec::Diff => TransformArg::Diff,
        TransformSpec::Threshold { .. } => TransformArg::Threshold,
        TransformSpec::Ramp { .. } => TransformArg::Ramp,
    }
}

fn default_for(kind: TransformArg) -> TransformSpec {
    match kind {
        TransformArg::Identity => TransformSpec::Identity,
        TransformArg::Gaussian => TransformSpec::default(),
        TransformArg::Diff => TransformSpec::Diff,
        TransformArg::Threshold => TransformSpec::Threshold {
            threshold: BelowThreshold::default().threshold,
        },
        TransformArg::Ramp => TransformSpec::Ramp {
            divisor: IndexRamp::default().divisor,
        },
    }
}
