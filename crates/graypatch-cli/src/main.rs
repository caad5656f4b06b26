//! graypatch — patch-based white balance from a gray reference rectangle.
//!
//! Loads an image, samples the given rectangle as a gray reference, applies
//! the estimated per-channel gains across the whole frame, and writes the
//! corrected result. The same core drives interactive shells; this binary
//! is the non-interactive collaborator for scripted use.

mod loader;
mod naming;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use graypatch_core::{Ccm, SelectionRect, correct_white_balance};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graypatch")]
#[command(version, about = "Gray-patch white balance corrector", long_about = None)]
struct Cli {
    /// Input image file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Gray reference rectangle in image pixels (x,y,width,height)
    #[arg(long, value_name = "X,Y,W,H")]
    roi: String,

    /// Output file for the corrected image
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Color correction matrix override: JSON array of nine row-major numbers
    #[arg(long, value_name = "FILE")]
    ccm: Option<PathBuf>,

    /// User name for the generated output basename
    #[arg(short, long, value_name = "NAME")]
    user: Option<String>,

    /// Scene identifier for the generated output basename
    #[arg(short, long, value_name = "ID")]
    scene: Option<String>,

    /// Directory for the named output (with --user and --scene)
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    ImageIo(#[from] loader::ImageIoError),
    #[error("{0}")]
    Balance(#[from] graypatch_core::BalanceError),
    #[error("invalid ROI {0:?}: expected x,y,width,height")]
    Roi(String),
    #[error("failed to read CCM file: {0}")]
    CcmRead(#[source] std::io::Error),
    #[error("invalid CCM file: expected a JSON array of nine numbers")]
    CcmFormat,
    #[error("{0} contains characters invalid in filenames ({chars})", chars = naming::INVALID_CHARS)]
    InvalidName(&'static str),
    #[error("--user and --scene must be given together")]
    IncompleteName,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let rect = parse_roi(&cli.roi)?;
    let ccm = match &cli.ccm {
        Some(path) => load_ccm(path)?,
        None => Ccm::default(),
    };

    let source = loader::load_source(&cli.input)?;
    tracing::info!("loaded {} from {}", source, cli.input.display());

    let (preview, gains) = correct_white_balance(&source, &ccm, rect)?;
    println!(
        "gains: R={:.3} G={:.3} B={:.3}",
        gains.r, gains.g, gains.b
    );

    if let Some(out) = &cli.out {
        loader::save_preview(&preview, out)?;
        tracing::info!("wrote corrected image to {}", out.display());
    }

    match (&cli.user, &cli.scene) {
        (Some(user), Some(scene)) => {
            if !naming::is_valid_component(user) {
                return Err(CliError::InvalidName("user"));
            }
            if !naming::is_valid_component(scene) {
                return Err(CliError::InvalidName("scene"));
            }
            let extension = cli
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png");
            let basename = naming::output_basename(user, scene, rect);
            let path = cli.out_dir.join(format!("{basename}.{extension}"));
            loader::save_preview(&preview, &path)?;
            println!("named output: {}", path.display());
        }
        (None, None) => {}
        _ => return Err(CliError::IncompleteName),
    }

    Ok(())
}

fn parse_roi(text: &str) -> Result<SelectionRect, CliError> {
    let parts: Vec<u32> = text
        .split(',')
        .map(|p| p.trim().parse().map_err(|_| CliError::Roi(text.to_string())))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(SelectionRect {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        }),
        _ => Err(CliError::Roi(text.to_string())),
    }
}

fn load_ccm(path: &Path) -> Result<Ccm, CliError> {
    let text = std::fs::read_to_string(path).map_err(CliError::CcmRead)?;
    let values: Vec<f32> = serde_json::from_str(&text).map_err(|_| CliError::CcmFormat)?;
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = values.as_slice() else {
        return Err(CliError::CcmFormat);
    };
    let matrix = [
        [*m00, *m01, *m02],
        [*m10, *m11, *m12],
        [*m20, *m21, *m22],
    ];
    Ok(Ccm::new(matrix)?)
}
