use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use num_complex::Complex64;
use ptycho2d_backend_cpu::CpuBackend;
use ptycho2d_core::{
    field::FieldStack,
    params::PropagationParams,
    propagator::WavefieldPropagator,
};

#[derive(Parser, Debug)]
#[command(name = "ptycho2d", about = "Wavefield propagation CLI")]
struct Cli {
    /// Path to a TOML propagation configuration file
    #[arg(short, long)]
    config: PathBuf,
    /// Path to CSV output (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Which transform to apply to the seed field
    #[arg(long, value_enum, default_value = "forward")]
    direction: Direction,
    /// Suppress progress logs (stderr)
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    Forward,
    Inverse,
    Roundtrip,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    if !cli.quiet {
        eprintln!("[cli] loading config {}", cli.config.display());
    }
    let raw = fs::read_to_string(&cli.config)?;
    let params: PropagationParams = toml::from_str(&raw)?;
    if !cli.quiet {
        eprintln!(
            "[cli] propagator={} np={} zo={} ({:?})",
            params.propagator, params.np, params.zo, cli.direction
        );
    }

    // unit-amplitude seed; a probe loader can replace this later
    let seed = FieldStack::filled(params.field_shape(), Complex64::new(1.0, 0.0));
    let mut engine = WavefieldPropagator::new(CpuBackend::new());
    let result = match cli.direction {
        Direction::Forward => engine.forward(&seed, &params)?,
        Direction::Inverse => engine.inverse(&seed, &params)?,
        Direction::Roundtrip => {
            let detector = engine.forward(&seed, &params)?;
            engine.inverse(&detector, &params)?
        }
    };
    emit_csv(&result, cli.output.as_deref())?;
    if !cli.quiet {
        for (kind, stats) in engine.kernel_stats() {
            if stats.misses > 0 || stats.hits > 0 {
                eprintln!(
                    "[cli] kernel cache {kind}: {} hits, {} misses, {} entries",
                    stats.hits, stats.misses, stats.entries
                );
            }
        }
        if let Some(path) = cli.output {
            eprintln!("wrote {} samples to {}", result.as_slice().len(), path.display());
        } else {
            eprintln!("wrote {} samples to stdout", result.as_slice().len());
        }
    }
    Ok(())
}

/// One row per sample: plane index, grid position, and intensity.
fn emit_csv(field: &FieldStack, dest: Option<&Path>) -> io::Result<()> {
    let mut writer: Box<dyn Write> = match dest {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let np = field.shape().np;
    writeln!(writer, "plane,iy,ix,re,im,intensity")?;
    for plane_idx in 0..field.shape().planes() {
        let plane = field.plane(plane_idx);
        for iy in 0..np {
            for ix in 0..np {
                let value = plane[iy * np + ix];
                writeln!(
                    writer,
                    "{plane_idx},{iy},{ix},{},{},{}",
                    value.re,
                    value.im,
                    value.norm_sqr()
                )?;
            }
        }
    }
    writer.flush()
}
