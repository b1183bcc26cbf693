use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use tzp_core::profile::Profile;
use tzp_core::writer::EncodeOptions;
use tzp_core::{decode_file, encode_file, inspect, Stats};

#[derive(Parser)]
#[command(
    name = "tzp",
    about = "Turbo Zip — block-oriented general-purpose compression container",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a TZP container
    Compress {
        /// Source file to compress
        input: PathBuf,
        /// Destination TZP file
        output: PathBuf,
        /// Encode profile: lightning | fast | balanced | high | max
        #[arg(short, long, default_value = "balanced")]
        profile: String,
        /// Nominal raw bytes per block (default: 4 MiB)
        #[arg(short, long)]
        block_size: Option<u32>,
        /// Worker thread count (default: available parallelism, capped at 16)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Use natural-boundary (newline/NUL) partitioning instead of fixed-size blocks
        #[arg(long)]
        adaptive: bool,
    },
    /// Decompress a TZP container back to raw bytes
    Decompress {
        /// Source TZP file
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Worker thread count (default: available parallelism, capped at 16)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Print header and block-table summary without decoding any payload
    Inspect {
        /// TZP file to inspect
        file: PathBuf,
    },
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn print_stats(stats: &Stats) {
    eprintln!("  profile     : {}", stats.profile.as_str());
    eprintln!("  blocks      : {}", stats.block_count);
    eprintln!("  raw size    : {}", human_bytes(stats.original_size));
    eprintln!("  compressed  : {}", human_bytes(stats.compressed_size));
    eprintln!("  ratio       : {:.2}x", 1.0 / stats.ratio().max(f64::EPSILON));
    eprintln!("  throughput  : {:.2} MiB/s", stats.throughput_mib_per_s());
    eprintln!("  elapsed     : {:.3}s", stats.elapsed.as_secs_f64());
    eprintln!("  algorithms  :");
    for (id, tally) in &stats.algorithm_histogram {
        eprintln!(
            "    id {:>2}  blocks={:<6} in={:<10} out={}",
            id,
            tally.block_count,
            human_bytes(tally.bytes_in),
            human_bytes(tally.bytes_out)
        );
    }
}

fn run_compress(
    input: PathBuf,
    output: PathBuf,
    profile: &str,
    block_size: Option<u32>,
    threads: Option<usize>,
    adaptive: bool,
) -> anyhow::Result<()> {
    let profile = Profile::parse(profile)
        .ok_or_else(|| anyhow::anyhow!("unknown profile '{}'", profile))?;
    let opts = EncodeOptions {
        profile,
        block_size,
        threads,
        adaptive,
    };
    let stats = encode_file(&input, &output, &opts)
        .with_context(|| format!("compressing {:?} to {:?}", input, output))?;
    print_stats(&stats);
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf, threads: Option<usize>) -> anyhow::Result<()> {
    let stats = decode_file(&input, &output, threads)
        .with_context(|| format!("decompressing {:?} to {:?}", input, output))?;
    print_stats(&stats);
    Ok(())
}

fn run_inspect(file: PathBuf) -> anyhow::Result<()> {
    let container = std::fs::read(&file).with_context(|| format!("reading {:?}", file))?;
    let inspection = inspect(&container)?;

    println!("=== TZP container: {:?} ===", file);
    println!();
    println!("  version        : 0x{:04x}", inspection.version);
    println!("  flags          : 0x{:04x}", inspection.flags);
    println!(
        "  uncompressed   : {}",
        human_bytes(inspection.uncompressed_size)
    );
    println!(
        "  compressed     : {}",
        human_bytes(inspection.compressed_size)
    );
    println!("  block count    : {}", inspection.block_count);
    println!(
        "  base block size: {}",
        human_bytes(inspection.base_block_size as u64)
    );
    println!();
    println!("  {:>4}  {:>10}  {:>12}  {:>12}", "algo", "blocks", "in", "out");
    for (id, tally) in &inspection.algorithm_histogram {
        println!(
            "  {:>4}  {:>10}  {:>12}  {:>12}",
            id,
            tally.block_count,
            human_bytes(tally.bytes_in),
            human_bytes(tally.bytes_out)
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            profile,
            block_size,
            threads,
            adaptive,
        } => run_compress(input, output, &profile, block_size, threads, adaptive),
        Commands::Decompress {
            input,
            output,
            threads,
        } => run_decompress(input, output, threads),
        Commands::Inspect { file } => run_inspect(file),
    }
}
