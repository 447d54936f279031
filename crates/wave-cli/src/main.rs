use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use wave_core::chunks::{self, Chunk};
use wave_core::{SizePolicy, WaveHeader, WaveRecord, DATA_ID, FMT_ID};

#[derive(Parser, Debug)]
#[command(version, about = "Validate and re-serialize RIFF/WAVE containers")]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace) unless RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a .wav file and write it back out
    Copy {
        #[arg(short, long, default_value = "inputs/test.wav")]
        input: PathBuf,
        #[arg(short, long, default_value = "outputs/test.wav")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Sizes::PassThrough)]
        sizes: Sizes,
    },
    /// Print header fields of a .wav file
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        /// Also list every sub-chunk in the file
        #[arg(long)]
        chunks: bool,
    },
    /// Copy every .wav file under a directory into a mirrored tree
    Batch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Sizes::PassThrough)]
        sizes: Sizes,
    },
}

/// Treatment of the header size fields on write.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Sizes {
    /// Write the header exactly as read
    PassThrough,
    /// Recompute sizes from the payload length
    Recompute,
    /// Fail if the header disagrees with the payload
    Strict,
}

impl From<Sizes> for SizePolicy {
    fn from(sizes: Sizes) -> Self {
        match sizes {
            Sizes::PassThrough => SizePolicy::PassThrough,
            Sizes::Recompute => SizePolicy::Recompute,
            Sizes::Strict => SizePolicy::Strict,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.cmd {
        Commands::Copy { input, output, sizes } => {
            let header = copy_file(&input, &output, sizes.into())?;
            print_summary(&header);
            println!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Inspect { input, chunks } => inspect_file(&input, chunks),
        Commands::Batch { input, output, sizes } => copy_tree(&input, &output, sizes.into()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn copy_file(input: &Path, output: &Path, policy: SizePolicy) -> Result<WaveHeader> {
    let record = WaveRecord::open(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!(input = %input.display(), header = %record.header(), "read container");

    if !record.is_consistent() {
        warn!(
            declared = record.header().data_len(),
            actual = record.payload().len(),
            "header size disagrees with payload"
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    record
        .save_with(output, policy)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(output = %output.display(), "wrote container");
    Ok(*record.header())
}

fn print_summary(h: &WaveHeader) {
    println!("{:<16} {}", "Audio format:", h.audio_format.get());
    println!("{:<16} {}", "Channels:", h.num_channels.get());
    println!("{:<16} {}", "Sample rate:", h.sample_rate.get());
    println!("{:<16} {}", "Bit depth:", h.bits_per_sample.get());
}

fn chunk_role(chunk: &Chunk<'_>) -> &'static str {
    if chunk.is(&FMT_ID) {
        "format"
    } else if chunk.is(&DATA_ID) {
        "samples"
    } else {
        ""
    }
}

fn inspect_file(input: &Path, list_chunks: bool) -> Result<()> {
    let record = WaveRecord::open(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let h = record.header();

    println!("{:<16} {}", "Format:", h);
    println!("{:<16} {}", "Chunk size:", h.chunk_size.get());
    println!("{:<16} {}", "fmt size:", h.subchunk1_size.get());
    println!("{:<16} {}", "Byte rate:", h.byte_rate.get());
    println!("{:<16} {}", "Block align:", h.block_align.get());
    println!("{:<16} {}", "Data size:", h.data_len());
    println!("{:<16} {}", "Frames:", h.frame_count());
    match h.duration() {
        Some(d) => println!("{:<16} {:.3}s", "Duration:", d.as_secs_f64()),
        None => println!("{:<16} unknown", "Duration:"),
    }
    println!(
        "{:<16} {}",
        "Sizes:",
        if record.is_consistent() { "consistent" } else { "INCONSISTENT" }
    );

    if list_chunks {
        let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
        println!();
        println!("{:<6} | {:<10} | {:<10} | {}", "ID", "OFFSET", "SIZE", "ROLE");
        println!("{:-<6}-|-{:-<10}-|-{:-<10}-|-{:-<7}", "", "", "", "");
        for chunk in chunks::scan(&bytes)? {
            let chunk = chunk?;
            println!(
                "{:<6} | {:<10} | {:<10} | {}",
                chunk.id.escape_ascii().to_string(),
                chunk.offset,
                chunk.data.len(),
                chunk_role(&chunk)
            );
        }
    }
    Ok(())
}

fn copy_tree(input: &Path, output: &Path, policy: SizePolicy) -> Result<()> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry?;
        if entry.file_type().is_file() && is_wav(entry.path()) {
            files.push(entry.into_path());
        }
    }
    info!(count = files.len(), input = %input.display(), "found wave files");

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut failed = 0usize;
    for path in &files {
        let target = output.join(path.strip_prefix(input)?);
        debug!(from = %path.display(), to = %target.display(), "copying");
        if let Err(e) = copy_file(path, &target, policy) {
            bar.suspend(|| warn!("{:#}", e));
            failed += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if failed > 0 {
        bail!("{} of {} files failed", failed, files.len());
    }
    info!(count = files.len(), "batch complete");
    Ok(())
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
}
