use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ndac_bench::{default_matrix, run_matrix, BenchReport, BucketSpec, Sample};
use ndac_codecs::{codec_by_id, compress_with};
use ndac_core::codec::{CodecChoice, CodecId};
use ndac_core::npy::{decode_any, write_npy};
use ndac_core::{format, pipeline, Dtype, NdArray, SelectionPolicy};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ndac",
    about = "NDAC: adaptive sparsity-aware compression for numeric arrays",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress an array file into an NDAC container
    Compress {
        /// Source file: JSON rows, base64-wrapped npy, or raw npy
        input: PathBuf,
        /// Destination container file
        output: PathBuf,
        /// Codec: auto | store | bz2 | lzma | deflate
        #[arg(short, long, default_value = "auto")]
        codec: String,
        /// Compression level/preset (per-codec default when omitted)
        #[arg(short, long)]
        level: Option<u32>,
    },
    /// Decompress an NDAC container back to npy
    Decompress {
        /// Source container file
        input: PathBuf,
        /// Destination npy file
        output: PathBuf,
    },
    /// Print container header metadata without decompressing
    Inspect {
        /// Container file to inspect
        file: PathBuf,
    },
    /// Run the codec matrix over a corpus and report per-sparsity winners
    Bench {
        /// Directory of sample arrays; a synthetic sparsity sweep when omitted
        #[arg(short, long)]
        samples: Option<PathBuf>,
        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Bucket width below 5% sparsity
        #[arg(long, default_value_t = 0.005)]
        fine_width: f64,
        /// Bucket width above 5% sparsity
        #[arg(long, default_value_t = 0.05)]
        coarse_width: f64,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Seed for the synthetic corpus
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn choice_from_name(name: &str, level: Option<u32>) -> anyhow::Result<CodecChoice> {
    let choice = match name {
        "store" | "none" => CodecChoice::new(CodecId::Store, 0),
        "bz2" | "bzip2" => CodecChoice::new(CodecId::Bzip2, level.unwrap_or(9)),
        "lzma" | "xz" => CodecChoice::new(CodecId::Lzma, level.unwrap_or(6)),
        "deflate" | "zlib" => CodecChoice::new(CodecId::Deflate, level.unwrap_or(6)),
        other => anyhow::bail!(
            "unknown codec '{}'. Valid options: auto, store, bz2, lzma, deflate",
            other
        ),
    };
    Ok(choice)
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

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(
    input: PathBuf,
    output: PathBuf,
    codec_name: &str,
    level: Option<u32>,
) -> anyhow::Result<()> {
    let raw = fs::read(&input).with_context(|| format!("reading input file {:?}", input))?;
    let array = decode_any(&raw)?;
    let sparsity = array.sparsity();

    let choice = match codec_name {
        "auto" => SelectionPolicy::default().select_for_sparsity(sparsity),
        name => choice_from_name(name, level)?,
    };

    let t0 = Instant::now();
    let blob = compress_with(&array, choice)?;
    let elapsed = t0.elapsed();

    fs::write(&output, &blob).with_context(|| format!("writing output file {:?}", output))?;

    eprintln!("  shape       : {:?}", array.shape());
    eprintln!("  dtype       : {}", array.dtype());
    eprintln!("  sparsity    : {:.4}", sparsity);
    eprintln!("  method      : {}", choice);
    eprintln!("  raw size    : {}", human_bytes(array.byte_len() as u64));
    eprintln!("  compressed  : {}", human_bytes(blob.len() as u64));
    eprintln!(
        "  ratio       : {:.4}",
        blob.len() as f64 / array.byte_len() as f64
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let blob = fs::read(&input).with_context(|| format!("reading input file {:?}", input))?;
    let (header, payload) = format::decode(&blob)?;
    let codec = codec_by_id(header.codec_id)?;

    eprintln!("  codec       : {} (id={})", codec.name(), header.codec_id);
    eprintln!("  shape       : {:?}", header.shape);
    eprintln!("  dtype       : {}", header.dtype);

    let t0 = Instant::now();
    let array = pipeline::decompress_array(header, payload, codec.as_ref())?;
    let elapsed = t0.elapsed();

    let npy = write_npy(&array);
    fs::write(&output, &npy).with_context(|| format!("writing output file {:?}", output))?;

    eprintln!("  raw size    : {}", human_bytes(array.byte_len() as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf) -> anyhow::Result<()> {
    let blob = fs::read(&file).with_context(|| format!("reading file {:?}", file))?;
    let (header, payload) = format::decode(&blob)?;

    // Unknown ids still inspect; only decompression needs the registry.
    let codec_name = CodecId::try_from(header.codec_id)
        .map(|id| id.name())
        .unwrap_or("unknown");
    let elements: u64 = header.shape.iter().map(|&d| d as u64).product();
    let raw_size = ndac_core::array::declared_byte_len(&header.shape, header.dtype);

    println!("=== NDAC container: {:?} ===", file);
    println!();
    println!("  codec        : {} (id={})", codec_name, header.codec_id);
    println!("  rank         : {}", header.shape.len());
    println!("  shape        : {:?}", header.shape);
    println!("  dtype        : {}", header.dtype);
    println!("  elements     : {}", elements);
    println!("  raw size     : {}", human_bytes(raw_size));
    println!("  header       : {} bytes", header.encoded_len());
    println!("  payload      : {}", human_bytes(payload.len() as u64));
    if raw_size > 0 {
        println!("  ratio        : {:.4}", payload.len() as f64 / raw_size as f64);
    }
    Ok(())
}

fn run_bench(
    samples_dir: Option<PathBuf>,
    json: Option<PathBuf>,
    fine_width: f64,
    coarse_width: f64,
    threads: usize,
    seed: u64,
) -> anyhow::Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("initializing worker pool")?;
    }

    let samples = match &samples_dir {
        Some(dir) => load_samples(dir)?,
        None => synthetic_corpus(seed)?,
    };
    anyhow::ensure!(!samples.is_empty(), "no usable samples to benchmark");

    let methods = default_matrix();
    let buckets = BucketSpec {
        fine_width,
        coarse_width,
        ..BucketSpec::default()
    };

    eprintln!(
        "benchmarking {} methods × {} samples...",
        methods.len(),
        samples.len()
    );
    let t0 = Instant::now();
    let report = run_matrix(&samples, &methods, &buckets)?;
    eprintln!(
        "completed {} runs in {:.1}s",
        report.results.len(),
        t0.elapsed().as_secs_f64()
    );

    print_report(&report);

    if let Some(path) = json {
        let file =
            File::create(&path).with_context(|| format!("creating report file {:?}", path))?;
        serde_json::to_writer_pretty(file, &report)?;
        eprintln!("report written to {:?}", path);
    }
    Ok(())
}

// ── Corpus loading ─────────────────────────────────────────────────────────

fn load_samples(dir: &Path) -> anyhow::Result<Vec<Sample>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading samples directory {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut samples = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let raw = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("skipping {}: {}", name, e);
                continue;
            }
        };
        match decode_any(&raw) {
            Ok(array) if array.byte_len() == 0 => eprintln!("skipping {}: empty array", name),
            Ok(array) => samples.push(Sample::new(name, array)),
            Err(e) => eprintln!("skipping {}: {}", name, e),
        }
    }
    Ok(samples)
}

/// Deterministic 500×500 int16 matrices sweeping the sparsity range, dense
/// coverage below 5% where the fine buckets live.
fn synthetic_corpus(seed: u64) -> anyhow::Result<Vec<Sample>> {
    const SIDE: u32 = 500;
    const LEVELS: &[f64] = &[
        0.0, 0.01, 0.02, 0.03, 0.04, 0.1, 0.3, 0.5, 0.7, 0.85, 0.9, 0.95, 0.99,
    ];

    let mut samples = Vec::with_capacity(LEVELS.len());
    for (i, &target) in LEVELS.iter().enumerate() {
        let array = sparse_matrix(SIDE, target, seed.wrapping_add(i as u64))?;
        samples.push(Sample::new(format!("synthetic-{:.2}", target), array));
    }
    Ok(samples)
}

/// Square int16 matrix with roughly `zero_fraction` zero entries, generated
/// by a fixed LCG so the corpus is reproducible across runs and platforms.
fn sparse_matrix(side: u32, zero_fraction: f64, seed: u64) -> anyhow::Result<NdArray> {
    let count = side as usize * side as usize;
    let threshold = (zero_fraction * 10_000.0) as u64;
    let mut data = Vec::with_capacity(count * 2);
    let mut rng = seed;
    for _ in 0..count {
        rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let draw = rng >> 33;
        let value: i16 = if draw % 10_000 < threshold {
            0
        } else {
            ((draw >> 16) % 199) as i16 - 99
        };
        data.extend_from_slice(&value.to_le_bytes());
    }
    Ok(NdArray::from_parts(vec![side, side], Dtype::Int16, data)?)
}

// ── Report printing ────────────────────────────────────────────────────────

fn print_report(report: &BenchReport) {
    println!();
    println!("=== method summary (best first) ===");
    println!(
        "  {:<12} {:>6} {:>12} {:>10} {:>10} {:>12}",
        "method", "runs", "mean score", "min", "max", "mean ratio"
    );
    println!("  {}", "-".repeat(68));
    for m in report.top_methods(report.methods.len()) {
        println!(
            "  {:<12} {:>6} {:>12.4} {:>10.4} {:>10.4} {:>12.4}",
            m.method, m.runs, m.mean_score, m.min_score, m.max_score, m.mean_ratio
        );
    }

    println!();
    println!("=== top 3 overall ===");
    for (i, m) in report.top_methods(3).iter().enumerate() {
        println!("  {}. {:<12} mean score {:.4}", i + 1, m.method, m.mean_score);
    }

    println!();
    println!("=== best method per sparsity bucket ===");
    println!(
        "  {:<16} {:>8} {:<12} {:>12}",
        "bucket", "samples", "winner", "mean score"
    );
    println!("  {}", "-".repeat(52));
    for b in &report.buckets {
        println!(
            "  [{:.3}, {:.3})  {:>8} {:<12} {:>12.4}",
            b.lower, b.upper, b.samples, b.winner, b.winner_mean_score
        );
    }

    if !report.failures.is_empty() {
        println!();
        println!("=== failures ({}) ===", report.failures.len());
        for f in &report.failures {
            println!("  {} / {}: {}", f.sample, f.method, f.error);
        }
    }
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
            level,
        } => run_compress(input, output, &codec, level),
        Commands::Decompress { input, output } => run_decompress(input, output),
        Commands::Inspect { file } => run_inspect(file),
        Commands::Bench {
            samples,
            json,
            fine_width,
            coarse_width,
            threads,
            seed,
        } => run_bench(samples, json, fine_width, coarse_width, threads, seed),
    }
}
