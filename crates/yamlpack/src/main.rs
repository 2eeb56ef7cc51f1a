//! Command-line interface for yamlpack.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use yamlpack::{
    compress_document, decompress_document, inspect_document, CompressionConfig, FloatDtype,
};

/// Machine-readable result emitted with `--json`
#[derive(Serialize)]
struct JsonOutput {
    operation: String,
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    input_bytes: u64,
    output_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ratio: Option<f64>,
    arrays: usize,
    values: usize,
    elapsed_secs: f64,
}

#[derive(Parser)]
#[command(name = "yamlpack")]
#[command(version, about = "Selective binary packing for numeric arrays in YAML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack large numeric sequences into binary blocks
    Compress(CompressArgs),
    /// Expand packed blocks back into literal sequences
    Decompress(DecompressArgs),
    /// Show the packed arrays inside a document
    Info(InfoArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct CompressArgs {
    /// Input YAML document
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output path
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Minimum element count before a sequence is packed
    #[arg(short, long, default_value_t = 10)]
    threshold: usize,

    /// Float storage width (integers always pack losslessly)
    #[arg(short, long, value_enum, default_value = "f32")]
    dtype: DtypeArg,

    /// Print the configuration before running
    #[arg(short, long)]
    verbose: bool,

    /// Emit results as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Show a progress spinner
    #[arg(long)]
    progress: bool,
}

#[derive(Args)]
struct DecompressArgs {
    /// Input YAML document with packed blocks
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output path
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Emit results as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Show a progress spinner
    #[arg(long)]
    progress: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// YAML document to inspect
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// List every packed array
    #[arg(short = 'd', long)]
    detailed: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

/// Float width argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DtypeArg {
    /// IEEE-754 binary16, 2 bytes per element (lossy)
    F16,
    /// IEEE-754 binary32, 4 bytes per element (lossy)
    F32,
    /// IEEE-754 binary64, 8 bytes per element (lossless)
    F64,
}

impl From<DtypeArg> for FloatDtype {
    fn from(arg: DtypeArg) -> Self {
        match arg {
            DtypeArg::F16 => FloatDtype::Float16,
            DtypeArg::F32 => FloatDtype::Float32,
            DtypeArg::F64 => FloatDtype::Float64,
        }
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

fn run_compress(args: &CompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = CompressionConfig {
        threshold: args.threshold,
        dtype: args.dtype.into(),
    };

    if args.verbose {
        eprintln!("Configuration:");
        eprintln!("  Threshold: {} elements", config.threshold);
        eprintln!("  Dtype:     {}", config.dtype);
        eprintln!();
    }

    let spinner = if args.progress && !args.json {
        Some(create_spinner("Compressing..."))
    } else {
        None
    };

    let start = Instant::now();
    let stats = compress_document(&args.input, &args.output, &config)?;
    let elapsed = start.elapsed();

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if args.json {
        let output = JsonOutput {
            operation: "compress".to_string(),
            input: args.input.display().to_string(),
            output: Some(args.output.display().to_string()),
            input_bytes: stats.input_bytes,
            output_bytes: stats.output_bytes,
            ratio: Some(stats.ratio),
            arrays: stats.arrays_packed,
            values: stats.values_packed,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("Compression Results:");
        eprintln!(
            "  Input:   {} ({})",
            args.input.display(),
            format_size(stats.input_bytes)
        );
        eprintln!(
            "  Output:  {} ({})",
            args.output.display(),
            format_size(stats.output_bytes)
        );
        eprintln!("  Ratio:   {:.2}x", stats.ratio);
        eprintln!(
            "  Packed:  {} arrays, {} values",
            stats.arrays_packed, stats.values_packed
        );
        eprintln!("  Time:    {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn run_decompress(args: &DecompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = if args.progress && !args.json {
        Some(create_spinner("Decompressing..."))
    } else {
        None
    };

    let start = Instant::now();
    let stats = decompress_document(&args.input, &args.output)?;
    let elapsed = start.elapsed();

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if args.json {
        let output = JsonOutput {
            operation: "decompress".to_string(),
            input: args.input.display().to_string(),
            output: Some(args.output.display().to_string()),
            input_bytes: stats.input_bytes,
            output_bytes: stats.output_bytes,
            ratio: None,
            arrays: stats.arrays_unpacked,
            values: stats.values_unpacked,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("Decompression Results:");
        eprintln!(
            "  Input:    {} ({})",
            args.input.display(),
            format_size(stats.input_bytes)
        );
        eprintln!(
            "  Output:   {} ({})",
            args.output.display(),
            format_size(stats.output_bytes)
        );
        eprintln!(
            "  Expanded: {} arrays, {} values",
            stats.arrays_unpacked, stats.values_unpacked
        );
        eprintln!("  Time:     {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn run_info(args: &InfoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = inspect_document(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Document: {}", args.input.display());
    println!("Packed arrays: {}", report.arrays.len());
    println!("Packed values: {}", report.values_packed);
    println!(
        "Packed payload: {}",
        format_size(report.payload_bytes as u64)
    );

    if args.detailed && !report.arrays.is_empty() {
        println!();
        println!(
            "{:<40} {:>10} {:>10} {:>12}",
            "Path", "Dtype", "Length", "Payload"
        );
        println!("{}", "-".repeat(76));
        for array in &report.arrays {
            println!(
                "{:<40} {:>10} {:>10} {:>12}",
                truncate_path(&array.path, 40),
                array.dtype,
                array.len,
                format_size(array.payload_bytes as u64)
            );
        }
    }

    Ok(())
}

fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "yamlpack", &mut io::stdout());
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GiB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn truncate_path(path: &str, max: usize) -> String {
    if path.len() <= max {
        path.to_string()
    } else {
        format!("...{}", &path[path.len() - (max - 3)..])
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Compress(args) => run_compress(args),
        Commands::Decompress(args) => run_decompress(args),
        Commands::Info(args) => run_info(args),
        Commands::Completions(args) => {
            run_completions(args);
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
