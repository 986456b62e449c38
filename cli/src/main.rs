use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use template_compat_core::{check_file, CheckOptions, Diagnostic, TemplateFile};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "template-compat")]
#[command(about = "Run compatibility checks over parsed template file trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve globals, rewrite static call targets and report compatibility errors
    Check {
        /// Input file trees (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = DiagnosticFormat::Text)]
        format: DiagnosticFormat,

        /// Write each rewritten tree into this directory, named after its input
        #[arg(long)]
        emit_dir: Option<PathBuf>,

        /// Skip global resolution (the trees were resolved upstream)
        #[arg(long)]
        no_resolve_globals: bool,

        /// Max statement/expression nesting depth accepted
        #[arg(long, default_value_t = 48)]
        max_depth: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum DiagnosticFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct FileDiagnostics<'a> {
    file: &'a str,
    diagnostics: &'a [Diagnostic],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for diagnostics
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            inputs,
            format,
            emit_dir,
            no_resolve_globals,
            max_depth,
        } => {
            let options = CheckOptions {
                resolve_globals: !no_resolve_globals,
                max_depth,
            };

            if emit_dir.is_some() {
                ensure_distinct_file_names(&inputs)?;
            }

            let mut results = Vec::with_capacity(inputs.len());
            let mut failed = 0;
            for input in &inputs {
                match check_input(input, &options, emit_dir.as_deref()) {
                    Ok(diagnostics) => results.push((input.display().to_string(), diagnostics)),
                    Err(e) => {
                        tracing::error!("{e:#}");
                        failed += 1;
                    }
                }
            }

            print_diagnostics(&results, format)?;

            let total: usize = results.iter().map(|(_, d)| d.len()).sum();
            if total > 0 || failed > 0 {
                anyhow::bail!("{total} error(s) reported, {failed} input(s) failed");
            }
        }
    }

    Ok(())
}

/// Load, check and optionally emit one tree.
fn check_input(
    input: &Path,
    options: &CheckOptions,
    emit_dir: Option<&Path>,
) -> Result<Vec<Diagnostic>> {
    let mut file = read_tree(input)?;
    let report = check_file(&mut file, options)
        .map_err(|e| anyhow::Error::from(e).context(format!("Check failed: {}", input.display())))?;
    tracing::debug!(
        input = %input.display(),
        diagnostics = report.diagnostics.len(),
        "checked file"
    );

    if let Some(dir) = emit_dir {
        let name = input
            .file_name()
            .with_context(|| format!("Input has no file name: {}", input.display()))?;
        write_json(&file, &dir.join(name))?;
    }
    Ok(report.diagnostics)
}

/// Emitted trees are named after their input, so two inputs must not share a
/// file name.
fn ensure_distinct_file_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<&OsStr, &Path> = HashMap::new();
    for input in inputs {
        let name = input
            .file_name()
            .with_context(|| format!("Input has no file name: {}", input.display()))?;
        if let Some(previous) = seen.insert(name, input.as_path()) {
            anyhow::bail!(
                "Inputs {} and {} would both be emitted as {}",
                previous.display(),
                input.display(),
                name.to_string_lossy()
            );
        }
    }
    Ok(())
}

fn read_tree(path: &Path) -> Result<TemplateFile> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse file tree from: {}", path.display()))
}

fn print_diagnostics(
    results: &[(String, Vec<Diagnostic>)],
    format: DiagnosticFormat,
) -> Result<()> {
    let mut out = BufWriter::new(io::stdout());
    match format {
        DiagnosticFormat::Text => {
            for diagnostic in results.iter().flat_map(|(_, d)| d) {
                writeln!(out, "{diagnostic}").context("Failed to write diagnostics")?;
            }
        }
        DiagnosticFormat::Json => {
            let files: Vec<FileDiagnostics<'_>> = results
                .iter()
                .map(|(file, diagnostics)| FileDiagnostics { file, diagnostics })
                .collect();
            serde_json::to_writer_pretty(&mut out, &files).context("Failed to write JSON")?;
            writeln!(out).context("Failed to write trailing newline")?;
        }
    }
    out.flush().context("Failed to flush stdout")
}

fn write_json<T: Serialize>(val: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
