//! tabsplit - parallel PDF table extraction.
//!
//! `tabsplit extract report.pdf` splits the report into page-range
//! segments, extracts each segment's tables in an isolated worker process,
//! and prints (or writes) the merged table. The hidden `worker` subcommand
//! is the per-segment entry point the controller spawns; it prints one
//! segment's table as JSON on stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tabsplit_core::{
    extract_segment, PipelineConfig, PipelineError, SegmentArtifact, Table, TextLayoutExtractor,
    WorkerSpawner,
};

#[derive(Parser)]
#[command(
    name = "tabsplit",
    version,
    about = "Split a PDF report and extract its tables in parallel"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every table of a PDF into one merged table
    Extract {
        /// The PDF report to process
        pdf: PathBuf,

        /// Segment/worker count (default: half the CPUs, minimum 1)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Directory for intermediate split files; must not exist yet
        #[arg(long, default_value = "split")]
        workspace: PathBuf,

        /// Write the merged table to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; defaults to the output file extension, or an
        /// aligned text table on stdout
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Internal per-segment worker (spawned by `extract`)
    #[command(hide = true)]
    Worker {
        /// Segment artifact to extract
        artifact: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned plain-text table
    Table,
    /// Comma-separated values
    Csv,
    /// JSON (columns + rows, missing cells as null)
    Json,
}

/// Spawns `tabsplit worker <artifact>` with the running binary, giving
/// every segment its own process and its own extractor instance.
struct SelfSpawner {
    exe: PathBuf,
}

impl WorkerSpawner for SelfSpawner {
    fn command(&self, artifact: &SegmentArtifact) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("worker").arg(&artifact.path);
        cmd
    }
}

fn main() -> Result<()> {
    // logs go to stderr: the worker's stdout is a JSON channel
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Extract {
            pdf,
            workers,
            workspace,
            output,
            format,
        } => cmd_extract(pdf, workers, workspace, output.as_deref(), format),
        Commands::Worker { artifact } => cmd_worker(&artifact),
    }
}

fn cmd_extract(
    pdf: PathBuf,
    workers: Option<usize>,
    workspace: PathBuf,
    output: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let format = match format {
        Some(f) => f,
        None => infer_format(output)?,
    };

    let mut config = PipelineConfig::new(pdf, workspace);
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    let exe = std::env::current_exe().context("failed to locate the tabsplit binary")?;
    let merged = match tabsplit_core::run(&config, &SelfSpawner { exe }) {
        Ok(table) => table,
        Err(err) => {
            if let PipelineError::Extraction { failures, .. } = &err {
                for failure in failures {
                    eprintln!("{failure}");
                }
            }
            return Err(err.into());
        }
    };

    match output {
        None => match format {
            OutputFormat::Table => print!("{}", format_table(&merged)),
            OutputFormat::Csv => write_csv(&merged, io::stdout().lock())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(io::stdout().lock(), &merged)?;
                println!();
            }
        },
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            match format {
                OutputFormat::Table => {
                    let mut file = file;
                    file.write_all(format_table(&merged).as_bytes())?;
                }
                OutputFormat::Csv => write_csv(&merged, file)?,
                OutputFormat::Json => serde_json::to_writer_pretty(file, &merged)?,
            }
            println!(
                "wrote {} row(s) x {} column(s) to {}",
                merged.row_count(),
                merged.columns.len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn cmd_worker(artifact: &Path) -> Result<()> {
    let extractor = TextLayoutExtractor::default();
    let table = extract_segment(&extractor, artifact)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &table)?;
    handle.flush()?;
    Ok(())
}

fn infer_format(output: Option<&Path>) -> Result<OutputFormat> {
    let Some(path) = output else {
        return Ok(OutputFormat::Table);
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => Ok(OutputFormat::Csv),
        Some("json") => Ok(OutputFormat::Json),
        Some("txt") => Ok(OutputFormat::Table),
        _ => bail!(
            "cannot infer output format for '{}'; pass --format",
            path.display()
        ),
    }
}

fn write_csv<W: io::Write>(table: &Table, writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);
    out.write_record(&table.columns)?;
    for row in &table.rows {
        out.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    out.flush()?;
    Ok(())
}

/// Render an aligned plain-text table, column widths sized to content.
fn format_table(table: &Table) -> String {
    if table.is_empty() {
        return "(no tables found)\n".to_string();
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(cell) = cell {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    for (i, column) in table.columns.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("{column:<width$}", width = widths[i]));
    }
    out.push('\n');
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&"-".repeat(*width));
    }
    out.push('\n');
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            let text = cell.as_deref().unwrap_or("");
            out.push_str(&format!("{text:<width$}", width = widths[i]));
        }
        out.push('\n');
    }
    out
}
