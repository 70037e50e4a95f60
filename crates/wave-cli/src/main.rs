//! wavec - resolve pipeline output schemas into operands
//!
//! `wavec compile plan.yaml` prints each stage's subfields, types and output
//! operand ids. `wavec extract '$.path'` runs JSON path extraction over
//! newline-delimited JSON.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use wave_compile::{compile_pipeline, CompiledPipeline, PipelineSummary};
use wave_json::JsonExtractor;

mod config;
mod logging;
mod plan;

use config::Config;
use plan::Plan;

#[derive(Debug, Parser)]
#[command(name = "wavec", version, about = "Resolve pipeline output schemas into operands")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a plan and print the resolved operands
    Compile {
        /// Plan file (YAML, or JSON with a .json extension)
        plan: PathBuf,

        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Record binding conflicts instead of failing on them
        #[arg(long)]
        lenient: bool,
    },
    /// Extract values from newline-delimited JSON
    Extract {
        /// JSON path, e.g. '$.store.book[*].title'
        path: String,

        /// Input file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report {
    fingerprint: String,
    #[serde(flatten)]
    summary: PipelineSummary,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default().with_env_overrides()?,
    };
    logging::init(&config.logging)?;

    match cli.command {
        Command::Compile {
            plan,
            format,
            lenient,
        } => {
            let mut options = config.compile.clone();
            if lenient {
                options.strict_bindings = false;
            }

            let plan = Plan::load(&plan).with_context(|| format!("loading plan {}", plan.display()))?;
            info!(stages = plan.stages.len(), strict = options.strict_bindings, "compiling plan");

            let compiled = compile_pipeline(&plan.stages, options)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match format {
                ReportFormat::Text => write_text_report(&mut out, &compiled)?,
                ReportFormat::Json => {
                    let report = Report {
                        fingerprint: compiled.fingerprint(),
                        summary: compiled.summary(),
                    };
                    serde_json::to_writer_pretty(&mut out, &report)?;
                    writeln!(out)?;
                }
            }
        }
        Command::Extract { path, input } => {
            let reader: Box<dyn BufRead> = match &input {
                Some(file) => Box::new(BufReader::new(
                    std::fs::File::open(file)
                        .with_context(|| format!("opening {}", file.display()))?,
                )),
                None => Box::new(BufReader::new(std::io::stdin())),
            };

            let mut extractor = JsonExtractor::with_capacity(config.json.cache_capacity);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match extractor.extract(&line, &path)? {
                    Some(values) => serde_json::to_writer(&mut out, &values)?,
                    None => out.write_all(b"null")?,
                }
                writeln!(out)?;
            }
        }
    }

    Ok(())
}

fn write_text_report(out: &mut impl Write, compiled: &CompiledPipeline) -> std::io::Result<()> {
    for op in compiled.operators() {
        writeln!(out, "stage {}", op.stage())?;
        for (subfield, ty) in op.subfields().iter().zip(op.types()) {
            let id = op
                .operand_for(subfield)
                .map(|operand| operand.id().to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "  {:<6} {:<24} {}", id, subfield.to_string(), ty)?;
        }
        let ids: Vec<String> = op.output_ids().iter().map(|id| id.to_string()).collect();
        writeln!(out, "  outputs [{}]", ids.join(", "))?;
    }

    for conflict in compiled.state().conflicts() {
        writeln!(out, "conflict: {}", conflict)?;
    }
    writeln!(out, "operands {}", compiled.state().operands().len())?;
    writeln!(out, "fingerprint {}", compiled.fingerprint())
}
