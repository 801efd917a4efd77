//! Command-line front end
//!
//! The binary is a thin shell over the library: every subcommand writes its
//! human-readable output to the supplied writer so it can be driven from
//! tests as well as from `main`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use panelcam_camtools::{
    BatchProcessor, BatchReport, CamToolError, CamToolResult, GenerationOutcome, InputStore,
    ProgramStore,
};
use panelcam_settings::{MachiningParameters, SettingsError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "panelcam")]
#[command(about = "Convert DXF panel drawings into G-code programs")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log records as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate programs for stored documents
    Generate {
        /// Documents to process; every stored document when omitted
        ids: Vec<String>,

        /// Directory holding the uploaded DXF documents
        #[arg(short, long, default_value = "uploads")]
        input_dir: PathBuf,

        /// Directory the generated programs are written to
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored documents
    List {
        #[arg(short, long, default_value = "uploads")]
        input_dir: PathBuf,
    },

    /// Copy a DXF file into the document store
    Import {
        file: PathBuf,

        #[arg(short, long, default_value = "uploads")]
        input_dir: PathBuf,
    },

    /// Remove a stored document
    Delete {
        name: String,

        #[arg(short, long, default_value = "uploads")]
        input_dir: PathBuf,
    },

    /// Print the effective machining parameters as TOML
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ParamArgs {
    /// Parameter file (.toml or .json); defaults to the user config file if present
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Override one parameter, e.g. --set feed_rate=9000
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl ParamArgs {
    /// Build the parameter set for one run: file, then overrides
    pub fn resolve(&self) -> CamToolResult<MachiningParameters> {
        let base = match self.config_file() {
            Some(path) => {
                debug!(path = %path.display(), "Loading parameter file");
                MachiningParameters::load_from_file(&path)?
            }
            None => MachiningParameters::default(),
        };

        let pairs = self
            .overrides
            .iter()
            .map(|item| {
                item.split_once('=')
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .ok_or_else(|| SettingsError::invalid(item.as_str(), "expected KEY=VALUE"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let overlay = MachiningParameters::overlay_from_pairs(pairs);
        Ok(base.with_overlay(&overlay)?)
    }

    fn config_file(&self) -> Option<PathBuf> {
        self.params.clone().or_else(|| {
            MachiningParameters::default_config_path().filter(|path| path.is_file())
        })
    }
}

/// Outcome of a CLI invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// A batch was requested and no document produced a program
    AllFailed,
}

pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<RunStatus> {
    match cli.command {
        Commands::Generate {
            ids,
            input_dir,
            output_dir,
            params,
            json,
        } => generate(&ids, &input_dir, &output_dir, &params, json, out),
        Commands::List { input_dir } => {
            list(&input_dir, out)?;
            Ok(RunStatus::Success)
        }
        Commands::Import { file, input_dir } => {
            let store = InputStore::open(&input_dir).map_err(CamToolError::from)?;
            let receipt = store.import_file(&file).map_err(CamToolError::from)?;
            let verb = if receipt.replaced { "Replaced" } else { "Imported" };
            writeln!(out, "{} {}", verb, receipt.name)?;
            Ok(RunStatus::Success)
        }
        Commands::Delete { name, input_dir } => {
            let store = InputStore::open(&input_dir).map_err(CamToolError::from)?;
            store.delete(&name).map_err(CamToolError::from)?;
            writeln!(out, "Deleted {}", name)?;
            Ok(RunStatus::Success)
        }
        Commands::Params { params } => {
            let resolved = params.resolve()?;
            let text = toml::to_string_pretty(&resolved)
                .context("Failed to render machining parameters")?;
            write!(out, "{}", text)?;
            Ok(RunStatus::Success)
        }
    }
}

fn generate(
    ids: &[String],
    input_dir: &Path,
    output_dir: &Path,
    params: &ParamArgs,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<RunStatus> {
    let params = params.resolve()?;
    let store = InputStore::open(input_dir).map_err(CamToolError::from)?;
    let sink = ProgramStore::new(output_dir);

    let ids = if ids.is_empty() {
        store.all_ids().map_err(CamToolError::from)?
    } else {
        ids.to_vec()
    };
    info!(documents = ids.len(), order = %params.process_order, "Starting batch");

    let report = BatchProcessor::new(params).run(&store, &sink, &ids);

    if json {
        let text = report.to_json().map_err(CamToolError::from)?;
        writeln!(out, "{}", text)?;
    } else {
        print_report(&report, out)?;
    }

    if !report.is_empty() && report.succeeded() == 0 {
        Ok(RunStatus::AllFailed)
    } else {
        Ok(RunStatus::Success)
    }
}

fn print_report(report: &BatchReport, out: &mut impl Write) -> std::io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "No documents to process");
    }

    for result in &report.results {
        match &result.outcome {
            GenerationOutcome::Generated {
                program_id,
                line_count,
                ..
            } => {
                let summary = result.summary.unwrap_or_default();
                writeln!(
                    out,
                    "OK    {} -> {} ({} lines; {} records, {} polylines, {} circles, {} texts)",
                    result.source,
                    program_id,
                    line_count,
                    summary.total_records,
                    summary.polylines,
                    summary.circles,
                    summary.texts
                )?;
            }
            GenerationOutcome::Failed { error } => {
                writeln!(out, "FAIL  {}: {}", result.source, error)?;
            }
        }
    }
    writeln!(
        out,
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    )
}

fn list(input_dir: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let store = InputStore::open(input_dir).map_err(CamToolError::from)?;
    let documents = store.list().map_err(CamToolError::from)?;
    if documents.is_empty() {
        writeln!(out, "No stored documents")?;
    }
    for doc in documents {
        writeln!(
            out,
            "{:<40} {:>10}  {}",
            doc.name,
            doc.size,
            doc.modified.format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    Ok(())
}
