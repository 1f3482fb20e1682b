//! Command line front end
//!
//! Usage:
//!   case_compiler compile <case.json> [--out DIR] [--templates DIR] [--stdout]
//!   case_compiler import <Case_Def.xml> [--out case.json]
//!
//! Logging goes through `RUST_LOG` (e.g. `RUST_LOG=debug` for per-slot timings).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sph_case_compiler::{import_case, Case, ExportConfig, Exporter};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "case_compiler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile SPH cases into GenCase XML definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON case into `{name}_Def.xml`
    Compile {
        case: PathBuf,
        /// Output directory (default: next to the case file)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Template directory, overrides SPH_CASE_TEMPLATES
        #[arg(short, long)]
        templates: Option<PathBuf>,
        /// Print the definition instead of writing files
        #[arg(long)]
        stdout: bool,
    },
    /// Read an exported definition back into a JSON case
    Import {
        definition: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile {
            case,
            out,
            templates,
            stdout,
        } => compile(case, out, templates, stdout),
        Commands::Import { definition, out } => import(definition, out),
    }
}

fn compile(path: PathBuf, out: Option<PathBuf>, templates: Option<PathBuf>, stdout: bool) -> Result<()> {
    let start = Instant::now();
    let text = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let case: Case = serde_json::from_str(&text).with_context(|| format!("invalid case {}", path.display()))?;

    let mut config = ExportConfig::from_env();
    if let Some(dir) = templates {
        config = config.with_templates_dir(dir);
    }
    let exporter = Exporter::new(config);

    if stdout {
        let compiled = exporter.compile(&case)?;
        print!("{}", compiled.xml);
        report_skipped(compiled.skipped.len());
        return Ok(());
    }

    let dir = out.unwrap_or_else(|| {
        path.parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let written = exporter.save(&case, &dir)?;
    eprintln!("Wrote {} in {:.1}ms", written.display(), start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

fn import(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let case = import_case(&path)?;
    let json = serde_json::to_string_pretty(&case)?;
    match out {
        Some(file) => {
            fs::write(&file, json).with_context(|| format!("failed to write {}", file.display()))?;
            eprintln!("Wrote {}", file.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn report_skipped(count: usize) {
    if count > 0 {
        eprintln!("{} fragment(s) skipped, see log for details", count);
    }
}
