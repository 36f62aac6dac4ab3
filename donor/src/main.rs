#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use donor_ir::Module;
use donor_verify::verify_module;
use miette::{IntoDiagnostic, NamedSource};
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::{VerifyOverrides, build_verify_config, resolve_config};

#[derive(Parser, Debug)]
#[command(name = "donor", version, about = "Donation verifier for distributed array programs")]
struct Cli {
    /// Config file. Defaults to `donor.toml` next to the module, if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check the donation discipline of every function in a module
    Verify {
        /// Module in JSON form
        path: PathBuf,

        /// Keep checking the remaining functions after a failure
        #[arg(long)]
        keep_going: bool,

        /// Check functions one at a time
        #[arg(long)]
        no_parallel: bool,

        /// Stop after this many failing functions (with --keep-going)
        #[arg(long)]
        max_diagnostics: Option<usize>,

        /// Write a JSON report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the module as an IR listing
    Print {
        /// Module in JSON form
        path: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env("DONOR_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn load_module(path: &Path) -> miette::Result<Module> {
    let text = fs::read_to_string(path).into_diagnostic()?;
    let module = Module::from_json(&text)?;
    Ok(module)
}

/// Source text the module's spans point into, if it names one.
fn load_source(module_path: &Path, module: &Module) -> miette::Result<Option<(String, String)>> {
    let Some(rel) = &module.source_file else {
        return Ok(None);
    };
    let dir = module_path.parent().unwrap_or_else(|| Path::new("."));
    let path = dir.join(rel);
    let text = fs::read_to_string(&path).into_diagnostic()?;
    Ok(Some((display_path(&path), text)))
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Verify {
            path,
            keep_going,
            no_parallel,
            max_diagnostics,
            report: report_out,
        } => {
            let resolved = resolve_config(cli.config.as_deref(), &path)?;
            init_logging(&resolved.config.log.level);
            if let Some(p) = &resolved.config_path {
                tracing::debug!(config = %p.display(), "loaded config");
            }
            let cfg = build_verify_config(
                &resolved,
                VerifyOverrides {
                    keep_going,
                    no_parallel,
                    max_diagnostics,
                },
            );
            verify_file(&path, cfg, report_out.as_deref())
        }
        Cmd::Print { path } => {
            let resolved = resolve_config(cli.config.as_deref(), &path)?;
            init_logging(&resolved.config.log.level);
            let module = load_module(&path)?;
            print!("{module}");
            Ok(())
        }
    }
}

fn verify_file(
    path: &Path,
    cfg: donor_verify::VerifyConfig,
    report_out: Option<&Path>,
) -> miette::Result<()> {
    let module = load_module(path)?;
    let source = load_source(path, &module)?;
    let named = source
        .as_ref()
        .map(|(name, text)| NamedSource::new(name.clone(), text.clone()));

    if let Err(e) = module.validate() {
        let report = miette::Report::new(e);
        return Err(match named {
            Some(src) => report.with_source_code(src),
            None => report,
        });
    }

    let verified = verify_module(&module, &cfg);

    if let Some(out) = report_out {
        let text = source.as_ref().map(|(_, text)| text.as_str());
        let json = report::build_report(path, &module, &verified, text);
        report::write_report(&json, out)?;
    }

    if verified.is_ok() {
        println!(
            "{}: {} function(s) checked, {} skipped",
            display_path(path),
            verified.checked,
            verified.skipped
        );
        return Ok(());
    }

    let failed = verified.failures.len();
    let mut reports: Vec<miette::Report> = verified
        .failures
        .into_iter()
        .map(|f| {
            let report = miette::Report::new(f.error);
            match &named {
                Some(src) => report.with_source_code(src.clone()),
                None => report,
            }
        })
        .collect();

    if failed == 1 {
        if let Some(report) = reports.pop() {
            return Err(report);
        }
    }
    for report in &reports {
        eprintln!("{report:?}");
    }
    Err(miette::miette!("{failed} function(s) failed donation verification"))
}
