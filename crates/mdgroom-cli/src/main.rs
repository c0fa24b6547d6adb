use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mdgroom_config::Config;
use mdgroom_engine::io;

#[derive(Parser)]
#[command(name = "mdgroom")]
#[command(version, about = "Tidy generated markdown notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize files in place
    Fix {
        /// Markdown files or directories; defaults to the configured
        /// knowledge directory
        paths: Vec<PathBuf>,

        /// Treat fence diagnostics as errors
        #[arg(long)]
        strict: bool,

        /// Suppress per-file output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Report files that would change, without writing
    Check {
        /// Markdown files or directories; defaults to the configured
        /// knowledge directory
        paths: Vec<PathBuf>,

        /// Treat fence diagnostics as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mdgroom: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Fix {
            paths,
            strict,
            quiet,
        } => {
            let (files, strict) = resolve_targets(paths, strict)?;
            let summary = process_all(&files, true, quiet)?;
            finish(summary, strict, false)
        }
        Command::Check { paths, strict } => {
            let (files, strict) = resolve_targets(paths, strict)?;
            let summary = process_all(&files, false, false)?;
            finish(summary, strict, true)
        }
    }
}

struct Summary {
    changed: usize,
    noted: usize,
}

/// Turn CLI paths into a concrete file list, falling back to the configured
/// knowledge directory when none were given. The config's strict default
/// combines with the flag.
fn resolve_targets(paths: Vec<PathBuf>, strict_flag: bool) -> Result<(Vec<PathBuf>, bool)> {
    let config = Config::load().context("failed to load config file")?;
    let strict = strict_flag || config.as_ref().is_some_and(|c| c.strict);

    let roots = if paths.is_empty() {
        let Some(config) = config else {
            bail!(
                "no paths given and no config file found; pass a file or \
                 create {} with a knowledge_dir entry",
                Config::config_path().display()
            );
        };
        vec![config.knowledge_dir]
    } else {
        paths
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_dir() {
            files.extend(io::scan_markdown_files(&root)?);
        } else {
            files.push(root);
        }
    }
    Ok((files, strict))
}

fn process_all(files: &[PathBuf], write: bool, quiet: bool) -> Result<Summary> {
    let mut summary = Summary {
        changed: 0,
        noted: 0,
    };
    for file in files {
        let outcome = io::process_file_report(file, write)
            .with_context(|| format!("failed to process {}", file.display()))?;
        for note in &outcome.notes {
            eprintln!("mdgroom: {}: {note}", file.display());
        }
        summary.noted += outcome.notes.len();
        if outcome.changed {
            summary.changed += 1;
            if !quiet {
                let verb = if write { "fixed" } else { "would fix" };
                println!("{verb} {}", file.display());
            }
        } else if !quiet && write {
            println!("unchanged {}", file.display());
        }
    }
    Ok(summary)
}

fn finish(summary: Summary, strict: bool, check: bool) -> Result<ExitCode> {
    if strict && summary.noted > 0 {
        bail!("{} fence diagnostic(s) in strict mode", summary.noted);
    }
    if check && summary.changed > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
