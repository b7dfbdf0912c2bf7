use std::path::{Path, PathBuf};

use alsd_core::{
    AlsdConfig, ReportOptions, fixtures::write_demo_live_set, init_tracing_with_config, load,
    render_report,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

const LIVE_SET_EXTENSION: &str = "als";

#[derive(Debug, Parser)]
#[command(name = "alsd")]
#[command(about = "Dump tracks, devices, clips and automation from Ableton Live sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Also write a JSON log file into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Dump {
        /// Live set files, or directories to search for them.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// The track number to display (0 = master).
        #[arg(short, long)]
        track: Option<usize>,

        #[arg(short = 'D', long)]
        show_devices: bool,

        #[arg(short = 'C', long)]
        show_clips: bool,

        /// Display the master track settings.
        #[arg(short = 'M', long = "show-mastertrack")]
        show_master: bool,

        /// Print the loaded model as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
    Demo {
        #[arg(long, default_value = "demo.als")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AlsdConfig::load_from(path)?,
        None => AlsdConfig::load()?,
    };
    if cli.log_dir.is_some() {
        config.diagnostics.log_dir.clone_from(&cli.log_dir);
    }
    let _telemetry = init_tracing_with_config(&config.diagnostics)?;

    match cli.command {
        Commands::Dump {
            paths,
            track,
            show_devices,
            show_clips,
            show_master,
            json,
        } => {
            let options = ReportOptions {
                track,
                show_devices: show_devices || config.report.show_devices,
                show_clips: show_clips || config.report.show_clips,
                show_master: show_master || config.report.show_master,
            };
            for path in live_set_paths(&paths) {
                dump(&path, &options, json)?;
            }
        }
        Commands::Demo { output } => {
            write_demo_live_set(&output)?;
            tracing::info!(path = %output.display(), "demo live set written");
        }
    }

    Ok(())
}

fn dump(path: &Path, options: &ReportOptions, json: bool) -> anyhow::Result<()> {
    let project = load(path).with_context(|| format!("failed to load {}", path.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        let report = render_report(&project, options)
            .with_context(|| format!("cannot report on {}", path.display()))?;
        print!("{report}");
    }
    Ok(())
}

fn live_set_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            found.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry)
                    if entry.file_type().is_file()
                        && entry.path().extension().is_some_and(|ext| ext == LIVE_SET_EXTENSION) =>
                {
                    found.push(entry.into_path());
                }
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, "skipping unreadable directory entry"),
            }
        }
    }
    found
}
