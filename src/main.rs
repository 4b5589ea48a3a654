//! CLI for generating object-detector performance graphs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use perfgraphs_rs::{
    ALL_PLATFORMS, Error, GraphStyle, PerformanceReport, Result, data, graph,
    platform_file_name,
};

#[derive(Debug, Parser)]
#[command(
    name = "perfgraphs",
    version,
    about = "Generates graphs based on performance test data"
)]
struct Args {
    /// Comma-separated list of SQLite database file paths, one per platform.
    /// A single path generates graphs for one platform.
    #[arg(short, long)]
    database: String,

    /// Platform to graph. Required with a single database; "all" requests
    /// the combined view.
    #[arg(short, long)]
    platform: Option<String>,

    /// Directory in which to save the generated graphs.
    #[arg(short, long)]
    output: PathBuf,

    /// Also write the aggregated reports as JSON next to the graphs.
    #[arg(long)]
    dump_report: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let sources: Vec<PathBuf> = args
        .database
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();

    if sources.is_empty() {
        return Err(Error::InvalidArguments(
            "no database file paths provided".into(),
        ));
    }
    if !args.output.is_dir() {
        return Err(Error::InvalidArguments(format!(
            "output directory '{}' does not exist",
            args.output.display()
        )));
    }

    let requested = match (args.platform.as_deref(), sources.len()) {
        (Some(platform), 1) => platform.to_string(),
        (None, 1) => {
            return Err(Error::InvalidArguments(
                "a platform name is required with a single database".into(),
            ));
        }
        (Some(platform), _) if platform != ALL_PLATFORMS => {
            return Err(Error::InvalidArguments(
                "multiple databases imply the combined view; drop --platform or pass 'all'".into(),
            ));
        }
        _ => ALL_PLATFORMS.to_string(),
    };

    info!(sources = sources.len(), platform = %requested, "validating benchmark data");
    data::validate(&sources, &requested)?;

    let style = GraphStyle::default();

    if requested == ALL_PLATFORMS && sources.len() > 1 {
        // One chart pair per platform, then the combined pair.
        for platform in data::platform_names(&sources)? {
            let report = data::compute(&sources, &platform)?;
            render(&report, &style, &args.output, args.dump_report)?;
        }
        let combined = data::compute(&sources, ALL_PLATFORMS)?;
        render(&combined, &style, &args.output, args.dump_report)?;
    } else {
        let report = data::compute(&sources, &requested)?;
        render(&report, &style, &args.output, args.dump_report)?;
    }

    Ok(())
}

fn render(
    report: &PerformanceReport,
    style: &GraphStyle,
    output_directory: &Path,
    dump_report: bool,
) -> Result<()> {
    graph::render_frame_time_graph(
        &report.frame_times,
        report.is_multi_platform,
        style,
        output_directory,
    )?;
    graph::render_fps_graph(
        &report.frames_per_second,
        report.is_multi_platform,
        style,
        output_directory,
    )?;

    if dump_report {
        let path = output_directory.join(format!(
            "{}_report.json",
            platform_file_name(&report.frame_times.platform_name)
        ));
        std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
        info!(path = %path.display(), "saved aggregated report");
    }

    Ok(())
}
