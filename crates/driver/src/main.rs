mod input;

use crate::input::SubjectsFile;
use std::{
    fs,
    io,
    path::PathBuf,
    time::Duration,
};
use structopt::StructOpt;
use thiserror::Error;
use timetable::{
    build_model,
    solve_with_config,
    ConfigError,
    SolveConfig,
    Timetable,
};
use tracing::{
    debug,
    error,
    info,
};
use tracing_subscriber::EnvFilter;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(name = "subjects .json file", parse(from_os_str))]
    subjects: PathBuf,
    /// Rooms file, accepted for compatibility with the catalog export. It is never opened.
    #[structopt(long, parse(from_os_str))]
    rooms: Option<PathBuf>,
    /// Solver configuration in TOML.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Overrides the configured time limit, in seconds.
    #[structopt(long)]
    time_limit: Option<f64>,
}

#[derive(Debug, Error)]
enum DriverError {
    #[error("couldn't read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("couldn't decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solver(#[from] timetable::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let opt = Opt::from_args();
    if let Err(err) = run(opt) {
        error!(%err, "timetable generation failed");
        std::process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), DriverError> {
    let mut config = match &opt.config {
        Some(path) => SolveConfig::load(path)?,
        None => SolveConfig::default(),
    };
    if let Some(seconds) = opt.time_limit {
        config.time_limit_seconds = seconds;
        config.validate()?;
    }
    if let Some(rooms) = &opt.rooms {
        debug!(path = %rooms.display(), "rooms are not taken into account");
    }
    let text = fs::read_to_string(&opt.subjects).map_err(|source| {
        DriverError::Read {
            path: opt.subjects.clone(),
            source,
        }
    })?;
    let catalog = SubjectsFile::from_json(&text)
        .map_err(|source| {
            DriverError::Decode {
                path: opt.subjects.clone(),
                source,
            }
        })?
        .into_catalog();
    info!(levels = catalog.len(), "loaded subjects");
    let model = build_model(&catalog, &config)?;
    let result = solve_with_config(&model, &config);
    if result.status().has_solution() {
        let table = Timetable::extract(&model, &result).map_err(timetable::Error::from)?;
        println!("Generated timetable:\n");
        print!("{}", table);
        print_statistics(table.assigned_shifts(), result.wall_time());
    } else {
        println!("No timetable found: {}", result.status());
        print_statistics(0, result.wall_time());
    }
    Ok(())
}

fn print_statistics(assigned_shifts: usize, wall_time: Duration) {
    println!("\nStatistics");
    println!("  - Number of shift requests met = {}", assigned_shifts);
    println!("  - Wall time       : {:.3}s", wall_time.as_secs_f64());
}
