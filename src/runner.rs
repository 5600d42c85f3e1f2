//! The headless driver: parse command line arguments, build a population and advance it round
//! by round, optionally writing the per-round counts report.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, LevelFilter};

use crate::error::SimError;
use crate::log::{set_log_level, set_module_filters};
use crate::parameters::Parameters;
use crate::population::Population;
use crate::report::{ReportOptions, RoundReportWriter};

/// Default cli arguments for the simulation runner
#[derive(Args, Debug, Clone)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Optional directory for the per-round counts report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Overwrite existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Number of rounds to simulate
    #[arg(short = 'n', long, default_value = "200")]
    pub rounds: usize,

    /// Stop early once no healthy agents remain
    #[arg(long)]
    pub stop_when_over: bool,

    /// Enable logging: a level (`info`) or comma separated `module=level` pairs
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Default for BaseArgs {
    fn default() -> Self {
        BaseArgs {
            random_seed: 0,
            config: None,
            output_dir: None,
            file_prefix: String::new(),
            force_overwrite: false,
            rounds: 200,
            stop_when_over: false,
            log_level: None,
        }
    }
}

fn create_cli() -> Command {
    let cli = Command::new("epidemic-sim")
        .about("Simulates disease spread among moving agents with a capacity-limited hospital");
    BaseArgs::augment_args(cli)
}

type ModuleFilters = Vec<(String, LevelFilter)>;

/// Parses `info` or `epidemic_sim=debug,epidemic_sim::spatial=off` into a global level and
/// module filters.
fn parse_log_levels(levels: &str) -> Result<(Option<LevelFilter>, ModuleFilters), SimError> {
    let parse_level = |level: &str| {
        LevelFilter::from_str(level.trim())
            .map_err(|_| SimError::InvalidParameter(format!("unknown log level: {level}")))
    };

    let mut global = None;
    let mut modules = Vec::new();
    for item in levels.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        match item.split_once('=') {
            Some((module, level)) => modules.push((module.trim().to_string(), parse_level(level)?)),
            None => global = Some(parse_level(item)?),
        }
    }
    Ok((global, modules))
}

fn configure_logging(levels: &str) -> Result<(), SimError> {
    let (global, modules) = parse_log_levels(levels)?;
    if let Some(level) = global {
        set_log_level(level);
    }
    if !modules.is_empty() {
        set_module_filters(&modules);
        for (module, level) in &modules {
            println!("Logging enabled for {module} at level {level}");
        }
    }
    Ok(())
}

/// Runs a simulation with arguments parsed from the command line.
///
/// # Errors
/// Returns an error if argument parsing or the simulation setup fails
pub fn run_with_args() -> Result<Population, Box<dyn std::error::Error>> {
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run_simulation(&args)?)
}

/// Builds the population described by `args` and advances it `args.rounds` times, writing the
/// counts of round 0 and of every later round to the report when an output directory is set.
/// Prints the summary line of the last round.
///
/// # Errors
/// Returns an error if logging, parameter loading, population construction or reporting fails
pub fn run_simulation(args: &BaseArgs) -> Result<Population, SimError> {
    if let Some(levels) = &args.log_level {
        configure_logging(levels)?;
    }

    let parameters = match &args.config {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };

    let mut population = Population::new(parameters, args.random_seed)?;

    let mut report = match &args.output_dir {
        Some(directory) => {
            let mut options = ReportOptions::new();
            options
                .directory(directory.clone())
                .file_prefix(args.file_prefix.clone())
                .overwrite(args.force_overwrite);
            Some(RoundReportWriter::create(&options, "counts")?)
        }
        None => None,
    };
    if let Some(report) = report.as_mut() {
        report.send(&population.counts())?;
    }

    for _ in 0..args.rounds {
        if args.stop_when_over && population.is_over() {
            info!("no healthy agents left at round {}", population.round());
            break;
        }
        population.update();
        if let Some(report) = report.as_mut() {
            report.send(&population.counts())?;
        }
    }

    println!("{}", population.counts());
    Ok(population)
}
