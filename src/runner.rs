use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use crate::error::HerdImmunityError;
use crate::log::LogLevelSpec;
use crate::parameters::Parameters;
use crate::report::{text_report_name, ReportOptions, StepCsvReport, TextReport};
use crate::simulation::{RunSummary, Simulation};
use crate::virus::Virus;

/// Command line arguments for a single run.
///
/// The five virus and population arguments are positional and may be omitted when a
/// `--config` file provides them. Positional values override the file.
#[derive(Parser, Debug, Default)]
#[command(name = "herd_immunity")]
#[command(about = "Simulates whether vaccination stops the spread of a virus through a population")]
pub struct RunArgs {
    /// Number of people in the population
    #[arg(required_unless_present = "config")]
    pub population_size: Option<usize>,

    /// Fraction of the population that is vaccinated, between 0 and 1
    #[arg(required_unless_present = "config", allow_negative_numbers = true)]
    pub vaccination_percentage: Option<f64>,

    /// Name of the virus
    #[arg(required_unless_present = "config")]
    pub virus_name: Option<String>,

    /// Probability that an infected person dies in a time step
    #[arg(required_unless_present = "config", allow_negative_numbers = true)]
    pub mortality_rate: Option<f64>,

    /// Probability that an interaction transmits the virus
    #[arg(required_unless_present = "config", allow_negative_numbers = true)]
    pub reproduction_rate: Option<f64>,

    /// Number of people infected at the start [default: 1]
    pub initial_infected: Option<usize>,

    /// Random seed [default: 42]
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for report output
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Prefix prepended to report file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Overwrite existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Enable diagnostic logging: a level (`info`), `module=level` pairs, or both
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Stop after this many time steps
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Count people infected by several sources in one step only once
    #[arg(long)]
    pub deduplicate_infections: bool,

    /// Also write a CSV with one row per time step
    #[arg(long)]
    pub step_csv: bool,
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, HerdImmunityError> {
    value.ok_or_else(|| {
        HerdImmunityError::ParameterError(format!(
            "missing {name}: pass it as an argument or in a --config file"
        ))
    })
}

/// Combines the optional parameters file with the command line.
///
/// # Errors
///
/// Returns an error if the parameters file cannot be loaded or a required value is
/// provided neither on the command line nor in the file.
pub fn build_parameters(args: &RunArgs) -> Result<Parameters, HerdImmunityError> {
    let mut parameters = match &args.config {
        Some(path) => {
            info!("Loading parameters from: {}", path.display());
            let mut parameters = Parameters::from_json_file(path)?;
            if let Some(population_size) = args.population_size {
                parameters.population_size = population_size;
            }
            if let Some(vaccination_percentage) = args.vaccination_percentage {
                parameters.vaccination_percentage = vaccination_percentage;
            }
            if let Some(name) = &args.virus_name {
                parameters.virus.name.clone_from(name);
            }
            if let Some(mortality_rate) = args.mortality_rate {
                parameters.virus.mortality_rate = mortality_rate;
            }
            if let Some(reproduction_rate) = args.reproduction_rate {
                parameters.virus.reproduction_rate = reproduction_rate;
            }
            if let Some(initial_infected) = args.initial_infected {
                parameters.initial_infected = initial_infected;
            }
            parameters
        }
        None => {
            let virus = Virus::new(
                required(args.virus_name.clone(), "virus name")?,
                required(args.reproduction_rate, "reproduction rate")?,
                required(args.mortality_rate, "mortality rate")?,
            );
            Parameters::new(
                required(args.population_size, "population size")?,
                required(args.vaccination_percentage, "vaccination percentage")?,
                virus,
                args.initial_infected.unwrap_or(1),
            )
        }
    };

    if let Some(seed) = args.random_seed {
        parameters.seed = seed;
    }
    if args.max_steps.is_some() {
        parameters.max_steps = args.max_steps;
    }
    parameters.deduplicate_new_infections |= args.deduplicate_infections;
    Ok(parameters)
}

/// Runs a simulation with the given arguments, writing its reports to disk.
///
/// # Errors
///
/// Returns an error if the parameters are invalid or a report cannot be written.
pub fn run_with_parsed_args(args: &RunArgs) -> Result<RunSummary, HerdImmunityError> {
    if let Some(log_level) = &args.log_level {
        log_level.parse::<LogLevelSpec>()?.apply()?;
    }

    let parameters = build_parameters(args)?;
    for warning in parameters.warnings() {
        warn!("{warning}");
    }

    let mut report_options = ReportOptions::new();
    report_options
        .directory(args.output_dir.clone())
        .file_prefix(args.file_prefix.clone())
        .overwrite(args.force_overwrite);

    let report_name = text_report_name(
        &parameters.virus.name,
        parameters.population_size,
        parameters.vaccination_percentage,
        parameters.initial_infected,
    );
    let text_report = TextReport::create(&report_options, &report_name)?;
    let step_report = if args.step_csv {
        let csv_name = format!("{}_steps.csv", report_name.trim_end_matches(".txt"));
        Some(StepCsvReport::create(&report_options, &csv_name)?)
    } else {
        None
    };

    let mut simulation = Simulation::from_parameters(&parameters, (text_report, step_report))?;
    simulation.run()
}

/// Parses the process arguments and runs a simulation.
///
/// # Errors
///
/// Returns an error if the run fails; argument errors exit the process with a usage
/// message.
pub fn run_with_args() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let args = RunArgs::parse();
    Ok(run_with_parsed_args(&args)?)
}
