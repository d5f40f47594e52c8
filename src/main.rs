use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use foamrun::config::{BatchDirectives, RunConfig, SolverConfig};
use foamrun::error::FoamrunError;
use foamrun::estimator::estimate_step;
use foamrun::shutdown::install_shutdown_handler;
use foamrun::slurm::render_submission_script;
use foamrun::solver::{DictionaryControl, SolverControl, SolverLauncher, StopMode};
use foamrun::watchdog::{supervise, StopSchedule};

#[derive(Parser, Debug)]
#[command(name = "foamrun")]
#[command(version)]
#[command(about = "Reservation watchdog and MPI launcher for OpenFOAM solver runs")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Estimate step duration, arm the graceful-stop timer, run the solver
    Run {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Show the timing plan without touching the case or launching anything
    Plan {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(long, short = 'o', default_value = "table")]
        output: OutputFormat,
    },

    /// Emit the batch submission script for this case
    Script {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        batch: BatchArgs,
    },
}

// =============================================================================
// Run Arguments (shared by all subcommands)
// =============================================================================

#[derive(Parser, Debug)]
struct RunArgs {
    /// Reservation walltime, scheduler syntax ([D-]HH:MM:SS)
    #[arg(long, default_value = "06:00:00")]
    walltime: String,

    /// OpenFOAM case directory
    #[arg(long, default_value = ".")]
    case: PathBuf,

    /// Solver executable
    #[arg(long, default_value = "reactingFoam")]
    solver: String,

    /// MPI rank count
    #[arg(long, default_value = "16")]
    ranks: u32,

    /// Solver log to sample (defaults to <case>/log.<solver>)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Safety factor applied to the worst observed step duration
    #[arg(long, default_value = "3.0")]
    safety_factor: f64,

    /// Step-duration guess in seconds when the log has too few samples
    #[arg(long, default_value = "3000.0")]
    fallback_step: f64,

    /// How many recent execution-time samples to consider
    #[arg(long, default_value = "10")]
    window: usize,

    /// MPI launcher program
    #[arg(long, default_value = "mpirun")]
    mpirun: String,

    /// Dictionary tool used to edit the case controlDict
    #[arg(long, default_value = "foamDictionary")]
    foam_dictionary: String,
}

impl RunArgs {
    fn to_config(&self) -> Result<RunConfig, FoamrunError> {
        Ok(RunConfig {
            walltime: self.walltime.parse()?,
            sample_window: self.window,
            fallback_step_secs: self.fallback_step,
            safety_factor: self.safety_factor,
            log_file: self.log.clone(),
            solver: SolverConfig {
                solver: self.solver.clone(),
                case_dir: self.case.clone(),
                ranks: self.ranks,
                mpirun: self.mpirun.clone(),
                foam_dictionary: self.foam_dictionary.clone(),
            },
        })
    }
}

// =============================================================================
// Batch Script Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Job name; the singleton constraint applies per name
    #[arg(long, default_value = "foamrun")]
    job_name: String,

    /// Scheduler partition
    #[arg(long, default_value = "compute")]
    partition: String,

    #[arg(long, default_value = "1")]
    nodes: u32,

    /// Scheduler task count; defaults to the MPI rank count
    #[arg(long)]
    ntasks: Option<u32>,

    /// Memory per CPU, scheduler syntax (e.g. "3G")
    #[arg(long)]
    mem_per_cpu: Option<String>,

    /// Stdout/stderr pattern
    #[arg(long, default_value = "%x.o%j")]
    output: String,

    /// Mail notification events; empty string disables mail
    #[arg(long, default_value = "END,FAIL")]
    mail_type: String,

    #[arg(long)]
    mail_user: Option<String>,

    /// Allow multiple jobs with this name to run concurrently
    #[arg(long)]
    no_singleton: bool,
}

impl BatchArgs {
    fn to_directives(&self, ranks: u32) -> BatchDirectives {
        BatchDirectives {
            job_name: self.job_name.clone(),
            partition: self.partition.clone(),
            nodes: self.nodes,
            ntasks: self.ntasks.unwrap_or(ranks),
            mem_per_cpu: self.mem_per_cpu.clone(),
            output: self.output.clone(),
            mail_type: if self.mail_type.is_empty() {
                None
            } else {
                Some(self.mail_type.clone())
            },
            mail_user: self.mail_user.clone(),
            singleton: !self.no_singleton,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// Plan Output
// =============================================================================

#[derive(Serialize)]
struct PlanReport {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    walltime: String,
    walltime_secs: u64,
    samples_used: usize,
    fallback: bool,
    max_step_secs: f64,
    safety_factor: f64,
    stop_margin_secs: f64,
    safe_sleep_secs: f64,
    stop_request_at: DateTime<Utc>,
    command: String,
}

fn stop_request_eta(schedule: &StopSchedule) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(schedule.safe_sleep_secs as i64)
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn handle_run(config: RunConfig) -> i32 {
    let run_id = Uuid::new_v4();
    let log = config.log_path();
    tracing::info!(
        %run_id,
        walltime = %config.walltime,
        solver = %config.solver.solver,
        case = %config.solver.case_dir.display(),
        "Starting reservation-limited solver run"
    );

    let control = Arc::new(DictionaryControl::new(&config.solver));

    // Clear any stale stop request left by a previous run of this case.
    if let Err(e) = control.request(StopMode::RunToEnd).await {
        tracing::error!(error = %e, "Failed to reset solver stop entry");
        return 2;
    }

    let estimate = estimate_step(&log, config.sample_window, config.fallback_step_secs);

    let schedule = match StopSchedule::plan(
        estimate.max_step_secs,
        config.safety_factor,
        config.walltime,
    ) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!(error = %e, "Refusing to launch");
            return 1;
        }
    };

    tracing::info!(
        max_step_secs = estimate.max_step_secs,
        fallback = estimate.fallback,
        stop_margin_secs = schedule.stop_margin_secs,
        safe_sleep_secs = schedule.safe_sleep_secs,
        stop_request_at = %stop_request_eta(&schedule),
        "Stop schedule armed"
    );

    let launcher = SolverLauncher::new(config.solver.clone());
    let shutdown = install_shutdown_handler();

    match supervise(schedule, &launcher, control, shutdown).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::error!(error = %e, "Solver run failed");
            2
        }
    }
}

fn handle_plan(config: RunConfig, output: OutputFormat) -> i32 {
    let log = config.log_path();
    let estimate = estimate_step(&log, config.sample_window, config.fallback_step_secs);

    let schedule = match StopSchedule::plan(
        estimate.max_step_secs,
        config.safety_factor,
        config.walltime,
    ) {
        Ok(schedule) => schedule,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let launcher = SolverLauncher::new(config.solver.clone());
    let report = PlanReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        walltime: config.walltime.to_string(),
        walltime_secs: config.walltime.total_seconds(),
        samples_used: estimate.samples_used,
        fallback: estimate.fallback,
        max_step_secs: estimate.max_step_secs,
        safety_factor: config.safety_factor,
        stop_margin_secs: schedule.stop_margin_secs,
        safe_sleep_secs: schedule.safe_sleep_secs,
        stop_request_at: stop_request_eta(&schedule),
        command: launcher.command_line().join(" "),
    };

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize plan: {e}");
                return 2;
            }
        },
        OutputFormat::Table => {
            println!("Timing plan");
            println!("{}", "=".repeat(40));
            println!("Walltime:        {} ({}s)", report.walltime, report.walltime_secs);
            if report.fallback {
                println!("Samples:         {} (fallback guess)", report.samples_used);
            } else {
                println!("Samples:         {}", report.samples_used);
            }
            println!("Max step:        {:.1}s", report.max_step_secs);
            println!("Safety factor:   {}", report.safety_factor);
            println!("Stop margin:     {:.1}s", report.stop_margin_secs);
            println!("Safe sleep:      {:.1}s", report.safe_sleep_secs);
            println!("Stop request at: {}", report.stop_request_at);
            println!("Command:         {}", report.command);
        }
    }
    0
}

fn handle_script(config: RunConfig, batch: BatchDirectives) -> i32 {
    print!("{}", render_submission_script(&batch, &config));
    0
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let code = match args.command {
        Commands::Run { run } => match run.to_config() {
            Ok(config) => handle_run(config).await,
            Err(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                2
            }
        },
        Commands::Plan { run, output } => match run.to_config() {
            Ok(config) => handle_plan(config, output),
            Err(e) => {
                eprintln!("Error: {e}");
                2
            }
        },
        Commands::Script { run, batch } => match run.to_config() {
            Ok(config) => {
                let directives = batch.to_directives(config.solver.ranks);
                handle_script(config, directives)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                2
            }
        },
    };

    std::process::exit(code);
}
