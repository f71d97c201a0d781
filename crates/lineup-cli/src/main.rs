mod logging;
mod report;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use lineup_assign::{
    AssignOptions, BuildOptions, DEFAULT_TIME_LIMIT, Placement, ProblemInput, UsageLinking, assign,
};
use lineup_core::{Solver, SolverConfig};
use lineup_highs::solver_by_name;

use crate::report::ProblemSummary;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assign containers to capacity-limited assembly lines"
)]
struct Cli {
    /// Log filter (for example `debug` or `lineup_highs=trace`); overrides LINEUP_TRACE
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve an assignment problem from a JSON document
    Solve(SolveArgs),
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// Input JSON document with `lines` and `containers`
    #[arg(long)]
    input: PathBuf,

    /// Backend to solve with
    #[arg(long, default_value = "highs")]
    solver: String,

    /// Wall-clock budget for the solve, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT.as_secs_f64())]
    time_limit_secs: f64,

    /// Threads the backend may use
    #[arg(long)]
    threads: Option<u32>,

    /// Relative MIP gap at which the backend may stop
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Allow containers to stay off every line and maximize how many are placed
    #[arg(long)]
    optional_placement: bool,

    /// Only count items that a placed container on the line requires
    #[arg(long)]
    tight_usage: bool,

    /// Write the model in LP format to this path before solving
    #[arg(long)]
    write_lp: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Echo the backend's own log to the console
    #[arg(long)]
    solver_log: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl SolveArgs {
    fn assign_options(&self) -> Result<AssignOptions, Box<dyn Error>> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(boxed_input_error(&format!(
                "--time-limit-secs must be a positive number, got {}",
                self.time_limit_secs
            )));
        }

        let mut solver = SolverConfig::new()
            .with_time_limit(Duration::from_secs_f64(self.time_limit_secs))
            .with_log_to_console(self.solver_log);
        if let Some(threads) = self.threads {
            solver = solver.with_threads(threads);
        }
        if let Some(gap) = self.mip_gap {
            solver = solver.with_mip_gap(gap);
        }
        solver.validate()?;

        let build = BuildOptions::default()
            .with_placement(if self.optional_placement {
                Placement::Optional
            } else {
                Placement::Exact
            })
            .with_usage(if self.tight_usage {
                UsageLinking::Tight
            } else {
                UsageLinking::Loose
            });

        let mut options = AssignOptions::default()
            .with_build(build)
            .with_solver(solver);
        if let Some(path) = &self.write_lp {
            options = options.with_lp_dump(path);
        }
        Ok(options)
    }
}

/// Exit status when the solve ends without a placement.
const EXIT_NO_SOLUTION: u8 = 2;

fn boxed_input_error(message: &str) -> Box<dyn Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

fn run_solve(args: &SolveArgs) -> Result<ExitCode, Box<dyn Error>> {
    let options = args.assign_options()?;
    let mut solver = solver_by_name(&args.solver)?;
    let input = ProblemInput::load(&args.input)?;
    let summary = ProblemSummary::of(&input);

    tracing::info!(
        component = "cli",
        operation = "solve",
        status = "start",
        input = %args.input.display(),
        containers = summary.containers,
        lines = summary.lines,
        items = summary.items,
        total_capacity = summary.total_capacity,
        "Solving assignment problem"
    );

    let outcome = assign(&input.containers, &input.lines, &mut solver, &options)?;

    let rendered = match args.format {
        OutputFormat::Table => report::render_table(&summary, solver.name(), &outcome),
        OutputFormat::Json => report::render_json(&summary, solver.name(), &outcome)?,
    };
    println!("{}", rendered.trim_end());

    Ok(if outcome.is_placed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NO_SOLUTION)
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.log_level.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Solve(args) => run_solve(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(
                component = "cli",
                operation = "solve",
                status = "error",
                error = %err,
                "Command failed"
            );
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
