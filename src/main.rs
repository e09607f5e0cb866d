use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use racepace::catalog::StrategyAdvice;
use racepace::config::{load_request, AppConfig, OutputFormat};
use racepace::conversion::{pace_to_seconds, seconds_to_pace, seconds_to_time};
use racepace::logging::{init_logging, LogLevel};
use racepace::{
    FitnessPlan, FitnessSegments, PacingCalculator, PacingPlan, RaceStrategy, RaceType,
    TargetPlan, TargetSegments, WhatIfOverrides, WhatIfRecalculator,
};

/// racepace - Race Day Pacing CLI
///
/// Builds swim/bike/run pacing plans for triathlons and running races from
/// current fitness or a goal finish time.
#[derive(Parser)]
#[command(name = "racepace")]
#[command(version)]
#[command(about = "Race day pacing calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a pacing plan from a request file (TOML or JSON)
    Plan {
        /// Request file path
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short = 'f', long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Recompute the finish time with adjusted segment values
    WhatIf {
        /// Request file path (must be a fitness-based triathlon request)
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,

        /// Swim pace per 100 yd (M:SS)
        #[arg(long)]
        swim_pace: Option<String>,

        /// T1 in seconds
        #[arg(long)]
        t1: Option<f64>,

        /// Bike speed in mph
        #[arg(long)]
        bike_speed: Option<f64>,

        /// T2 in seconds
        #[arg(long)]
        t2: Option<f64>,

        /// Run pace per mile (M:SS)
        #[arg(long)]
        run_pace: Option<String>,
    },

    /// List supported races with their distances
    Races,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    if let Some(level) = LogLevel::from_verbosity(cli.verbose) {
        config.logging.level = level;
    }
    init_logging(&config.logging)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let outcome = run(cli.command, &config);

    // Engine errors get the friendly message; everything else keeps its context chain
    if let Err(err) = &outcome {
        if let Some(engine_err) = err.downcast_ref::<racepace::RacePaceError>() {
            tracing::debug!(
                severity = ?engine_err.severity(),
                "Request rejected"
            );
            eprintln!("{} {}", "✗".red().bold(), engine_err.user_message());
            std::process::exit(1);
        }
    }

    outcome
}

fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Plan { request, format } => {
            let request = load_request(&request)?;
            let plan = PacingCalculator::calculate(&request)?;

            match format.unwrap_or(config.output.format) {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&plan)
                        .context("Failed to serialize pacing plan")?;
                    println!("{}", json);
                }
                OutputFormat::Table => {
                    print_plan(&plan);
                    if config.output.show_strategy {
                        print_strategy(&plan.context().strategy);
                    }
                }
            }
        }

        Commands::WhatIf {
            request,
            swim_pace,
            t1,
            bike_speed,
            t2,
            run_pace,
        } => {
            let request = load_request(&request)?;
            let plan = PacingCalculator::calculate(&request)?;

            let overrides = WhatIfOverrides {
                swim_pace_seconds: parse_pace_override(swim_pace)?,
                t1_seconds: t1,
                bike_speed_mph: bike_speed,
                t2_seconds: t2,
                run_pace_seconds: parse_pace_override(run_pace)?,
            };

            print_what_if(&plan, &overrides);
        }

        Commands::Races => print_races(),
    }

    Ok(())
}

fn parse_pace_override(pace: Option<String>) -> Result<Option<f64>> {
    let seconds = pace.map(|p| pace_to_seconds(&p)).transpose()?;
    Ok(seconds.map(f64::from))
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "HR")]
    heart_rate: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Effort")]
    effort: String,
}

impl SegmentRow {
    fn new(segment: &str, target: String, range: String, heart_rate: String, time: f64) -> Self {
        Self {
            segment: segment.to_string(),
            target,
            range,
            heart_rate,
            time: seconds_to_time(time),
            effort: String::new(),
        }
    }

    fn transition(segment: &str, time: f64) -> Self {
        Self::new(segment, "-".into(), "-".into(), "-".into(), time)
    }

    fn effort(mut self, effort: impl ToString) -> Self {
        self.effort = effort.to_string();
        self
    }
}

fn print_plan(plan: &PacingPlan) {
    let context = plan.context();

    println!(
        "{}",
        format!("{} pacing plan", context.race_type).green().bold()
    );
    println!(
        "  Max HR: {:.0} bpm  Threshold HR: {} bpm  RPE: {}",
        context.heart_rate.max_hr, context.heart_rate.threshold_hr, context.zones.rpe
    );

    let rows = match plan {
        PacingPlan::Fitness(plan) => fitness_rows(plan),
        PacingPlan::Target(plan) => target_rows(plan),
    };

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!(
        "{} {}",
        "Estimated finish:".bold(),
        plan.total_time().cyan().bold()
    );
}

fn fitness_rows(plan: &FitnessPlan) -> Vec<SegmentRow> {
    let thresholds = &plan.thresholds;
    println!(
        "  Threshold run pace: {}/mi{}{}",
        thresholds.run_threshold_pace(),
        thresholds
            .css()
            .map(|css| format!("  CSS: {}/100yd", css))
            .unwrap_or_default(),
        thresholds
            .ftp_watts
            .map(|ftp| format!("  FTP: {} W", ftp))
            .unwrap_or_default(),
    );

    match &plan.segments {
        FitnessSegments::Triathlon(segments) => {
            let bike = &segments.bike;
            vec![
                SegmentRow::new(
                    "Swim",
                    format!("{}/100yd", segments.swim.target_pace()),
                    "-".into(),
                    "-".into(),
                    segments.swim.estimated_time_seconds,
                )
                .effort(segments.swim.effort),
                SegmentRow::transition("T1", segments.t1.time_seconds),
                SegmentRow::new(
                    "Bike",
                    format!("{} W @ {} mph", bike.target_power, bike.estimated_speed_mph),
                    format!("{}-{} W", bike.power_range.low, bike.power_range.high),
                    format!("{} ({}-{})", bike.target_hr, bike.hr_range.low, bike.hr_range.high),
                    bike.estimated_time_seconds,
                )
                .effort(bike.effort),
                SegmentRow::transition("T2", segments.t2.time_seconds),
                run_row(&segments.run),
            ]
        }
        FitnessSegments::Run(run) => vec![run_row(run)],
    }
}

fn run_row(run: &racepace::RunFitnessTarget) -> SegmentRow {
    let target = match run.target_power {
        Some(watts) => format!("{}/mi @ {} W", run.target_pace(), watts),
        None => format!("{}/mi", run.target_pace()),
    };
    SegmentRow::new(
        "Run",
        target,
        run.pace_range(),
        format!("{} ({}-{})", run.target_hr, run.hr_range.low, run.hr_range.high),
        run.estimated_time_seconds,
    )
    .effort(run.effort)
}

fn target_rows(plan: &TargetPlan) -> Vec<SegmentRow> {
    match &plan.segments {
        TargetSegments::Triathlon(segments) => vec![
            SegmentRow::new(
                "Swim",
                format!("{}/100yd", seconds_to_pace(segments.swim.required_pace_seconds)),
                "-".into(),
                "-".into(),
                segments.swim.target_time_seconds,
            ),
            SegmentRow::transition("T1", segments.t1.time_seconds),
            SegmentRow::new(
                "Bike",
                format!("{} mph", segments.bike.required_speed_mph),
                "-".into(),
                "-".into(),
                segments.bike.target_time_seconds,
            ),
            SegmentRow::transition("T2", segments.t2.time_seconds),
            SegmentRow::new(
                "Run",
                format!("{}/mi", segments.run.required_pace()),
                "-".into(),
                "-".into(),
                segments.run.target_time_seconds,
            ),
        ],
        TargetSegments::Run(run) => vec![SegmentRow::new(
            "Run",
            format!("{}/mi", run.required_pace()),
            "-".into(),
            "-".into(),
            run.target_time_seconds,
        )],
    }
}

fn print_strategy(strategy: &RaceStrategy) {
    println!();
    println!("{}", "Race strategy".yellow().bold());
    println!("  {} {}", "Common mistake:".bold(), strategy.mistake);
    match strategy.advice {
        StrategyAdvice::Triathlon { swim, bike, run } => {
            println!("  {} {}", "Swim:".bold(), swim);
            println!("  {} {}", "Bike:".bold(), bike);
            println!("  {} {}", "Run:".bold(), run);
        }
        StrategyAdvice::Run { strategy } => {
            println!("  {} {}", "Strategy:".bold(), strategy);
        }
    }
    println!("  {} {}", "Mindset:".bold(), strategy.mindset.italic());
}

fn print_what_if(plan: &PacingPlan, overrides: &WhatIfOverrides) {
    let baseline = plan.total_time_seconds();
    let adjusted = WhatIfRecalculator::total_time_seconds(plan, overrides);

    match WhatIfRecalculator::breakdown(plan, overrides) {
        Some(breakdown) => {
            println!("{}", "What-if finish time".cyan().bold());
            println!("  Swim: {}", seconds_to_time(breakdown.swim_seconds));
            println!("  T1:   {}", seconds_to_time(breakdown.t1_seconds));
            println!("  Bike: {}", seconds_to_time(breakdown.bike_seconds));
            println!("  T2:   {}", seconds_to_time(breakdown.t2_seconds));
            println!("  Run:  {}", seconds_to_time(breakdown.run_seconds));
        }
        None => println!(
            "{}",
            "What-if adjustments apply to fitness-based triathlon plans only".yellow()
        ),
    }

    let delta = adjusted - baseline;
    let delta_label = if delta <= 0.0 {
        format!("-{}", seconds_to_time(-delta)).green()
    } else {
        format!("+{}", seconds_to_time(delta)).red()
    };

    println!(
        "{} {} ({} vs plan {})",
        "Finish:".bold(),
        seconds_to_time(adjusted).cyan().bold(),
        delta_label,
        seconds_to_time(baseline)
    );
}

#[derive(Tabled)]
struct RaceRow {
    #[tabled(rename = "Race")]
    name: &'static str,
    #[tabled(rename = "Swim (mi)")]
    swim: String,
    #[tabled(rename = "Bike (mi)")]
    bike: String,
    #[tabled(rename = "Run (mi)")]
    run: String,
    #[tabled(rename = "RPE")]
    rpe: &'static str,
}

fn print_races() {
    let distance = |miles: f64| {
        if miles > 0.0 {
            format!("{}", miles)
        } else {
            "-".to_string()
        }
    };

    let rows: Vec<RaceRow> = RaceType::ALL
        .iter()
        .map(|race| {
            let (swim, bike, run) = match race.nominal_distances() {
                Some(d) => (distance(d.swim_miles), distance(d.bike_miles), distance(d.run_miles)),
                None => ("custom".into(), "custom".into(), "custom".into()),
            };
            RaceRow {
                name: race.name(),
                swim: if race.is_triathlon() { swim } else { "-".into() },
                bike: if race.is_triathlon() { bike } else { "-".into() },
                run,
                rpe: match race {
                    RaceType::CustomRun => "-",
                    _ => race.zones().rpe,
                },
            }
        })
        .collect();

    println!("{}", "Supported races".green().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
}
