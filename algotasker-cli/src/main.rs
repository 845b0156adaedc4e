use algotasker_core::{
    Algorithm, SchedulingAnalytics, analytics::DEFAULT_WINDOW_DAYS, apply_schedule,
    clear_schedule, compare_algorithms, group_by_day, parse_local_datetime, recommend, schedule_tasks,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(name = "algotasker", version, about = "Schedule tasks into working hours with SJF, Round-Robin or Priority")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a schedule with one algorithm
    Schedule {
        /// JSON task file (default: ~/.algotasker/tasks.json)
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// SJF, RoundRobin or Priority (default: from config)
        #[arg(long)]
        algorithm: Option<Algorithm>,

        /// Round-Robin time quantum in minutes
        #[arg(long)]
        quantum: Option<i32>,

        /// Reference time: RFC 3339 or "YYYY-MM-DD HH:MM" local (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Write the scheduled slots back into the task file
        #[arg(long)]
        apply: bool,
    },

    /// Run every algorithm and recommend the best one
    Compare {
        #[arg(long)]
        tasks: Option<PathBuf>,

        #[arg(long)]
        quantum: Option<i32>,

        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show scheduled open tasks grouped by day
    Agenda {
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Remove every scheduled slot from the task file
    Clear {
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Estimate accuracy and algorithm usage for recently completed tasks
    Analytics {
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Look-back window in days
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        days: i64,

        #[arg(long)]
        now: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.algotasker/config.toml with defaults
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Schedule {
            tasks,
            algorithm,
            quantum,
            now,
            json,
            apply,
        } => {
            let cfg = config::load_config()?;
            let tz = cfg.timezone()?;
            let algorithm = match algorithm {
                Some(a) => a,
                None => cfg.default_algorithm()?,
            };
            let options = cfg.scheduling_options(quantum)?;
            let now = resolve_now(now.as_deref(), tz)?;

            let path = tasks_path(tasks)?;
            let records = state::read_tasks(&path)?;
            info!(tasks = records.len(), %algorithm, %now, "scheduling");

            let result = schedule_tasks(&records, algorithm, &options, now)
                .with_context(|| format!("{algorithm} scheduling failed"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                report::print_schedule(&result, tz);
            }

            if apply {
                let updated = apply_schedule(&records, &result);
                state::write_tasks(&path, &updated)?;
                if !json {
                    println!("\nSaved scheduled slots to {}", path.display());
                }
            }
        }

        Command::Compare {
            tasks,
            quantum,
            now,
            json,
        } => {
            let cfg = config::load_config()?;
            let tz = cfg.timezone()?;
            let options = cfg.scheduling_options(quantum)?;
            let now = resolve_now(now.as_deref(), tz)?;
            let records = state::read_tasks(&tasks_path(tasks)?)?;

            let comparison = compare_algorithms(&records, &options, now);
            let recommendation = recommend(&comparison);

            if json {
                let out = serde_json::json!({
                    "comparison": comparison,
                    "recommendation": recommendation,
                    "task_count": records.len(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                report::print_comparison(&comparison, recommendation.as_ref());
            }
        }

        Command::Agenda { tasks } => {
            let cfg = config::load_config()?;
            let records = state::read_tasks(&tasks_path(tasks)?)?;
            report::print_agenda(&group_by_day(&records), cfg.timezone()?);
        }

        Command::Clear { tasks } => {
            let path = tasks_path(tasks)?;
            let records = state::read_tasks(&path)?;
            let cleared = records.iter().filter(|t| t.scheduled.is_some()).count();
            state::write_tasks(&path, &clear_schedule(&records))?;
            info!(cleared, "schedule cleared");
            println!("Cleared {cleared} scheduled slot(s) in {}", path.display());
        }

        Command::Analytics {
            tasks,
            days,
            now,
            json,
        } => {
            let cfg = config::load_config()?;
            let now = resolve_now(now.as_deref(), cfg.timezone()?)?;
            let records = state::read_tasks(&tasks_path(tasks)?)?;

            let analytics = SchedulingAnalytics::calculate(&records, now, days);
            if json {
                println!("{}", serde_json::to_string_pretty(&analytics)?);
            } else {
                report::print_analytics(&analytics, days);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                println!("Working hours: {}", cfg.working_hours()?);
            }
        },
    }

    Ok(())
}

fn tasks_path(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(p) => Ok(p),
        None => state::default_tasks_path(),
    }
}

/// The engine never reads the clock; the CLI does it once here.
fn resolve_now(arg: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    match arg {
        Some(s) => parse_local_datetime(s, tz).context("--now"),
        None => Ok(Utc::now()),
    }
}
