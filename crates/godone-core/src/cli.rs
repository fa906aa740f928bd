use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::calendar::MonthKey;
use crate::deadline::{DateKey, parse_deadline};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "godone",
    version,
    about = "GoDone: calendar, dashboard and priority views over a task list"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Print the computed view as JSON instead of text.
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct TaskSource {
    /// JSON array of task records; `-` reads stdin.
    #[arg(long = "tasks", default_value = "-")]
    pub tasks: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TodayArg {
    /// Day to treat as today (YYYY-MM-DD); defaults to the clock.
    #[arg(long = "today", value_parser = parse_date_arg)]
    pub today: Option<DateKey>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Month grid with tasks binned by deadline.
    Calendar {
        #[command(flatten)]
        source: TaskSource,

        /// Month to show (YYYY-MM); defaults to the current month.
        #[arg(long = "month", value_parser = parse_month_arg)]
        month: Option<MonthKey>,

        #[command(flatten)]
        today: TodayArg,
    },

    /// Overdue, due-today and upcoming tasks.
    Dashboard {
        #[command(flatten)]
        source: TaskSource,

        #[command(flatten)]
        today: TodayArg,

        #[arg(long = "upcoming-limit")]
        upcoming_limit: Option<usize>,

        #[arg(long = "overdue-limit")]
        overdue_limit: Option<usize>,
    },

    /// Active tasks grouped into high, medium and low columns.
    Priorities {
        #[command(flatten)]
        source: TaskSource,

        #[command(flatten)]
        today: TodayArg,
    },

    /// Classify a single deadline relative to today.
    Classify {
        deadline: Option<String>,

        #[command(flatten)]
        today: TodayArg,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

pub fn parse_date_arg(raw: &str) -> anyhow::Result<DateKey> {
    parse_deadline(Some(raw)).ok_or_else(|| anyhow!("expected a date as YYYY-MM-DD, got: {raw}"))
}

pub fn parse_month_arg(raw: &str) -> anyhow::Result<MonthKey> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("expected a month as YYYY-MM, got: {raw}"))?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(year) || !all_digits(month) {
        return Err(anyhow!("expected a month as YYYY-MM, got: {raw}"));
    }

    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    Ok(MonthKey::new(year, month)?)
}
