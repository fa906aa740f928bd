use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::{CalendarCell, MonthKey, WEEKDAY_LABELS, bin_by_month};
use crate::cli::Command;
use crate::clock::{local_hour, today_in_timezone};
use crate::config::Config;
use crate::dashboard::{DashboardBuckets, Greeting, bucket_for_dashboard, greeting_for_hour};
use crate::deadline::{DateKey, parse_deadline};
use crate::priority::{PriorityCounts, PriorityGroups, group_by_priority};
use crate::relative::{Classification, classify};
use crate::render::Renderer;
use crate::source::load_tasks;

#[derive(Debug, Serialize)]
struct CalendarOutput<'a> {
    title: String,
    year: i32,
    month: u32,
    today: DateKey,
    weekdays: [&'static str; 7],
    cells: &'a [Option<CalendarCell>],
}

#[derive(Debug, Serialize)]
struct DashboardOutput<'a> {
    greeting: Greeting,
    today: DateKey,
    #[serde(flatten)]
    buckets: &'a DashboardBuckets,
    priority_counts: PriorityCounts,
}

#[derive(Debug, Serialize)]
struct PrioritiesOutput<'a> {
    today: DateKey,
    #[serde(flatten)]
    groups: &'a PriorityGroups,
    counts: PriorityCounts,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    deadline: Option<&'a str>,
    today: DateKey,
    #[serde(flatten)]
    classification: &'a Classification,
}

/// Everything a command needs from the host: config, output style and the
/// instant it runs at. The engine below never sees the clock itself.
#[derive(Debug, Clone)]
pub struct Session {
    pub cfg: Config,
    pub renderer: Renderer,
    pub json: bool,
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn resolve_today(&self, explicit: Option<DateKey>) -> DateKey {
        if let Some(today) = explicit {
            debug!(%today, "using explicit today");
            return today;
        }
        let timezone = self.cfg.timezone();
        let today = today_in_timezone(self.now, timezone);
        debug!(%today, %timezone, "derived today from clock");
        today
    }

    fn greeting(&self) -> Greeting {
        greeting_for_hour(local_hour(self.now, self.cfg.timezone()))
    }
}

#[tracing::instrument(skip_all)]
pub fn dispatch(session: &Session, command: Command) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    dispatch_to(session, command, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn dispatch_to<W: Write>(session: &Session, command: Command, mut out: W) -> anyhow::Result<()> {
    match command {
        Command::Calendar {
            source,
            month,
            today,
        } => {
            let today = session.resolve_today(today.today);
            let month = month.unwrap_or_else(|| MonthKey::from_date(today));
            let tasks = load_tasks(&source.tasks)?;
            info!(month = %month.title(), tasks = tasks.len(), "rendering calendar");

            let cells = bin_by_month(&tasks, month.year(), month.month())?;
            if session.json {
                write_json(
                    &mut out,
                    &CalendarOutput {
                        title: month.title(),
                        year: month.year(),
                        month: month.month(),
                        today,
                        weekdays: WEEKDAY_LABELS,
                        cells: &cells,
                    },
                )
            } else {
                session.renderer.write_calendar(&mut out, month, &cells, today)
            }
        }
        Command::Dashboard {
            source,
            today,
            upcoming_limit,
            overdue_limit,
        } => {
            let today = session.resolve_today(today.today);
            let mut limits = session.cfg.dashboard_limits();
            if let Some(limit) = upcoming_limit {
                limits.upcoming = limit;
            }
            if let Some(limit) = overdue_limit {
                limits.overdue = limit;
            }
            let tasks = load_tasks(&source.tasks)?;
            info!(%today, tasks = tasks.len(), "rendering dashboard");

            let buckets = bucket_for_dashboard(&tasks, today, limits);
            let counts = group_by_priority(&tasks).counts();
            let greeting = session.greeting();
            if session.json {
                write_json(
                    &mut out,
                    &DashboardOutput {
                        greeting,
                        today,
                        buckets: &buckets,
                        priority_counts: counts,
                    },
                )
            } else {
                session
                    .renderer
                    .write_dashboard(&mut out, greeting, &buckets, counts, today)
            }
        }
        Command::Priorities { source, today } => {
            let today = session.resolve_today(today.today);
            let tasks = load_tasks(&source.tasks)?;
            info!(tasks = tasks.len(), "rendering priority board");

            let groups = group_by_priority(&tasks);
            if session.json {
                write_json(
                    &mut out,
                    &PrioritiesOutput {
                        today,
                        groups: &groups,
                        counts: groups.counts(),
                    },
                )
            } else {
                session.renderer.write_priorities(&mut out, &groups, today)
            }
        }
        Command::Classify { deadline, today } => {
            let today = session.resolve_today(today.today);
            let classification = classify(parse_deadline(deadline.as_deref()), today);
            if session.json {
                write_json(
                    &mut out,
                    &ClassifyOutput {
                        deadline: deadline.as_deref(),
                        today,
                        classification: &classification,
                    },
                )
            } else {
                session
                    .renderer
                    .write_classification(&mut out, deadline.as_deref(), &classification)
            }
        }
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
