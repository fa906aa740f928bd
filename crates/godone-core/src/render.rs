use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::calendar::{CalendarCell, MonthKey, WEEKDAY_LABELS};
use crate::config::Config;
use crate::dashboard::{DashboardBuckets, Greeting};
use crate::deadline::{DateKey, month_abbrev};
use crate::priority::{PriorityCounts, PriorityGroups};
use crate::relative::{Classification, deadline_label};
use crate::task::{Priority, Task};

const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";
const GRAY: &str = "90";
const BOLD: &str = "1";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.display.color,
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, out, cells))]
    pub fn write_calendar<W: Write>(
        &self,
        mut out: W,
        month: MonthKey,
        cells: &[Option<CalendarCell>],
        today: DateKey,
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&month.title(), BOLD))?;
        writeln!(out)?;

        let headers = WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect();
        let rows = cells
            .chunks(7)
            .map(|week| {
                let mut row = week
                    .iter()
                    .map(|cell| match cell {
                        Some(cell) => self.day_marker(cell, today),
                        None => String::new(),
                    })
                    .collect::<Vec<_>>();
                row.resize(7, String::new());
                row
            })
            .collect();
        write_table(&mut out, headers, rows)?;

        let mut detail_rows = Vec::new();
        for cell in cells.iter().flatten() {
            for task in cell.tasks_by_priority() {
                detail_rows.push(vec![
                    format!("{} {}", month_abbrev(cell.date.month()), cell.day),
                    task.title.clone(),
                    task.category_label().to_string(),
                    self.priority_cell(task),
                ]);
            }
        }

        writeln!(out)?;
        if detail_rows.is_empty() {
            writeln!(out, "No tasks due this month.")?;
        } else {
            write_table(
                &mut out,
                vec![
                    "Date".to_string(),
                    "Task".to_string(),
                    "Category".to_string(),
                    "Priority".to_string(),
                ],
                detail_rows,
            )?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, out, buckets, counts))]
    pub fn write_dashboard<W: Write>(
        &self,
        mut out: W,
        greeting: Greeting,
        buckets: &DashboardBuckets,
        counts: PriorityCounts,
        today: DateKey,
    ) -> anyhow::Result<()> {
        writeln!(out, "Hello, {}!", greeting.text())?;

        for (heading, tasks) in [
            ("Overdue", &buckets.overdue),
            ("Today", &buckets.today),
            ("Upcoming", &buckets.upcoming),
        ] {
            writeln!(out)?;
            writeln!(out, "{}", self.paint(heading, BOLD))?;
            self.write_task_rows(&mut out, tasks, today)?;
        }

        writeln!(out)?;
        writeln!(out, "{}", self.paint("Task Priorities", BOLD))?;
        let rows = Priority::ALL
            .iter()
            .map(|priority| {
                vec![
                    self.paint(&format!("{} Priority", priority.title()), tone(Some(*priority))),
                    task_count(counts.get(*priority)),
                ]
            })
            .collect();
        write_table(&mut out, vec!["Priority".to_string(), "Tasks".to_string()], rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, out, groups))]
    pub fn write_priorities<W: Write>(
        &self,
        mut out: W,
        groups: &PriorityGroups,
        today: DateKey,
    ) -> anyhow::Result<()> {
        for (idx, priority) in Priority::ALL.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            let heading = format!("{} Priority", priority.title());
            writeln!(out, "{}", self.paint(&heading, tone(Some(*priority))))?;
            self.write_task_rows(&mut out, groups.tier(*priority), today)?;
        }
        Ok(())
    }

    pub fn write_classification<W: Write>(
        &self,
        mut out: W,
        deadline: Option<&str>,
        classification: &Classification,
    ) -> anyhow::Result<()> {
        let bucket = classification
            .bucket
            .map(|bucket| format!("{bucket:?}").to_ascii_lowercase())
            .unwrap_or_else(|| "-".to_string());
        let offset = classification
            .day_offset
            .map(|offset| offset.to_string())
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            out,
            "{}  bucket={bucket} offset={offset}  {}",
            deadline.unwrap_or("-"),
            classification.label
        )?;
        Ok(())
    }

    fn write_task_rows<W: Write>(
        &self,
        out: &mut W,
        tasks: &[Task],
        today: DateKey,
    ) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(out, "  (none)")?;
            return Ok(());
        }

        let rows = tasks
            .iter()
            .map(|task| {
                let label = deadline_label(task.deadline_key(), today);
                let label = if label.ends_with("overdue") {
                    self.paint(&label, RED)
                } else {
                    label
                };
                vec![
                    task.title.clone(),
                    task.category_label().to_string(),
                    label,
                    self.priority_cell(task),
                ]
            })
            .collect();

        write_table(
            out,
            vec![
                "Task".to_string(),
                "Category".to_string(),
                "Due".to_string(),
                "Priority".to_string(),
            ],
            rows,
        )
    }

    fn day_marker(&self, cell: &CalendarCell, today: DateKey) -> String {
        let marker = match cell.top_priority() {
            Some(Priority::High) => "!",
            Some(Priority::Medium) => "*",
            Some(Priority::Low) => ".",
            None => "",
        };
        let text = format!("{}{marker}", cell.day);
        let text = if cell.date == today {
            format!("[{text}]")
        } else {
            text
        };
        match cell.top_priority() {
            Some(priority) => self.paint(&text, tone(Some(priority))),
            None => text,
        }
    }

    fn priority_cell(&self, task: &Task) -> String {
        let text = task.priority.map(Priority::title).unwrap_or("-");
        self.paint(text, tone(task.priority))
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn tone(priority: Option<Priority>) -> &'static str {
    match priority {
        Some(Priority::High) => RED,
        Some(Priority::Medium) => YELLOW,
        Some(Priority::Low) => GREEN,
        None => GRAY,
    }
}

fn task_count(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ", width = *width)?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
