use std::fs;

use chrono::{TimeZone, Utc};
use godone_core::calendar::bin_by_month;
use godone_core::cli::{Command, TaskSource, TodayArg};
use godone_core::commands::{Session, dispatch_to};
use godone_core::config::Config;
use godone_core::dashboard::{DashboardLimits, bucket_for_dashboard};
use godone_core::deadline::DateKey;
use godone_core::priority::group_by_priority;
use godone_core::relative::classify;
use godone_core::render::Renderer;
use godone_core::source::load_tasks;
use godone_core::task::Task;
use tempfile::tempdir;

const PAYLOAD: &str = r#"[
  {"task_id": 1, "category_id": 1, "category_name": "Jaringan Komputer", "title": "Kuis 7 Jaringan Komputer",
   "description": "", "deadline": "2025-11-29", "priority": "High", "status": "pending"},
  {"task_id": 2, "category_id": 2, "category_name": "Keamanan Siber", "title": "Kuis 7 Keamanan Siber",
   "description": "", "deadline": "2025-11-28T00:00:00.000000Z", "priority": "MEDIUM", "status": "pending"},
  {"task_id": 3, "category_id": 3, "category_name": "IMPAL", "title": "Tugas 5 IMPAL",
   "description": "", "deadline": "2025-11-20", "priority": "low", "status": "pending"},
  {"task_id": 4, "category_id": 3, "category_name": "IMPAL", "title": "Tugas 4 IMPAL",
   "description": "", "deadline": "2025-11-21", "priority": "low", "status": "Completed"},
  {"task_id": 5, "category_id": 1, "title": "Draft", "deadline": "not-a-date", "priority": "high"},
  {"task_id": 6, "category_id": 1, "title": "", "deadline": "2025-11-28", "priority": "high"},
  {"task_id": 7, "title": "Final project", "deadline": "2025-12-20", "priority": "medium"}
]"#;

fn today() -> DateKey {
    DateKey::new(2025, 11, 28).expect("valid today")
}

fn write_payload() -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    fs::write(&path, PAYLOAD).expect("write payload");
    (temp, path)
}

fn session(json: bool) -> Session {
    let cfg = Config::default();
    Session {
        renderer: Renderer::plain(),
        cfg,
        json,
        now: Utc
            .with_ymd_and_hms(2025, 11, 28, 2, 0, 0)
            .single()
            .expect("valid now"),
    }
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.id.as_str()).collect()
}

#[test]
fn loaded_payload_feeds_every_view() {
    let (_temp, path) = write_payload();
    let tasks = load_tasks(&path).expect("load tasks");
    assert_eq!(tasks.len(), 7);

    let cells = bin_by_month(&tasks, 2025, 11).expect("bin november");
    assert_eq!(cells.len(), 36);
    let placed = cells
        .iter()
        .flatten()
        .flat_map(|cell| cell.tasks.iter().map(|task| task.id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(placed, ["3", "2", "1"]);

    let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
    assert_eq!(ids(&buckets.overdue), ["3"]);
    assert_eq!(ids(&buckets.today), ["2"]);
    assert_eq!(ids(&buckets.upcoming), ["1"]);

    let groups = group_by_priority(&tasks);
    assert_eq!(ids(&groups.high), ["1", "5", "6"]);
    assert_eq!(ids(&groups.medium), ["2", "7"]);
    assert_eq!(ids(&groups.low), ["3"]);
}

#[test]
fn completed_tasks_never_reach_a_view() {
    let (_temp, path) = write_payload();
    let tasks = load_tasks(&path).expect("load tasks");

    let cells = bin_by_month(&tasks, 2025, 11).expect("bin november");
    let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
    let groups = group_by_priority(&tasks);

    let everything = cells
        .iter()
        .flatten()
        .flat_map(|cell| cell.tasks.iter())
        .chain(buckets.upcoming.iter())
        .chain(buckets.today.iter())
        .chain(buckets.overdue.iter())
        .chain(groups.high.iter())
        .chain(groups.medium.iter())
        .chain(groups.low.iter());
    for task in everything {
        assert!(task.is_active(), "task {} is completed", task.id);
    }
}

#[test]
fn malformed_deadline_is_dateless_everywhere() {
    let (_temp, path) = write_payload();
    let tasks = load_tasks(&path).expect("load tasks");
    let draft = tasks.iter().find(|task| task.id == "5").expect("draft task");

    assert_eq!(classify(draft.deadline_key(), today()).label, "No deadline");

    let cells = bin_by_month(&tasks, 2025, 11).expect("bin november");
    assert!(cells.iter().flatten().all(|cell| cell.tasks.iter().all(|t| t.id != "5")));

    let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
    for list in [&buckets.upcoming, &buckets.today, &buckets.overdue] {
        assert!(list.iter().all(|task| task.id != "5"));
    }
}

#[test]
fn views_are_idempotent() {
    let (_temp, path) = write_payload();
    let tasks = load_tasks(&path).expect("load tasks");

    assert_eq!(
        bin_by_month(&tasks, 2025, 11).expect("first"),
        bin_by_month(&tasks, 2025, 11).expect("second")
    );
    assert_eq!(
        bucket_for_dashboard(&tasks, today(), DashboardLimits::default()),
        bucket_for_dashboard(&tasks, today(), DashboardLimits::default())
    );
    assert_eq!(group_by_priority(&tasks), group_by_priority(&tasks));
}

#[test]
fn calendar_command_emits_json_cells() {
    let (_temp, path) = write_payload();
    let mut out = Vec::new();
    dispatch_to(
        &session(true),
        Command::Calendar {
            source: TaskSource { tasks: path },
            month: None,
            today: TodayArg {
                today: Some(today()),
            },
        },
        &mut out,
    )
    .expect("calendar command");

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(value["title"], "November 2025");
    assert_eq!(value["weekdays"][0], "Sun");
    let cells = value["cells"].as_array().expect("cells array");
    assert_eq!(cells.len(), 36);
    assert!(cells[0].is_null());
    let day29 = &cells[6 + 28];
    assert_eq!(day29["day"], 29);
    assert_eq!(day29["has_high"], true);
    assert_eq!(day29["tasks"][0]["task_id"], "1");
}

#[test]
fn dashboard_command_uses_clock_in_configured_zone() {
    let (_temp, path) = write_payload();
    let mut out = Vec::new();
    // 02:00 UTC is 09:00 in Jakarta, the default zone.
    dispatch_to(
        &session(true),
        Command::Dashboard {
            source: TaskSource { tasks: path },
            today: TodayArg { today: None },
            upcoming_limit: None,
            overdue_limit: Some(0),
        },
        &mut out,
    )
    .expect("dashboard command");

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(value["greeting"], "morning");
    assert_eq!(value["today"]["day"], 28);
    assert_eq!(value["overdue"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["upcoming"][0]["task_id"], "1");
    assert_eq!(value["priority_counts"]["high"], 3);
}

#[test]
fn config_file_drives_limits() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("godone.toml");
    fs::write(&path, "[dashboard]\nupcoming_limit = 2\n").expect("write config");

    let cfg = Config::load(Some(path.as_path())).expect("load config");
    assert_eq!(cfg.dashboard_limits().upcoming, 2);
    assert_eq!(cfg.dashboard_limits().overdue, 5);
    assert_eq!(cfg.loaded_file.as_deref(), Some(path.as_path()));

    let missing = temp.path().join("missing.toml");
    assert!(Config::load(Some(missing.as_path())).is_err());
}

#[test]
fn non_array_file_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("tasks.json");
    fs::write(&path, r#"{"data": []}"#).expect("write payload");

    let err = load_tasks(&path).expect_err("object payload");
    assert!(format!("{err:#}").contains("must be a JSON array"));
}
