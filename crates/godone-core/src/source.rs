use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::task::Task;

/// Parses the body of a `GET /tasks` response.
///
/// The body itself must be an array; anything else is a caller bug. Array
/// elements that are not objects are dirty data and get skipped.
#[tracing::instrument(skip(raw), fields(bytes = raw.len()))]
pub fn parse_tasks(raw: &str) -> Result<Vec<Task>> {
    let payload: Value = serde_json::from_str(raw)?;
    let Value::Array(records) = payload else {
        return Err(EngineError::NotATaskArray(json_kind(&payload)));
    };

    let mut tasks = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            warn!(index = idx, kind = json_kind(&record), "skipping non-object task record");
            continue;
        }
        tasks.push(serde_json::from_value::<Task>(record)?);
    }

    debug!(count = tasks.len(), "parsed task records");
    Ok(tasks)
}

/// Loads a task payload from a file, or from stdin when `path` is `-`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_tasks(path: &Path) -> anyhow::Result<Vec<Task>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read tasks from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    let tasks = parse_tasks(&raw).with_context(|| format!("failed to load tasks from {}", path.display()))?;
    info!(count = tasks.len(), "loaded tasks");
    Ok(tasks)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
