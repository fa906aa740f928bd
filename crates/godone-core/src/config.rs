use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::dashboard::{
  DEFAULT_OVERDUE_LIMIT,
  DEFAULT_UPCOMING_LIMIT,
  DashboardLimits
};

const CONFIG_FILE: &str = "godone.toml";
const CONFIG_ENV_VAR: &str =
  "GODONE_CONFIG";
const TIMEZONE_ENV_VAR: &str =
  "GODONE_TIMEZONE";
pub const DEFAULT_TIMEZONE: &str =
  "Asia/Jakarta";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  pub timezone:    Option<String>,
  pub dashboard:   DashboardSection,
  pub display:     DisplaySection,
  #[serde(skip)]
  pub loaded_file: Option<PathBuf>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
  pub upcoming_limit: usize,
  pub overdue_limit:  usize
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
  pub color: bool
}

impl Default for Config {
  fn default() -> Self {
    Self {
      timezone:    None,
      dashboard:
        DashboardSection::default(),
      display:
        DisplaySection::default(),
      loaded_file: None
    }
  }
}

impl Default for DashboardSection {
  fn default() -> Self {
    Self {
      upcoming_limit:
        DEFAULT_UPCOMING_LIMIT,
      overdue_limit:
        DEFAULT_OVERDUE_LIMIT
    }
  }
}

impl Default for DisplaySection {
  fn default() -> Self {
    Self { color: true }
  }
}

impl Config {
  /// Loads `--config`, then
  /// `$GODONE_CONFIG`, then `./godone.toml`,
  /// then the user config dir. Only an
  /// explicitly named file has to exist.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    if let Some(path) = override_path {
      return Self::load_file(path);
    }

    if let Ok(raw) =
      std::env::var(CONFIG_ENV_VAR)
    {
      let trimmed = raw.trim();
      if !trimmed.is_empty() {
        return Self::load_file(
          Path::new(trimmed)
        )
        .with_context(|| {
          format!(
            "{CONFIG_ENV_VAR} points \
             at an unusable file"
          )
        });
      }
    }

    for candidate in
      implicit_config_paths()
    {
      if candidate.exists() {
        return Self::load_file(
          &candidate
        );
      }
      debug!(
        file = %candidate.display(),
        "config candidate not found"
      );
    }

    info!(
      "no config file found; using \
       defaults"
    );
    Ok(Self::default())
  }

  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut cfg =
      toml::from_str::<Self>(raw)
        .context(
          "failed to parse config toml"
        )?;
    cfg.sanitize();
    Ok(cfg)
  }

  #[tracing::instrument(skip(path), fields(file = %path.display()))]
  fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml_str(
      &raw
    )
    .with_context(|| {
      format!(
        "invalid config file {}",
        path.display()
      )
    })?;
    cfg.loaded_file =
      Some(path.to_path_buf());

    info!(
      file = %path.display(),
      timezone = ?cfg.timezone,
      upcoming_limit =
        cfg.dashboard.upcoming_limit,
      overdue_limit =
        cfg.dashboard.overdue_limit,
      "loaded config"
    );
    Ok(cfg)
  }

  fn sanitize(&mut self) {
    if self
      .timezone
      .as_deref()
      .is_some_and(|tz| {
        tz.trim().is_empty()
      })
    {
      warn!(
        "config timezone was blank; \
         ignoring"
      );
      self.timezone = None;
    }

    if self.dashboard.upcoming_limit == 0
    {
      self.dashboard.upcoming_limit =
        DEFAULT_UPCOMING_LIMIT;
    }
    if self.dashboard.overdue_limit == 0
    {
      self.dashboard.overdue_limit =
        DEFAULT_OVERDUE_LIMIT;
    }
  }

  #[must_use]
  pub fn dashboard_limits(
    &self
  ) -> DashboardLimits {
    DashboardLimits {
      upcoming: self
        .dashboard
        .upcoming_limit,
      overdue:  self
        .dashboard
        .overdue_limit
    }
  }

  /// `$GODONE_TIMEZONE`, then the file,
  /// then the default zone.
  #[must_use]
  pub fn timezone(&self) -> Tz {
    let from_env =
      std::env::var(TIMEZONE_ENV_VAR)
        .ok();
    resolve_timezone(
      from_env.as_deref(),
      self.timezone.as_deref()
    )
  }
}

fn implicit_config_paths() -> Vec<PathBuf>
{
  let mut paths = Vec::new();
  if let Ok(dir) = std::env::current_dir()
  {
    paths.push(dir.join(CONFIG_FILE));
  }
  if let Some(dir) = dirs::config_dir() {
    paths.push(
      dir.join("godone").join(CONFIG_FILE)
    );
  }
  paths
}

#[must_use]
pub fn resolve_timezone(
  env_value: Option<&str>,
  configured: Option<&str>
) -> Tz {
  if let Some(raw) = env_value
    && let Some(tz) =
      parse_timezone(raw, TIMEZONE_ENV_VAR)
  {
    return tz;
  }

  if let Some(raw) = configured
    && let Some(tz) =
      parse_timezone(raw, CONFIG_FILE)
  {
    return tz;
  }

  parse_timezone(
    DEFAULT_TIMEZONE,
    "DEFAULT_TIMEZONE"
  )
  .unwrap_or_else(|| {
    tracing::error!(
      "failed to parse fallback \
       timezone; using UTC"
    );
    chrono_tz::UTC
  })
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      debug!(
        source,
        timezone = %trimmed,
        "resolved timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}
