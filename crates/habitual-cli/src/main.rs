//! `habitual`: command-line front end for the Habitual habit tracker.
//!
//! # Usage
//!
//! ```
//! habitual init-db
//! habitual create --name walk --specification "walk each day" \
//!   --period daily --from 2024-03-01 --to 2024-06-30
//! habitual complete 2
//! habitual show --period weekly
//! habitual --json streak --id 2
//! ```

mod render;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use habitual_core::habit::{HabitId, HabitPatch, NewHabit, Periodicity};
use habitual_service::{
  completion, habits, local_now, seed,
  streaks::{self, StreakScope},
};
use habitual_store_sqlite::SqliteStore;
use render::{Output, Report};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "habitual", version, about = "Track daily and weekly habits")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, global = true, value_name = "FILE", default_value = "habitual.toml")]
  config: PathBuf,

  /// SQLite database path; overrides the config file and environment.
  #[arg(long, global = true, value_name = "PATH")]
  db: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the database and fill it with demo habits if it is empty.
  InitDb,
  /// Define a new habit.
  Create {
    #[arg(long)]
    name:          String,
    #[arg(long)]
    specification: String,
    /// `daily` or `weekly`.
    #[arg(long)]
    period:        String,
    /// First day of the validity window (YYYY-MM-DD).
    #[arg(long)]
    from:          NaiveDate,
    /// Last day of the validity window (YYYY-MM-DD).
    #[arg(long)]
    to:            NaiveDate,
  },
  /// Delete a habit and its history.
  Delete { id: HabitId },
  /// Change some fields of a habit.
  Modify {
    id:            HabitId,
    #[arg(long)]
    name:          Option<String>,
    #[arg(long)]
    specification: Option<String>,
    #[arg(long)]
    period:        Option<String>,
    #[arg(long)]
    from:          Option<NaiveDate>,
    #[arg(long)]
    to:            Option<NaiveDate>,
  },
  /// Check off a habit now.
  Complete { id: HabitId },
  /// List habits with their history.
  Show(Selector),
  /// Longest run of consecutive completed periods.
  Streak(Selector),
}

/// Narrows `show` and `streak` to one periodicity or one habit.
#[derive(Args, Debug)]
struct Selector {
  #[arg(long, conflicts_with = "id")]
  period: Option<String>,
  #[arg(long)]
  id:     Option<HabitId>,
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct Settings {
  store_path: PathBuf,
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
  let db = cli.db.as_ref().map(|p| p.to_string_lossy().into_owned());

  let settings = config::Config::builder()
    .set_default("store_path", "habitual.db")?
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("HABITUAL"))
    .set_override_option("store_path", db)?
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise settings")
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  match run(cli).await {
    Ok(code) => code,
    Err(e) => {
      eprintln!("error: {e:#}");
      ExitCode::FAILURE
    }
  }
}

/// Setup failures come back as `Err`; failed habit operations are reported
/// here and turn into a failing exit code.
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
  let settings = load_settings(&cli)?;
  let store_path = expand_tilde(&settings.store_path);
  tracing::debug!(?store_path, "opening store");

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let out = Output::new(cli.json);
  match execute(&store, cli.command).await {
    Ok(report) => {
      out.report(&report)?;
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      out.failure(&e)?;
      Ok(ExitCode::FAILURE)
    }
  }
}

async fn execute(
  store: &SqliteStore,
  command: Command,
) -> Result<Report, habitual_service::Error> {
  Ok(match command {
    Command::InitDb => Report::Seeded(seed::initialize(store, local_now()).await?),
    Command::Create {
      name,
      specification,
      period,
      from,
      to,
    } => {
      let periodicity = Periodicity::parse(&period)?;
      let input = NewHabit::new(name, specification, periodicity, from, to);
      Report::Created(habits::create(store, input, local_now()).await?)
    }
    Command::Delete { id } => {
      habits::delete(store, id).await?;
      Report::Deleted(id)
    }
    Command::Modify {
      id,
      name,
      specification,
      period,
      from,
      to,
    } => {
      let patch = HabitPatch {
        name,
        specification,
        periodicity: period.as_deref().map(Periodicity::parse).transpose()?,
        period_from: from,
        period_to: to,
      };
      Report::Modified(habits::modify(store, id, patch).await?)
    }
    Command::Complete { id } => {
      Report::Completed(completion::complete(store, id, local_now()).await?)
    }
    Command::Show(selector) => {
      let periodicity = selector.periodicity()?;
      let tracked = match selector.id {
        Some(id) => vec![habits::get(store, id).await?],
        None => habits::list(store, periodicity).await?,
      };
      Report::Habits { tracked, periodicity }
    }
    Command::Streak(selector) => {
      let scope = selector.scope()?;
      let longest = streaks::longest_streak(store, scope).await?;
      Report::Streak { scope, longest }
    }
  })
}

impl Selector {
  fn periodicity(&self) -> Result<Option<Periodicity>, habitual_core::Error> {
    self.period.as_deref().map(Periodicity::parse).transpose()
  }

  fn scope(&self) -> Result<StreakScope, habitual_core::Error> {
    Ok(match (self.id, self.periodicity()?) {
      (Some(id), _) => StreakScope::Habit(id),
      (None, Some(p)) => StreakScope::Periodicity(p),
      (None, None) => StreakScope::All,
    })
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/habits.db")),
      PathBuf::from(home).join("habits.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/h.db")), PathBuf::from("/tmp/h.db"));
  }

  #[test]
  fn selector_scope() {
    let by_id = Selector { period: None, id: Some(3) };
    assert_eq!(by_id.scope().unwrap(), StreakScope::Habit(3));

    let by_period = Selector { period: Some(" Weekly ".into()), id: None };
    assert_eq!(
      by_period.scope().unwrap(),
      StreakScope::Periodicity(Periodicity::Weekly)
    );

    let everything = Selector { period: None, id: None };
    assert_eq!(everything.scope().unwrap(), StreakScope::All);

    let bogus = Selector { period: Some("monthly".into()), id: None };
    assert!(bogus.scope().is_err());
  }

  #[test]
  fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from(["habitual", "--db", "x.db", "show", "--period", "daily"])
      .unwrap();
    assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    assert!(matches!(cli.command, Command::Show(Selector { period: Some(_), id: None })));

    let conflict = Cli::try_parse_from(["habitual", "streak", "--period", "daily", "--id", "1"]);
    assert!(conflict.is_err());
  }
}
