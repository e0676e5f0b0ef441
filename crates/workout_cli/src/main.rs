//! Terminal host for the workout core.
//!
//! # Responsibility
//! - Wire configuration, logging and the SQLite slot store to the
//!   presentation coordinator.
//! - Stand in for map, list and form surfaces with plain terminal output.

mod surfaces;

use clap::{Args, Parser, Subcommand};
use log::error;
use std::process::ExitCode;
use surfaces::{ConfiguredPosition, TerminalSurfaces};
use workout_core::db::open_db;
use workout_core::{
    init_logging, ActivityKind, ActivityRepository, ActivityService, Coordinates, CoreConfig,
    FormSubmission, PresentationCoordinator, SqliteSlotRepository,
};

#[derive(Debug, Parser)]
#[command(name = "workout", version, about = "Log paced and elevation workouts")]
struct Cli {
    /// Database file; overrides WORKOUT_DB_PATH.
    #[arg(long, global = true)]
    db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log a new activity at the given position.
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },
    /// Print every logged activity in creation order.
    List,
    /// Re-center on one activity by id.
    ///
    /// The selection is counted for this run only; counts are saved when a
    /// later `add` writes the collection, so the CLI never persists them.
    Select { id: String },
    /// Delete every logged activity.
    Reset,
}

#[derive(Debug, Subcommand)]
enum AddKind {
    /// Distance-paced activity.
    Paced {
        #[command(flatten)]
        common: CommonFields,
        /// Steps per minute.
        #[arg(long, allow_hyphen_values = true)]
        cadence: String,
    },
    /// Elevation-based activity.
    Elevation {
        #[command(flatten)]
        common: CommonFields,
        /// Elevation gain in meters.
        #[arg(long, allow_hyphen_values = true)]
        elevation_gain: String,
    },
}

impl AddKind {
    fn common(&self) -> &CommonFields {
        match self {
            Self::Paced { common, .. } | Self::Elevation { common, .. } => common,
        }
    }
}

#[derive(Debug, Args)]
struct CommonFields {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
    /// Distance in km.
    #[arg(long, allow_hyphen_values = true)]
    distance: String,
    /// Duration in minutes.
    #[arg(long, allow_hyphen_values = true)]
    duration: String,
}

impl CommonFields {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = ActivityRepository::with_key(
        SqliteSlotRepository::new(&conn),
        config.storage_key.clone(),
    );
    let terminal = TerminalSurfaces::default();
    let mut app = PresentationCoordinator::new(
        ActivityService::new(repo),
        terminal.surfaces(),
        config.view_settings(),
    );

    // Without a configured home position, `add` centers the map on the new
    // workout itself.
    let position = config.home_position.or(match &cli.command {
        Command::Add { kind } => Some(kind.common().coordinates()),
        _ => None,
    });
    let summary = app.start(&ConfiguredPosition(position));
    if summary.load_failed {
        eprintln!("warning: stored workouts could not be read; starting empty");
    }

    match cli.command {
        Command::List => {
            for line in terminal.list_lines() {
                println!("{line}");
            }
            if summary.restored == 0 {
                println!("no workouts logged yet");
            }
            Ok(())
        }
        Command::Add { kind } => {
            let (kind, common, kind_value) = match kind {
                AddKind::Paced { common, cadence } => (ActivityKind::Paced, common, cadence),
                AddKind::Elevation {
                    common,
                    elevation_gain,
                } => (ActivityKind::Elevation, common, elevation_gain),
            };
            app.on_kind_toggled(kind);
            app.on_map_click(common.coordinates());

            let mut submission = FormSubmission {
                kind: kind.as_str().to_string(),
                distance: common.distance,
                duration: common.duration,
                ..FormSubmission::default()
            };
            match kind {
                ActivityKind::Paced => submission.cadence = kind_value,
                ActivityKind::Elevation => submission.elevation_gain = kind_value,
            }

            let id = app.on_form_submitted(&submission).map_err(|err| {
                error!("event=cli_add module=cli status=error error={err}");
                err.to_string()
            })?;
            if let Some(line) = terminal.list_lines().last() {
                println!("{line}");
            }
            println!("saved workout {id}");
            Ok(())
        }
        Command::Select { id } => {
            if app.on_list_item_selected(&id) {
                println!("map centered on workout {id}");
            } else {
                println!("nothing to center on for `{id}`");
            }
            Ok(())
        }
        Command::Reset => {
            let dropped = app.service().len();
            app.reset_all().map_err(|err| err.to_string())?;
            println!("removed {dropped} workouts");
            Ok(())
        }
    }
}
