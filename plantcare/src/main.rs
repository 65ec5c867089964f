//! plantcare - plant watering tracker CLI
//!
//! Records waterings and shows which plants need attention, a month
//! calendar of due and watered plants, and per-plant watering streaks.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plantcare_core::care::{classify, plant_streak, CalendarMonth, CareSnapshot};
use plantcare_core::{
    parse_date, Clock, Config, Database, FixedClock, NewPlant, SystemClock, WateringEvent,
};

#[derive(Parser, Debug)]
#[command(name = "plantcare")]
#[command(about = "Track plant watering schedules, statuses and streaks")]
#[command(version)]
struct Args {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Database file (default: from config, or the XDG data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a plant
    Add {
        /// Plant name (used as the nickname when --species is given)
        name: String,

        /// Days between waterings
        #[arg(long, allow_negative_numbers = true)]
        interval: i64,

        /// Species name
        #[arg(long)]
        species: Option<String>,

        /// Date the plant was last watered (YYYY-MM-DD)
        #[arg(long)]
        last_watered: Option<String>,
    },

    /// Record a watering
    Water {
        /// Plant id or name
        plant: String,

        /// Day of the watering (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Amount of water in millilitres
        #[arg(long)]
        amount: Option<i64>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Change a plant's watering interval
    Interval {
        /// Plant id or name
        plant: String,

        /// New interval in days
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Remove a plant and its watering history
    Remove {
        /// Plant id or name
        plant: String,
    },

    /// Show every plant's care status, most urgent first
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show plants due and watered per day of a month
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show a plant's watering streak
    Streak {
        /// Plant id or name
        plant: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        plantcare_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let clock: Box<dyn Clock> = match &args.today {
        Some(s) => Box::new(FixedClock(parse_date(s).context("invalid --today")?)),
        None => Box::new(SystemClock),
    };
    // One reading per invocation so every view agrees on "today"
    let today = clock.today();

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| config.resolved_database_path());
    tracing::info!(path = %db_path.display(), %today, "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::Add {
            name,
            interval,
            species,
            last_watered,
        } => {
            let last_watered_at = last_watered
                .as_deref()
                .map(parse_date)
                .transpose()
                .context("invalid --last-watered")?;
            let new = match species {
                Some(species) => NewPlant {
                    species,
                    nickname: Some(name),
                    watering_interval_days: interval,
                    last_watered_at,
                },
                None => NewPlant {
                    species: name,
                    nickname: None,
                    watering_interval_days: interval,
                    last_watered_at,
                },
            };
            let plant = db.add_plant(&new, today).context("failed to add plant")?;
            let status = classify(plant.next_due_at, today, plant.watering_interval_days)?;
            render::print_added(&plant, &status);
        }

        Command::Water {
            plant,
            date,
            amount,
            note,
        } => {
            let plant = db.resolve_plant(&plant)?;
            let occurred_at = match date.as_deref() {
                Some(s) => parse_date(s).context("invalid --date")?,
                None => today,
            };
            let event = WateringEvent {
                plant_id: plant.id.clone(),
                occurred_at,
                amount_ml: amount,
                note,
            };
            let plant = db
                .record_watering(&event, today)
                .context("failed to record watering")?;
            let status = classify(plant.next_due_at, today, plant.watering_interval_days)?;
            render::print_watered(&plant, occurred_at, &status);
        }

        Command::Interval { plant, days } => {
            let plant = db.resolve_plant(&plant)?;
            let plant = db
                .update_interval(&plant.id, days, today)
                .context("failed to update interval")?;
            let status = classify(plant.next_due_at, today, plant.watering_interval_days)?;
            render::print_rescheduled(&plant, &status);
        }

        Command::Remove { plant } => {
            let plant = db.resolve_plant(&plant)?;
            db.remove_plant(&plant.id)
                .context("failed to remove plant")?;
            println!("Removed {} ({})", plant.display_name(), plant.id);
        }

        Command::Status { format } => {
            let snapshot = CareSnapshot::build(&db, &FixedClock(today), None)
                .context("failed to compute plant statuses")?;
            match format {
                OutputFormat::Json => println!("{}", snapshot.to_json_pretty()?),
                OutputFormat::Text => render::print_status(&snapshot),
            }
        }

        Command::Calendar { month, format } => {
            let month = month
                .as_deref()
                .map(CalendarMonth::parse)
                .transpose()
                .context("invalid --month")?;
            let snapshot = CareSnapshot::build(&db, &FixedClock(today), month)
                .context("failed to build calendar")?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "month": snapshot.month.to_string(),
                    "days": snapshot.calendar,
                }))?,
                OutputFormat::Text => render::print_calendar(&snapshot),
            }
        }

        Command::Streak { plant, format } => {
            let plant = db.resolve_plant(&plant)?;
            let streak = plant_streak(&db, &plant, today, &config.care)
                .context("failed to compute streak")?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "plant_id": plant.id,
                    "display_name": plant.display_name(),
                    "watering_interval_days": plant.watering_interval_days,
                    "streak": streak,
                }))?,
                OutputFormat::Text => render::print_streak(&plant, &streak, today),
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
