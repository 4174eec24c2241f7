//! Command-line front end for horse health records.
//!
//! Each invocation opens the SQLite store, performs one intent and exits.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use horse_health_core::models::{category_field_label, category_options, format_display_date, OTHER};
use horse_health_core::session::user_message;
use horse_health_core::{
    Confirm, Confirmed, HealthConfig, HealthError, NewHorse, RecordForm, RecordKind, Session,
    SqliteStore,
};
use log::debug;

#[derive(Parser, Debug)]
#[command(name = "horse-health", version, about = "Horse health record keeper")]
struct Cli {
    /// SQLite file holding the records.
    #[arg(long, global = true, default_value = "horse_health.db")]
    db: PathBuf,
    /// Optional JSON config overriding defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Adds a horse.
    AddHorse {
        name: String,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        colour: Option<String>,
    },
    /// Lists horses with their index.
    Horses,
    /// Adds a health record to a horse.
    AddRecord(AddRecordArgs),
    /// Lists every record of one kind, newest first.
    Records {
        #[arg(long)]
        horse: usize,
        kind: RecordKind,
    },
    /// Shows the most recent records across all kinds.
    Activity {
        #[arg(long)]
        horse: usize,
    },
    /// Deletes a record by its position in `records` output.
    DeleteRecord {
        #[arg(long)]
        horse: usize,
        kind: RecordKind,
        index: usize,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Lists due and overdue reminders across all horses.
    Reminders {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Replaces all horses with the contents of a JSON export.
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Writes all horses to a JSON file.
    Export {
        /// Output path; defaults to the configured export file name.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Shows the category options for a record kind.
    Options { kind: RecordKind },
}

#[derive(Args, Debug)]
struct AddRecordArgs {
    #[arg(long)]
    horse: usize,
    kind: RecordKind,
    /// Category option, or "Other" together with --other.
    category: String,
    #[arg(long, default_value = "")]
    other: String,
    #[arg(long)]
    date: String,
    #[arg(long, default_value = "")]
    next_due: String,
    /// Veterinarian or farrier name.
    #[arg(long, default_value = "")]
    provider: String,
    #[arg(long, default_value = "")]
    weight: String,
    #[arg(long, default_value = "")]
    cost: String,
    #[arg(long, default_value = "")]
    diagnosis: String,
    #[arg(long, default_value = "")]
    treatment: String,
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<AddRecordArgs> for RecordForm {
    fn from(args: AddRecordArgs) -> Self {
        RecordForm {
            kind: args.kind,
            category: args.category,
            other_text: args.other,
            date: args.date,
            next_due: args.next_due,
            provider: args.provider,
            weight: args.weight,
            cost: args.cost,
            diagnosis: args.diagnosis,
            treatment: args.treatment,
            notes: args.notes,
        }
    }
}

/// Asks on stdin; anything but "y"/"yes" declines.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening record store {}", cli.db.display()))?;
    let mut session = Session::with_config(store, config);
    debug!("opened {} with {} horses", cli.db.display(), session.horses().len());
    if let Some(warning) = session.load_warning() {
        eprintln!("Warning: {}", warning);
    }

    match cli.command {
        Commands::AddHorse {
            name,
            breed,
            age,
            colour,
        } => {
            let index = session
                .add_horse(NewHorse {
                    name,
                    breed,
                    age,
                    colour,
                })
                .map_err(report)?;
            println!("Horse added successfully! (index {})", index);
        }
        Commands::Horses => list_horses(&session),
        Commands::AddRecord(args) => {
            session.select_horse(args.horse).map_err(report)?;
            let kind = args.kind;
            session.add_record(args.into()).map_err(report)?;
            println!("{} added successfully!", kind.label());
        }
        Commands::Records { horse, kind } => {
            session.select_horse(horse).map_err(report)?;
            print_records(&session, kind)?;
        }
        Commands::Activity { horse } => {
            session.select_horse(horse).map_err(report)?;
            print_activity(&session)?;
        }
        Commands::DeleteRecord {
            horse,
            kind,
            index,
            yes,
        } => {
            session.select_horse(horse).map_err(report)?;
            let removed = if yes {
                session.delete_record(kind, index, &mut Confirmed)
            } else {
                session.delete_record(kind, index, &mut PromptConfirm)
            }
            .map_err(report)?;
            match removed {
                Some(record) => println!("Record deleted successfully! ({})", record.title()),
                None => println!("Nothing deleted."),
            }
        }
        Commands::Reminders { today } => {
            let reminders = match today {
                Some(date) => session.reminders(date),
                None => session.reminders_today(),
            };
            if reminders.is_empty() {
                println!("No upcoming reminders.");
            }
            for reminder in reminders {
                let marker = if reminder.overdue { "!" } else { " " };
                println!(
                    "{} {} - {} ({}, {}): {}",
                    marker,
                    reminder.horse_name,
                    reminder.item_name,
                    reminder.kind_label,
                    format_display_date(reminder.due_date),
                    reminder.status_text()
                );
            }
        }
        Commands::Import { file, yes } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading import file {}", file.display()))?;
            let imported = if yes {
                session.import(&raw, &mut Confirmed)
            } else {
                session.import(&raw, &mut PromptConfirm)
            }
            .map_err(report)?;
            match imported {
                Some(count) => println!("Data imported successfully! ({} horses)", count),
                None => println!("Import cancelled."),
            }
        }
        Commands::Export { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(session.export_file_name()));
            let json = session.export().map_err(report)?;
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} horses to {}", session.horses().len(), path.display());
        }
        Commands::Options { kind } => {
            println!("{}:", category_field_label(kind));
            for option in category_options(kind) {
                println!("  {}", option);
            }
            println!("  {} (use --other <text>)", OTHER);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<HealthConfig> {
    let Some(path) = path else {
        return Ok(HealthConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    HealthConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn report(error: HealthError) -> anyhow::Error {
    anyhow!(user_message(&error))
}

fn list_horses(session: &Session<SqliteStore>) {
    if session.horses().is_empty() {
        println!("No horses yet. Use `add-horse` to start.");
        return;
    }
    for (index, horse) in session.horses().iter().enumerate() {
        println!(
            "[{}] {} - breed: {}, age: {}, colour: {} ({} records)",
            index,
            horse.name,
            horse.breed,
            horse.age,
            horse.colour,
            horse.record_count()
        );
    }
}

fn print_records(session: &Session<SqliteStore>, kind: RecordKind) -> Result<()> {
    let rows = session.records(kind).map_err(report)?;
    if rows.is_empty() {
        println!("No records yet. Use `add-record` to start.");
    }
    for row in rows {
        println!(
            "[{}] {} - {}",
            row.display_index,
            format_display_date(row.record.date()),
            row.title
        );
        for detail in row.details {
            println!("      {}: {}", detail.label, detail.value);
        }
    }
    Ok(())
}

fn print_activity(session: &Session<SqliteStore>) -> Result<()> {
    if let Some(horse) = session.selected_horse() {
        println!("{}", horse.name);
        println!("  Breed: {}", horse.breed);
        println!("  Age: {}", horse.age);
        println!("  Colour: {}", horse.colour);
    }

    let entries = session.recent_activity().map_err(report)?;
    if entries.is_empty() {
        println!("No records yet. Add health records to start!");
        return Ok(());
    }
    println!("Recent Activity");
    for entry in entries {
        println!(
            "  {:<13} {}  {}",
            entry.kind_name,
            format_display_date(entry.date),
            entry.summary
        );
    }
    Ok(())
}
