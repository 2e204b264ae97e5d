mod commands;
mod prompt;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weekgrid_core::config::Settings;

#[derive(Parser)]
#[command(name = "weekgrid")]
#[command(about = "Plan your week on a day-by-hour grid")]
struct Cli {
    /// Path to the configuration file (defaults to ~/.config/weekgrid/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one week as a day-by-hour grid
    Show {
        /// Any day of the week to show (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Weeks to move forward (or back, if negative) from that day
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Create a new event
    Add {
        /// Event title
        title: String,

        /// Day of the event (YYYY-MM-DD)
        #[arg(short, long)]
        day: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,

        /// Event type, e.g. "Work" or "Spa"
        #[arg(short = 't', long = "type", default_value = "")]
        event_type: String,

        /// Replace an event that already starts at the same time without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Drag an event's block and release it at a point on the grid.
    /// Releasing inside the trash deletes the event after confirmation.
    Drag {
        /// Event key, e.g. event-2025-03-17-09:00
        key: String,

        /// Release point, horizontal pixel
        #[arg(short, long, allow_negative_numbers = true)]
        x: i32,

        /// Release point, vertical pixel
        #[arg(short, long, allow_negative_numbers = true)]
        y: i32,

        /// Confirm the deletion without prompting
        #[arg(long)]
        yes: bool,
    },
    /// List every stored event
    List,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { date, offset } => commands::show::run(&settings, date, offset),
        Commands::Add {
            title,
            day,
            start,
            end,
            event_type,
            force,
        } => commands::add::run(&settings, title, day, start, end, event_type, force),
        Commands::Drag { key, x, y, yes } => commands::drag::run(&settings, key, x, y, yes),
        Commands::List => commands::list::run(&settings),
    }
}

/// Log to stderr, filtered by `WEEKGRID_LOG` (warnings only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_env("WEEKGRID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
