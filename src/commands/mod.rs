pub mod add;
pub mod drag;
pub mod list;
pub mod show;

use owo_colors::OwoColorize;
use weekgrid_core::config::Settings;
use weekgrid_core::kv::FileStore;
use weekgrid_core::store::{EventStore, LoadFailure};
use weekgrid_core::{CalendarController, SystemClock};

use crate::prompt::BellNotifier;

pub type Controller = CalendarController<FileStore, SystemClock>;

/// Controller over the configured data directory. Nothing is rendered yet.
pub fn open_controller(settings: &Settings) -> Controller {
    let store = EventStore::new(FileStore::new(settings.data_path()));

    CalendarController::new(store, SystemClock, settings.grid, settings.trash)
        .with_notifier(BellNotifier)
}

/// Print entries that could not be read. They never stop a command.
pub fn report_failures(failures: &[LoadFailure]) {
    if failures.is_empty() {
        return;
    }

    eprintln!();
    for failure in failures {
        eprintln!(
            "{} skipped unreadable entry {}: {}",
            "warning:".yellow(),
            failure.key,
            failure.reason.dimmed()
        );
    }
}
