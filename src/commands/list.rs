use anyhow::Result;
use owo_colors::OwoColorize;
use weekgrid_core::config::Settings;

use super::{open_controller, report_failures};

pub fn run(settings: &Settings) -> Result<()> {
    let controller = open_controller(settings);
    let mut report = controller.store().load_all()?;

    if report.events.is_empty() {
        println!("{}", "No events stored".dimmed());
    }

    report.events.sort_by_key(|e| (e.day, e.start));
    for event in &report.events {
        println!("{}  {}", event.key().to_string().dimmed(), event);
    }

    report_failures(&report.failures);
    Ok(())
}
