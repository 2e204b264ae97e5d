use anyhow::Result;
use owo_colors::OwoColorize;
use weekgrid_core::config::Settings;
use weekgrid_core::event::parse_day;
use weekgrid_core::{EventRecord, TimeOfDay, WeekWindow};

use super::{open_controller, report_failures};
use crate::prompt;
use crate::render::Render;

pub fn run(
    settings: &Settings,
    title: String,
    day: String,
    start: String,
    end: String,
    event_type: String,
    force: bool,
) -> Result<()> {
    let day = parse_day(&day)?;
    let start = TimeOfDay::parse(&start)?;
    let end = TimeOfDay::parse(&end)?;

    // Rejects inverted and too-short ranges before anything is written
    let event = EventRecord::new(title, day, start, end, event_type)?;
    let key = event.key();

    let grid = &settings.grid;
    if !grid.is_within_axis(start, end) {
        println!(
            "{} {} runs outside the {:02}:00-{:02}:00 grid and will be cut off",
            "!".yellow(),
            event,
            grid.first_hour,
            grid.last_hour()
        );
    }

    let mut controller = open_controller(settings);

    // Same day and start time means same key, so saving would replace it
    if !force && let Some(existing) = controller.store().get(&key)? {
        println!("{} {} already holds {}", "!".yellow(), key, existing);
        if !prompt::ask("  Replace it?") {
            anyhow::bail!("Kept the existing event at {key}");
        }
    }

    let failures = controller.render(WeekWindow::for_date(day))?;
    controller.add_event(&event)?;

    println!("{} {}", "Created".green(), event);
    println!("  {}", key.to_string().dimmed());
    println!();
    println!("{}", controller.view().render());

    report_failures(&failures);
    Ok(())
}
