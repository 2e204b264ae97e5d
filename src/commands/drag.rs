use anyhow::Result;
use owo_colors::OwoColorize;
use weekgrid_core::config::Settings;
use weekgrid_core::drag::Point;
use weekgrid_core::{DragOutcome, EventKey, WeekWindow};

use super::{open_controller, report_failures};
use crate::prompt::PromptConfirm;
use crate::render::Render;

pub fn run(settings: &Settings, key: String, x: i32, y: i32, yes: bool) -> Result<()> {
    let key = EventKey::parse(&key)?;

    let mut controller = open_controller(settings);
    let Some(record) = controller.store().get(&key)? else {
        anyhow::bail!("No event stored under {key}");
    };

    let failures = controller.render(WeekWindow::for_date(record.day))?;
    report_failures(&failures);

    controller.drag_start(&key)?;

    let point = Point::new(x, y);
    let outcome = if yes {
        controller.drag_end(point, &mut |_: &EventKey| true)?
    } else {
        let mut confirm = PromptConfirm {
            label: record.title.clone(),
        };
        controller.drag_end(point, &mut confirm)?
    };

    match outcome {
        DragOutcome::DroppedElsewhere(key) => {
            println!(
                "{} dropped at ({x}, {y}), outside the trash ({})",
                key,
                controller.trash().render().dimmed()
            );
        }
        DragOutcome::Cancelled(key) => {
            println!("{} {}", "Kept".yellow(), key);
        }
        // BellNotifier already announced it
        DragOutcome::Deleted(_) => {}
    }

    Ok(())
}
