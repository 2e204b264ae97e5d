use anyhow::Result;
use weekgrid_core::config::Settings;
use weekgrid_core::event::parse_day;
use weekgrid_core::{Clock, SystemClock, WeekWindow};

use super::{open_controller, report_failures};
use crate::render::Render;

pub fn run(settings: &Settings, date: Option<String>, offset: i64) -> Result<()> {
    let reference = match date {
        Some(d) => parse_day(&d)?,
        None => SystemClock.today(),
    };
    let window = WeekWindow::for_date(reference).shift(offset)?;

    let mut controller = open_controller(settings);
    let failures = controller.render(window)?;

    println!("{}", controller.view().render());
    println!();
    println!("{}", controller.trash().render());

    report_failures(&failures);
    Ok(())
}
