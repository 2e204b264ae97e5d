//! Terminal rendering for weekgrid views.
//!
//! The grid rows come from the same `HourSlot`s the layout engine measured
//! blocks against, so a block shows up in exactly the rows its pixel span
//! covers.

use owo_colors::OwoColorize;
use weekgrid_core::drag::Rect;
use weekgrid_core::layout::HourSlot;
use weekgrid_core::view::{DayColumn, PlacedBlock, WeekView};

/// Width of one day column in the grid, in characters
const CELL_WIDTH: usize = 12;

/// Width of the hour label gutter
const GUTTER_WIDTH: usize = 6;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// What a single grid cell shows.
#[derive(Debug, PartialEq, Eq)]
enum Cell<'a> {
    Empty,
    /// The block's top edge falls in this row
    Starts(&'a PlacedBlock),
    /// The block started in an earlier row
    Continues(&'a PlacedBlock),
}

fn cell_for<'a>(slot: &HourSlot, blocks: &'a [PlacedBlock]) -> Cell<'a> {
    let slot_bottom = slot.top + slot.height;

    match blocks
        .iter()
        .find(|b| b.geometry.top < slot_bottom && b.geometry.bottom() > slot.top)
    {
        None => Cell::Empty,
        Some(block) if block.geometry.top >= slot.top => Cell::Starts(block),
        Some(block) => Cell::Continues(block),
    }
}

/// Cut `text` to at most `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width), width = width)
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => pad("·", CELL_WIDTH).dimmed().to_string(),
        Cell::Starts(block) => pad(&block.title, CELL_WIDTH).cyan().bold().to_string(),
        Cell::Continues(_) => pad("┃", CELL_WIDTH).cyan().to_string(),
    }
}

impl Render for DayColumn {
    fn render(&self) -> String {
        let header = pad(&self.header(), CELL_WIDTH);
        if self.is_today {
            header.green().bold().to_string()
        } else {
            header.bold().to_string()
        }
    }
}

impl Render for PlacedBlock {
    fn render(&self) -> String {
        let mut line = format!("{}-{} {}", self.start, self.end, self.title);
        if !self.event_type.is_empty() {
            line.push_str(&format!(" [{}]", self.event_type));
        }

        format!(
            "{}  {}",
            line,
            format!(
                "{} (top {}, height {})",
                self.key, self.geometry.top, self.geometry.height
            )
            .dimmed()
        )
    }
}

impl Render for WeekView {
    fn render(&self) -> String {
        let window = self.window();
        let mut lines = Vec::new();

        lines.push(format!("Week {}: {}", window.iso_week(), window).bold().to_string());
        lines.push(String::new());

        // Grid
        let mut header = " ".repeat(GUTTER_WIDTH);
        for column in self.columns() {
            header.push_str(&column.render());
        }
        lines.push(header);

        let slot_count = self.columns().first().map_or(0, |c| c.slots.len());
        for row in 0..slot_count {
            let label = &self.columns()[0].slots[row].label;
            let mut line = pad(label, GUTTER_WIDTH).dimmed().to_string();

            for column in self.columns() {
                line.push_str(&render_cell(&cell_for(&column.slots[row], &column.blocks)));
            }
            lines.push(line);
        }

        // Agenda
        let mut any_blocks = false;
        for column in self.columns().iter().filter(|c| !c.blocks.is_empty()) {
            any_blocks = true;
            lines.push(String::new());
            lines.push(column.render().trim_end().to_string());
            for block in &column.blocks {
                lines.push(format!("  {}", block.render()));
            }
        }

        if !any_blocks {
            lines.push(String::new());
            lines.push("No events this week".dimmed().to_string());
        }

        lines.join("\n")
    }
}

impl Render for Rect {
    fn render(&self) -> String {
        format!(
            "🗑  Trash: ({}, {}) to ({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
