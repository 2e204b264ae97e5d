//! Rendered week: seven day columns with hour rows and positioned blocks.
//!
//! This is what a renderer draws. It is rebuilt from scratch on every
//! `CalendarController::render` and patched in place for single additions and
//! deletions.

use chrono::{Datelike, NaiveDate};

use crate::event::{EventKey, EventRecord, TimeOfDay};
use crate::layout::{BlockGeometry, GridMetrics, HourSlot};
use crate::week::WeekWindow;

/// An event positioned inside its day column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedBlock {
    pub key: EventKey,
    pub title: String,
    pub event_type: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub geometry: BlockGeometry,
}

#[derive(Debug, Clone)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub slots: Vec<HourSlot>,
    /// Sorted by start time
    pub blocks: Vec<PlacedBlock>,
}

impl DayColumn {
    /// Header text, e.g. `Mon 17`.
    pub fn header(&self) -> String {
        format!("{} {:02}", self.date.weekday(), self.date.day())
    }
}

#[derive(Debug, Clone)]
pub struct WeekView {
    window: WeekWindow,
    header_height: i32,
    columns: Vec<DayColumn>,
}

impl WeekView {
    /// Empty grid for `window`, with `today` marked if it falls inside.
    pub fn new(window: WeekWindow, today: NaiveDate, metrics: &GridMetrics) -> Self {
        let header_height = metrics.header_height;
        let columns = window
            .days()
            .map(|date| DayColumn {
                date,
                is_today: date == today,
                slots: metrics.hour_slots(header_height),
                blocks: Vec::new(),
            })
            .collect();

        WeekView {
            window,
            header_height,
            columns,
        }
    }

    pub fn window(&self) -> WeekWindow {
        self.window
    }

    /// Monday first.
    pub fn columns(&self) -> &[DayColumn] {
        &self.columns
    }

    pub fn blocks(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.columns.iter().flat_map(|c| c.blocks.iter())
    }

    pub fn block(&self, key: &EventKey) -> Option<&PlacedBlock> {
        self.blocks().find(|b| &b.key == key)
    }

    pub fn contains_block(&self, key: &EventKey) -> bool {
        self.block(key).is_some()
    }

    /// Lay `event` out in its day column. Events from other weeks are left
    /// out and `false` is returned. A block already placed under the same key
    /// is replaced.
    pub fn place(&mut self, event: &EventRecord, metrics: &GridMetrics) -> bool {
        let Some(index) = self.window.day_index(event.day) else {
            return false;
        };

        let key = event.key();
        self.remove_block(&key);

        let block = PlacedBlock {
            geometry: metrics.layout_block(self.header_height, event.start, event.end),
            key,
            title: event.title.clone(),
            event_type: event.event_type.clone(),
            start: event.start,
            end: event.end,
        };

        let blocks = &mut self.columns[index].blocks;
        let position = blocks.partition_point(|b| b.start <= block.start);
        blocks.insert(position, block);
        true
    }

    /// Drop the block for `key`. Returns whether one was shown.
    pub fn remove_block(&mut self, key: &EventKey) -> bool {
        for column in &mut self.columns {
            if let Some(position) = column.blocks.iter().position(|b| &b.key == key) {
                column.blocks.remove(position);
                return true;
            }
        }
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
