//! Pixel geometry for event blocks.
//!
//! Pure arithmetic: no rendering calls, no storage. The same `GridMetrics`
//! drive both the hour rows drawn by a renderer and the block positions
//! computed here, so the two cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::error::{WeekGridError, WeekGridResult};
use crate::event::TimeOfDay;

pub const MINUTES_PER_HOUR: i32 = 60;

/// Dimensions of the visible time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    /// Hour at the top of the axis
    pub first_hour: u32,
    /// Number of one-hour slots shown
    pub hour_count: u32,
    pub pixels_per_minute: i32,
    /// Gap kept between a block's edges and its slot boundaries
    pub block_inset: i32,
    /// Height of each day column's header, above the first hour slot
    pub header_height: i32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        GridMetrics {
            first_hour: 6,
            hour_count: 16,
            pixels_per_minute: 1,
            block_inset: 2,
            header_height: 20,
        }
    }
}

/// Vertical placement of a block inside a day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    pub top: i32,
    pub height: i32,
}

impl BlockGeometry {
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// One labelled hour row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: u32,
    pub label: String,
    pub top: i32,
    pub height: i32,
}

impl GridMetrics {
    pub fn validate(&self) -> WeekGridResult<()> {
        if self.hour_count == 0 {
            return Err(WeekGridError::Config("grid.hour_count must be at least 1".into()));
        }
        if self
            .first_hour
            .checked_add(self.hour_count)
            .is_none_or(|last| last > 24)
        {
            return Err(WeekGridError::Config(format!(
                "grid axis {}:00 + {} hours runs past midnight",
                self.first_hour, self.hour_count
            )));
        }
        if self.pixels_per_minute <= 0 {
            return Err(WeekGridError::Config(
                "grid.pixels_per_minute must be positive".into(),
            ));
        }
        if self.block_inset < 0 || self.header_height < 0 {
            return Err(WeekGridError::Config(
                "grid.block_inset and grid.header_height cannot be negative".into(),
            ));
        }
        // hour_count is at most 24 here
        let grid_bottom = MINUTES_PER_HOUR
            .checked_mul(self.pixels_per_minute)
            .and_then(|slot| slot.checked_mul(self.hour_count as i32))
            .and_then(|axis| axis.checked_add(self.header_height));
        if grid_bottom.is_none() {
            return Err(WeekGridError::Config(format!(
                "grid of {} hours at {} pixels per minute is too tall",
                self.hour_count, self.pixels_per_minute
            )));
        }
        Ok(())
    }

    /// Pixel height of one hour row.
    pub fn hour_slot_height(&self) -> i32 {
        MINUTES_PER_HOUR * self.pixels_per_minute
    }

    /// Pixel height of the whole axis, header excluded.
    pub fn axis_height(&self) -> i32 {
        self.hour_count as i32 * self.hour_slot_height()
    }

    pub fn last_hour(&self) -> u32 {
        self.first_hour + self.hour_count
    }

    /// Minutes between the top of the axis and `time`.
    ///
    /// Negative before the axis starts and at least `hour_count * 60` at or
    /// after its end. Not clamped.
    pub fn time_to_offset_minutes(&self, time: TimeOfDay) -> i32 {
        (time.hour() as i32 - self.first_hour as i32) * MINUTES_PER_HOUR + time.minute() as i32
    }

    /// Place a `[start, end)` block below a header of `header_height` pixels.
    pub fn layout_block(
        &self,
        header_height: i32,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> BlockGeometry {
        let top = header_height
            + self.time_to_offset_minutes(start) * self.pixels_per_minute
            + self.block_inset;
        let raw_end = header_height
            + self.time_to_offset_minutes(end) * self.pixels_per_minute
            - self.block_inset;

        BlockGeometry {
            top,
            height: (raw_end - top) - self.block_inset,
        }
    }

    /// Whether `[start, end)` lies entirely on the visible axis.
    pub fn is_within_axis(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        let axis_end = self.hour_count as i32 * MINUTES_PER_HOUR;
        self.time_to_offset_minutes(start) >= 0 && self.time_to_offset_minutes(end) <= axis_end
    }

    pub fn hour_slots(&self, header_height: i32) -> Vec<HourSlot> {
        (0..self.hour_count)
            .map(|i| HourSlot {
                hour: self.first_hour + i,
                label: format!("{:02}:00", self.first_hour + i),
                top: header_height + i as i32 * self.hour_slot_height(),
                height: self.hour_slot_height(),
            })
            .collect()
    }
}

/// `time_to_offset_minutes` against the default 06:00 axis.
pub fn time_to_offset_minutes(time: TimeOfDay) -> i32 {
    GridMetrics::default().time_to_offset_minutes(time)
}

/// `layout_block` with the default metrics (one pixel per minute, 2px inset).
pub fn layout_block(header_height: i32, start: TimeOfDay, end: TimeOfDay) -> BlockGeometry {
    GridMetrics::default().layout_block(header_height, start, end)
}

// =============================================================================
// Tests
// =============================================================================
