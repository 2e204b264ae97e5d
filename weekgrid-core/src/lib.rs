//! Core library for weekgrid.
//!
//! - `event` / `store` / `kv`: event records and how they are persisted
//! - `week` / `layout` / `view`: which days are shown and where blocks go
//! - `drag`: the drag-to-trash deletion interaction
//! - `controller`: the application context tying it all together

pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod event;
pub mod kv;
pub mod layout;
pub mod store;
pub mod view;
pub mod week;

pub use controller::{CalendarController, Clock, DragOutcome, FixedClock, SystemClock};
pub use error::{WeekGridError, WeekGridResult};
pub use event::{EventKey, EventRecord, TimeOfDay};
pub use week::WeekWindow;
