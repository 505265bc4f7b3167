//! Core types for daybook.
//!
//! This crate holds everything the front-end calls into:
//! - `store` for the date-keyed event store and its JSON file
//! - `grid` for rendering a month as text with exact day positions
//! - `month` for (year, month) navigation
//! - `config` for the global configuration file

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod grid;
pub mod month;
pub mod store;

pub use error::{DaybookError, DaybookResult};
pub use event::Event;
pub use grid::{CalendarRenderer, DaySpan, MonthGrid};
pub use month::YearMonth;
pub use store::EventStore;
