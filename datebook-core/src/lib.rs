//! Core of the datebook local calendar.
//!
//! - `store` owns the events, assigns ids and persists them
//! - `navigation` tracks the selected view and focused date
//! - `editor` is the create/edit popup state driving the `store`
//!
//! Rendering is left to the embedding UI through the `CalendarWidget` and
//! `EditorSurface` traits.

pub mod config;
pub mod constants;
pub mod date;
pub mod editor;
pub mod error;
pub mod event;
pub mod navigation;
pub mod storage;
pub mod store;
pub mod widget;

pub use crate::config::{DatebookConfig, IdPolicy};
pub use editor::{
    CellGeometry, EditorMode, EditorSession, EditorSurface, EventForm, PopupPlacement,
    SubmitOutcome,
};
pub use error::{DatebookError, DatebookResult};
pub use event::{CalendarEvent, EventDate, NewEvent};
pub use navigation::{CalendarView, Navigation};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CalendarViewEvent, EventStore, StoreOptions};
pub use widget::CalendarWidget;
