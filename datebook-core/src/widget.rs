//! The rendering widget the core drives.

use chrono::NaiveDate;

/// A calendar grid that renders events. Implemented by the embedding UI.
///
/// The core owns the focused date and the selected view; the widget is only
/// told about changes and asked to refresh.
pub trait CalendarWidget {
    /// Switch to an external view identifier such as `dayGridMonth`.
    fn change_view(&mut self, view_name: &str);

    /// Show the period containing `date`.
    fn go_to_date(&mut self, date: NaiveDate);

    /// Pull the event projection again and re-render.
    fn refetch_events(&mut self);
}
