//! View granularity and focused date.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, Months, NaiveDate};
use tracing::debug;

use crate::date::{format_month_year, is_same_date, is_same_month};
use crate::error::DatebookError;
use crate::widget::CalendarWidget;

/// External view identifier used when a view name isn't recognised.
pub const FALLBACK_VIEW_NAME: &str = "dayGridMonth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
    Agenda,
}

impl CalendarView {
    pub const ALL: [CalendarView; 4] = [
        CalendarView::Month,
        CalendarView::Week,
        CalendarView::Day,
        CalendarView::Agenda,
    ];

    /// Identifier understood by the rendering widget.
    /// Agenda renders as the week time grid.
    pub fn external_name(&self) -> &'static str {
        match self {
            CalendarView::Month => "dayGridMonth",
            CalendarView::Week => "timeGridWeek",
            CalendarView::Day => "timeGridDay",
            CalendarView::Agenda => "timeGridWeek",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalendarView::Month => "Month",
            CalendarView::Week => "Week",
            CalendarView::Day => "Day",
            CalendarView::Agenda => "Agenda",
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CalendarView {
    type Err = DatebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarView::ALL
            .into_iter()
            .find(|v| v.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DatebookError::UnknownView(s.to_string()))
    }
}

/// External identifier for a view name, falling back to the month grid.
pub fn view_name_for(name: &str) -> &'static str {
    name.parse::<CalendarView>()
        .map(|v| v.external_name())
        .unwrap_or(FALLBACK_VIEW_NAME)
}

/// Tracks the selected view and focused date.
///
/// This is the only owner of the focused date. Navigation computes the new
/// date here and then tells the widget, if one is attached.
#[derive(Debug, Clone)]
pub struct Navigation {
    current_view: CalendarView,
    current_date: NaiveDate,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl Navigation {
    pub fn new(current_date: NaiveDate) -> Self {
        Navigation {
            current_view: CalendarView::default(),
            current_date,
        }
    }

    pub fn current_view(&self) -> CalendarView {
        self.current_view
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn change_view(&mut self, view: CalendarView, widget: Option<&mut dyn CalendarWidget>) {
        self.current_view = view;
        debug!(view = %view, "Changed view");

        if let Some(widget) = widget {
            widget.change_view(view.external_name());
        }
    }

    /// Change view by name, e.g. from a toolbar. Unknown names select the
    /// month view.
    pub fn change_view_named(&mut self, name: &str, widget: Option<&mut dyn CalendarWidget>) {
        let view = name.parse::<CalendarView>().unwrap_or_default();
        self.change_view(view, widget);
    }

    pub fn go_to_today(&mut self, widget: Option<&mut dyn CalendarWidget>) {
        self.go_to_today_at(Local::now().date_naive(), widget);
    }

    pub fn go_to_today_at(&mut self, today: NaiveDate, widget: Option<&mut dyn CalendarWidget>) {
        self.set_date(today, widget);
    }

    /// Step back one period of the current view.
    pub fn previous(&mut self, widget: Option<&mut dyn CalendarWidget>) {
        let date = step(self.current_date, self.current_view, -1);
        self.set_date(date, widget);
    }

    /// Step forward one period of the current view.
    pub fn next(&mut self, widget: Option<&mut dyn CalendarWidget>) {
        let date = step(self.current_date, self.current_view, 1);
        self.set_date(date, widget);
    }

    /// Sync from the widget's own navigation callback. The widget already
    /// shows this date, so it isn't notified.
    pub fn update_date(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    pub fn is_today(&self) -> bool {
        self.is_today_at(Local::now().date_naive())
    }

    /// Month view compares the month, every other view the exact day.
    pub fn is_today_at(&self, now: NaiveDate) -> bool {
        match self.current_view {
            CalendarView::Month => is_same_month(&self.current_date, &now),
            _ => is_same_date(&self.current_date, &now),
        }
    }

    pub fn current_month_year(&self) -> String {
        format_month_year(&self.current_date)
    }

    fn set_date(&mut self, date: NaiveDate, widget: Option<&mut dyn CalendarWidget>) {
        self.current_date = date;
        debug!(date = %date, "Navigated");

        if let Some(widget) = widget {
            widget.go_to_date(date);
        }
    }
}

/// Move `date` by `delta` periods of `view`. Month steps clamp the day to the
/// target month's length.
fn step(date: NaiveDate, view: CalendarView, delta: i32) -> NaiveDate {
    match view {
        CalendarView::Day => date + Duration::days(i64::from(delta)),
        CalendarView::Week | CalendarView::Agenda => date + Duration::weeks(i64::from(delta)),
        CalendarView::Month => {
            let months = Months::new(delta.unsigned_abs());
            let shifted = if delta < 0 {
                date.checked_sub_months(months)
            } else {
                date.checked_add_months(months)
            };
            shifted.unwrap_or(date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Default)]
    struct RecordingWidget {
        views: Vec<String>,
        dates: Vec<NaiveDate>,
    }

    impl CalendarWidget for RecordingWidget {
        fn change_view(&mut self, view_name: &str) {
            self.views.push(view_name.to_string());
        }

        fn go_to_date(&mut self, date: NaiveDate) {
            self.dates.push(date);
        }

        fn refetch_events(&mut self) {}
    }

    #[test]
    fn test_agenda_maps_like_week() {
        let mut widget = RecordingWidget::default();
        let mut nav = Navigation::new(day(2024, 1, 1));

        nav.change_view(CalendarView::Agenda, Some(&mut widget));
        nav.change_view(CalendarView::Week, Some(&mut widget));

        assert_eq!(widget.views, vec!["timeGridWeek", "timeGridWeek"]);
        assert_eq!(nav.current_view(), CalendarView::Week);
    }

    #[test]
    fn test_view_mapping() {
        assert_eq!(view_name_for("Month"), "dayGridMonth");
        assert_eq!(view_name_for("Week"), "timeGridWeek");
        assert_eq!(view_name_for("Day"), "timeGridDay");
        assert_eq!(view_name_for("Agenda"), "timeGridWeek");
        assert_eq!(view_name_for("Year"), FALLBACK_VIEW_NAME);
        assert!("Year".parse::<CalendarView>().is_err());
    }

    #[test]
    fn test_unknown_view_name_selects_month() {
        let mut widget = RecordingWidget::default();
        let mut nav = Navigation::new(day(2024, 1, 1));
        nav.change_view(CalendarView::Day, None);

        nav.change_view_named("Fortnight", Some(&mut widget));

        assert_eq!(nav.current_view(), CalendarView::Month);
        assert_eq!(widget.views, vec!["dayGridMonth"]);
    }

    #[test]
    fn test_change_view_without_widget() {
        let mut nav = Navigation::new(day(2024, 1, 1));
        nav.change_view(CalendarView::Day, None);
        assert_eq!(nav.current_view(), CalendarView::Day);
    }

    #[test]
    fn test_previous_next_owned_by_core() {
        let mut widget = RecordingWidget::default();
        let mut nav = Navigation::new(day(2024, 1, 31));

        nav.next(Some(&mut widget));
        assert_eq!(nav.current_date(), day(2024, 2, 29));

        nav.change_view(CalendarView::Week, None);
        nav.previous(Some(&mut widget));
        assert_eq!(nav.current_date(), day(2024, 2, 22));

        nav.change_view(CalendarView::Day, None);
        nav.next(Some(&mut widget));
        assert_eq!(nav.current_date(), day(2024, 2, 23));

        assert_eq!(widget.dates, vec![day(2024, 2, 29), day(2024, 2, 22), day(2024, 2, 23)]);
    }

    #[test]
    fn test_go_to_today_notifies_widget() {
        let mut widget = RecordingWidget::default();
        let mut nav = Navigation::new(day(2020, 5, 5));

        nav.go_to_today_at(day(2024, 6, 1), Some(&mut widget));

        assert_eq!(nav.current_date(), day(2024, 6, 1));
        assert_eq!(widget.dates, vec![day(2024, 6, 1)]);
    }

    #[test]
    fn test_update_date_from_widget() {
        let mut nav = Navigation::new(day(2024, 1, 1));
        nav.update_date(day(2024, 3, 10));
        assert_eq!(nav.current_date(), day(2024, 3, 10));
    }

    #[test]
    fn test_is_today_by_view() {
        let now = day(2024, 1, 15);
        let mut nav = Navigation::new(day(2024, 1, 2));

        assert!(nav.is_today_at(now));

        nav.change_view(CalendarView::Week, None);
        assert!(!nav.is_today_at(now));

        nav.update_date(now);
        assert!(nav.is_today_at(now));

        nav.change_view(CalendarView::Month, None);
        assert!(!nav.is_today_at(day(2025, 1, 15)));
    }

    #[test]
    fn test_current_month_year() {
        let nav = Navigation::new(day(2024, 12, 25));
        assert_eq!(nav.current_month_year(), "December 2024");
    }
}
