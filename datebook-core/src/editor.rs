//! Editor session: the create/edit popup's state.
//!
//! The session never touches the screen directly. It drives an
//! [`EditorSurface`] implemented by the UI, which owns the date cells, the
//! event elements and the draft preview row.

use std::fmt;

use tracing::debug;

use crate::config::DatebookConfig;
use crate::constants::{
    EVENT_TITLE_MAX_LENGTH, MOBILE_BREAKPOINT, MOBILE_POPUP_MAX_WIDTH, MOBILE_POPUP_WIDTH_PERCENT,
    POPUP_OFFSET, PREVIEW_PLACEHOLDER, palette_color,
};
use crate::date::{parse_date, parse_time};
use crate::error::{DatebookError, DatebookResult};
use crate::event::{CalendarEvent, EventDate, NewEvent};
use crate::storage::Storage;
use crate::store::EventStore;
use crate::widget::CalendarWidget;

/// The UI side of the editor.
pub trait EditorSurface {
    /// Handle to an on-screen date cell.
    type Cell: Clone + PartialEq + fmt::Debug;
    /// Handle to an on-screen rendered event.
    type Element: Clone + PartialEq + fmt::Debug;

    fn set_cell_selected(&mut self, cell: &Self::Cell, selected: bool);

    fn set_event_editing(&mut self, element: &Self::Element, editing: bool);

    /// Create the draft preview row inside `cell`.
    /// Returns false if the cell has nowhere to put it.
    fn create_preview(&mut self, cell: &Self::Cell, text: &str) -> bool;

    fn update_preview(&mut self, text: &str);

    fn remove_preview(&mut self);

    /// Current on-screen geometry of `cell`, if it is rendered.
    fn measure(&self, cell: &Self::Cell) -> Option<CellGeometry>;

    fn viewport_width(&self) -> u32;
}

/// Positions of a date cell and of the calendar container around it, in one
/// coordinate space (usually viewport CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub cell_left: f64,
    pub cell_bottom: f64,
    pub container_left: f64,
    pub container_top: f64,
}

/// Where the popup goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupPlacement {
    /// Below the clicked cell, left-aligned with it, relative to the container
    Anchored { top: f64, left: f64 },
    /// Fixed in the middle of the viewport
    Centered { width_percent: u32, max_width: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Closed,
    Creating,
    Editing,
}

/// Data submitted by the editor form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl EventForm {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        EventForm {
            title: title.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The event timestamp: the date alone, or date and time combined.
    pub fn timestamp(&self) -> DatebookResult<EventDate> {
        let date = parse_date(&self.date)?;

        match non_empty(&self.time) {
            Some(time) => Ok(EventDate::DateTime(date.and_time(parse_time(&time)?))),
            None => Ok(EventDate::Date(date)),
        }
    }

    fn validated_title(&self) -> DatebookResult<String> {
        let title = self.title.trim();

        if title.is_empty() {
            return Err(DatebookError::InvalidForm("title is required".into()));
        }
        if title.chars().count() > EVENT_TITLE_MAX_LENGTH {
            return Err(DatebookError::InvalidForm(format!(
                "title is longer than {} characters",
                EVENT_TITLE_MAX_LENGTH
            )));
        }

        Ok(title.to_string())
    }

    /// The chosen color: a palette name or value maps to the palette value,
    /// any other `#RRGGBB` is kept as written. `None` when left blank.
    fn validated_color(&self) -> DatebookResult<Option<String>> {
        let Some(color) = non_empty(&self.color) else {
            return Ok(None);
        };

        if let Some(value) = palette_color(&color) {
            return Ok(Some(value.to_string()));
        }

        let is_hex = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex {
            return Err(DatebookError::InvalidForm(format!("unknown color '{}'", color)));
        }

        Ok(Some(color))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(CalendarEvent),
    Updated(CalendarEvent),
    /// The edited event no longer exists; nothing was stored
    Missing(String),
}

/// At most one editing target at a time plus the UI marks that go with it.
pub struct EditorSession<S: EditorSurface> {
    open: bool,
    selected_date: Option<String>,
    editing_event: Option<CalendarEvent>,
    selected_cell: Option<S::Cell>,
    editing_element: Option<S::Element>,
    title_preview: String,
    preview_shown: bool,
    placement: Option<PopupPlacement>,
    placement_pending: bool,
    mobile_breakpoint: u32,
}

impl<S: EditorSurface> Default for EditorSession<S> {
    fn default() -> Self {
        Self::new(MOBILE_BREAKPOINT)
    }
}

impl<S: EditorSurface> EditorSession<S> {
    pub fn new(mobile_breakpoint: u32) -> Self {
        EditorSession {
            open: false,
            selected_date: None,
            editing_event: None,
            selected_cell: None,
            editing_element: None,
            title_preview: String::new(),
            preview_shown: false,
            placement: None,
            placement_pending: false,
            mobile_breakpoint,
        }
    }

    pub fn from_config(config: &DatebookConfig) -> Self {
        Self::new(config.mobile_breakpoint)
    }

    pub fn mode(&self) -> EditorMode {
        match (self.open, &self.editing_event) {
            (false, _) => EditorMode::Closed,
            (true, None) => EditorMode::Creating,
            (true, Some(_)) => EditorMode::Editing,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn editing_event(&self) -> Option<&CalendarEvent> {
        self.editing_event.as_ref()
    }

    pub fn selected_cell(&self) -> Option<&S::Cell> {
        self.selected_cell.as_ref()
    }

    pub fn editing_element(&self) -> Option<&S::Element> {
        self.editing_element.as_ref()
    }

    pub fn title_preview(&self) -> &str {
        &self.title_preview
    }

    pub fn has_preview(&self) -> bool {
        self.preview_shown
    }

    /// Placement computed by the last [`settle`](Self::settle).
    pub fn placement(&self) -> Option<PopupPlacement> {
        self.placement
    }

    /// Whether a placement is waiting for the next render pass.
    pub fn placement_pending(&self) -> bool {
        self.placement_pending
    }

    /// Open the editor on `cell`. Without `event` this creates a new event on
    /// `date`; with one it edits it, marking `element` if given.
    ///
    /// Marks from a previous target are cleared first, so calling this while
    /// already open is fine. Placement is computed by `settle` once the UI
    /// has rendered the new marks.
    pub fn open(
        &mut self,
        surface: &mut S,
        cell: S::Cell,
        date: &str,
        event: Option<CalendarEvent>,
        element: Option<S::Element>,
    ) {
        self.clear_marks(surface);

        surface.set_cell_selected(&cell, true);
        self.selected_cell = Some(cell);
        self.selected_date = Some(date.to_string());

        self.editing_element = match (&event, element) {
            (Some(_), Some(element)) => {
                surface.set_event_editing(&element, true);
                Some(element)
            }
            _ => None,
        };

        debug!(date, event = ?event.as_ref().map(|e| &e.id), "Opened editor");

        self.editing_event = event;
        self.title_preview.clear();
        self.open = true;
        self.placement = None;
        self.placement_pending = true;
    }

    /// Compute the popup placement. Call after the render pass that follows
    /// `open`; positions measured earlier would be stale.
    pub fn settle(&mut self, surface: &S) -> Option<PopupPlacement> {
        if !self.placement_pending {
            return self.placement;
        }
        self.placement_pending = false;

        if surface.viewport_width() < self.mobile_breakpoint {
            self.placement = Some(PopupPlacement::Centered {
                width_percent: MOBILE_POPUP_WIDTH_PERCENT,
                max_width: MOBILE_POPUP_MAX_WIDTH,
            });
            return self.placement;
        }

        let geometry = self.selected_cell.as_ref().and_then(|cell| surface.measure(cell));
        if let Some(g) = geometry {
            self.placement = Some(PopupPlacement::Anchored {
                top: g.cell_bottom - g.container_top + POPUP_OFFSET,
                left: g.cell_left - g.container_left,
            });
        }

        self.placement
    }

    /// Show the in-progress title in the selected cell. Only new events get a
    /// preview; the row is created on the first non-empty title.
    pub fn update_title_preview(&mut self, surface: &mut S, title: &str) {
        self.title_preview = title.to_string();

        if self.editing_event.is_some() {
            return;
        }
        let Some(cell) = self.selected_cell.as_ref() else {
            return;
        };

        if self.preview_shown {
            let text = if title.is_empty() { PREVIEW_PLACEHOLDER } else { title };
            surface.update_preview(text);
        } else if !title.is_empty() {
            self.preview_shown = surface.create_preview(cell, title);
        }
    }

    /// Store the form and close. Editing updates the edited event, otherwise
    /// a new event is added. Invalid forms leave the session open.
    pub fn submit<St: Storage>(
        &mut self,
        surface: &mut S,
        store: &mut EventStore<St>,
        widget: Option<&mut dyn CalendarWidget>,
        form: &EventForm,
    ) -> DatebookResult<SubmitOutcome> {
        let title = form.validated_title()?;
        let timestamp = form.timestamp()?;
        let description = non_empty(&form.description);
        let color = form.validated_color()?;

        let outcome = match self.editing_event.take() {
            Some(existing) => {
                let id = existing.id.clone();
                let updated = CalendarEvent {
                    title,
                    date: timestamp,
                    start: Some(timestamp),
                    description,
                    color: color.unwrap_or(existing.color.clone()),
                    ..existing
                };

                match store.update_event(updated) {
                    Some(event) => SubmitOutcome::Updated(event),
                    None => SubmitOutcome::Missing(id),
                }
            }
            None => {
                let new_event = NewEvent {
                    title,
                    date: Some(timestamp),
                    start: Some(timestamp),
                    end: None,
                    color,
                    description,
                };
                SubmitOutcome::Created(store.add_event(new_event))
            }
        };

        self.close(surface);

        if let Some(widget) = widget {
            widget.refetch_events();
        }

        Ok(outcome)
    }

    /// Delete an event and close. Returns whether the store removed one.
    pub fn delete_current<St: Storage>(
        &mut self,
        surface: &mut S,
        store: &mut EventStore<St>,
        widget: Option<&mut dyn CalendarWidget>,
        event_id: &str,
    ) -> bool {
        let removed = store.delete_event(event_id);
        self.close(surface);

        if let Some(widget) = widget {
            widget.refetch_events();
        }

        removed
    }

    /// Drop the target and every mark without storing anything.
    pub fn close(&mut self, surface: &mut S) {
        self.clear_marks(surface);

        self.open = false;
        self.selected_date = None;
        self.editing_event = None;
        self.title_preview.clear();
        self.placement = None;
        self.placement_pending = false;
    }

    fn clear_marks(&mut self, surface: &mut S) {
        if self.preview_shown {
            surface.remove_preview();
            self.preview_shown = false;
        }
        if let Some(element) = self.editing_element.take() {
            surface.set_event_editing(&element, false);
        }
        if let Some(cell) = self.selected_cell.take() {
            surface.set_cell_selected(&cell, false);
        }
    }
}
