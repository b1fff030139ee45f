//! The event store: canonical event list, id assignment and persistence.

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DatebookConfig, IdPolicy};
use crate::constants::{DEFAULT_EVENT_COLOR, EVENT_TEXT_COLOR, NEXT_ID_KEY_SUFFIX, STORAGE_KEY};
use crate::date::{is_same_date, is_same_month};
use crate::error::DatebookResult;
use crate::event::{CalendarEvent, EventDate, NewEvent};
use crate::storage::{FileStorage, Storage};

/// Settings a store is loaded with.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Slot holding the serialized events
    pub key: String,
    pub default_color: String,
    pub id_policy: IdPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            key: STORAGE_KEY.to_string(),
            default_color: DEFAULT_EVENT_COLOR.to_string(),
            id_policy: IdPolicy::default(),
        }
    }
}

impl From<&DatebookConfig> for StoreOptions {
    fn from(config: &DatebookConfig) -> Self {
        StoreOptions {
            key: config.storage_key.clone(),
            default_color: config.default_color.clone(),
            id_policy: config.id_policy,
        }
    }
}

/// An event shaped for the rendering widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarViewEvent {
    pub id: String,
    pub title: String,
    pub start: EventDate,
    pub end: EventDate,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&CalendarEvent> for CalendarViewEvent {
    fn from(event: &CalendarEvent) -> Self {
        CalendarViewEvent {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.effective_start(),
            end: event.effective_end(),
            background_color: event.color.clone(),
            border_color: event.color.clone(),
            text_color: EVENT_TEXT_COLOR.to_string(),
            description: event.description.clone(),
        }
    }
}

/// Owns every event of the calendar.
///
/// Each mutation rewrites the whole collection to storage. Storage failures
/// are logged and otherwise ignored: the in-memory list stays authoritative
/// and the change may just not survive a reload.
#[derive(Debug)]
pub struct EventStore<S: Storage> {
    storage: S,
    options: StoreOptions,
    events: Vec<CalendarEvent>,
    next_id: u64,
}

impl EventStore<FileStorage> {
    /// Open the file-backed store described by `config`.
    pub fn open(config: &DatebookConfig) -> Self {
        Self::load(FileStorage::new(config.data_path()), StoreOptions::from(config))
    }
}

impl<S: Storage> EventStore<S> {
    /// Load from storage. Missing or corrupt data yields an empty store.
    pub fn load(storage: S, options: StoreOptions) -> Self {
        let events = read_events(&storage, &options.key);

        let mut next_id = recompute_next_id(&events);
        if options.id_policy == IdPolicy::Persisted {
            if let Some(stored) = read_counter(&storage, &counter_key(&options.key)) {
                next_id = next_id.max(stored);
            }
        }

        info!(key = %options.key, events = events.len(), next_id, "Loaded event store");

        EventStore {
            storage,
            options,
            events,
            next_id,
        }
    }

    /// Events in insertion order.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn default_color(&self) -> &str {
        &self.options.default_color
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // MUTATIONS:

    pub fn add_event(&mut self, new_event: NewEvent) -> CalendarEvent {
        let id = self.next_id.to_string();
        let event = new_event.into_event(id, &self.options.default_color);

        self.events.push(event.clone());
        match self.next_id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => warn!(id = %event.id, "Event id counter exhausted"),
        }
        self.persist();

        debug!(id = %event.id, title = %event.title, "Added event");
        event
    }

    /// Replace the event with the same id, keeping its position.
    /// Returns `None` (and changes nothing) if no such event exists.
    pub fn update_event(&mut self, event: CalendarEvent) -> Option<CalendarEvent> {
        let index = self.events.iter().position(|e| e.id == event.id)?;

        let event = event.with_default_color(&self.options.default_color);
        self.events[index] = event.clone();
        self.persist();

        debug!(id = %event.id, "Updated event");
        Some(event)
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let Some(index) = self.events.iter().position(|e| e.id == id) else {
            return false;
        };

        self.events.remove(index);
        self.persist();

        debug!(id, "Deleted event");
        true
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.next_id = 1;
        self.persist();

        debug!("Cleared all events");
    }

    // QUERIES:

    /// Events whose effective day is `date`'s day.
    pub fn events_by_date(&self, date: &impl Datelike) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| is_same_date(&e.date.day(), date))
            .collect()
    }

    /// Events in a calendar month. `month` is 1-based.
    pub fn events_by_month(&self, year: i32, month: u32) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| {
                let day = e.date.day();
                day.year() == year && day.month() == month
            })
            .collect()
    }

    /// Events sharing a month with `date`.
    pub fn events_in_month_of(&self, date: &impl Datelike) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| is_same_month(&e.date.day(), date))
            .collect()
    }

    pub fn event_by_id(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Display projection sorted by start. Equal starts keep insertion order.
    pub fn calendar_view(&self) -> Vec<CalendarViewEvent> {
        let mut view: Vec<CalendarViewEvent> =
            self.events.iter().map(CalendarViewEvent::from).collect();

        // sort_by_key is stable
        view.sort_by_key(|e| e.start.timestamp());
        view
    }

    // PERSISTENCE:

    /// Write everything out, logging instead of failing.
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(key = %self.options.key, error = %e, "Failed to save events to storage");
        }
    }

    fn save(&mut self) -> DatebookResult<()> {
        let content = serde_json::to_string(&self.events)?;
        self.storage.write(&self.options.key, &content)?;

        if self.options.id_policy == IdPolicy::Persisted {
            let key = counter_key(&self.options.key);
            self.storage.write(&key, &self.next_id.to_string())?;
        }

        Ok(())
    }
}

fn counter_key(key: &str) -> String {
    format!("{}{}", key, NEXT_ID_KEY_SUFFIX)
}

fn read_events<S: Storage>(storage: &S, key: &str) -> Vec<CalendarEvent> {
    decode_events(storage, key).unwrap_or_else(|e| {
        warn!(key, error = %e, "Failed to load events from storage, starting empty");
        Vec::new()
    })
}

fn decode_events<S: Storage>(storage: &S, key: &str) -> DatebookResult<Vec<CalendarEvent>> {
    let Some(content) = storage.read(key)? else {
        return Ok(Vec::new());
    };

    Ok(serde_json::from_str(&content)?)
}

/// Stored counter, if present and usable.
fn read_counter<S: Storage>(storage: &S, key: &str) -> Option<u64> {
    let content = match storage.read(key) {
        Ok(content) => content?,
        Err(e) => {
            warn!(key, error = %e, "Failed to load id counter from storage");
            return None;
        }
    };

    match content.trim().parse::<u64>() {
        Ok(counter) if counter < u64::MAX => Some(counter),
        _ => {
            warn!(key, counter = %content.trim(), "Ignoring unusable id counter");
            None
        }
    }
}

/// Highest numeric id + 1, or 1 for an empty list. An id that can't be
/// followed by another is skipped as corrupt.
fn recompute_next_id(events: &[CalendarEvent]) -> u64 {
    events
        .iter()
        .filter_map(|e| {
            let next = e.numeric_id().checked_add(1);
            if next.is_none() {
                warn!(id = %e.id, "Ignoring out of range event id");
            }
            next
        })
        .max()
        .unwrap_or(1)
}
