//! Bounded diagnostic event history.
//!
//! Each protocol client keeps two of these (outbound "Client" events and
//! inbound "Service" events) and renders them in its diagnostic dump. This is
//! separate from process logging: nothing here is written anywhere until
//! [`EventLog::dump`] is called.
//!
//! # De-duplication
//!
//! An event identical in kind and label to the most recently written slot does
//! not take a new slot. The existing entry takes the new value and timestamp
//! and its `repeat_count` grows, so a burst of identical events collapses into
//! one line annotated with "& K similar events".

use std::fmt::Write as _;
use std::time::SystemTime;

use humantime::format_rfc3339_millis;

/// Payload shape of a recorded event. Part of the identity used for de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OneOff,
    Float,
    Integer,
    BoolTrue,
    BoolFalse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: EventKind,
    pub label: String,
    pub value: f32,
    pub timestamp: SystemTime,
    pub repeat_count: u32,
}

impl LogEntry {
    fn new(kind: EventKind, label: &str, value: f32) -> Self {
        Self {
            kind,
            label: label.to_string(),
            value,
            timestamp: SystemTime::now(),
            repeat_count: 0,
        }
    }

    fn matches(&self, kind: EventKind, label: &str) -> bool {
        self.kind == kind && self.label == label
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let _ = write!(
            out,
            "{prefix}  {}  {}",
            format_rfc3339_millis(self.timestamp),
            self.label
        );
        let _ = match self.kind {
            EventKind::OneOff => Ok(()),
            EventKind::Float => write!(out, ": {}", self.value),
            EventKind::Integer => write!(out, ": {}", self.value as i32),
            EventKind::BoolTrue => write!(out, ": true"),
            EventKind::BoolFalse => write!(out, ": false"),
        };
        if self.repeat_count > 0 {
            let _ = write!(out, " & {} similar events", self.repeat_count);
        }
        out.push('\n');
    }
}

/// Fixed-capacity ring of [`LogEntry`] values.
#[derive(Debug, Clone)]
pub struct EventLog {
    tag: String,
    slots: Vec<Option<LogEntry>>,
    next: usize,
}

impl EventLog {
    /// Create an empty log. A zero capacity is raised to one.
    pub fn new(tag: impl Into<String>, capacity: usize) -> Self {
        Self {
            tag: tag.into(),
            slots: vec![None; capacity.max(1)],
            next: 0,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record an event, collapsing it into the previous entry when identical.
    pub fn record(&mut self, kind: EventKind, label: &str, value: f32) {
        let capacity = self.slots.len();
        let last = (self.next + capacity - 1) % capacity;

        if let Some(entry) = self.slots[last].as_mut()
            && entry.matches(kind, label)
        {
            entry.value = value;
            entry.timestamp = SystemTime::now();
            entry.repeat_count += 1;
            return;
        }

        self.slots[self.next] = Some(LogEntry::new(kind, label, value));
        self.next = (self.next + 1) % capacity;
    }

    pub fn event(&mut self, label: &str) {
        self.record(EventKind::OneOff, label, 0.0);
    }

    pub fn float(&mut self, label: &str, value: f32) {
        self.record(EventKind::Float, label, value);
    }

    pub fn int(&mut self, label: &str, value: i32) {
        self.record(EventKind::Integer, label, value as f32);
    }

    pub fn flag(&mut self, label: &str, value: bool) {
        let kind = if value {
            EventKind::BoolTrue
        } else {
            EventKind::BoolFalse
        };
        self.record(kind, label, 0.0);
    }

    /// Occupied entries, oldest first.
    pub fn entries(&self) -> Vec<&LogEntry> {
        let capacity = self.slots.len();
        (0..capacity)
            .filter_map(|offset| self.slots[(self.next + offset) % capacity].as_ref())
            .collect()
    }

    /// Render the history, oldest first and newest last.
    pub fn dump(&self, prefix: &str) -> String {
        let mut out = format!("{prefix}{} event history:\n", self.tag);
        for entry in self.entries() {
            entry.render(prefix, &mut out);
        }
        out
    }
}
