//! Observability hook for production events.
//!
//! The engine and producers never touch logging configuration. They hand
//! tagged [`Event`]s to an injected [`Observer`], and the observer decides
//! what to do with them.
//!
//! Observers compose by wrapping:
//!
//! ```
//! use economy_core::observer::{Event, Level, LevelFilter, Observer, OperationFilter, RecordingObserver};
//!
//! let recorder = RecordingObserver::new();
//! let observer = OperationFilter::new(["make", "mine_iron"], LevelFilter::new(Level::Info, &recorder));
//!
//! observer.notify(&Event::info("mine_iron", "mining iron"));
//! observer.notify(&Event::debug("make", "making a 'nails'"));
//! observer.notify(&Event::info("make_nails", "making nails"));
//!
//! assert_eq!(recorder.messages(), vec!["mining iron".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Event severity. Ordered so that `Debug < Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => f.write_str("debug"),
            Level::Info => f.write_str("info"),
        }
    }
}

/// A tagged production event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Operation that emitted the event, e.g. `make` or `mine_iron`.
    pub operation: String,
    pub level: Level,
    pub message: String,
}

impl Event {
    pub fn new(operation: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            level,
            message: message.into(),
        }
    }

    pub fn info(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(operation, Level::Info, message)
    }

    pub fn debug(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(operation, Level::Debug, message)
    }
}

// ---------------------------------------------------------------------------
// Observer trait
// ---------------------------------------------------------------------------

/// Sink for production events.
pub trait Observer {
    fn notify(&self, event: &Event);
}

impl<O: Observer + ?Sized> Observer for &O {
    fn notify(&self, event: &Event) {
        (**self).notify(event);
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn notify(&self, event: &Event) {
        (**self).notify(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&self, _event: &Event) {}
}

/// Forwards events to the `tracing` macros, carrying the operation tag as a
/// structured `operation` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &Event) {
        match event.level {
            Level::Info => tracing::info!(operation = %event.operation, "{}", event.message),
            Level::Debug => tracing::debug!(operation = %event.operation, "{}", event.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Forwards only events whose operation tag is in the allow list.
#[derive(Debug, Clone)]
pub struct OperationFilter<O> {
    allowed: BTreeSet<String>,
    inner: O,
}

impl<O: Observer> OperationFilter<O> {
    pub fn new<I, S>(allowed: I, inner: O) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            inner,
        }
    }

    pub fn allows(&self, operation: &str) -> bool {
        self.allowed.contains(operation)
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Observer> Observer for OperationFilter<O> {
    fn notify(&self, event: &Event) {
        if self.allows(&event.operation) {
            self.inner.notify(event);
        }
    }
}

/// Forwards only events at or above a minimum level.
#[derive(Debug, Clone)]
pub struct LevelFilter<O> {
    min: Level,
    inner: O,
}

impl<O: Observer> LevelFilter<O> {
    pub fn new(min: Level, inner: O) -> Self {
        Self { min, inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Observer> Observer for LevelFilter<O> {
    fn notify(&self, event: &Event) {
        if event.level >= self.min {
            self.inner.notify(event);
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Drain recorded events, leaving the recorder empty.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Operation tags of recorded events at the given level.
    pub fn operations_at(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.operation.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}
