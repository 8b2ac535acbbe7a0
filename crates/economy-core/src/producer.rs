//! Producers: the per-item handlers invoked during production.
//!
//! Every item in the graph is bound to exactly one [`Producer`]. When the
//! engine reaches an item in the execution order it hands the producer a
//! [`ProduceContext`] carrying the [`Materials`] contributed by the item's
//! direct prerequisites and a way to emit observability events.

use crate::id::Quantity;
use crate::observer::{Event, Level, Observer};
use std::collections::BTreeMap;
use std::fmt;

/// Quantity contributed by each direct prerequisite. There is no
/// multiplicity model: every prerequisite always supplies one unit.
pub const UNIT: Quantity = 1;

/// Direct prerequisite name -> quantity supplied.
pub type Materials = BTreeMap<String, Quantity>;

// ---------------------------------------------------------------------------
// Producer trait
// ---------------------------------------------------------------------------

/// Produces one item from its direct prerequisites.
///
/// Implementations should emit at least one event through the context.
/// Returning `None` marks a consumption-only item that yields nothing.
pub trait Producer: fmt::Debug {
    /// Operation tag attached to events emitted by this producer.
    fn operation(&self) -> &str;

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity>;
}

// ---------------------------------------------------------------------------
// ProduceContext
// ---------------------------------------------------------------------------

/// Context passed to [`Producer::produce`].
pub struct ProduceContext<'a> {
    /// Name of the item being produced.
    pub item: &'a str,
    /// One unit of every direct prerequisite.
    pub materials: &'a Materials,
    operation: &'a str,
    observer: &'a dyn Observer,
}

impl<'a> ProduceContext<'a> {
    pub fn new(
        item: &'a str,
        operation: &'a str,
        materials: &'a Materials,
        observer: &'a dyn Observer,
    ) -> Self {
        Self {
            item,
            materials,
            operation,
            observer,
        }
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Quantity supplied by the named prerequisite, or 0 if it is not one.
    pub fn quantity(&self, name: &str) -> Quantity {
        self.materials.get(name).copied().unwrap_or(0)
    }

    /// Emit an event tagged with this producer's operation.
    pub fn emit(&self, level: Level, message: impl Into<String>) {
        self.observer
            .notify(&Event::new(self.operation, level, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Level::Debug, message);
    }
}

impl fmt::Debug for ProduceContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProduceContext")
            .field("item", &self.item)
            .field("operation", &self.operation)
            .field("materials", &self.materials)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// FnProducer
// ---------------------------------------------------------------------------

/// Adapts a closure into a [`Producer`].
///
/// ```
/// use economy_core::producer::{FnProducer, Producer};
///
/// let smelt = FnProducer::new("smelt_ore", |ctx| {
///     ctx.info("smelting ore");
///     Some(1)
/// });
/// assert_eq!(smelt.operation(), "smelt_ore");
/// ```
pub struct FnProducer<F> {
    operation: String,
    f: F,
}

impl<F> FnProducer<F> {
    pub fn new(operation: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ProduceContext<'_>) -> Option<Quantity>,
    {
        Self {
            operation: operation.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnProducer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProducer")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

impl<F> Producer for FnProducer<F>
where
    F: Fn(&ProduceContext<'_>) -> Option<Quantity>,
{
    fn operation(&self) -> &str {
        &self.operation
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        (self.f)(ctx)
    }
}
