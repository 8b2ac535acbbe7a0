//! The reference economy: eight items from raw resources to a meal.
//!
//! ```text
//! cow ---> steak ----------------> meal
//! iron --> nails ---> table -----/
//! tree --> lumber --/
//! ```
//!
//! Each item kind has its own [`Producer`] so that its events carry a
//! distinct operation tag and can be filtered individually.

use crate::graph::{GraphError, ItemGraph, ItemGraphBuilder};
use crate::id::Quantity;
use crate::producer::{ProduceContext, Producer};

// ---------------------------------------------------------------------------
// Raw resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct MineIron;

impl Producer for MineIron {
    fn operation(&self) -> &str {
        "mine_iron"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("mining iron");
        Some(1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChopTree;

impl Producer for ChopTree {
    fn operation(&self) -> &str {
        "chop_tree"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("chopping down a tree");
        Some(1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KillCow;

impl Producer for KillCow {
    fn operation(&self) -> &str {
        "kill_cow"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("slaughtering a cow");
        Some(1)
    }
}

// ---------------------------------------------------------------------------
// Intermediates
// ---------------------------------------------------------------------------

/// cow -> steak
#[derive(Debug, Clone, Copy, Default)]
pub struct PackSteak;

impl Producer for PackSteak {
    fn operation(&self) -> &str {
        "pack_steak"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("packaging a steak");
        Some(1)
    }
}

/// iron -> nails
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeNails;

impl Producer for MakeNails {
    fn operation(&self) -> &str {
        "make_nails"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("making nails");
        Some(1)
    }
}

/// tree -> lumber
#[derive(Debug, Clone, Copy, Default)]
pub struct MillLumber;

impl Producer for MillLumber {
    fn operation(&self) -> &str {
        "mill_lumber"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("milling lumber");
        Some(1)
    }
}

/// lumber + nails -> table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildTable;

impl Producer for BuildTable {
    fn operation(&self) -> &str {
        "build_table"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("building a table");
        Some(1)
    }
}

// ---------------------------------------------------------------------------
// Consumers
// ---------------------------------------------------------------------------

/// table + steak, consumed. Yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaveMeal;

impl Producer for HaveMeal {
    fn operation(&self) -> &str {
        "have_meal"
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info("having a meal");
        None
    }
}

/// `(producer, consumer)` pairs of the reference economy.
pub const REFERENCE_EDGES: [(&str, &str); 7] = [
    ("cow", "steak"),
    ("iron", "nails"),
    ("tree", "lumber"),
    ("lumber", "table"),
    ("nails", "table"),
    ("table", "meal"),
    ("steak", "meal"),
];

/// Register the reference items and dependencies into `builder`.
pub fn register_reference(builder: &mut ItemGraphBuilder) -> Result<(), GraphError> {
    builder.add_item("iron", MineIron)?;
    builder.add_item("tree", ChopTree)?;
    builder.add_item("cow", KillCow)?;
    builder.add_item("steak", PackSteak)?;
    builder.add_item("nails", MakeNails)?;
    builder.add_item("lumber", MillLumber)?;
    builder.add_item("table", BuildTable)?;
    builder.add_item("meal", HaveMeal)?;

    for (producer, consumer) in REFERENCE_EDGES {
        builder.add_dependency(producer, consumer)?;
    }
    Ok(())
}

/// Build the reference economy graph.
pub fn reference_graph() -> Result<ItemGraph, GraphError> {
    let mut builder = ItemGraphBuilder::new();
    register_reference(&mut builder)?;
    Ok(builder.build())
}
