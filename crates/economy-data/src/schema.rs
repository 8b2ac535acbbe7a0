//! Serde data file structs for economy definitions.
//!
//! These structs define the on-disk format for items and their dependencies.
//! They are deserialized from RON, JSON, or TOML files and then turned into an
//! [`ItemGraph`](economy_core::graph::ItemGraph) by the loader.

use economy_core::id::Quantity;
use serde::Deserialize;

/// A whole economy: items plus `producer -> consumer` dependencies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EconomyData {
    #[serde(default)]
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub dependencies: Vec<DependencyData>,
}

/// An item and the producer bound to it.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    /// Operation tag attached to the producer's events.
    pub operation: String,
    /// Message the producer emits when it runs.
    pub message: String,
    #[serde(default = "default_yield")]
    pub yields: Quantity,
    /// Consumption-only item: the producer yields nothing.
    #[serde(default)]
    pub consumes_only: bool,
}

fn default_yield() -> Quantity {
    1
}

/// A dependency entry, supporting both the short tuple form and the full
/// form with named fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencyData {
    /// Short form: `("producer", "consumer")`.
    Short(String, String),
    /// Full form: `{ producer = "...", consumer = "..." }`.
    Full { producer: String, consumer: String },
}

impl DependencyData {
    pub fn producer(&self) -> &str {
        match self {
            DependencyData::Short(p, _) => p,
            DependencyData::Full { producer, .. } => producer,
        }
    }

    pub fn consumer(&self) -> &str {
        match self {
            DependencyData::Short(_, c) => c,
            DependencyData::Full { consumer, .. } => consumer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults() {
        let item: ItemData =
            serde_json::from_str(r#"{"name": "iron", "operation": "mine_iron", "message": "mining iron"}"#)
                .unwrap();
        assert_eq!(item.yields, 1);
        assert!(!item.consumes_only);
    }

    #[test]
    fn dependency_short_and_full_forms() {
        let deps: Vec<DependencyData> = serde_json::from_str(
            r#"[["cow", "steak"], {"producer": "iron", "consumer": "nails"}]"#,
        )
        .unwrap();
        assert_eq!(deps[0], DependencyData::Short("cow".into(), "steak".into()));
        assert_eq!(deps[0].producer(), "cow");
        assert_eq!(deps[1].consumer(), "nails");
    }

    #[test]
    fn empty_document_is_empty_economy() {
        let data: EconomyData = serde_json::from_str("{}").unwrap();
        assert!(data.items.is_empty());
        assert!(data.dependencies.is_empty());
    }
}
