use slotmap::new_key_type;

new_key_type! {
    /// Identifies an item (node) in the economy graph.
    pub struct ItemId;
}

/// Number of units a producer yields or a consumer receives.
pub type Quantity = u32;
