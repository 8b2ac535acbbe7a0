use economy_core::id::Quantity;
use economy_core::producer::{ProduceContext, Producer};

/// Producer defined by data: emits a fixed message under a fixed operation
/// tag and yields a fixed quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedProducer {
    operation: String,
    message: String,
    yields: Option<Quantity>,
}

impl ScriptedProducer {
    pub fn new(
        operation: impl Into<String>,
        message: impl Into<String>,
        yields: Option<Quantity>,
    ) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            yields,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn yields(&self) -> Option<Quantity> {
        self.yields
    }
}

impl Producer for ScriptedProducer {
    fn operation(&self) -> &str {
        &self.operation
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info(self.message.as_str());
        self.yields
    }
}
