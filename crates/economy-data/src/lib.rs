pub mod loader;
pub mod producer;
pub mod schema;

pub use loader::{load_economy, DataLoadError, Format};
