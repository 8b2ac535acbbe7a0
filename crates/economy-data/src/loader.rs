//! Loading pipeline: reads an economy file, deserializes it, and registers
//! its items and dependencies into an [`ItemGraph`].

use crate::producer::ScriptedProducer;
use crate::schema::EconomyData;
use economy_core::graph::{GraphError, ItemGraph, ItemGraphBuilder};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {origin}: {detail}")]
    Parse { origin: String, detail: String },

    /// The data describes an invalid graph (duplicate or unknown items).
    #[error("invalid economy in {origin}: {error}")]
    Graph { origin: String, error: GraphError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` according to `format`. `origin` names the input in
/// error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    origin: &str,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        origin: origin.to_string(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, &path.display().to_string())
}

// ===========================================================================
// Graph construction
// ===========================================================================

/// Register every item and dependency of `data` into `builder`.
///
/// Items are registered first, so dependencies may reference items listed
/// later in the file.
pub fn register_economy(
    builder: &mut ItemGraphBuilder,
    data: &EconomyData,
) -> Result<(), GraphError> {
    for item in &data.items {
        let yields = (!item.consumes_only).then_some(item.yields);
        builder.add_item(
            item.name.as_str(),
            ScriptedProducer::new(item.operation.as_str(), item.message.as_str(), yields),
        )?;
    }
    for dep in &data.dependencies {
        builder.add_dependency(dep.producer(), dep.consumer())?;
    }
    Ok(())
}

/// Build a frozen graph from already parsed data.
pub fn build_graph(data: &EconomyData, origin: &str) -> Result<ItemGraph, DataLoadError> {
    let mut builder = ItemGraphBuilder::new();
    register_economy(&mut builder, data).map_err(|error| DataLoadError::Graph {
        origin: origin.to_string(),
        error,
    })?;
    Ok(builder.build())
}

/// Parse an economy from a string in the given format.
pub fn parse_economy(content: &str, format: Format) -> Result<ItemGraph, DataLoadError> {
    let data: EconomyData = deserialize_str(content, format, "<inline>")?;
    build_graph(&data, "<inline>")
}

/// Load an economy file (`.ron`, `.json` or `.toml`) into a frozen graph.
pub fn load_economy(path: &Path) -> Result<ItemGraph, DataLoadError> {
    let data: EconomyData = deserialize_file(path)?;
    build_graph(&data, &path.display().to_string())
}
