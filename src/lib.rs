pub mod converters;
pub mod format_detection;
pub mod geo;
pub mod ordered;
pub mod output;
pub mod reader;
pub mod value_conversion;

// Re-export commonly used items for convenience
pub use converters::gbif::{GbifConverter, GbifOptions, OccurrenceDataset};
pub use converters::plants_meta::{slugify_id, MetaConverter, MetaDataset, MetaOptions};
pub use converters::{Converter, Summary};
pub use format_detection::{resolve_delimiter, sniff_delimiter, DelimiterError};
pub use geo::{haversine_km, Coordinate, RadiusFilter};
pub use value_conversion::normalize_date;

use anyhow::{Context, Result};
use std::path::Path;

/// High-level entry point shared by both binaries.
/// Resolves the delimiter (override or sniff) and runs `converter`.
pub fn run_converter<C: Converter>(
    converter: &C,
    input_path: &Path,
    output_path: &Path,
    delimiter_override: Option<&str>,
) -> Result<Summary> {
    let delimiter = resolve_delimiter(input_path, delimiter_override)?;
    converter
        .convert(input_path, output_path, delimiter)
        .with_context(|| format!("Failed to convert {:?}", input_path))
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
