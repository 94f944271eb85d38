use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Renders `value` as 2-space indented JSON with a trailing newline.
/// Non-ASCII text is written as-is.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    json.push('\n');
    Ok(json)
}

/// Writes the dataset to `output_path`, creating missing parent directories.
///
/// The document is rendered before the file is touched, so a failure never
/// leaves a partial file behind.
pub fn write_json<T: Serialize>(output_path: &Path, value: &T) -> Result<()> {
    let json = to_pretty_json(value)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write output file: {:?}", output_path))?;
    tracing::info!(path = ?output_path, "wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_json_layout() {
        let json = to_pretty_json(&json!({"plants": [], "version": "generated"})).unwrap();
        assert_eq!(json, "{\n  \"plants\": [],\n  \"version\": \"generated\"\n}\n");
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let json = to_pretty_json(&json!({"commonName": "Löwenzahn"})).unwrap();
        assert!(json.contains("Löwenzahn"));
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets/data/plants.json");
        write_json(&path, &json!({"plants": []})).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
    }
}
