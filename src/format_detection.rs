use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Number of characters inspected when sniffing the delimiter.
pub const SNIFF_SAMPLE_CHARS: usize = 4096;

// A UTF-8 character is at most four bytes wide.
const SNIFF_SAMPLE_BYTES: u64 = (SNIFF_SAMPLE_CHARS * 4) as u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DelimiterError {
    #[error("delimiter must be a single byte character or '\\t', got {0:?}")]
    NotSingleByte(String),
}

/// Picks tab or comma by counting both in the first 4096 characters of the file.
///
/// Undecodable bytes are skipped rather than rejected. Tab only wins when it
/// strictly outnumbers comma, so an empty or delimiter-free sample yields comma.
pub fn sniff_delimiter(file_path: &Path) -> Result<u8> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file for delimiter detection: {:?}", file_path))?;

    let mut raw = Vec::new();
    file.take(SNIFF_SAMPLE_BYTES)
        .read_to_end(&mut raw)
        .context("Failed to read delimiter detection sample")?;

    Ok(sniff_sample(&raw))
}

/// Delimiter choice over an in-memory sample; see [`sniff_delimiter`].
pub fn sniff_sample(raw: &[u8]) -> u8 {
    let mut tabs = 0usize;
    let mut commas = 0usize;

    let chars = raw
        .utf8_chunks()
        .flat_map(|chunk| chunk.valid().chars())
        .take(SNIFF_SAMPLE_CHARS);
    for c in chars {
        match c {
            '\t' => tabs += 1,
            ',' => commas += 1,
            _ => {}
        }
    }

    if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Interprets a `--delimiter` value.
///
/// `None` or an empty string means "sniff". The two-character sequence `\t`
/// stands for a tab; any other value must be exactly one byte.
pub fn parse_delimiter_override(value: Option<&str>) -> Result<Option<u8>, DelimiterError> {
    match value {
        None | Some("") => Ok(None),
        Some("\\t") => Ok(Some(b'\t')),
        Some(s) if s.len() == 1 => Ok(Some(s.as_bytes()[0])),
        Some(s) => Err(DelimiterError::NotSingleByte(s.to_string())),
    }
}

/// Resolves the delimiter for `file_path`: a caller-supplied override always
/// wins, otherwise the file is sniffed.
pub fn resolve_delimiter(file_path: &Path, override_value: Option<&str>) -> Result<u8> {
    match parse_delimiter_override(override_value)? {
        Some(delimiter) => {
            tracing::info!(delimiter = ?(delimiter as char), "using delimiter override");
            Ok(delimiter)
        }
        None => {
            let delimiter = sniff_delimiter(file_path)?;
            tracing::info!(delimiter = ?(delimiter as char), "sniffed delimiter");
            Ok(delimiter)
        }
    }
}
