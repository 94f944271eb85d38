use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

/// One data row addressed by header name.
///
/// Columns missing from the header, or missing from a short row, read as "".
#[derive(Debug, Clone)]
pub struct Row {
    columns: Rc<HashMap<String, usize>>,
    record: StringRecord,
}

impl Row {
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }
}

/// Header-addressed reader over a delimited text file.
pub struct RowReader<R: Read> {
    columns: Rc<HashMap<String, usize>>,
    records: StringRecordsIntoIter<BufReader<R>>,
}

impl RowReader<File> {
    pub fn open(input_path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open input file: {:?}", input_path))?;
        Self::from_reader(file, delimiter)
    }
}

impl<R: Read> RowReader<R> {
    pub fn from_reader(input: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(b'"')
            .double_quote(true)
            .flexible(true) // Short and long rows are tolerated
            .has_headers(true)
            .from_reader(BufReader::with_capacity(32 * 1024, input));

        let headers = reader.headers().context("Failed to read headers")?;

        // A repeated header name resolves to its last column.
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();

        Ok(Self {
            columns: Rc::new(columns),
            records: reader.into_records(),
        })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .context("Failed to read record")
                .map(|record| Row {
                    columns: Rc::clone(&self.columns),
                    record,
                }),
        )
    }
}
