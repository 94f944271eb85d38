pub mod gbif;
pub mod plants_meta;

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Common trait for the table-to-JSON pipelines
pub trait Converter {
    /// Read the delimited `input_path`, build the dataset and write it to `output_path`
    fn convert(&self, input_path: &Path, output_path: &Path, delimiter: u8) -> Result<Summary>;
}

/// What a finished run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Occurrences {
        output_path: PathBuf,
        taxa: usize,
        occurrences: usize,
    },
    Plants {
        output_path: PathBuf,
        plants: usize,
    },
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Occurrences {
                output_path,
                taxa,
                occurrences,
            } => write!(
                f,
                "Wrote {} ({} taxa, {} occurrences)",
                output_path.display(),
                taxa,
                occurrences
            ),
            Summary::Plants {
                output_path,
                plants,
            } => write!(f, "Wrote {} ({} plants)", output_path.display(), plants),
        }
    }
}

/// Per-reason tally of rows that did not make it into a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropCounts {
    pub basis_of_record: usize,
    pub occurrence_status: usize,
    pub missing_required: usize,
    pub outside_radius: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    BasisOfRecord,
    OccurrenceStatus,
    MissingRequired,
    OutsideRadius,
}

impl DropCounts {
    pub fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::BasisOfRecord => self.basis_of_record += 1,
            DropReason::OccurrenceStatus => self.occurrence_status += 1,
            DropReason::MissingRequired => self.missing_required += 1,
            DropReason::OutsideRadius => self.outside_radius += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.basis_of_record + self.occurrence_status + self.missing_required + self.outside_radius
    }

    pub fn log(&self, rows_read: usize) {
        tracing::info!(
            rows_read,
            dropped = self.total(),
            basis_of_record = self.basis_of_record,
            occurrence_status = self.occurrence_status,
            missing_required = self.missing_required,
            outside_radius = self.outside_radius,
            "finished reading rows"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let occ = Summary::Occurrences {
            output_path: PathBuf::from("out/plants_gbif.json"),
            taxa: 2,
            occurrences: 7,
        };
        assert_eq!(
            occ.to_string(),
            "Wrote out/plants_gbif.json (2 taxa, 7 occurrences)"
        );

        let meta = Summary::Plants {
            output_path: PathBuf::from("plants_meta.json"),
            plants: 3,
        };
        assert_eq!(meta.to_string(), "Wrote plants_meta.json (3 plants)");
    }

    #[test]
    fn test_drop_counts() {
        let mut counts = DropCounts::default();
        counts.record(DropReason::MissingRequired);
        counts.record(DropReason::MissingRequired);
        counts.record(DropReason::OutsideRadius);
        assert_eq!(counts.missing_required, 2);
        assert_eq!(counts.outside_radius, 1);
        assert_eq!(counts.total(), 3);
    }
}
