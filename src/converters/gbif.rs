use anyhow::Result;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::geo::{Coordinate, RadiusFilter};
use crate::ordered::OrderedMap;
use crate::output::write_json;
use crate::reader::{Row, RowReader};
use crate::value_conversion::{non_empty, normalize_date, parse_float, parse_int};

use super::{Converter, DropCounts, DropReason, Summary};

pub const DEFAULT_BASIS_OF_RECORD: &str = "HUMAN_OBSERVATION";
pub const DEFAULT_OCCURRENCE_STATUS: &str = "PRESENT";
pub const DEFAULT_REGION_NAME: &str = "GBIF radius export";
pub const DATASET_VERSION: &str = "generated";

#[derive(Debug, Clone, PartialEq)]
pub struct GbifOptions {
    pub region_name: String,
    pub center: Coordinate,
    pub radius_km: f64,
    /// Empty disables the check.
    pub basis_of_record: String,
    /// Empty disables the check.
    pub occurrence_status: String,
}

impl GbifOptions {
    pub fn new(center: Coordinate, radius_km: f64) -> Self {
        Self {
            region_name: DEFAULT_REGION_NAME.to_string(),
            center,
            radius_km,
            basis_of_record: DEFAULT_BASIS_OF_RECORD.to_string(),
            occurrence_status: DEFAULT_OCCURRENCE_STATUS.to_string(),
        }
    }
}

/// A validated input row.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceRecord {
    pub taxon_key: i64,
    pub species: String,
    pub scientific_name: String,
    pub position: Coordinate,
    pub gbif_id: Option<i64>,
    pub event_date: Option<String>,
    pub license: Option<String>,
}

impl OccurrenceRecord {
    /// Applies the row filters and coerces fields, or says why the row is dropped.
    pub fn from_row(
        row: &Row,
        options: &GbifOptions,
        region: &RadiusFilter,
    ) -> Result<Self, DropReason> {
        if !options.basis_of_record.is_empty()
            && row.get("basisOfRecord").trim() != options.basis_of_record
        {
            return Err(DropReason::BasisOfRecord);
        }
        if !options.occurrence_status.is_empty()
            && row.get("occurrenceStatus").trim() != options.occurrence_status
        {
            return Err(DropReason::OccurrenceStatus);
        }

        let taxon_key = parse_int(row.get("taxonKey"));
        let lat = parse_float(row.get("decimalLatitude"));
        let lon = parse_float(row.get("decimalLongitude"));
        let (Some(taxon_key), Some(lat), Some(lon)) = (taxon_key, lat, lon) else {
            return Err(DropReason::MissingRequired);
        };

        let position = Coordinate::new(lat, lon);
        if !region.contains(position) {
            return Err(DropReason::OutsideRadius);
        }

        let species = row.get("species").trim();
        let scientific_name = row.get("scientificName").trim();
        let species = if species.is_empty() {
            scientific_name
        } else {
            species
        };
        let scientific_name = if scientific_name.is_empty() {
            species
        } else {
            scientific_name
        };

        Ok(Self {
            taxon_key,
            species: species.to_string(),
            scientific_name: scientific_name.to_string(),
            position,
            gbif_id: parse_int(row.get("gbifID")),
            event_date: normalize_date(row.get("eventDate")),
            license: non_empty(row.get("license")).map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "gbifId", skip_serializing_if = "Option::is_none")]
    pub gbif_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Occurrence {
    fn sort_key(&self) -> &str {
        // Undated entries sort last under descending order.
        self.date.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonAggregate {
    pub taxon_key: i64,
    pub species: String,
    pub scientific_name: String,
    pub frequency: usize,
    pub last_observed: Option<String>,
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub basis_of_record: String,
    pub occurrence_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub center: Center,
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccurrenceDataset {
    pub version: String,
    pub filters: Filters,
    pub region: Region,
    pub plants: Vec<TaxonAggregate>,
}

impl OccurrenceDataset {
    pub fn occurrence_count(&self) -> usize {
        self.plants.iter().map(|p| p.occurrences.len()).sum()
    }
}

/// Per-taxon state while rows are streaming in.
#[derive(Debug, Default)]
struct TaxonAccumulator {
    species: String,
    scientific_name: String,
    last_observed: Option<String>,
    occurrences: Vec<Occurrence>,
}

/// Groups validated records by taxon key, in first-seen order.
#[derive(Debug, Default)]
pub struct OccurrenceAggregator {
    taxa: OrderedMap<i64, TaxonAccumulator>,
}

impl OccurrenceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: OccurrenceRecord) {
        let taxon = self
            .taxa
            .get_or_insert_with(record.taxon_key, || TaxonAccumulator {
                // First row for a taxon names it.
                species: record.species.clone(),
                scientific_name: record.scientific_name.clone(),
                ..TaxonAccumulator::default()
            });

        if let Some(date) = &record.event_date {
            // Canonical dates are zero-padded, so string order is date order.
            if taxon.last_observed.as_ref().map_or(true, |prev| date > prev) {
                taxon.last_observed = Some(date.clone());
            }
        }

        taxon.occurrences.push(Occurrence {
            lat: record.position.lat,
            lon: record.position.lon,
            gbif_id: record.gbif_id,
            date: record.event_date,
            license: record.license,
        });
    }

    /// Taxa ordered by descending frequency, ties in first-seen order;
    /// each taxon's occurrences newest first, undated last.
    pub fn finish(self) -> Vec<TaxonAggregate> {
        let mut plants: Vec<TaxonAggregate> = self
            .taxa
            .into_entries()
            .map(|(taxon_key, mut taxon)| {
                taxon
                    .occurrences
                    .sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
                TaxonAggregate {
                    taxon_key,
                    species: taxon.species,
                    scientific_name: taxon.scientific_name,
                    frequency: taxon.occurrences.len(),
                    last_observed: taxon.last_observed,
                    occurrences: taxon.occurrences,
                }
            })
            .collect();

        plants.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        plants
    }
}

/// GBIF occurrence export → per-taxon occurrence dataset.
///
/// Rows are filtered on `basisOfRecord`, `occurrenceStatus` and distance from
/// a region center, then grouped by `taxonKey`. Only the fields the app needs
/// survive; observer names and verbatim localities are never copied.
pub struct GbifConverter {
    pub options: GbifOptions,
}

impl GbifConverter {
    pub fn new(options: GbifOptions) -> Self {
        Self { options }
    }

    /// Runs the whole pipeline over already-opened rows.
    pub fn build<R: Read>(&self, rows: RowReader<R>) -> Result<OccurrenceDataset> {
        if !rows.has_column("taxonKey") {
            tracing::warn!("input has no taxonKey column; every row will be dropped");
        }

        let region = RadiusFilter::new(self.options.center, self.options.radius_km);
        let mut aggregator = OccurrenceAggregator::new();
        let mut drops = DropCounts::default();
        let mut rows_read = 0;

        for row in rows {
            let row = row?;
            rows_read += 1;
            match OccurrenceRecord::from_row(&row, &self.options, &region) {
                Ok(record) => aggregator.add(record),
                Err(reason) => drops.record(reason),
            }
        }
        drops.log(rows_read);

        Ok(OccurrenceDataset {
            version: DATASET_VERSION.to_string(),
            filters: Filters {
                basis_of_record: self.options.basis_of_record.clone(),
                occurrence_status: self.options.occurrence_status.clone(),
            },
            region: Region {
                name: self.options.region_name.clone(),
                center: Center {
                    lat: self.options.center.lat,
                    lon: self.options.center.lon,
                },
                radius_km: self.options.radius_km,
            },
            plants: aggregator.finish(),
        })
    }
}

impl Converter for GbifConverter {
    fn convert(&self, input_path: &Path, output_path: &Path, delimiter: u8) -> Result<Summary> {
        let dataset = self.build(RowReader::open(input_path, delimiter)?)?;
        write_json(output_path, &dataset)?;

        Ok(Summary::Occurrences {
            output_path: output_path.to_path_buf(),
            taxa: dataset.plants.len(),
            occurrences: dataset.occurrence_count(),
        })
    }
}
