use anyhow::Result;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::output::write_json;
use crate::reader::{Row, RowReader};
use crate::value_conversion::{non_empty, parse_int};

use super::{Converter, DropReason, Summary};

pub const DEFAULT_VERSION: &str = "generated";

/// Identifier used when a scientific name has no usable characters.
pub const FALLBACK_ID: &str = "plant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaOptions {
    pub version: String,
}

impl Default for MetaOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// Derives a stable id from a scientific name: genus and species epithet
/// joined by `_`, lowercased, with every run of other characters collapsed
/// to a single `_`.
pub fn slugify_id(scientific_name: &str) -> String {
    let trimmed = scientific_name.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let base = if tokens.len() >= 2 {
        tokens[..2].join("_")
    } else {
        trimmed.to_string()
    };

    let mut slug = String::with_capacity(base.len());
    let mut pending_separator = false;
    for c in base.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        slug
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_url: Option<String>,
}

/// All three parts are written once any of them is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub prep: String,
    pub simple: String,
    pub pairing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantMeta {
    pub id: String,
    pub taxon_key: i64,
    pub scientific_name: String,
    pub common_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikipedia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_markers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalike_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
}

fn optional(row: &Row, column: &str) -> Option<String> {
    non_empty(row.get(column)).map(str::to_string)
}

impl PlantMeta {
    /// Builds a record from one row; rows without a numeric taxon key or a
    /// scientific name are rejected.
    pub fn from_row(row: &Row) -> Result<Self, DropReason> {
        let taxon_key = parse_int(row.get("taxonKey"));
        let scientific_name = non_empty(row.get("scientificName"));
        let (Some(taxon_key), Some(scientific_name)) = (taxon_key, scientific_name) else {
            return Err(DropReason::MissingRequired);
        };

        let id = optional(row, "id").unwrap_or_else(|| slugify_id(scientific_name));

        let image = Image {
            url: optional(row, "imageUrl"),
            file_page: optional(row, "imageFilePage"),
            credit_url: optional(row, "imageCreditUrl"),
        };
        let has_image = image.url.is_some() || image.file_page.is_some() || image.credit_url.is_some();

        let recipe = Recipe {
            prep: row.get("recipePrep").trim().to_string(),
            simple: row.get("recipeSimple").trim().to_string(),
            pairing: row.get("recipePairing").trim().to_string(),
        };
        let has_recipe =
            !recipe.prep.is_empty() || !recipe.simple.is_empty() || !recipe.pairing.is_empty();

        Ok(Self {
            id,
            taxon_key,
            scientific_name: scientific_name.to_string(),
            common_name: row.get("commonName").trim().to_string(),
            wikipedia: optional(row, "wikipedia"),
            image: has_image.then_some(image),
            id_markers: optional(row, "idMarkers"),
            lookalike_warning: optional(row, "lookalikeWarning"),
            recipe: has_recipe.then_some(recipe),
        })
    }

    /// Common name, or scientific name when the common name is blank.
    pub fn display_name(&self) -> &str {
        if self.common_name.is_empty() {
            &self.scientific_name
        } else {
            &self.common_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaDataset {
    pub version: String,
    pub plants: Vec<PlantMeta>,
}

/// Curated plant metadata table → app metadata dataset.
///
/// Fills the fields occurrence exports lack: common name, wikipedia link,
/// image, identification notes and a recipe. Minimal headers are
/// `taxonKey`, `scientificName` and `commonName`; `id`, `wikipedia`,
/// `imageUrl`, `imageFilePage`, `imageCreditUrl`, `idMarkers`,
/// `lookalikeWarning`, `recipePrep`, `recipeSimple` and `recipePairing`
/// are optional.
pub struct MetaConverter {
    pub options: MetaOptions,
}

impl MetaConverter {
    pub fn new(options: MetaOptions) -> Self {
        Self { options }
    }

    pub fn build<R: Read>(&self, rows: RowReader<R>) -> Result<MetaDataset> {
        for column in ["taxonKey", "scientificName"] {
            if !rows.has_column(column) {
                tracing::warn!(column, "required column missing; every row will be dropped");
            }
        }

        let mut plants = Vec::new();
        let mut missing_required = 0usize;
        let mut rows_read = 0;

        for row in rows {
            let row = row?;
            rows_read += 1;
            match PlantMeta::from_row(&row) {
                Ok(plant) => plants.push(plant),
                // The only rejection here is a missing taxon key or scientific name.
                Err(_) => missing_required += 1,
            }
        }
        tracing::info!(rows_read, missing_required, "finished reading rows");

        // Byte-wise, so uppercase names sort before lowercase ones.
        plants.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        Ok(MetaDataset {
            version: self.options.version.clone(),
            plants,
        })
    }
}

impl Converter for MetaConverter {
    fn convert(&self, input_path: &Path, output_path: &Path, delimiter: u8) -> Result<Summary> {
        let dataset = self.build(RowReader::open(input_path, delimiter)?)?;
        write_json(output_path, &dataset)?;

        Ok(Summary::Plants {
            output_path: output_path.to_path_buf(),
            plants: dataset.plants.len(),
        })
    }
}
