use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use forage_data::converters::gbif::{
    DEFAULT_BASIS_OF_RECORD, DEFAULT_OCCURRENCE_STATUS, DEFAULT_REGION_NAME,
};
use forage_data::{init_logging, run_converter, Coordinate, GbifConverter, GbifOptions};

#[derive(clap::Parser, Debug)]
#[command(
    name = "gbif-csv-to-json",
    about = "Converts a GBIF occurrence export (CSV/TSV) into an offline per-taxon JSON dataset"
)]
struct Args {
    /// Path to GBIF CSV/TSV export
    #[arg(long = "in")]
    input: PathBuf,

    /// Output JSON path
    #[arg(long = "out")]
    output: PathBuf,

    /// Latitude of the region center
    #[arg(long, allow_negative_numbers = true)]
    center_lat: f64,

    /// Longitude of the region center
    #[arg(long, allow_negative_numbers = true)]
    center_lon: f64,

    /// Keep occurrences within this many kilometres of the center (<= 0 keeps all)
    #[arg(long, allow_negative_numbers = true)]
    radius_km: f64,

    #[arg(long, default_value = DEFAULT_REGION_NAME)]
    region_name: String,

    /// Required basisOfRecord value (empty disables the filter)
    #[arg(long, default_value = DEFAULT_BASIS_OF_RECORD)]
    basis_of_record: String,

    /// Required occurrenceStatus value (empty disables the filter)
    #[arg(long, default_value = DEFAULT_OCCURRENCE_STATUS)]
    occurrence_status: String,

    /// Force delimiter: ',' or '\t' (default: sniffed from the file)
    #[arg(long)]
    delimiter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let options = GbifOptions {
        region_name: args.region_name,
        center: Coordinate::new(args.center_lat, args.center_lon),
        radius_km: args.radius_km,
        basis_of_record: args.basis_of_record,
        occurrence_status: args.occurrence_status,
    };
    let converter = GbifConverter::new(options);

    let summary = run_converter(
        &converter,
        &args.input,
        &args.output,
        args.delimiter.as_deref(),
    )?;
    println!("{}", summary);

    Ok(())
}
