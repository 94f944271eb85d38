use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use forage_data::converters::plants_meta::DEFAULT_VERSION;
use forage_data::{init_logging, run_converter, MetaConverter, MetaOptions};

#[derive(clap::Parser, Debug)]
#[command(
    name = "plants-meta-csv-to-json",
    about = "Converts a curated plant metadata CSV/TSV into the app's plant metadata JSON",
    disable_version_flag = true
)]
struct Args {
    /// Path to meta CSV/TSV
    #[arg(long = "in")]
    input: PathBuf,

    /// Output JSON path
    #[arg(long = "out")]
    output: PathBuf,

    /// Dataset version written into the output
    #[arg(long, default_value = DEFAULT_VERSION)]
    version: String,

    /// Force delimiter: ',' or '\t' (default: sniffed from the file)
    #[arg(long)]
    delimiter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let converter = MetaConverter::new(MetaOptions {
        version: args.version,
    });

    let summary = run_converter(
        &converter,
        &args.input,
        &args.output,
        args.delimiter.as_deref(),
    )?;
    println!("{}", summary);

    Ok(())
}
