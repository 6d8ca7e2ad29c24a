use std::{
    fs::{read, write},
    path::PathBuf,
};

use clap::Parser;
use fontmerge::{MergeError, Merger, Options, Result, build_font};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "fontmerge")]
#[command(about = "Merge multiple fonts into one", long_about = None)]
struct Cli {
    /// Input font files to merge
    #[arg(required = true)]
    input_files: Vec<PathBuf>,

    /// Output font file
    #[arg(short, long, default_value = "merged.ttf")]
    output: PathBuf,

    /// Comma-separated list of tables to drop
    #[arg(long, value_delimiter = ',')]
    drop_tables: Vec<String>,

    /// Option override as key=value; += appends to and -= removes from list values
    #[arg(long = "option")]
    options: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log how long the merge took
    #[arg(long)]
    timing: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .init();

    let mut options = Options::new().verbose(cli.verbose).timing(cli.timing);
    if !cli.drop_tables.is_empty() {
        options = options.drop_tables(cli.drop_tables);
    }
    for option in &cli.options {
        options.apply(option, &[])?;
    }

    let font_data: Vec<Vec<u8>> = cli
        .input_files
        .iter()
        .map(|path| read(path).map_err(MergeError::Io))
        .collect::<Result<Vec<_>>>()?;
    let font_refs: Vec<&[u8]> = font_data.iter().map(Vec::as_slice).collect();

    let merger = Merger::new(options);
    let merged = merger.merge(&font_refs)?;
    let bytes = build_font(&merged)?;

    write(&cli.output, &bytes)?;
    println!("{}", cli.output.display());

    Ok(())
}
