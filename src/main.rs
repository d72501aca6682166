use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{info, warn};

use cazagg::{AggregateTable, ResultTable, SpeciesStatistics, OUTPUT_FILENAME};

#[derive(Parser)]
#[command(name = "cazagg")]
#[command(version)]
#[command(about = "Aggregate consensus CAZyme family calls across species annotation tables")]
#[command(long_about = r##"
Reads dbCAN-style overview tables (one per species), reconciles the HMMER,
dbCAN_sub and DIAMOND calls of every gene into one consensus family, and
writes family and category count tables with one column per species.

Input tables are tab-separated with a header row and must carry the columns
"Gene ID", "HMMER", "dbCAN_sub", "DIAMOND" and "#ofTools" (any order).
Genes called by fewer than two tools are skipped. Output goes to
aggregated_family_category_statistics.txt in the working directory.

EXAMPLES:
  cazagg -i overview.txt
  cazagg -i 'results/*.txt' -i extra/Ecoli.sample1.txt
"##)]
struct Args {
    /// Annotation tables to analyze; shell-style wildcards are supported.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATTERN",
        num_args = 1..,
        required = true
    )]
    input_files: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let files = expand_patterns(&args.input_files)?;
    let mut aggregate = AggregateTable::new();
    for path in &files {
        let species = species_name(path);
        info!("processing {} as species {:?}", path.display(), species);
        let file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut table =
            ResultTable::new(file).with_context(|| format!("reading {}", path.display()))?;
        let stats = SpeciesStatistics::collect(&mut table)
            .with_context(|| format!("processing {}", path.display()))?;
        aggregate.merge(&species, stats);
    }

    let out =
        File::create(OUTPUT_FILENAME).with_context(|| format!("creating {OUTPUT_FILENAME}"))?;
    let mut writer = BufWriter::new(out);
    aggregate.write_to(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("writing {OUTPUT_FILENAME}"))?;
    info!("wrote statistics for {} species to {OUTPUT_FILENAME}", files.len());
    Ok(())
}

/// Expands every pattern and returns the union of matched files, keeping
/// first-occurrence order. A pattern that matches nothing is only a warning.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matches =
            glob::glob(pattern).with_context(|| format!("invalid pattern {pattern:?}"))?;
        let mut matched_any = false;
        for entry in matches {
            let path = entry.with_context(|| format!("expanding pattern {pattern:?}"))?;
            files.push(path);
            matched_any = true;
        }
        if !matched_any {
            warn!("pattern {pattern:?} matched no files");
        }
    }
    Ok(files.into_iter().unique().collect())
}

/// Species identifier for a table: base filename with its extension stripped.
fn species_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
