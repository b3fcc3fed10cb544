//! CSV ingestion for the demographic tables.
//!
//! Expected files in the data directory:
//!
//! | file                           | columns                                  |
//! |--------------------------------|------------------------------------------|
//! | `life_expectancy.csv`          | `year,expectancy` (header)               |
//! | `birth_and_marriage_rates.csv` | `decade,birth_rate,marriage_rate`        |
//! | `first_names.csv`              | `decade,gender,name,frequency`           |
//! | `last_names.csv`               | `decade,rank,last_name`                  |
//! | `rank_to_probability.csv`      | one headerless row of probabilities      |
//!
//! Decade labels may carry a trailing `s` ("1950s").

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use super::DemographicTables;
use crate::error::{FamilyTreeError, Result};

pub const LIFE_EXPECTANCY_FILE: &str = "life_expectancy.csv";
pub const RATES_FILE: &str = "birth_and_marriage_rates.csv";
pub const FIRST_NAMES_FILE: &str = "first_names.csv";
pub const LAST_NAMES_FILE: &str = "last_names.csv";
pub const RANK_PROBABILITY_FILE: &str = "rank_to_probability.csv";

/// Load all five tables from `dir`.
pub fn load_tables(dir: &Path) -> Result<DemographicTables> {
    let mut tables = DemographicTables::new();

    read_life_expectancy(open(dir, LIFE_EXPECTANCY_FILE)?, &mut tables)?;
    read_rates(open(dir, RATES_FILE)?, &mut tables)?;
    read_first_names(open(dir, FIRST_NAMES_FILE)?, &mut tables)?;
    read_last_names(open(dir, LAST_NAMES_FILE)?, &mut tables)?;
    read_rank_probabilities(open(dir, RANK_PROBABILITY_FILE)?, &mut tables)?;

    info!(
        decades = tables.covered_decades().len(),
        ranks = tables.rank_count(),
        "demographic tables loaded from {}",
        dir.display()
    );
    Ok(tables)
}

fn open(dir: &Path, name: &str) -> Result<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| FamilyTreeError::Io { path, source })
}

/// `year,expectancy`. Only rows on a decade boundary are kept, since
/// lookups are always by decade key.
pub fn read_life_expectancy<R: Read>(reader: R, tables: &mut DemographicTables) -> Result<()> {
    let file = LIFE_EXPECTANCY_FILE;
    let mut skipped = 0usize;
    for record in records(reader, true) {
        let record = record?;
        if skip_blank(&record, file) {
            continue;
        }
        let year: i32 = field(&record, 0, file)?;
        let expectancy: f64 = field(&record, 1, file)?;
        if year % 10 == 0 {
            tables.insert_life_expectancy(year, expectancy);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "ignored non-decade life expectancy rows");
    }
    Ok(())
}

/// `decade,birth_rate,marriage_rate`.
pub fn read_rates<R: Read>(reader: R, tables: &mut DemographicTables) -> Result<()> {
    let file = RATES_FILE;
    for record in records(reader, true) {
        let record = record?;
        if skip_blank(&record, file) {
            continue;
        }
        let decade = decade_field(&record, 0, file)?;
        let birth_rate: f64 = field(&record, 1, file)?;
        let marriage_rate: f64 = field(&record, 2, file)?;
        tables.insert_rates(decade, birth_rate, marriage_rate);
    }
    Ok(())
}

/// `decade,gender,name,frequency`. Gender is not used for sampling.
pub fn read_first_names<R: Read>(reader: R, tables: &mut DemographicTables) -> Result<()> {
    let file = FIRST_NAMES_FILE;
    for record in records(reader, true) {
        let record = record?;
        if skip_blank(&record, file) {
            continue;
        }
        let decade = decade_field(&record, 0, file)?;
        let name = text_field(&record, 2, file)?;
        let frequency: f64 = field(&record, 3, file)?;
        tables.push_first_name(decade, name, frequency);
    }
    Ok(())
}

/// `decade,rank,last_name`.
pub fn read_last_names<R: Read>(reader: R, tables: &mut DemographicTables) -> Result<()> {
    let file = LAST_NAMES_FILE;
    for record in records(reader, true) {
        let record = record?;
        if skip_blank(&record, file) {
            continue;
        }
        let decade = decade_field(&record, 0, file)?;
        let rank: u32 = field(&record, 1, file)?;
        let name = text_field(&record, 2, file)?;
        tables.push_surname(decade, name, rank);
    }
    Ok(())
}

/// A single headerless row; column i holds the weight of rank i + 1.
pub fn read_rank_probabilities<R: Read>(reader: R, tables: &mut DemographicTables) -> Result<()> {
    let file = RANK_PROBABILITY_FILE;
    let mut rows = records(reader, false);
    let record = match rows.next() {
        Some(record) => record?,
        None => {
            warn!("{} is empty", file);
            tables.set_rank_probabilities(Vec::new());
            return Ok(());
        }
    };

    let probabilities = (0..record.len())
        .filter(|&i| !record[i].is_empty())
        .map(|i| field::<f64>(&record, i, file))
        .collect::<Result<Vec<_>>>()?;
    tables.set_rank_probabilities(probabilities);
    Ok(())
}

fn records<R: Read>(reader: R, has_headers: bool) -> csv::StringRecordsIntoIter<R> {
    ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
        .into_records()
}

/// True for rows whose every field is empty; those are logged and skipped.
fn skip_blank(record: &StringRecord, file: &'static str) -> bool {
    let blank = record.iter().all(str::is_empty);
    if blank {
        warn!(file, line = line_of(record), "skipping blank row");
    }
    blank
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn text_field<'r>(record: &'r StringRecord, idx: usize, file: &'static str) -> Result<&'r str> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FamilyTreeError::MalformedRow {
            file,
            line: line_of(record),
            message: format!("missing column {}", idx + 1),
        }),
    }
}

fn field<T: FromStr>(record: &StringRecord, idx: usize, file: &'static str) -> Result<T> {
    let raw = text_field(record, idx, file)?;
    raw.parse().map_err(|_| FamilyTreeError::MalformedRow {
        file,
        line: line_of(record),
        message: format!("cannot parse '{}' in column {}", raw, idx + 1),
    })
}

fn decade_field(record: &StringRecord, idx: usize, file: &'static str) -> Result<i32> {
    let raw = text_field(record, idx, file)?;
    raw.trim_end_matches('s').parse().map_err(|_| FamilyTreeError::MalformedRow {
        file,
        line: line_of(record),
        message: format!("bad decade label '{}'", raw),
    })
}
