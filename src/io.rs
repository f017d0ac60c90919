//! # Snapshot I/O
//!
//! Plain-text snapshots of timetables. A snapshot holds the grid as a bracketed
//! integer-array literal, one row per line, followed by a blank line and a
//! `Non-zero values: N` footer:
//!
//! ```text
//! [[  0, 111],
//!  [112,   0]]
//!
//! Non-zero values: 2
//! ```
//!
//! Parsing stops at the first blank or metadata line, so footers are ignored on
//! import. A population is written as `p_1.txt`, `p_2.txt`, ... in one directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GeneticError, Result, ResultExt};
use crate::timetable::Chromosome;

const NON_ZERO_FOOTER: &str = "Non-zero values:";
const FREQUENCY_FOOTER: &str = "Element Frequencies:";

/// Renders a chromosome in snapshot format.
pub fn format_chromosome(chromosome: &Chromosome) -> String {
    format!(
        "{}\n\n{} {}\n",
        chromosome,
        NON_ZERO_FOOTER,
        chromosome.count_nonzero()
    )
}

/// Parses a chromosome from snapshot text.
///
/// # Errors
///
/// `GeneticError::Parse` if there is no array content, the literal is malformed,
/// or its rows differ in length.
pub fn parse_chromosome(text: &str) -> Result<Chromosome> {
    let literal = text
        .lines()
        .map(str::trim)
        .take_while(|line| {
            !line.is_empty() && !line.contains(NON_ZERO_FOOTER) && !line.contains(FREQUENCY_FOOTER)
        })
        .collect::<Vec<_>>()
        .join(" ");

    if literal.is_empty() {
        return Err(GeneticError::Parse(
            "No array content found in snapshot".to_string(),
        ));
    }

    let rows: Vec<Vec<u32>> = serde_json::from_str(&literal)?;
    Chromosome::from_rows(rows)
        .ok_or_else(|| GeneticError::Parse("Snapshot rows differ in length".to_string()))
}

/// Writes one chromosome to `path`, creating parent directories as needed.
pub fn export_chromosome(chromosome: &Chromosome, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format_chromosome(chromosome))?;
    Ok(())
}

/// Reads one chromosome from `path`.
pub fn read_chromosome(path: &Path) -> Result<Chromosome> {
    let text = fs::read_to_string(path)
        .context(format!("Failed to read snapshot {}", path.display()))?;
    parse_chromosome(&text)
}

/// File name of the `index`-th (0-based) member of an exported population.
pub fn member_file_name(index: usize) -> String {
    format!("p_{}.txt", index + 1)
}

/// Writes every chromosome into `dir` as `p_<i>.txt`, numbered from 1.
pub fn export_population<'a, I>(dir: &Path, chromosomes: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Chromosome>,
{
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for (i, chromosome) in chromosomes.into_iter().enumerate() {
        export_chromosome(chromosome, &dir.join(member_file_name(i)))?;
        written += 1;
    }
    debug!(dir = %dir.display(), written, "exported population");
    Ok(written)
}

/// Loads every `.txt` snapshot in `dir`, in file-name order.
///
/// Files that cannot be read or parsed are skipped with a warning.
///
/// # Errors
///
/// Only if `dir` itself cannot be listed.
pub fn import_population(dir: &Path) -> Result<Vec<Chromosome>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut chromosomes = Vec::with_capacity(paths.len());
    for path in paths {
        match read_chromosome(&path) {
            Ok(chromosome) => chromosomes.push(chromosome),
            Err(err) => warn!(file = %path.display(), error = %err, "skipping snapshot"),
        }
    }
    Ok(chromosomes)
}
