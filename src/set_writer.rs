//! Set writer: sorts a fetched set by collector number, appends its records
//! to the card data file and deduplicates the file in place.

use crate::error::Result;
use crate::models::ScryfallCard;
use crate::transform::{format_card, FormatOptions, HEADER};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const BOM: &str = "\u{feff}";

/// One run of a collector number: digits compare numerically, text after them
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollectorPart {
    Number(u64),
    Text(String),
}

/// Split a collector number into digit and non-digit runs.
///
/// Comparing the resulting vectors sorts `1 < 1a < 2 < 10`.
pub fn collector_sort_key(collector_number: &str) -> Vec<CollectorPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in collector_number.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            parts.push(make_part(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(make_part(current, in_digits));
    }

    parts
}

fn make_part(run: String, digits: bool) -> CollectorPart {
    if digits {
        CollectorPart::Number(run.parse().unwrap_or(u64::MAX))
    } else {
        CollectorPart::Text(run)
    }
}

/// Sort cards by collector number, numerically aware
pub fn sort_by_collector_number(cards: &mut [ScryfallCard]) {
    cards.sort_by_cached_key(|card| collector_sort_key(&card.collector_number));
}

/// Result of [`SetWriter::write_set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// The file did not exist before this write
    pub newly_created: bool,
    pub cards: usize,
    pub records: usize,
}

/// Writes LackeyCCG card data files
pub struct SetWriter {
    path: PathBuf,
    format: FormatOptions,
    write_bom: bool,
}

impl SetWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: FormatOptions::default(),
            write_bom: false,
        }
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Prefix newly created files with a UTF-8 byte order mark
    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one set's records. Creates the file with header and two blank
    /// lines when it does not exist yet.
    pub fn write_set(&self, set_code: &str, cards: &[ScryfallCard]) -> Result<WriteOutcome> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let newly_created = !self.path.exists();

        let mut sorted = cards.to_vec();
        sort_by_collector_number(&mut sorted);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if newly_created {
            if self.write_bom {
                file.write_all(BOM.as_bytes())?;
            }
            writeln!(file, "{}", HEADER.join("\t"))?;
            file.write_all(b"\n\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(file);

        let set_code = set_code.to_lowercase();
        let mut records = 0;
        for card in &sorted {
            for record in format_card(card, &set_code, self.format) {
                writer.write_record(record.fields())?;
                records += 1;
            }
        }
        writer.flush()?;

        if newly_created {
            log::info!(
                "Created {} with {} cards",
                self.path.display(),
                sorted.len()
            );
        } else {
            log::info!(
                "Appended {} cards to {}",
                sorted.len(),
                self.path.display()
            );
        }

        Ok(WriteOutcome {
            path: self.path.clone(),
            newly_created,
            cards: sorted.len(),
            records,
        })
    }
}

/// Counts from a deduplication pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupStats {
    pub kept: usize,
    pub removed: usize,
}

/// Deduplicate card data text by (Name, ImageFile), keeping the last
/// occurrence of each pair in its original position.
///
/// The first line and the blank lines right after it are kept verbatim.
/// Data lines with fewer than three columns are dropped.
pub fn deduplicate_lines(content: &str) -> (String, DedupStats) {
    let mut lines = content.split_inclusive('\n');

    let Some(header) = lines.next() else {
        return (String::new(), DedupStats::default());
    };

    let mut output = String::with_capacity(content.len());
    output.push_str(header);

    let mut lines = lines.peekable();
    while let Some(blank) = lines.next_if(|line| line.trim().is_empty()) {
        output.push_str(blank);
    }

    let data: Vec<&str> = lines.collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut unique: Vec<&str> = Vec::new();

    for line in data.iter().rev() {
        let columns: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if columns.len() < 3 {
            continue;
        }
        if seen.insert((columns[0], columns[2])) {
            unique.push(*line);
        }
    }
    unique.reverse();

    for line in &unique {
        output.push_str(line);
        if !line.ends_with('\n') {
            output.push('\n');
        }
    }

    let stats = DedupStats {
        kept: unique.len(),
        removed: data.len() - unique.len(),
    };
    (output, stats)
}

/// Deduplicate a card data file in place
pub fn deduplicate_file(path: &Path) -> Result<DedupStats> {
    let content = fs::read_to_string(path)?;
    if content.is_empty() {
        return Ok(DedupStats::default());
    }

    let (deduplicated, stats) = deduplicate_lines(&content);
    fs::write(path, deduplicated)?;

    log::info!(
        "Deduplicated {} ({} kept, {} removed)",
        path.display(),
        stats.kept,
        stats.removed
    );
    Ok(stats)
}
