use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which sampling round a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timepoint {
    Before,
    After,
}

impl std::fmt::Display for Timepoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// A single input row. `values` is aligned with the owning table's headers;
/// `position` is the zero-based data row it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub position: usize,
    pub values: Vec<String>,
}

impl Record {
    pub fn new(position: usize, values: Vec<String>) -> Self {
        Self { position, values }
    }

    /// Value at a column index; columns past the end read as empty.
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A loaded table: header row plus data rows in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Build a table from raw rows. Short rows are padded with empty strings,
    /// long rows are truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::from_numbered_rows(headers, rows.into_iter().enumerate().collect())
    }

    /// Like [`Table::new`], but each row carries the data-row index it was
    /// read from, so rows dropped by a reader leave gaps in `position`.
    pub fn from_numbered_rows(headers: Vec<String>, rows: Vec<(usize, Vec<String>)>) -> Self {
        let width = headers.len();
        let records = rows
            .into_iter()
            .map(|(position, mut values)| {
                values.resize(width, String::new());
                Record::new(position, values)
            })
            .collect();
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Split rows into Before and After groups by the timepoint column.
    ///
    /// Tags are compared after trimming surrounding whitespace. Rows whose tag
    /// matches neither label are left out of both groups and counted in
    /// `Partition::skipped`.
    pub fn partition(
        &self,
        timepoint_column: &str,
        before_label: &str,
        after_label: &str,
    ) -> Result<Partition, ReconError> {
        let idx = self
            .column_index(timepoint_column)
            .ok_or_else(|| ReconError::MissingColumn {
                column: timepoint_column.into(),
            })?;

        let mut before = Group::new(Timepoint::Before, self.headers.clone());
        let mut after = Group::new(Timepoint::After, self.headers.clone());
        let mut skipped = 0;

        for record in &self.records {
            let tag = record.value(idx).trim();
            if tag == before_label {
                before.records.push(record.clone());
            } else if tag == after_label {
                after.records.push(record.clone());
            } else {
                log::warn!(
                    "row {}: timepoint '{}' is neither '{}' nor '{}', skipping",
                    record.position + 1,
                    tag,
                    before_label,
                    after_label
                );
                skipped += 1;
            }
        }

        Ok(Partition {
            before,
            after,
            skipped,
        })
    }
}

/// Records sharing one timepoint tag, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub timepoint: Timepoint,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Group {
    pub fn new(timepoint: Timepoint, headers: Vec<String>) -> Self {
        Self {
            timepoint,
            headers,
            records: Vec::new(),
        }
    }

    pub fn with_records(timepoint: Timepoint, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            timepoint,
            headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone)]
pub struct Partition {
    pub before: Group,
    pub after: Group,
    /// Rows whose timepoint tag matched neither label.
    pub skipped: usize,
}

/// True when a raw cell counts as missing: blank after trimming, or equal to
/// the missing sentinel ignoring case.
pub fn is_missing(raw: &str, missing_sentinel: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.to_lowercase() == missing_sentinel.trim().to_lowercase()
}

/// The comparable name for a raw key value, or `None` when it is missing.
pub fn candidate_name<'a>(raw: &'a str, missing_sentinel: &str) -> Option<&'a str> {
    if is_missing(raw, missing_sentinel) {
        None
    } else {
        Some(raw.trim())
    }
}

// ---------------------------------------------------------------------------
// Link output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub id: u64,
    /// Index into the Before group.
    pub before_index: usize,
    /// Index into the After group.
    pub after_index: usize,
    /// `Record::position` of the Before record in the input table.
    pub before_position: usize,
    /// `Record::position` of the After record in the input table.
    pub after_position: usize,
    pub score: f64,
}

/// Identifier bookkeeping for one link run.
///
/// Only `linker::link` can build one, and it hands it out only once every
/// record holds an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    next_id: u64,
    pairs: Vec<MatchedPair>,
    before_ids: Vec<u64>,
    after_ids: Vec<u64>,
}

impl MatchState {
    pub(crate) fn new(before_len: usize, after_len: usize) -> Self {
        Self {
            next_id: 1,
            pairs: Vec::new(),
            before_ids: vec![0; before_len],
            after_ids: vec![0; after_len],
        }
    }

    /// Hand out the next identifier. Never returns the same value twice.
    pub(crate) fn issue(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn assign_before(&mut self, index: usize, id: u64) {
        debug_assert_eq!(self.before_ids[index], 0, "before record assigned twice");
        self.before_ids[index] = id;
    }

    pub(crate) fn assign_after(&mut self, index: usize, id: u64) {
        debug_assert_eq!(self.after_ids[index], 0, "after record assigned twice");
        self.after_ids[index] = id;
    }

    pub(crate) fn record_pair(&mut self, pair: MatchedPair) {
        self.pairs.push(pair);
    }

    /// The value the next issued identifier would take.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn ids_issued(&self) -> u64 {
        self.next_id - 1
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn before_ids(&self) -> &[u64] {
        &self.before_ids
    }

    pub fn after_ids(&self) -> &[u64] {
        &self.after_ids
    }

    pub fn before_id(&self, index: usize) -> Option<u64> {
        self.before_ids.get(index).copied()
    }

    pub fn after_id(&self, index: usize) -> Option<u64> {
        self.after_ids.get(index).copied()
    }
}

/// A working copy of an input record carrying its assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub record: Record,
    pub id: u64,
}

#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub state: MatchState,
    pub before: Vec<Annotated>,
    pub after: Vec<Annotated>,
    pub key_field: String,
    pub threshold: f64,
    pub headers: Vec<String>,
    /// Before indexes whose key value was missing.
    pub absent_before: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSummary {
    pub key_column: String,
    pub threshold: f64,
    pub total_records: usize,
    pub ids_issued: u64,
    pub matched_pairs: usize,
    pub unmatched_before: usize,
    pub absent_name_before: usize,
    pub unmatched_after: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub meta: LinkMeta,
    pub summary: LinkSummary,
    pub pairs: Vec<MatchedPair>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkMeta {
    pub input: String,
    pub engine_version: String,
    pub skipped_rows: usize,
}
