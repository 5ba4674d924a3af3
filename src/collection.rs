//! Ordered record collections and the diff between them

use std::fmt;
use std::io::{self, Write};

use crate::matcher::matches;
use crate::record::Record;

/// Annotation appended to proxied records in listings
const PROXIED_MARK: &str = " ; PROXIED";

/// An ordered sequence of records
///
/// Order reflects parse or fetch order. Lookups and diffs use [`matches`]
/// rather than structural equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the first record equivalent to `needle` and its position
    pub fn find(&self, needle: &Record) -> Option<(usize, &Record)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| matches(r, needle))
    }

    /// Splits two collections into the records only `self` has and the
    /// records only `remote` has
    ///
    /// Records with an equivalent on the other side appear in neither
    /// result. Each result keeps the order of its source. Duplicates are
    /// not paired off one-to-one: one remote record satisfies every
    /// equivalent local record, and vice versa.
    pub fn diff(&self, remote: &RecordCollection) -> (RecordCollection, RecordCollection) {
        let local_only = self
            .iter()
            .filter(|l| remote.find(l).is_none())
            .cloned()
            .collect();
        let remote_only = remote
            .iter()
            .filter(|r| self.find(r).is_none())
            .cloned()
            .collect();

        (local_only, remote_only)
    }

    /// Writes a listing resembling the BIND zone file format
    pub fn fprint<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{}", self)
    }
}

impl fmt::Display for RecordCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_name = self.records.iter().map(|r| r.name().len()).max().unwrap_or(0);

        for r in &self.records {
            let proxied = if r.is_proxied() { PROXIED_MARK } else { "" };
            writeln!(
                f,
                "{}.{} {} {:<8} {}{}",
                r.name(),
                " ".repeat(max_name - r.name().len()),
                r.ttl(),
                format!("IN {}", r.record_type),
                r.content(),
                proxied
            )?;
        }
        Ok(())
    }
}

impl From<Vec<Record>> for RecordCollection {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordCollection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//==============================================================================
// Tests
//==============================================================================
