//! Writer implementation for sweep result tables.
//!
//! A table has one comma-separated row per motif width, in ascending width
//! order, followed by a bookkeeping row with the elapsed time in seconds and
//! the width bounds of the sweep. There is no header row.
//!
//! With the positions projection, a row holds the window start of every
//! sequence; with the consensus projection, it holds the consensus motif:
//! ```text
//! TTGACA
//! TTGACAT
//! GTTGACAT
//! 12,5,8
//! ```
//! The bookkeeping row is padded with `-1` fields so that it is as wide as
//! the widest result row.

use std::io::Write;
use std::str::FromStr;

use gibbsmotif::abc::Alphabet;
use gibbsmotif::search::Projection;
use gibbsmotif::search::RunOutcome;
use gibbsmotif::sweep::SweepTable;

use crate::error::Error;

/// The placeholder written in padding fields.
pub const SENTINEL: &str = "-1";

/// How to render a run that recorded no configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Write empty fields.
    #[default]
    Empty,
    /// Write `-1` fields.
    Sentinel,
}

impl FromStr for DegeneratePolicy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(DegeneratePolicy::Empty),
            "sentinel" => Ok(DegeneratePolicy::Sentinel),
            _ => Err(Error::InvalidData(Some(format!(
                "unknown degenerate policy: {}",
                s
            )))),
        }
    }
}

/// Build the fields of every row of a table, bookkeeping row included.
pub fn rows<A: Alphabet>(table: &SweepTable<A>, policy: DegeneratePolicy) -> Vec<Vec<String>> {
    let placeholder = match policy {
        DegeneratePolicy::Empty => "",
        DegeneratePolicy::Sentinel => SENTINEL,
    };
    let degenerate_width = match table.projection {
        Projection::Positions => table.sequences,
        Projection::Consensus => 1,
    };

    let mut rows = table
        .rows
        .iter()
        .map(|result| match &result.outcome {
            RunOutcome::Positions(positions) => positions.iter().map(|p| p.to_string()).collect(),
            RunOutcome::Consensus(motif) => vec![motif.to_string()],
            RunOutcome::Degenerate => vec![placeholder.to_string(); degenerate_width],
        })
        .collect::<Vec<Vec<String>>>();

    let mut bookkeeping = vec![
        table.timing.elapsed.as_secs().to_string(),
        table.timing.min_width.to_string(),
        table.timing.max_width.to_string(),
    ];
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if bookkeeping.len() < width {
        bookkeeping.resize(width, SENTINEL.to_string());
    }
    rows.push(bookkeeping);
    rows
}

/// Write a sweep table as comma-separated rows.
pub fn write<W: Write, A: Alphabet>(
    mut writer: W,
    table: &SweepTable<A>,
    policy: DegeneratePolicy,
) -> Result<(), Error> {
    for row in rows(table, policy) {
        writeln!(writer, "{}", row.join(","))?;
    }
    writer.flush()?;
    Ok(())
}
