//! Edge-list tokenizer.
//!
//! # Grammar
//!
//! ```text
//! file    := header? line*
//! line    := fields                      (line terminator stripped)
//! fields  := split(line, ',')            if the line contains a comma
//!          | split_whitespace(line)      otherwise
//! source  := trim(fields[0])             must be non-empty
//! target  := trim(fields[1]) | ""        "" declares an isolated node
//! ```
//!
//! Fields after the second are ignored. There is no quoting, escaping or
//! comment syntax. A line whose target equals its source is rejected, since
//! edges join two distinct nodes.

use std::io::BufRead;

use tracing::{debug, warn};

use crate::config::LoaderConfig;
use crate::error::{LoadError, ParseIssue};

/// One parsed data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// `source` alone: a node with no edges.
    Isolated(String),
    /// `source,target`: an undirected edge.
    Edge { source: String, target: String },
}

/// A record tagged with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedRecord {
    pub line: usize,
    pub record: Record,
}

/// Split a line into trimmed fields.
///
/// Comma-delimited when the line contains a comma, whitespace-delimited
/// otherwise. Comma splitting keeps empty fields so that `A,` yields
/// `["A", ""]`.
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Parse a single data line.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] when the line has no source token and
/// [`LoadError::SelfLoop`] when source and target are the same node.
pub fn parse_line(line: &str, line_no: usize) -> Result<Record, LoadError> {
    let fields = tokenize(line);

    let source = match fields.first() {
        None => {
            return Err(LoadError::Parse {
                line: line_no,
                issue: ParseIssue::BlankLine,
            });
        }
        Some(s) if s.is_empty() => {
            return Err(LoadError::Parse {
                line: line_no,
                issue: ParseIssue::MissingSource,
            });
        }
        Some(s) => *s,
    };

    let target = fields.get(1).copied().unwrap_or("");
    if target.is_empty() {
        return Ok(Record::Isolated(source.to_string()));
    }
    if target == source {
        return Err(LoadError::SelfLoop {
            line: line_no,
            node: source.to_string(),
        });
    }

    Ok(Record::Edge {
        source: source.to_string(),
        target: target.to_string(),
    })
}

/// Read every data line of `reader` into records.
///
/// Stops at the first bad line; nothing read so far is returned in that
/// case.
///
/// # Errors
///
/// Returns [`LoadError::Read`] on I/O or UTF-8 failures and the errors of
/// [`parse_line`] for malformed lines.
pub fn read_records<R: BufRead>(
    reader: R,
    config: &LoaderConfig,
) -> Result<Vec<NumberedRecord>, LoadError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| LoadError::Read {
            line: line_no,
            source,
        })?;

        if line_no == 1 && config.header {
            debug!(header = %line, "skipping header line");
            continue;
        }

        if config.skip_blank_lines && line.trim().is_empty() {
            warn!(line = line_no, "skipping blank line");
            continue;
        }

        let record = parse_line(&line, line_no)?;
        records.push(NumberedRecord {
            line: line_no,
            record,
        });
    }

    Ok(records)
}
