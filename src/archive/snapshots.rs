// src/archive/snapshots.rs
// =============================================================================
// Parses the CDX server's JSON answer into snapshot records.
//
// The answer is an array of arrays. The first row is a header naming the
// columns, every following row is one capture:
//
//   [["urlkey","timestamp","original","mimetype","statuscode","digest","length"],
//    ["com,example)/","20200101000000","http://example.com/","text/html","200","ABC","1234"]]
//
// We drop the header and keep the rest in the order the server sent them.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

/// One capture of a URL, one row of the CDX answer.
///
/// serde reads each row positionally, so a row with the wrong number of
/// columns is a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub urlkey: String,
    /// 14-digit archive timestamp (yyyyMMddhhmmss)
    pub timestamp: String,
    pub original: String,
    pub mimetype: String,
    pub statuscode: String,
    pub digest: String,
    pub length: String,
}

/// Parses raw index bytes, stripping the header row.
///
/// Errors:
/// - `Decode` when the bytes are not an array of 7-column string rows
/// - `EmptyResult` when nothing but (at most) the header came back
pub fn parse_snapshots(raw: &[u8]) -> Result<Vec<SnapshotRecord>, ArchiveError> {
    let mut rows: Vec<SnapshotRecord> = serde_json::from_slice(raw)?;

    if rows.len() <= 1 {
        return Err(ArchiveError::EmptyResult);
    }

    // leave off the header
    rows.remove(0);
    Ok(rows)
}

/// The only column the dispatcher needs.
pub fn timestamps(records: &[SnapshotRecord]) -> Vec<String> {
    records.iter().map(|r| r.timestamp.clone()).collect()
}
