//! Record source reading one JSON object per line and yielding a single field
//! of every record, e.g. `remote_addr` of web server access logs.
//!
//! Malformed records never stop the stream:
//! - blank lines are skipped.
//! - lines which are not JSON objects, are not valid UTF-8, miss the field, or
//!   hold an array or object in it are skipped and counted in `errors()`.
//! - `null` and empty string values are skipped without being counted.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::Path;

use serde_json::Value;
use tracing::{trace, warn};

/// Field holding the client address in access logs
pub const DEFAULT_FIELD: &str = "remote_addr";

pub struct RecordSource<R: BufRead> {
    lines: Lines<R>,
    field: String,
    line_number: usize,
    records: usize,
    errors: usize,
}

impl RecordSource<BufReader<File>> {
    /// Open log file at `path`. The source is restarted by opening the file again.
    pub fn open<P: AsRef<Path>>(path: P, field: &str) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), field))
    }
}

impl<R: BufRead> RecordSource<R> {
    pub fn from_reader(reader: R, field: &str) -> Self {
        Self {
            lines: reader.lines(),
            field: field.to_string(),
            line_number: 0,
            records: 0,
            errors: 0,
        }
    }

    /// Number of malformed records skipped so far
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Number of elements yielded so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Extract field value from a single line.
    /// `Err(())` marks a malformed record, `Ok(None)` a record to skip silently.
    fn parse(&self, line: &str) -> Result<Option<String>, ()> {
        let record: Value = serde_json::from_str(line).map_err(|_| ())?;
        match record.get(&self.field) {
            None => Err(()),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Array(_)) | Some(Value::Object(_)) => Err(()),
            Some(scalar) => Ok(Some(scalar.to_string())),
        }
    }
}

impl<R: BufRead> Iterator for RecordSource<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    self.line_number += 1;
                    self.errors += 1;
                    trace!(line = self.line_number, "skipping non UTF-8 record");
                    continue;
                }
                Err(e) => {
                    warn!(line = self.line_number, error = %e, "failed to read records");
                    return None;
                }
            };
            self.line_number += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.parse(line) {
                Ok(Some(value)) => {
                    self.records += 1;
                    return Some(value);
                }
                Ok(None) => continue,
                Err(()) => {
                    self.errors += 1;
                    trace!(line = self.line_number, "skipping malformed record");
                }
            }
        }
    }
}
