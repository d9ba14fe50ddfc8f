use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::domain::project_config::CsvColumns;
use crate::domain::ticket::Ticket;
use crate::services::data_source::{TicketSource, TicketSourceError};

/// Reads tickets from an issue-tracker CSV export. Only the three configured
/// columns are used, everything else in the export is ignored.
pub struct CsvTicketSource {
    path: PathBuf,
    columns: CsvColumns,
}

impl CsvTicketSource {
    pub fn new<P: AsRef<Path>>(path: P, columns: CsvColumns) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            columns,
        }
    }
}

impl TicketSource for CsvTicketSource {
    fn load_tickets(&self) -> Result<Vec<Ticket>, TicketSourceError> {
        let file = File::open(&self.path).map_err(|source| TicketSourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "reading ticket csv");
        read_tickets_from_csv(file, &self.columns)
    }
}

pub fn read_tickets_from_csv<R: Read>(
    reader: R,
    columns: &CsvColumns,
) -> Result<Vec<Ticket>, TicketSourceError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let name_index = column_index(&headers, &columns.name)?;
    let points_index = column_index(&headers, &columns.points)?;
    let sprint_index = column_index(&headers, &columns.sprint)?;

    let mut tickets = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Row 1 is the header.
        let row = index + 2;
        let points = parse_points(cell(&record, points_index), row)?;
        tickets.push(Ticket::new(
            cell(&record, name_index),
            points,
            cell(&record, sprint_index),
        ));
    }
    Ok(tickets)
}

/// Issue-tracker exports may repeat a header, the first occurrence wins.
fn column_index(headers: &StringRecord, column: &str) -> Result<usize, TicketSourceError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| TicketSourceError::MissingColumn(column.to_string()))
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

/// Blank cells are unestimated tickets. Exports write points as floats
/// ("3.0"), which are truncated.
fn parse_points(value: &str, row: usize) -> Result<u32, TicketSourceError> {
    if value.is_empty() {
        return Ok(0);
    }

    let invalid = || TicketSourceError::InvalidPoints {
        row,
        value: value.to_string(),
    };
    let points: f64 = value.parse().map_err(|_| invalid())?;
    if !points.is_finite() || points < 0.0 || points > f64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(points.trunc() as u32)
}
