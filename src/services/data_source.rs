use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::domain::ticket::Ticket;
use crate::services::ticket_list::TicketList;

#[derive(Error, Debug)]
pub enum TicketSourceError {
    #[error("failed to read ticket file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse ticket csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing csv column: {0}")]
    MissingColumn(String),
    #[error("invalid story points on row {row}: {value:?}")]
    InvalidPoints { row: usize, value: String },
}

/// Describes an interface for retrieving the tickets of a project.
pub trait TicketSource {
    fn load_tickets(&self) -> Result<Vec<Ticket>, TicketSourceError>;
}

impl TicketSource for [Ticket] {
    fn load_tickets(&self) -> Result<Vec<Ticket>, TicketSourceError> {
        Ok(self.to_vec())
    }
}

pub fn load_ticket_list<S: TicketSource + ?Sized>(
    source: &S,
) -> Result<TicketList, TicketSourceError> {
    let tickets = source.load_tickets()?;
    info!(tickets = tickets.len(), "loaded tickets");
    Ok(TicketList::new(tickets))
}
