use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::commands::base_commands::ReportArgs;
use crate::commands::report_format::{ReportFormatError, render_report};
use crate::services::data_source::{TicketSourceError, load_ticket_list};
use crate::services::forecast_report::build_forecast_report;
use crate::services::project_config_yaml::{ProjectConfigError, load_settings_from_yaml_file};
use crate::services::ticket_csv::CsvTicketSource;
use crate::services::ticket_list::EstimationError;

#[derive(Error, Debug)]
pub enum ReportCommandError {
    #[error(transparent)]
    Config(#[from] ProjectConfigError),
    #[error(transparent)]
    Tickets(#[from] TicketSourceError),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    #[error(transparent)]
    Format(#[from] ReportFormatError),
    #[error("failed to write report {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub fn report_command(args: &ReportArgs) -> Result<(), ReportCommandError> {
    let settings = load_settings_from_yaml_file(&args.config)?;
    let source = CsvTicketSource::new(&args.input, settings.columns.clone());
    let tickets = load_ticket_list(&source)?;
    let report = build_forecast_report(&tickets, &settings.project)?;
    let rendered = render_report(&report, args.format)?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, rendered).map_err(|source| ReportCommandError::Write {
                path: PathBuf::from(output),
                source,
            })?;
            info!(output = %output, "report written");
            println!("Report written to {output}");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
