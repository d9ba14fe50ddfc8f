use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::project_config::{CsvColumns, ForecastSettings, ProjectConfig};

pub const DATE_FORMAT: &str = "%d/%m/%y";

#[derive(Error, Debug)]
pub enum ProjectConfigError {
    #[error("failed to read project config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse project config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing config field: {0}")]
    MissingField(&'static str),
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid date for {field}: {value:?} (expected DD/MM/YY)")]
    InvalidDate { field: &'static str, value: String },
}

/// Config values may be written as YAML strings or as plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarRecord {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl ScalarRecord {
    fn into_text(self) -> String {
        match self {
            ScalarRecord::Text(text) => text.trim().to_string(),
            ScalarRecord::Integer(value) => value.to_string(),
            ScalarRecord::Float(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsRecord {
    project_name: Option<ScalarRecord>,
    sprint_default_speed: Option<ScalarRecord>,
    sprint_done: Option<ScalarRecord>,
    initial_nb_of_sprints: Option<ScalarRecord>,
    sprint_duration_in_weeks: Option<ScalarRecord>,
    new_sprint_begins: Option<ScalarRecord>,
    wish_date: Option<ScalarRecord>,
    #[serde(rename = "CSV")]
    csv: Option<CsvColumnsRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvColumnsRecord {
    ticket_name_field: Option<String>,
    ticket_points_field: Option<String>,
    ticket_sprint_field: Option<String>,
}

/// Loads and validates the project settings from a YAML file.
///
/// # Errors
/// - Returns an error on I/O or YAML syntax failures.
/// - Returns [`ProjectConfigError::MissingField`] when a key is absent.
/// - Returns an error when a number or a `DD/MM/YY` date cannot be parsed.
pub fn load_settings_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<ForecastSettings, ProjectConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ProjectConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded project config");
    deserialize_settings_from_yaml_str(&contents)
}

pub fn deserialize_settings_from_yaml_str(
    input: &str,
) -> Result<ForecastSettings, ProjectConfigError> {
    let record: SettingsRecord = serde_yaml::from_str(input)?;

    let project = ProjectConfig {
        project_name: required(record.project_name, "ProjectName")?,
        sprint_speed: parse_number(record.sprint_default_speed, "SprintDefaultSpeed")?,
        sprints_done: parse_number(record.sprint_done, "SprintDone")?,
        initial_sprint_count: parse_integer(record.initial_nb_of_sprints, "InitialNbOfSprints")?,
        sprint_duration_weeks: parse_integer(
            record.sprint_duration_in_weeks,
            "SprintDurationInWeeks",
        )?,
        next_sprint_start: parse_date(record.new_sprint_begins, "NewSprintBegins")?,
        wish_date: parse_date(record.wish_date, "WishDate")?,
    };

    let csv = record.csv.ok_or(ProjectConfigError::MissingField("CSV"))?;
    let columns = CsvColumns {
        name: csv
            .ticket_name_field
            .ok_or(ProjectConfigError::MissingField("TicketNameField"))?,
        points: csv
            .ticket_points_field
            .ok_or(ProjectConfigError::MissingField("TicketPointsField"))?,
        sprint: csv
            .ticket_sprint_field
            .ok_or(ProjectConfigError::MissingField("TicketSprintField"))?,
    };

    Ok(ForecastSettings { project, columns })
}

fn required(
    value: Option<ScalarRecord>,
    field: &'static str,
) -> Result<String, ProjectConfigError> {
    value
        .map(ScalarRecord::into_text)
        .ok_or(ProjectConfigError::MissingField(field))
}

fn parse_number(
    value: Option<ScalarRecord>,
    field: &'static str,
) -> Result<f64, ProjectConfigError> {
    let value = required(value, field)?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ProjectConfigError::InvalidNumber { field, value }),
    }
}

fn parse_integer(
    value: Option<ScalarRecord>,
    field: &'static str,
) -> Result<i64, ProjectConfigError> {
    let value = required(value, field)?;
    value
        .parse::<i64>()
        .map_err(|_| ProjectConfigError::InvalidNumber { field, value })
}

fn parse_date(
    value: Option<ScalarRecord>,
    field: &'static str,
) -> Result<NaiveDate, ProjectConfigError> {
    let value = required(value, field)?;
    let date = NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|_| ProjectConfigError::InvalidDate { field, value: value.clone() })?;
    // Two-digit years 69 to 99 belong to the 1900s; chrono reads 69 as 2069.
    if date.year() == 2069 {
        return date
            .with_year(1969)
            .ok_or(ProjectConfigError::InvalidDate { field, value });
    }
    Ok(date)
}
