use thiserror::Error;

use crate::commands::base_commands::OutputFormat;
use crate::domain::report::{ForecastReport, ReportTable};

const HEADER: [&str; 2] = ["Label", "Value"];

#[derive(Error, Debug)]
pub enum ReportFormatError {
    #[error("failed to serialize report to yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize report to json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn render_report(
    report: &ForecastReport,
    format: OutputFormat,
) -> Result<String, ReportFormatError> {
    match format {
        OutputFormat::Text => Ok(format_forecast_report(report)),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub fn format_forecast_report(report: &ForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Project: {}", report.project_name));
    lines.push(String::new());
    for table in report.tables() {
        lines.push(table.title.to_uppercase());
        lines.push(String::new());
        lines.push(format_report_table(table));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Renders a table as a grid with a border line between every row.
pub fn format_report_table(table: &ReportTable) -> String {
    let label_width = table
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .chain([HEADER[0].len()])
        .max()
        .unwrap_or(0);
    let value_width = table
        .rows
        .iter()
        .map(|row| row.value.chars().count())
        .chain([HEADER[1].len()])
        .max()
        .unwrap_or(0);

    let border = grid_border('-', label_width, value_width);
    let mut lines = vec![
        border.clone(),
        grid_row(HEADER[0], HEADER[1], label_width, value_width),
        grid_border('=', label_width, value_width),
    ];
    for row in &table.rows {
        lines.push(grid_row(&row.label, &row.value, label_width, value_width));
        lines.push(border.clone());
    }
    if table.rows.is_empty() {
        lines.pop();
        lines.push(border);
    }

    lines.join("\n")
}

fn grid_border(fill: char, label_width: usize, value_width: usize) -> String {
    let label = fill.to_string().repeat(label_width + 2);
    let value = fill.to_string().repeat(value_width + 2);
    format!("+{label}+{value}+")
}

fn grid_row(label: &str, value: &str, label_width: usize, value_width: usize) -> String {
    format!("| {label:<label_width$} | {value:<value_width$} |")
}
