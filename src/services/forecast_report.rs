use chrono::NaiveDate;
use tracing::debug;

use crate::domain::project_config::ProjectConfig;
use crate::domain::report::{ForecastReport, ReportRow, ReportTable};
use crate::services::project_forecast::ProjectForecast;
use crate::services::ticket_list::{EstimationError, TicketList};

pub fn build_forecast_report(
    tickets: &TicketList,
    config: &ProjectConfig,
) -> Result<ForecastReport, EstimationError> {
    let forecast = ProjectForecast::new(tickets, config);
    let report = ForecastReport {
        project_name: config.project_name.clone(),
        sprint_groups: sprint_groups_table(tickets)?,
        global_stats: global_stats_table(tickets)?,
        initial_parameters: initial_parameters_table(config),
        sprint_counts: sprint_counts_table(&forecast)?,
        project_dates: project_dates_table(&forecast)?,
    };
    debug!(project = %report.project_name, "built forecast report");
    Ok(report)
}

fn sprint_groups_table(tickets: &TicketList) -> Result<ReportTable, EstimationError> {
    let mut rows = Vec::new();
    for group in tickets.grouped_stats()? {
        rows.push(ReportRow::new("Ticket list", &group.label));
        rows.push(ReportRow::new("Tickets", group.ticket_count));
        rows.push(ReportRow::new("Points", group.points));
        if let Some(backlog) = &group.backlog {
            rows.push(ReportRow::new("Estimated tickets", backlog.estimated));
            rows.push(ReportRow::new("Tickets to estimate", backlog.to_estimate));
            rows.push(ReportRow::new(
                "Backlog estimated (%)",
                one_decimal(backlog.estimation_progress_pct),
            ));
            rows.push(ReportRow::new(
                "Share of tickets in backlog (%)",
                one_decimal(backlog.backlog_share_pct),
            ));
        }
        rows.push(ReportRow::separator());
    }
    Ok(ReportTable::new("Ticket lists", rows))
}

fn global_stats_table(tickets: &TicketList) -> Result<ReportTable, EstimationError> {
    let stats = tickets.global_stats()?;
    Ok(ReportTable::new(
        "Global",
        vec![
            ReportRow::new(
                "Points per estimated ticket",
                one_decimal(stats.points_per_estimated_ticket),
            ),
            ReportRow::new("Estimated points", stats.estimated_points),
            ReportRow::new("Projection: missing points", one_decimal(stats.missing_points)),
            ReportRow::new("Projection: total points", stats.total_points),
            ReportRow::new("Points done", stats.points_done),
            ReportRow::new("Points to be done", stats.points_to_be_done),
        ],
    ))
}

fn initial_parameters_table(config: &ProjectConfig) -> ReportTable {
    ReportTable::new(
        "General parameters",
        vec![
            ReportRow::new("Next sprint start", iso_date(config.next_sprint_start)),
            ReportRow::new("Sprint duration (weeks)", config.sprint_duration_weeks),
            ReportRow::new("Velocity", config.sprint_speed),
        ],
    )
}

fn sprint_counts_table(forecast: &ProjectForecast<'_>) -> Result<ReportTable, EstimationError> {
    let counts = forecast.sprint_counts()?;
    Ok(ReportTable::new(
        "Number of sprints",
        vec![
            ReportRow::new("Initial sprints", counts.initial),
            ReportRow::new("Sprints done", counts.done),
            ReportRow::new("Remaining sprints", counts.remaining),
            ReportRow::new("Sprints to add to the initial ones", counts.additional),
            ReportRow::new("Total sprints to finish the project", counts.needed),
        ],
    ))
}

fn project_dates_table(forecast: &ProjectForecast<'_>) -> Result<ReportTable, EstimationError> {
    let dates = forecast.project_dates()?;
    Ok(ReportTable::new(
        "Estimated end date",
        vec![
            ReportRow::new("Remaining weeks", dates.weeks_remaining),
            ReportRow::new("Estimated end of project", iso_date(dates.end_of_project)),
            ReportRow::new(
                format!(
                    "Velocity needed to meet the wish date of {}",
                    iso_date(dates.wish_date)
                ),
                one_decimal(dates.wished_sprint_speed),
            ),
        ],
    ))
}

fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
