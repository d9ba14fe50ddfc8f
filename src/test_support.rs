use chrono::NaiveDate;

use crate::domain::project_config::{CsvColumns, ProjectConfig};
use crate::domain::ticket::Ticket;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ticket(name: &str, points: u32, sprint_label: &str) -> Ticket {
    Ticket::new(name, points, sprint_label)
}

/// Speed 10, nothing done yet, 10 initial sprints of 2 weeks starting
/// 2024-01-01 with a wish date 12 weeks later.
pub fn build_config() -> ProjectConfig {
    ProjectConfig {
        project_name: "Demo".to_string(),
        sprint_speed: 10.0,
        sprints_done: 0.0,
        initial_sprint_count: 10,
        sprint_duration_weeks: 2,
        next_sprint_start: on_date(2024, 1, 1),
        wish_date: on_date(2024, 3, 25),
    }
}

pub fn jira_columns() -> CsvColumns {
    CsvColumns {
        name: "Summary".to_string(),
        points: "Custom field (Story Points)".to_string(),
        sprint: "Sprint".to_string(),
    }
}
