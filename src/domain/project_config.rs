use chrono::NaiveDate;

/// Scalars describing the project schedule, validated at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub project_name: String,
    /// Velocity in story points per sprint.
    pub sprint_speed: f64,
    /// Kept fractional until the needed sprint count is truncated.
    pub sprints_done: f64,
    pub initial_sprint_count: i64,
    pub sprint_duration_weeks: i64,
    pub next_sprint_start: NaiveDate,
    pub wish_date: NaiveDate,
}

/// Header names of the CSV columns holding the ticket fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub name: String,
    pub points: String,
    pub sprint: String,
}

/// Everything the config file provides for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub project: ProjectConfig,
    pub columns: CsvColumns,
}
