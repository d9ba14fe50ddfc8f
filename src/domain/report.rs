use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

impl ReportRow {
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }

    /// Empty row used to separate blocks inside a table.
    pub fn separator() -> Self {
        Self {
            label: String::new(),
            value: String::new(),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.label.is_empty() && self.value.is_empty()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, rows: Vec<ReportRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ForecastReport {
    pub project_name: String,
    pub sprint_groups: ReportTable,
    pub global_stats: ReportTable,
    pub initial_parameters: ReportTable,
    pub sprint_counts: ReportTable,
    pub project_dates: ReportTable,
}

impl ForecastReport {
    /// Tables in the order they are printed.
    pub fn tables(&self) -> [&ReportTable; 5] {
        [
            &self.sprint_groups,
            &self.global_stats,
            &self.initial_parameters,
            &self.sprint_counts,
            &self.project_dates,
        ]
    }
}
