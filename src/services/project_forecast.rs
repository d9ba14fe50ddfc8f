use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::domain::project_config::ProjectConfig;
use crate::services::ticket_list::{
    EstimationError, TicketList, checked_ratio, round_to_one_decimal,
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SprintCounts {
    pub initial: i64,
    pub done: f64,
    pub remaining: i64,
    pub additional: i64,
    pub needed: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectDates {
    pub weeks_remaining: i64,
    pub end_of_project: NaiveDate,
    pub wish_date: NaiveDate,
    pub wished_sprint_speed: f64,
}

/// Projects the remaining work of a [`TicketList`] onto the sprint calendar
/// described by a [`ProjectConfig`].
pub struct ProjectForecast<'a> {
    tickets: &'a TicketList,
    config: &'a ProjectConfig,
}

impl<'a> ProjectForecast<'a> {
    pub fn new(tickets: &'a TicketList, config: &'a ProjectConfig) -> Self {
        Self { tickets, config }
    }

    /// `points_to_be_done / sprint_speed`, rounded half away from zero.
    pub fn remaining_sprints(&self) -> Result<i64, EstimationError> {
        let sprints = checked_ratio(
            self.tickets.points_to_be_done()? as f64,
            self.config.sprint_speed,
            "remaining sprints with a zero sprint speed",
        )?;
        Ok(sprints.round() as i64)
    }

    pub fn needed_sprints(&self) -> Result<i64, EstimationError> {
        let needed = self.config.sprints_done + self.remaining_sprints()? as f64;
        Ok(needed.trunc() as i64)
    }

    pub fn additional_sprints(&self) -> Result<i64, EstimationError> {
        self.needed_sprints()?
            .checked_sub(self.config.initial_sprint_count)
            .ok_or(EstimationError::Overflow("additional sprints"))
    }

    pub fn weeks_remaining(&self) -> Result<i64, EstimationError> {
        self.remaining_sprints()?
            .checked_mul(self.config.sprint_duration_weeks)
            .ok_or(EstimationError::Overflow("remaining weeks"))
    }

    pub fn end_of_project(&self) -> Result<NaiveDate, EstimationError> {
        let weeks =
            TimeDelta::try_weeks(self.weeks_remaining()?).ok_or(EstimationError::DateOutOfRange)?;
        self.config
            .next_sprint_start
            .checked_add_signed(weeks)
            .ok_or(EstimationError::DateOutOfRange)
    }

    /// Velocity needed to finish the remaining points by the wish date.
    ///
    /// A wish date before the next sprint start gives a negative velocity.
    pub fn wished_sprint_speed(&self) -> Result<f64, EstimationError> {
        let days = (self.config.wish_date - self.config.next_sprint_start).num_days();
        let weeks_wished = days as f64 / 7.0;
        let sprints_wished = checked_ratio(
            weeks_wished,
            self.config.sprint_duration_weeks as f64,
            "wished sprint count with a zero sprint duration",
        )?;
        let speed = checked_ratio(
            self.tickets.points_to_be_done()? as f64,
            sprints_wished,
            "wished sprint speed when the wish date is the next sprint start",
        )?;
        Ok(round_to_one_decimal(speed))
    }

    pub fn sprint_counts(&self) -> Result<SprintCounts, EstimationError> {
        Ok(SprintCounts {
            initial: self.config.initial_sprint_count,
            done: self.config.sprints_done,
            remaining: self.remaining_sprints()?,
            additional: self.additional_sprints()?,
            needed: self.needed_sprints()?,
        })
    }

    pub fn project_dates(&self) -> Result<ProjectDates, EstimationError> {
        Ok(ProjectDates {
            weeks_remaining: self.weeks_remaining()?,
            end_of_project: self.end_of_project()?,
            wish_date: self.config.wish_date,
            wished_sprint_speed: self.wished_sprint_speed()?,
        })
    }
}
