use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::domain::ticket::Ticket;

/// Display name of the group of tickets without a sprint label.
pub const BACKLOG_LABEL: &str = "Backlog";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimationError {
    #[error("division by zero while computing {0}")]
    DivisionByZero(&'static str),
    #[error("integer overflow while computing {0}")]
    Overflow(&'static str),
    #[error("projected date is out of range")]
    DateOutOfRange,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BacklogEstimation {
    pub estimated: usize,
    pub to_estimate: usize,
    pub estimation_progress_pct: f64,
    pub backlog_share_pct: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SprintGroupStats {
    pub label: String,
    pub ticket_count: usize,
    pub points: u64,
    /// Only set for the backlog group.
    pub backlog: Option<BacklogEstimation>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GlobalStats {
    pub points_per_estimated_ticket: f64,
    pub estimated_points: u64,
    pub missing_points: f64,
    pub total_points: i64,
    pub points_done: u64,
    pub points_to_be_done: i64,
}

/// Aggregates the exported tickets into backlog and sprint statistics.
///
/// Every query recomputes from the ticket list, nothing is cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketList {
    tickets: Vec<Ticket>,
}

impl TicketList {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn backlog_tickets(&self) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|ticket| !ticket.is_sprint_ticket())
            .collect()
    }

    pub fn sprint_tickets(&self) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|ticket| ticket.is_sprint_ticket())
            .collect()
    }

    pub fn count_estimated<T: Borrow<Ticket>>(subset: &[T]) -> usize {
        subset
            .iter()
            .filter(|ticket| {
                let ticket: &Ticket = (*ticket).borrow();
                ticket.is_estimated()
            })
            .count()
    }

    pub fn count_to_estimate<T: Borrow<Ticket>>(subset: &[T]) -> usize {
        subset.len() - Self::count_estimated(subset)
    }

    pub fn sum_points<T: Borrow<Ticket>>(subset: &[T]) -> u64 {
        subset
            .iter()
            .map(|ticket| {
                let ticket: &Ticket = ticket.borrow();
                u64::from(ticket.points)
            })
            .sum()
    }

    /// Share of backlog tickets that already carry an estimate, in percent.
    pub fn estimation_progress_pct(&self) -> Result<f64, EstimationError> {
        let backlog = self.backlog_tickets();
        let ratio = checked_ratio(
            Self::count_estimated(&backlog) as f64,
            backlog.len() as f64,
            "estimation progress of an empty backlog",
        )?;
        Ok(round_to_one_decimal(ratio * 100.0))
    }

    /// Share of all tickets that are still in the backlog, in percent.
    pub fn backlog_share_of_all_pct(&self) -> Result<f64, EstimationError> {
        let ratio = checked_ratio(
            self.backlog_tickets().len() as f64,
            self.tickets.len() as f64,
            "backlog share of an empty ticket list",
        )?;
        Ok(round_to_one_decimal(ratio * 100.0))
    }

    /// Sprint tickets count here too, the average is taken over every
    /// estimated ticket.
    pub fn average_points_per_estimated_ticket(&self) -> Result<f64, EstimationError> {
        let average = checked_ratio(
            Self::sum_points(&self.tickets) as f64,
            Self::count_estimated(&self.tickets) as f64,
            "average points without any estimated ticket",
        )?;
        Ok(round_to_one_decimal(average))
    }

    /// Points the unestimated backlog tickets would add at the observed average.
    pub fn estimate_missing_points(&self) -> Result<f64, EstimationError> {
        let average = self.average_points_per_estimated_ticket()?;
        let to_estimate = Self::count_to_estimate(&self.backlog_tickets());
        Ok(round_to_one_decimal(average * to_estimate as f64))
    }

    pub fn estimate_total_points(&self) -> Result<i64, EstimationError> {
        let total = Self::sum_points(&self.tickets) as f64 + self.estimate_missing_points()?;
        Ok(total.round() as i64)
    }

    pub fn points_done(&self) -> u64 {
        Self::sum_points(&self.tickets) - Self::sum_points(&self.backlog_tickets())
    }

    pub fn points_to_be_done(&self) -> Result<i64, EstimationError> {
        Ok(self.estimate_total_points()? - self.points_done() as i64)
    }

    /// Groups tickets by raw sprint label. The empty label comes first and is
    /// reported as [`BACKLOG_LABEL`], the other labels follow in ascending order.
    pub fn grouped_stats(&self) -> Result<Vec<SprintGroupStats>, EstimationError> {
        let mut groups: BTreeMap<&str, Vec<&Ticket>> = BTreeMap::new();
        for ticket in &self.tickets {
            groups
                .entry(ticket.sprint_label.as_str())
                .or_default()
                .push(ticket);
        }

        groups
            .into_iter()
            .map(|(label, tickets)| -> Result<SprintGroupStats, EstimationError> {
                let label = if label.is_empty() { BACKLOG_LABEL } else { label };
                let backlog = if label == BACKLOG_LABEL {
                    Some(self.backlog_estimation()?)
                } else {
                    None
                };
                Ok(SprintGroupStats {
                    label: label.to_string(),
                    ticket_count: tickets.len(),
                    points: Self::sum_points(&tickets),
                    backlog,
                })
            })
            .collect()
    }

    pub fn global_stats(&self) -> Result<GlobalStats, EstimationError> {
        Ok(GlobalStats {
            points_per_estimated_ticket: self.average_points_per_estimated_ticket()?,
            estimated_points: Self::sum_points(&self.tickets),
            missing_points: self.estimate_missing_points()?,
            total_points: self.estimate_total_points()?,
            points_done: self.points_done(),
            points_to_be_done: self.points_to_be_done()?,
        })
    }

    fn backlog_estimation(&self) -> Result<BacklogEstimation, EstimationError> {
        let backlog = self.backlog_tickets();
        Ok(BacklogEstimation {
            estimated: Self::count_estimated(&backlog),
            to_estimate: Self::count_to_estimate(&backlog),
            estimation_progress_pct: self.estimation_progress_pct()?,
            backlog_share_pct: self.backlog_share_of_all_pct()?,
        })
    }
}

/// Above 2^52 every `f64` is already a whole number of tenths.
const EXACT_TENTHS_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Rounds the exact binary value to the nearest tenth, ties to even.
///
/// 2.25 becomes 2.2, while 1.15 is stored as 1.1499.. and becomes 1.1.
pub(crate) fn round_to_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    if !scaled.is_finite() || scaled.abs() >= EXACT_TENTHS_LIMIT {
        return value;
    }
    // What the multiplication lost, computed exactly.
    let residual = value.mul_add(10.0, -scaled);
    let nearest = scaled.round();
    let offset = (scaled - nearest) + residual;
    let tenths = if offset.abs() == 0.5 {
        (nearest + offset).round_ties_even()
    } else if offset > 0.5 {
        nearest + 1.0
    } else if offset < -0.5 {
        nearest - 1.0
    } else {
        nearest
    };
    tenths / 10.0
}

pub(crate) fn checked_ratio(
    numerator: f64,
    denominator: f64,
    quantity: &'static str,
) -> Result<f64, EstimationError> {
    if denominator == 0.0 {
        return Err(EstimationError::DivisionByZero(quantity));
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ticket;

    fn scenario_a() -> TicketList {
        TicketList::new(vec![
            ticket("A", 0, ""),
            ticket("B", 3, ""),
            ticket("C", 5, "Sprint 1"),
        ])
    }

    fn mixed_project() -> TicketList {
        TicketList::new(vec![
            ticket("ABC-1", 5, "Sprint 1"),
            ticket("ABC-2", 3, "Sprint 1"),
            ticket("ABC-3", 8, "Sprint 2"),
            ticket("ABC-4", 2, ""),
            ticket("ABC-5", 0, ""),
            ticket("ABC-6", 0, ""),
            ticket("ABC-7", 4, ""),
        ])
    }

    #[test]
    fn backlog_and_sprint_tickets_partition_the_list_in_order() {
        let list = mixed_project();
        let backlog: Vec<&str> = list
            .backlog_tickets()
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        let sprint: Vec<&str> = list
            .sprint_tickets()
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();

        assert_eq!(backlog, vec!["ABC-4", "ABC-5", "ABC-6", "ABC-7"]);
        assert_eq!(sprint, vec!["ABC-1", "ABC-2", "ABC-3"]);
        assert_eq!(backlog.len() + sprint.len(), list.tickets().len());
    }

    #[test]
    fn scenario_a_reports_half_of_the_backlog_estimated() {
        let list = scenario_a();
        let backlog = list.backlog_tickets();

        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog[0].name, "A");
        assert_eq!(backlog[1].name, "B");
        assert_eq!(TicketList::count_estimated(&backlog), 1);
        assert_eq!(list.estimation_progress_pct(), Ok(50.0));
    }

    #[test]
    fn estimated_and_to_estimate_counts_add_up_to_subset_length() {
        let list = mixed_project();
        let backlog = list.backlog_tickets();

        assert_eq!(
            TicketList::count_estimated(&backlog) + TicketList::count_to_estimate(&backlog),
            backlog.len()
        );
        assert_eq!(
            TicketList::count_estimated(list.tickets())
                + TicketList::count_to_estimate(list.tickets()),
            list.tickets().len()
        );
        assert_eq!(TicketList::count_to_estimate(&backlog), 2);
    }

    #[test]
    fn backlog_points_plus_points_done_equal_all_points() {
        let list = mixed_project();
        let all = TicketList::sum_points(list.tickets());
        let backlog = TicketList::sum_points(&list.backlog_tickets());

        assert_eq!(all, 22);
        assert_eq!(backlog, 6);
        assert_eq!(backlog + list.points_done(), all);
    }

    #[test]
    fn empty_backlog_has_no_estimation_progress() {
        let list = TicketList::new(vec![
            ticket("ABC-1", 5, "Sprint 1"),
            ticket("ABC-2", 3, "Sprint 2"),
        ]);

        assert!(matches!(
            list.estimation_progress_pct(),
            Err(EstimationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn empty_ticket_list_has_no_backlog_share() {
        let list = TicketList::new(vec![]);
        assert!(matches!(
            list.backlog_share_of_all_pct(),
            Err(EstimationError::DivisionByZero(_))
        ));
    }

    #[test]
    fn average_requires_at_least_one_estimated_ticket() {
        let list = TicketList::new(vec![ticket("ABC-1", 0, ""), ticket("ABC-2", 0, "")]);

        assert!(matches!(
            list.average_points_per_estimated_ticket(),
            Err(EstimationError::DivisionByZero(_))
        ));
        assert!(list.estimate_missing_points().is_err());
        assert!(list.points_to_be_done().is_err());
    }

    #[test]
    fn percentages_are_rounded_to_one_decimal() {
        let list = TicketList::new(vec![
            ticket("ABC-1", 1, ""),
            ticket("ABC-2", 0, ""),
            ticket("ABC-3", 0, ""),
        ]);

        assert_eq!(list.estimation_progress_pct(), Ok(33.3));
        assert_eq!(list.backlog_share_of_all_pct(), Ok(100.0));
    }

    #[test]
    fn projection_extrapolates_unestimated_backlog_tickets() {
        let list = mixed_project();

        // 22 points over 5 estimated tickets
        assert_eq!(list.average_points_per_estimated_ticket(), Ok(4.4));
        assert_eq!(list.estimate_missing_points(), Ok(8.8));
        // 22 + 8.8 = 30.8
        assert_eq!(list.estimate_total_points(), Ok(31));
        assert_eq!(list.points_done(), 16);
        assert_eq!(list.points_to_be_done(), Ok(15));
    }

    #[test]
    fn average_is_rounded_before_extrapolation() {
        // 10 / 3 = 3.33.. -> 3.3, times 2 unestimated -> 6.6
        let list = TicketList::new(vec![
            ticket("ABC-1", 3, "Sprint 1"),
            ticket("ABC-2", 3, ""),
            ticket("ABC-3", 4, ""),
            ticket("ABC-4", 0, ""),
            ticket("ABC-5", 0, ""),
        ]);

        assert_eq!(list.average_points_per_estimated_ticket(), Ok(3.3));
        assert_eq!(list.estimate_missing_points(), Ok(6.6));
        assert_eq!(list.estimate_total_points(), Ok(17));
    }

    #[test]
    fn unestimated_sprint_tickets_are_not_extrapolated() {
        let list = TicketList::new(vec![
            ticket("ABC-1", 0, "Sprint 1"),
            ticket("ABC-2", 4, ""),
        ]);

        assert_eq!(list.estimate_missing_points(), Ok(0.0));
        assert_eq!(list.estimate_total_points(), Ok(4));
        assert_eq!(list.points_to_be_done(), Ok(4));
    }

    #[test]
    fn grouped_stats_put_backlog_first_then_sorted_labels() {
        let list = TicketList::new(vec![
            ticket("ABC-1", 5, "Sprint 2"),
            ticket("ABC-2", 3, ""),
            ticket("ABC-3", 8, "Sprint 1"),
            ticket("ABC-4", 0, ""),
            ticket("ABC-5", 2, "Sprint 2"),
        ]);

        let stats = list.grouped_stats().unwrap();
        let labels: Vec<&str> = stats.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, vec!["Backlog", "Sprint 1", "Sprint 2"]);

        assert_eq!(stats[0].ticket_count, 2);
        assert_eq!(stats[0].points, 3);
        assert_eq!(
            stats[0].backlog,
            Some(BacklogEstimation {
                estimated: 1,
                to_estimate: 1,
                estimation_progress_pct: 50.0,
                backlog_share_pct: 40.0,
            })
        );

        assert_eq!(stats[2].ticket_count, 2);
        assert_eq!(stats[2].points, 7);
        assert_eq!(stats[2].backlog, None);
    }

    #[test]
    fn grouped_stats_without_backlog_succeed_for_all_sprint_tickets() {
        let list = TicketList::new(vec![ticket("ABC-1", 5, "Sprint 1")]);

        let stats = list.grouped_stats().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].label, "Sprint 1");
        assert_eq!(stats[0].backlog, None);
    }

    #[test]
    fn labels_without_sprint_substring_form_a_group_but_count_as_backlog() {
        let list = TicketList::new(vec![
            ticket("ABC-1", 5, "Iteration 1"),
            ticket("ABC-2", 0, ""),
        ]);

        let stats = list.grouped_stats().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label, "Backlog");
        assert_eq!(stats[0].ticket_count, 1);
        assert_eq!(stats[1].label, "Iteration 1");

        // "Iteration 1" is in the backlog for the estimation metrics.
        let backlog = stats[0].backlog.as_ref().unwrap();
        assert_eq!(backlog.estimated, 1);
        assert_eq!(backlog.to_estimate, 1);
        assert_eq!(backlog.backlog_share_pct, 100.0);
        assert_eq!(list.points_done(), 0);
    }

    #[test]
    fn global_stats_collect_the_projection() {
        let stats = mixed_project().global_stats().unwrap();

        assert_eq!(
            stats,
            GlobalStats {
                points_per_estimated_ticket: 4.4,
                estimated_points: 22,
                missing_points: 8.8,
                total_points: 31,
                points_done: 16,
                points_to_be_done: 15,
            }
        );
    }

    #[test]
    fn repeated_queries_return_identical_results() {
        let list = mixed_project();

        assert_eq!(list.grouped_stats(), list.grouped_stats());
        assert_eq!(list.global_stats(), list.global_stats());
        assert_eq!(list.points_to_be_done(), list.points_to_be_done());
        assert_eq!(list.backlog_tickets(), list.backlog_tickets());
    }

    #[test]
    fn round_to_one_decimal_rounds_exact_ties_to_even() {
        let test_cases = vec![
            (0.25, 0.2),
            (-0.25, -0.2),
            (0.75, 0.8),
            (2.25, 2.2),
            (2.35, 2.4),
            (1.15, 1.1),
            (66.66, 66.7),
            (33.333, 33.3),
            (12.0, 12.0),
        ];

        for (value, expected) in test_cases {
            assert_eq!(
                round_to_one_decimal(value),
                expected,
                "Expected {} to round to {}",
                value,
                expected
            );
        }
    }

    #[test]
    fn average_on_a_tie_rounds_to_even_before_extrapolation() {
        // 9 points over 4 estimated tickets is 2.25
        let mut tickets = vec![
            ticket("ABC-1", 2, "Sprint 1"),
            ticket("ABC-2", 2, "Sprint 1"),
            ticket("ABC-3", 2, ""),
            ticket("ABC-4", 3, ""),
        ];
        for index in 5..15 {
            tickets.push(ticket(&format!("ABC-{index}"), 0, ""));
        }
        let list = TicketList::new(tickets);

        assert_eq!(list.average_points_per_estimated_ticket(), Ok(2.2));
        assert_eq!(list.estimate_missing_points(), Ok(22.0));
        assert_eq!(list.estimate_total_points(), Ok(31));
        assert_eq!(list.points_to_be_done(), Ok(27));
    }
}
