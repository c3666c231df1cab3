//! Timeline sanity checks.
//!
//! The chart pipeline never requires a valid timeline; these checks exist for
//! callers (and the CLI `inspect` command) that want to surface problems in
//! the service payload.

use crate::domain::TimelinePoint;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineIssue {
    #[error("point {index}: date {date} repeats an earlier point")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("point {index}: date {date} is earlier than previous point ({previous})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Every ordering problem in `timeline`, in position order.
pub fn validate_timeline(timeline: &[TimelinePoint]) -> Vec<TimelineIssue> {
    timeline
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let (previous, date) = (pair[0].date, pair[1].date);
            let index = i + 1;
            if date == previous {
                Some(TimelineIssue::DuplicateDate { index, date })
            } else if date < previous {
                Some(TimelineIssue::OutOfOrder { index, date, previous })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(days: &[u32]) -> Vec<TimelinePoint> {
        days.iter()
            .map(|&d| TimelinePoint::new(NaiveDate::from_ymd_opt(2024, 5, d).unwrap()))
            .collect()
    }

    #[test]
    fn ascending_timeline_has_no_issues() {
        assert!(validate_timeline(&points(&[1, 2, 5, 9])).is_empty());
        assert!(validate_timeline(&[]).is_empty());
    }

    #[test]
    fn reports_duplicates_and_reordering() {
        let issues = validate_timeline(&points(&[1, 2, 2, 1]));
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], TimelineIssue::DuplicateDate { index: 2, .. }));
        assert!(matches!(issues[1], TimelineIssue::OutOfOrder { index: 3, .. }));
        assert!(issues[1].to_string().contains("earlier than previous"));
    }
}
