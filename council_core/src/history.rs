//! Append-only, pre-sized opinion history.

use crate::error::{CouncilError, Result};
use crate::update::mean;

/// Time-major log of state vectors plus the mean trajectory.
///
/// The grid is allocated up front (`step_count x member_count`, zero-filled).
/// Rows are written strictly in order starting at 0; nothing past the highest
/// written row is ever exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct OpinionHistory {
    member_count: usize,
    step_count: usize,
    grid: Vec<f64>,
    means: Vec<f64>,
}

impl OpinionHistory {
    /// Allocates an empty history for `step_count` rows of `member_count` opinions.
    pub fn new(step_count: usize, member_count: usize) -> Self {
        Self {
            member_count,
            step_count,
            grid: vec![0.0; step_count * member_count],
            means: Vec::with_capacity(step_count),
        }
    }

    /// Writes row `step` and appends its mean.
    ///
    /// `step` must be the next unwritten row; anything else is a caller defect.
    pub fn record(&mut self, step: usize, row: &[f64]) -> Result<()> {
        if step >= self.step_count {
            return Err(CouncilError::RowOutOfRange {
                step,
                step_count: self.step_count,
            });
        }
        if step != self.len() {
            return Err(CouncilError::Sequence {
                expected: self.len(),
                got: step,
            });
        }
        if row.len() != self.member_count {
            return Err(CouncilError::RowWidth {
                expected: self.member_count,
                got: row.len(),
            });
        }

        let start = step * self.member_count;
        self.grid[start..start + self.member_count].copy_from_slice(row);
        self.means.push(mean(row));
        Ok(())
    }

    /// Mean opinion after step `step`.
    pub fn mean_at(&self, step: usize) -> Result<f64> {
        self.means
            .get(step)
            .copied()
            .ok_or(CouncilError::NotRecorded {
                step,
                recorded: self.len(),
            })
    }

    /// Row `step`, if it has been written.
    pub fn row(&self, step: usize) -> Option<&[f64]> {
        if step >= self.len() {
            return None;
        }
        let start = step * self.member_count;
        Some(&self.grid[start..start + self.member_count])
    }

    /// Iterates over the written rows in time order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.len()).filter_map(move |step| self.row(step))
    }

    /// Mean trajectory so far.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Mean of the most recent row.
    pub fn last_mean(&self) -> Option<f64> {
        self.means.last().copied()
    }

    /// Owned copy of the written rows, for exporters.
    pub fn to_grid(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Number of rows written.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Returns true once every row has been written.
    pub fn is_full(&self) -> bool {
        self.len() == self.step_count
    }

    /// Total number of rows (the configured step count).
    pub fn capacity(&self) -> usize {
        self.step_count
    }

    pub fn member_count(&self) -> usize {
        self.member_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_new_history_is_empty() {
        let history = OpinionHistory::new(4, 3);
        assert!(history.is_empty());
        assert!(!history.is_full());
        assert_eq!(history.capacity(), 4);
        assert_eq!(history.member_count(), 3);
        assert_eq!(history.rows().count(), 0);
        assert!(history.last_mean().is_none());
    }

    #[test]
    fn test_record_in_order() {
        let mut history = OpinionHistory::new(3, 2);
        history.record(0, &[0.0, 1.0]).unwrap();
        history.record(1, &[0.25, 0.25]).unwrap();

        assert_eq!(history.len(), 2);
        assert_relative_eq!(history.mean_at(0).unwrap(), 0.5);
        assert_relative_eq!(history.mean_at(1).unwrap(), 0.25);
        assert_eq!(history.row(1), Some(&[0.25, 0.25][..]));
        assert_eq!(history.to_grid(), vec![vec![0.0, 1.0], vec![0.25, 0.25]]);
    }

    #[test]
    fn test_mean_matches_row() {
        let mut history = OpinionHistory::new(2, 4);
        history.record(0, &[0.1, 0.2, 0.3, 0.4]).unwrap();
        let row = history.row(0).unwrap();
        assert_relative_eq!(history.mean_at(0).unwrap(), mean(row));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let mut history = OpinionHistory::new(3, 1);
        history.record(0, &[0.5]).unwrap();

        let err = history.record(0, &[0.9]).unwrap_err();
        assert_eq!(err, CouncilError::Sequence { expected: 1, got: 0 });
        // Original row untouched
        assert_eq!(history.row(0), Some(&[0.5][..]));
    }

    #[test]
    fn test_skipped_row_rejected() {
        let mut history = OpinionHistory::new(3, 1);
        let err = history.record(2, &[0.5]).unwrap_err();
        assert_eq!(err, CouncilError::Sequence { expected: 0, got: 2 });
        assert!(history.is_empty());
    }

    #[test]
    fn test_row_past_end_rejected() {
        let mut history = OpinionHistory::new(1, 1);
        history.record(0, &[0.5]).unwrap();
        assert!(history.is_full());

        let err = history.record(1, &[0.5]).unwrap_err();
        assert_eq!(err, CouncilError::RowOutOfRange { step: 1, step_count: 1 });
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut history = OpinionHistory::new(2, 3);
        let err = history.record(0, &[0.5, 0.5]).unwrap_err();
        assert_eq!(err, CouncilError::RowWidth { expected: 3, got: 2 });
    }

    #[test]
    fn test_never_reads_unwritten_rows() {
        let mut history = OpinionHistory::new(5, 2);
        history.record(0, &[1.0, 1.0]).unwrap();

        assert!(history.row(1).is_none());
        assert_eq!(
            history.mean_at(1).unwrap_err(),
            CouncilError::NotRecorded { step: 1, recorded: 1 }
        );
        assert_eq!(history.rows().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_means_track_recorded_rows(
            (members, rows) in (1usize..16).prop_flat_map(|members| (
                Just(members),
                prop::collection::vec(prop::collection::vec(0.0f64..=1.0, members), 1..24),
            )),
            spare in 0usize..4,
        ) {
            let mut history = OpinionHistory::new(rows.len() + spare, members);
            for (t, row) in rows.iter().enumerate() {
                history.record(t, row).unwrap();
                prop_assert_eq!(history.len(), t + 1);
                prop_assert!(history.row(t + 1).is_none());
            }

            prop_assert_eq!(history.means().len(), rows.len());
            for (t, row) in rows.iter().enumerate() {
                prop_assert_eq!(history.row(t), Some(&row[..]));
                prop_assert!((history.mean_at(t).unwrap() - mean(row)).abs() < 1e-12);
            }
            prop_assert_eq!(history.is_full(), spare == 0);
        }
    }
}
