//! Positional roles within a pattern
//!
//! Beats divisible by four are downbeats, the remaining even beats are
//! upbeats and odd beats are off-beats. Longer patterns are a run of 8-beat
//! bars, each laid out like a single 8-beat pattern.

use crate::error::{Result, SchedulerError};

/// Positions per bar; the stage-4 override runs once per bar
pub const BAR_LENGTH: usize = 8;

/// Role assignment for every position of a fixed-length pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatLayout {
    length: usize,
    downbeats: Vec<usize>,
    upbeats: Vec<usize>,
    offbeats: Vec<usize>,
}

impl BeatLayout {
    pub fn new(length: usize) -> Result<Self> {
        if length < 2 || length % 2 != 0 {
            return Err(SchedulerError::InvalidPatternLength(length));
        }

        Ok(Self {
            length,
            downbeats: (0..length).filter(|p| p % 4 == 0).collect(),
            upbeats: (0..length).filter(|p| p % 4 == 2).collect(),
            offbeats: (0..length).filter(|p| p % 2 == 1).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn downbeats(&self) -> &[usize] {
        &self.downbeats
    }

    pub fn upbeats(&self) -> &[usize] {
        &self.upbeats
    }

    pub fn offbeats(&self) -> &[usize] {
        &self.offbeats
    }

    /// Split a role's positions into two alternating groups:
    /// 1st, 3rd, ... and 2nd, 4th, ...
    pub fn groups(positions: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let first = positions.iter().step_by(2).copied().collect();
        let second = positions.iter().skip(1).step_by(2).copied().collect();
        (first, second)
    }

    /// Off-beats of each bar
    pub fn offbeats_by_bar(&self) -> Vec<Vec<usize>> {
        (0..self.length)
            .step_by(BAR_LENGTH)
            .map(|start| {
                self.offbeats
                    .iter()
                    .copied()
                    .filter(|&p| p >= start && p < start + BAR_LENGTH)
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_beat_roles() {
        let layout = BeatLayout::new(8).unwrap();
        assert_eq!(layout.downbeats(), &[0, 4]);
        assert_eq!(layout.upbeats(), &[2, 6]);
        assert_eq!(layout.offbeats(), &[1, 3, 5, 7]);
        assert_eq!(layout.offbeats_by_bar(), vec![vec![1, 3, 5, 7]]);
    }

    #[test]
    fn test_sixteen_beat_roles() {
        let layout = BeatLayout::new(16).unwrap();
        assert_eq!(layout.downbeats(), &[0, 4, 8, 12]);
        assert_eq!(layout.upbeats(), &[2, 6, 10, 14]);
        assert_eq!(layout.offbeats().len(), 8);
        assert_eq!(
            BeatLayout::groups(layout.downbeats()),
            (vec![0, 8], vec![4, 12])
        );
        assert_eq!(
            layout.offbeats_by_bar(),
            vec![vec![1, 3, 5, 7], vec![9, 11, 13, 15]]
        );
    }

    #[test]
    fn test_short_patterns() {
        let layout = BeatLayout::new(6).unwrap();
        assert_eq!(layout.downbeats(), &[0, 4]);
        assert_eq!(layout.upbeats(), &[2]);
        assert_eq!(layout.offbeats(), &[1, 3, 5]);

        let layout = BeatLayout::new(2).unwrap();
        assert_eq!(layout.downbeats(), &[0]);
        assert!(layout.upbeats().is_empty());
        assert_eq!(BeatLayout::groups(layout.downbeats()), (vec![0], vec![]));
    }

    #[test]
    fn test_invalid_lengths() {
        assert_eq!(BeatLayout::new(0), Err(SchedulerError::InvalidPatternLength(0)));
        assert_eq!(BeatLayout::new(7), Err(SchedulerError::InvalidPatternLength(7)));
    }
}
