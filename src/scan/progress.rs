//! Weighted progress over several sub-tasks

/// Combines independently reported sub-task fractions into one overall fraction
///
/// Overall progress is `sum(v[i] * w[i]) / sum(w[i])`, rounded to four
/// decimal places (two decimals of a percentage).
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    values: Vec<f64>,
    weights: Vec<f64>,
}

impl ProgressTracker {
    /// Creates a tracker for `count` sub-tasks with equal weights
    pub fn new(count: usize) -> Self {
        Self {
            values: vec![0.0; count],
            weights: vec![1.0; count],
        }
    }

    /// Creates a tracker with one weight per sub-task
    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            values: vec![0.0; weights.len()],
            weights,
        }
    }

    /// Replaces the sub-task values and returns the overall progress
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per tracked sub-task.
    pub fn update(&mut self, values: &[f64]) -> f64 {
        assert_eq!(
            values.len(),
            self.values.len(),
            "progress update has {} values but {} are tracked",
            values.len(),
            self.values.len()
        );

        self.values.clear();
        self.values.extend_from_slice(values);
        self.total()
    }

    /// Current overall progress
    pub fn total(&self) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (value, weight) in self.values.iter().zip(&self.weights) {
            numerator += value * weight;
            denominator += weight;
        }

        if denominator == 0.0 {
            return 0.0;
        }

        ((numerator / denominator) * 10_000.0).round() / 10_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_complete_is_one() {
        let mut tracker = ProgressTracker::with_weights(vec![0.1, 0.9]);
        assert_eq!(tracker.update(&[1.0, 1.0]), 1.0);

        let mut tracker = ProgressTracker::with_weights(vec![3.0, 0.5, 7.25]);
        assert_eq!(tracker.update(&[1.0, 1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_all_zero_is_zero() {
        let mut tracker = ProgressTracker::with_weights(vec![0.1, 0.9]);
        assert_eq!(tracker.update(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_equal_weights_by_default() {
        let mut tracker = ProgressTracker::new(4);
        assert_eq!(tracker.update(&[1.0, 0.0, 1.0, 0.0]), 0.5);
    }

    #[test]
    fn test_weighted_phases() {
        let mut tracker = ProgressTracker::with_weights(vec![0.1, 0.9]);
        assert_eq!(tracker.update(&[1.0, 0.0]), 0.1);
        assert_eq!(tracker.update(&[1.0, 0.5]), 0.55);
    }

    #[test]
    fn test_rounds_to_four_decimals() {
        let mut tracker = ProgressTracker::new(3);
        assert_eq!(tracker.update(&[1.0, 0.0, 0.0]), 0.3333);
    }

    #[test]
    fn test_stays_in_unit_interval() {
        let mut tracker = ProgressTracker::with_weights(vec![0.1, 0.9]);
        for i in 0..=20 {
            for j in 0..=20 {
                let p = tracker.update(&[i as f64 / 20.0, j as f64 / 20.0]);
                assert!((0.0..=1.0).contains(&p), "{} out of range", p);
            }
        }
    }

    #[test]
    #[should_panic(expected = "progress update has 3 values but 2 are tracked")]
    fn test_arity_mismatch_panics() {
        let mut tracker = ProgressTracker::with_weights(vec![0.1, 0.9]);
        tracker.update(&[0.0, 0.0, 0.0]);
    }
}
