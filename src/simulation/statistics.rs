// src/simulation/statistics.rs

use serde::Serialize;

/// z-score for a two-sided 95% interval.
const Z_95: f64 = 1.96;

/// Summary of service levels across successful replications.
///
/// `std_dev` is the population estimator (divides by n). `sample_std_dev`
/// divides by n - 1 and drives the confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceLevelSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub sample_std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl ServiceLevelSummary {
    /// `None` for an empty slice.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();

        let std_dev = (sum_sq / n).sqrt();
        let sample_std_dev = if samples.len() > 1 {
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let half_width = Z_95 * sample_std_dev / n.sqrt();

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: samples.len(),
            mean,
            std_dev,
            sample_std_dev,
            min,
            max,
            ci_low: mean - half_width,
            ci_high: mean + half_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn empty_has_no_summary() {
        assert!(ServiceLevelSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn population_and_sample_std() {
        // Classic textbook set: population std 2, sample std sqrt(32/7).
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = ServiceLevelSummary::from_samples(&xs).unwrap();
        assert_eq!(s.count, 8);
        assert!(close(s.mean, 5.0));
        assert!(close(s.std_dev, 2.0));
        assert!(close(s.sample_std_dev, (32.0f64 / 7.0).sqrt()));
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert!(s.ci_low < s.mean && s.mean < s.ci_high);
        assert!(close(s.ci_high - s.mean, s.mean - s.ci_low));
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let s = ServiceLevelSummary::from_samples(&[0.97]).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.sample_std_dev, 0.0);
        assert_eq!(s.ci_low, 0.97);
        assert_eq!(s.ci_high, 0.97);
    }
}
