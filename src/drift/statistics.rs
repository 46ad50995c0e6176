//! Summary statistics for the drift speeds of a particle ensemble.

use super::DriftEstimate;
use crate::{
    error::{DriftError, DriftResult},
    num::mean,
    particle::fpt,
};
use ndarray::prelude::*;
use ndarray_stats::{interpolate::Linear, QuantileExt};
use noisy_float::types::n64;

/// Percentages for which percentiles are computed by default.
pub const DEFAULT_PERCENTAGES: [fpt; 5] = [5.0, 30.0, 50.0, 70.0, 95.0];

/// Counts of values falling in equally wide bins.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    lower_edge: fpt,
    upper_edge: fpt,
    bin_counts: Vec<usize>,
}

/// Distribution summary of a set of drift speeds [m/s].
#[derive(Clone, Debug, PartialEq)]
pub struct DriftStatistics {
    count: usize,
    mean: fpt,
    std_dev: fpt,
    min: fpt,
    max: fpt,
    percentiles: Vec<(fpt, fpt)>,
    histogram: Histogram,
}

/// Deviation of a mean empirical drift speed from a theoretical one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftComparison {
    pub theoretical_speed: fpt,
    /// Mean empirical speed minus theoretical speed [m/s].
    pub absolute_deviation: fpt,
    /// `None` if the theoretical speed is zero.
    pub relative_deviation: Option<fpt>,
}

impl Histogram {
    /// Bins the given values over `[min, max]` using Sturges' rule for the
    /// number of bins.
    ///
    /// All values land in the first bin if they are equal.
    fn sturges(values: &[fpt], min: fpt, max: fpt) -> Self {
        let n_bins = sturges_bin_count(values.len());
        let mut bin_counts = vec![0; n_bins];
        let width = max - min;
        for &value in values {
            let bin_idx = if width > 0.0 {
                (((value - min) / width) * n_bins as fpt).floor() as usize
            } else {
                0
            };
            bin_counts[usize::min(bin_idx, n_bins - 1)] += 1;
        }
        Self {
            lower_edge: min,
            upper_edge: max,
            bin_counts,
        }
    }

    pub fn lower_edge(&self) -> fpt {
        self.lower_edge
    }

    pub fn upper_edge(&self) -> fpt {
        self.upper_edge
    }

    pub fn bin_counts(&self) -> &[usize] {
        &self.bin_counts
    }

    pub fn number_of_bins(&self) -> usize {
        self.bin_counts.len()
    }

    /// Returns the lower and upper edge of the bin with the given index.
    pub fn bin_edges(&self, bin_idx: usize) -> (fpt, fpt) {
        let width = (self.upper_edge - self.lower_edge) / self.number_of_bins() as fpt;
        (
            self.lower_edge + bin_idx as fpt * width,
            self.lower_edge + (bin_idx + 1) as fpt * width,
        )
    }
}

impl DriftStatistics {
    /// Computes statistics for the given drift speeds.
    ///
    /// # Parameters
    ///
    /// - `speeds`: Drift speeds to summarize [m/s].
    /// - `percentages`: Percentages (between 0 and 100) to compute percentiles for.
    ///
    /// # Returns
    ///
    /// A `DriftResult` which is either:
    ///
    /// - `Ok`: Contains the new `DriftStatistics`.
    /// - `Err`: There are no speeds, a speed is NaN or a percentage is out of range.
    pub fn from_speeds(speeds: &[fpt], percentages: &[fpt]) -> DriftResult<Self> {
        if speeds.is_empty() {
            return Err(DriftError::InvalidParameter(
                "Cannot compute statistics without any drift speeds".to_string(),
            ));
        }
        if speeds.iter().any(|speed| speed.is_nan()) {
            return Err(DriftError::InvalidParameter(
                "Drift speeds contain NaN values".to_string(),
            ));
        }
        if let Some(percentage) = percentages
            .iter()
            .find(|percentage| !(0.0..=100.0).contains(*percentage))
        {
            return Err(DriftError::InvalidParameter(format!(
                "Percentage not between 0 and 100: {}",
                percentage
            )));
        }

        let count = speeds.len();
        let mean_speed = mean(speeds.iter().copied()).unwrap_or(0.0);
        let variance = mean(
            speeds
                .iter()
                .map(|speed| (speed - mean_speed) * (speed - mean_speed)),
        )
        .unwrap_or(0.0);
        let min = speeds.iter().copied().fold(fpt::INFINITY, fpt::min);
        let max = speeds.iter().copied().fold(fpt::NEG_INFINITY, fpt::max);

        let percentiles = percentages
            .iter()
            .map(|&percentage| {
                Array1::from(speeds.to_vec())
                    .quantile_axis_skipnan_mut(Axis(0), n64(percentage / 100.0), &Linear)
                    .map(|percentile| (percentage, percentile.into_scalar()))
                    .map_err(|err| {
                        DriftError::InvalidParameter(format!(
                            "Could not compute percentile: {}",
                            err
                        ))
                    })
            })
            .collect::<DriftResult<Vec<_>>>()?;

        Ok(Self {
            count,
            mean: mean_speed,
            std_dev: variance.sqrt(),
            min,
            max,
            percentiles,
            histogram: Histogram::sturges(speeds, min, max),
        })
    }

    /// Computes statistics for the speeds of the given drift estimates.
    pub fn from_estimates(estimates: &[DriftEstimate], percentages: &[fpt]) -> DriftResult<Self> {
        let speeds: Vec<_> = estimates.iter().map(DriftEstimate::speed).collect();
        Self::from_speeds(&speeds, percentages)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> fpt {
        self.mean
    }

    /// Returns the population standard deviation.
    pub fn std_dev(&self) -> fpt {
        self.std_dev
    }

    pub fn min(&self) -> fpt {
        self.min
    }

    pub fn max(&self) -> fpt {
        self.max
    }

    /// Returns pairs of percentage and percentile value.
    pub fn percentiles(&self) -> &[(fpt, fpt)] {
        &self.percentiles
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Compares the mean speed with the speed of the given theoretical estimate.
    pub fn compare_with(&self, theoretical: &DriftEstimate) -> DriftComparison {
        let theoretical_speed = theoretical.speed();
        let absolute_deviation = self.mean - theoretical_speed;
        DriftComparison {
            theoretical_speed,
            absolute_deviation,
            relative_deviation: if theoretical_speed == 0.0 {
                None
            } else {
                Some(absolute_deviation.abs() / theoretical_speed)
            },
        }
    }
}

/// Computes the number of histogram bins `ceil(log2(n)) + 1` for `n` values.
pub fn sturges_bin_count(n_values: usize) -> usize {
    if n_values <= 1 {
        1
    } else {
        (n_values as fpt).log2().ceil() as usize + 1
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::geometry::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn basic_statistics_are_correct() {
        let speeds = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let statistics = DriftStatistics::from_speeds(&speeds, &[50.0]).unwrap();
        assert_eq!(statistics.count(), 8);
        assert_relative_eq!(statistics.mean(), 5.0);
        assert_relative_eq!(statistics.std_dev(), 2.0);
        assert_eq!(statistics.min(), 2.0);
        assert_eq!(statistics.max(), 9.0);
        assert_eq!(statistics.percentiles(), &[(50.0, 4.5)]);
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let speeds = [4.0, 1.0, 3.0, 2.0];
        let statistics = DriftStatistics::from_speeds(&speeds, &[0.0, 50.0, 100.0]).unwrap();
        assert_eq!(
            statistics.percentiles(),
            &[(0.0, 1.0), (50.0, 2.5), (100.0, 4.0)]
        );
    }

    #[test]
    fn histogram_follows_sturges_rule() {
        assert_eq!(sturges_bin_count(1), 1);
        assert_eq!(sturges_bin_count(8), 4);
        assert_eq!(sturges_bin_count(300), 10);

        let speeds: Vec<_> = (0..8).map(|idx| idx as fpt).collect();
        let statistics = DriftStatistics::from_speeds(&speeds, &DEFAULT_PERCENTAGES).unwrap();
        let histogram = statistics.histogram();
        assert_eq!(histogram.bin_counts(), &[2, 2, 2, 2]);
        assert_eq!(histogram.bin_edges(1), (1.75, 3.5));
        assert_eq!(
            histogram.bin_counts().iter().sum::<usize>(),
            statistics.count()
        );
    }

    #[test]
    fn equal_speeds_fall_in_single_bin() {
        let statistics = DriftStatistics::from_speeds(&[3.0; 5], &DEFAULT_PERCENTAGES).unwrap();
        assert_eq!(statistics.std_dev(), 0.0);
        assert_eq!(statistics.histogram().bin_counts()[0], 5);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(DriftStatistics::from_speeds(&[], &DEFAULT_PERCENTAGES).is_err());
        assert!(DriftStatistics::from_speeds(&[1.0, fpt::NAN], &DEFAULT_PERCENTAGES).is_err());
        assert!(DriftStatistics::from_speeds(&[1.0, 2.0], &[101.0]).is_err());
    }

    #[test]
    fn comparison_with_theoretical_speed_works() {
        let estimates = [
            DriftEstimate::empirical(Vec3::new(3.0, 4.0, 0.0)),
            DriftEstimate::empirical(Vec3::new(0.0, 0.0, 7.0)),
        ];
        let statistics = DriftStatistics::from_estimates(&estimates, &[]).unwrap();
        assert_relative_eq!(statistics.mean(), 6.0);

        let comparison =
            statistics.compare_with(&DriftEstimate::theoretical(Vec3::new(0.0, 5.0, 0.0)));
        assert_relative_eq!(comparison.absolute_deviation, 1.0);
        assert_relative_eq!(comparison.relative_deviation.unwrap(), 0.2);

        let comparison = statistics.compare_with(&DriftEstimate::theoretical(Vec3::zero()));
        assert_eq!(comparison.relative_deviation, None);
    }
}
