//! Outlier clipping for raw sample arrays
//!
//! Both clippers return a new vector in input order and never mutate their
//! input. Results are deterministic for identical input and parameters.

/// Percentile with linear interpolation between nearest ranks
///
/// `percentile` is in [0, 100]; 0 yields the minimum and 100 the maximum.
/// Returns NaN for empty input.
pub fn percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_of_sorted(&sorted, percentile)
}

pub(crate) fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    // No interpolation towards a non-finite neighbour
    let (below, above) = (sorted[lower_idx], sorted[upper_idx]);
    if fraction == 0.0 || !below.is_finite() || !above.is_finite() {
        return below;
    }
    below + fraction * (above - below)
}

fn mean_and_stddev(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Iterative sigma clipping
///
/// Each round computes mean and (population) standard deviation of the
/// retained values and keeps those within `sigma_multiplier` standard
/// deviations of the mean. Stops when a round removes nothing or after
/// `max_iterations` rounds. Every round's retained set is a subset of the
/// previous one.
///
/// # Example
/// ```
/// use perflogic::clip::sigma_clip;
///
/// let data = [10.0, 10.5, 9.5, 10.2, 9.8, 10.1, 9.9, 10.3, 9.7, 100.0];
/// let clipped = sigma_clip(&data, 2.0, 10);
/// assert!(!clipped.contains(&100.0));
/// assert_eq!(clipped.len(), 9);
/// ```
pub fn sigma_clip(samples: &[f64], sigma_multiplier: f64, max_iterations: usize) -> Vec<f64> {
    let mut retained = samples.to_vec();

    for _ in 0..max_iterations {
        if retained.len() < 2 {
            break;
        }
        let (mean, std_dev) = mean_and_stddev(&retained);
        if std_dev == 0.0 || !std_dev.is_finite() {
            break;
        }

        let limit = sigma_multiplier * std_dev;
        let before = retained.len();
        retained.retain(|x| (x - mean).abs() <= limit);

        if retained.len() == before {
            break;
        }
    }

    retained
}

/// Quantile clipping
///
/// Drops values below the `lower` percentile and above the `upper` percentile
/// (both in [0, 100]). `quantile_clip(data, 0.0, 100.0)` returns `data`.
///
/// Values are ordered with `f64::total_cmp`, the same order the percentiles
/// are taken in, so non-finite values are kept or dropped like any other.
pub fn quantile_clip(samples: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let low = percentile_of_sorted(&sorted, lower);
    let high = percentile_of_sorted(&sorted, upper);

    samples
        .iter()
        .copied()
        .filter(|x| x.total_cmp(&low).is_ge() && x.total_cmp(&high).is_le())
        .collect()
}
