// Descriptive summary of one measurement's samples
//
// Computed once per measurement from the unscaled samples and handed to
// renderers alongside the verdicts.

use crate::clip::percentile_of_sorted;
use crate::sample_file::SampleProperties;
use serde::{Deserialize, Serialize};

/// Count, location and spread of a sample, plus header metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); 0 for fewer than two values
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Declared warm-up count, or -1 when unknown
    pub warmup_count: i64,
    /// Measurement date from the file header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl SampleSummary {
    /// Summarize `samples`; `properties` supplies warm-up count and date
    ///
    /// Location and spread are NaN for an empty sample.
    pub fn compute(samples: &[f64], properties: &SampleProperties) -> Self {
        let count = samples.len();
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (mean, std_dev, min, max) = if count == 0 {
            (f64::NAN, f64::NAN, f64::NAN, f64::NAN)
        } else {
            let n = count as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let std_dev = if count > 1 {
                (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
            } else {
                0.0
            };
            (mean, std_dev, sorted[0], sorted[count - 1])
        };

        Self {
            count,
            mean,
            median: percentile_of_sorted(&sorted, 50.0),
            std_dev,
            min,
            max,
            warmup_count: properties.warmup_count,
            date: properties.date.clone(),
        }
    }

    /// Coefficient of variation (std_dev / |mean|), 0 when the mean is ~0
    pub fn coefficient_of_variation(&self) -> f64 {
        if !self.mean.is_finite() || self.mean.abs() < 1e-12 {
            return 0.0;
        }
        self.std_dev / self.mean.abs()
    }
}
