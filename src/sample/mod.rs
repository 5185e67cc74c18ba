//! Measurement samples: storage, lazy loading and the run-scoped cache
//!
//! A [`MeasurementSample`] binds a measurement to either a data provider or,
//! when no data exists, a label describing why. Invalid samples never reach
//! a statistical test; every comparison touching one is inconclusive.

mod cache;
mod provider;
mod store;

pub use cache::SampleCache;
pub use provider::{AcquiredData, MeasurementSampleDataProvider};
pub use store::{DirectorySampleStore, SampleStore};

use crate::formula::Measurement;
use crate::statistics::SampleSummary;

#[derive(Debug)]
enum SampleSource {
    Data(MeasurementSampleDataProvider),
    Invalid { label: String },
}

/// A measurement together with access to its samples
#[derive(Debug)]
pub struct MeasurementSample {
    measurement: Measurement,
    source: SampleSource,
}

impl MeasurementSample {
    pub fn valid(provider: MeasurementSampleDataProvider) -> Self {
        Self {
            measurement: provider.measurement().clone(),
            source: SampleSource::Data(provider),
        }
    }

    pub fn invalid(measurement: Measurement, label: impl Into<String>) -> Self {
        Self {
            measurement,
            source: SampleSource::Invalid {
                label: label.into(),
            },
        }
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.source, SampleSource::Data(_))
    }

    pub fn provider(&self) -> Option<&MeasurementSampleDataProvider> {
        match &self.source {
            SampleSource::Data(provider) => Some(provider),
            SampleSource::Invalid { .. } => None,
        }
    }

    /// Why the sample is invalid
    pub fn label(&self) -> Option<&str> {
        match &self.source {
            SampleSource::Data(_) => None,
            SampleSource::Invalid { label } => Some(label),
        }
    }

    /// Samples seen so far; 0 for invalid or not yet loaded samples
    pub fn sample_count(&self) -> usize {
        self.provider()
            .and_then(|p| p.loaded_count())
            .unwrap_or(0)
    }

    /// Summary, if one was computed during the run
    pub fn summary(&self) -> Option<SampleSummary> {
        self.provider().and_then(|p| p.cached_summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sample() {
        let sample = MeasurementSample::invalid(Measurement::new("A", "g", "m"), "no data");

        assert!(!sample.is_valid());
        assert_eq!(sample.sample_count(), 0);
        assert_eq!(sample.label(), Some("no data"));
        assert!(sample.provider().is_none());
        assert!(sample.summary().is_none());
    }
}
