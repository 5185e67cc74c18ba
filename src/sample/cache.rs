// Run-scoped sample cache
//
// One entry per measurement seen in a run, keyed by value. There is no
// eviction: a run touches a bounded set of measurements and the cache is
// dropped with the evaluator.

use super::provider::MeasurementSampleDataProvider;
use super::store::SampleStore;
use super::MeasurementSample;
use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::formula::Measurement;
use fnv::FnvHashMap;
use std::sync::{Arc, Mutex};

/// Measurement to sample map shared by all evaluation workers of a run
pub struct SampleCache {
    store: Arc<dyn SampleStore>,
    cancel: CancellationToken,
    compute_summaries: bool,
    samples: Mutex<FnvHashMap<Measurement, Arc<MeasurementSample>>>,
}

impl SampleCache {
    pub fn new(
        store: Arc<dyn SampleStore>,
        cancel: CancellationToken,
        compute_summaries: bool,
    ) -> Self {
        Self {
            store,
            cancel,
            compute_summaries,
            samples: Mutex::new(FnvHashMap::default()),
        }
    }

    /// Cached sample for `measurement`, created on first use
    ///
    /// Missing data yields an invalid sample, cached like a valid one.
    pub fn get_sample(&self, measurement: &Measurement) -> Result<Arc<MeasurementSample>> {
        self.cancel.checkpoint()?;

        let mut samples = self
            .samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(sample) = samples.get(measurement) {
            tracing::debug!("Sample cache hit for {}", measurement);
            return Ok(Arc::clone(sample));
        }

        let sample = if self.store.contains(measurement) {
            tracing::debug!("Sample cache miss for {}", measurement);
            MeasurementSample::valid(MeasurementSampleDataProvider::new(
                measurement.clone(),
                Arc::clone(&self.store),
                self.cancel.clone(),
                self.compute_summaries,
            ))
        } else {
            tracing::warn!("No sample data for {}", measurement);
            Self::invalid_sample(measurement)
        };

        let sample = Arc::new(sample);
        samples.insert(measurement.clone(), Arc::clone(&sample));
        Ok(sample)
    }

    /// Invalid sample for `measurement`; not cached, no I/O
    pub fn invalid_sample(measurement: &Measurement) -> MeasurementSample {
        MeasurementSample::invalid(
            measurement.clone(),
            format!("no sample data for {}", measurement),
        )
    }

    /// Number of cached measurements
    pub fn len(&self) -> usize {
        self.samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
