// Lazy, reference-counted access to one measurement's raw samples
//
// A comparison reads the same samples up to three times (raw, sigma-clipped,
// quantile-clipped views for the three tests). The provider loads the file
// once per acquisition window and drops the buffer when the last
// `AcquiredData` guard goes away.

use super::store::SampleStore;
use crate::cancel::CancellationToken;
use crate::config::ClipMode;
use crate::error::SampleFileError;
use crate::formula::Measurement;
use crate::sample_file::{SampleFileReader, SampleProperties};
use crate::statistics::SampleSummary;
use std::sync::{Arc, Mutex, MutexGuard};

type Result<T> = std::result::Result<T, SampleFileError>;

#[derive(Debug, Default)]
struct ProviderState {
    /// Live `AcquiredData` guards
    acquisitions: usize,
    /// Unscaled samples, present while acquired
    raw: Option<Arc<Vec<f64>>>,
    identification: Option<String>,
    properties: Option<SampleProperties>,
    summary: Option<SampleSummary>,
    /// Sample count seen on the last load
    loaded_count: Option<usize>,
}

struct FileContents {
    identification: String,
    properties: SampleProperties,
    samples: Vec<f64>,
}

/// Per-measurement accessor created by the sample cache
pub struct MeasurementSampleDataProvider {
    measurement: Measurement,
    store: Arc<dyn SampleStore>,
    cancel: CancellationToken,
    compute_summary: bool,
    state: Mutex<ProviderState>,
}

impl std::fmt::Debug for MeasurementSampleDataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementSampleDataProvider")
            .field("measurement", &self.measurement)
            .field("compute_summary", &self.compute_summary)
            .finish_non_exhaustive()
    }
}

impl MeasurementSampleDataProvider {
    /// `compute_summary` makes the first acquisition also build the summary
    pub fn new(
        measurement: Measurement,
        store: Arc<dyn SampleStore>,
        cancel: CancellationToken,
        compute_summary: bool,
    ) -> Self {
        Self {
            measurement,
            store,
            cancel,
            compute_summary,
            state: Mutex::new(ProviderState::default()),
        }
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_file(&self, scale: f64) -> Result<FileContents> {
        if self.cancel.is_cancelled() {
            return Err(SampleFileError::Aborted);
        }
        let input = self.store.open(&self.measurement)?;
        let mut reader = SampleFileReader::new(input)?.with_cancellation(self.cancel.clone());
        let samples = reader.read_all(scale)?;
        tracing::debug!(
            "Loaded {} samples for {} (scale {})",
            samples.len(),
            self.measurement,
            scale
        );
        Ok(FileContents {
            identification: reader.identification().to_string(),
            properties: reader.properties().clone(),
            samples,
        })
    }

    fn remember(&self, state: &mut ProviderState, contents: &FileContents) {
        state.loaded_count = Some(contents.samples.len());
        state.identification = Some(contents.identification.clone());
        if state.properties.is_none() {
            state.properties = Some(contents.properties.clone());
        }
    }

    /// Load the raw samples into the cache (if needed) and pin them
    ///
    /// The buffer stays cached until every returned guard is dropped.
    pub fn acquire(&self) -> Result<AcquiredData<'_>> {
        let mut state = self.lock();

        let raw = match &state.raw {
            Some(raw) => Arc::clone(raw),
            None => {
                let contents = self.read_file(1.0)?;
                self.remember(&mut state, &contents);
                if self.compute_summary && state.summary.is_none() {
                    state.summary = Some(SampleSummary::compute(
                        &contents.samples,
                        &contents.properties,
                    ));
                }
                let raw = Arc::new(contents.samples);
                state.raw = Some(Arc::clone(&raw));
                raw
            }
        };
        state.acquisitions += 1;

        Ok(AcquiredData {
            provider: self,
            raw,
        })
    }

    fn release(&self) {
        let mut state = self.lock();
        state.acquisitions = state.acquisitions.saturating_sub(1);
        if state.acquisitions == 0 {
            state.raw = None;
        }
    }

    /// True while at least one guard keeps the raw buffer cached
    pub fn is_cached(&self) -> bool {
        self.lock().raw.is_some()
    }

    /// Samples multiplied by `scale`, from the cache when acquired and from
    /// the file otherwise
    pub fn load_raw_data(&self, scale: f64) -> Result<Vec<f64>> {
        if let Some(raw) = self.lock().raw.clone() {
            return Ok(raw.iter().map(|x| x * scale).collect());
        }
        let contents = self.read_file(scale)?;
        self.remember(&mut self.lock(), &contents);
        Ok(contents.samples)
    }

    /// Summary of the unscaled samples, computed at most once
    pub fn summary(&self) -> Result<SampleSummary> {
        if let Some(summary) = self.lock().summary.clone() {
            return Ok(summary);
        }

        let cached = {
            let state = self.lock();
            state.raw.clone().zip(state.properties.clone())
        };
        let (samples, properties) = match cached {
            Some((raw, properties)) => (raw.as_ref().clone(), properties),
            None => {
                let contents = self.read_file(1.0)?;
                self.remember(&mut self.lock(), &contents);
                (contents.samples, contents.properties)
            }
        };

        let mut state = self.lock();
        let summary = state
            .summary
            .get_or_insert_with(|| SampleSummary::compute(&samples, &properties));
        Ok(summary.clone())
    }

    /// Summary if one was already computed
    pub fn cached_summary(&self) -> Option<SampleSummary> {
        self.lock().summary.clone()
    }

    /// Identification line of the sample file, once loaded
    pub fn identification(&self) -> Option<String> {
        self.lock().identification.clone()
    }

    /// Number of samples seen by the last load
    pub fn loaded_count(&self) -> Option<usize> {
        self.lock().loaded_count
    }
}

/// Scoped access to a provider's cached raw samples
///
/// Dropping the guard releases the acquisition on every exit path.
pub struct AcquiredData<'a> {
    provider: &'a MeasurementSampleDataProvider,
    raw: Arc<Vec<f64>>,
}

impl AcquiredData<'_> {
    /// Unscaled samples
    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    /// Samples multiplied by `lambda`
    pub fn scaled(&self, lambda: f64) -> Vec<f64> {
        self.raw.iter().map(|x| x * lambda).collect()
    }

    /// Scaled, then clipped view read by one statistical test
    pub fn view(&self, lambda: f64, clip: &ClipMode) -> Vec<f64> {
        clip.apply(&self.scaled(lambda))
    }
}

impl Drop for AcquiredData<'_> {
    fn drop(&mut self) {
        self.provider.release();
    }
}
