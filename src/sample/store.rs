// Sample stores: where a measurement's sample file comes from
//
// The engine only reads. `DirectorySampleStore` can also write, so tools that
// produce samples and tests share one layout.

use crate::formula::Measurement;
use crate::sample_file::{SampleFileWriter, SampleProperties};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Source of raw sample files, keyed by measurement
pub trait SampleStore: Send + Sync {
    /// True if sample data exists for `measurement`
    fn contains(&self, measurement: &Measurement) -> bool;

    /// Open the sample file of `measurement` for reading
    fn open(&self, measurement: &Measurement) -> io::Result<Box<dyn BufRead + Send>>;
}

/// Sample files in one directory, named by a hash of the measurement identity
///
/// File name: hex SHA-256 over method, generator and machine (NUL separated)
/// with the `.samples` extension. Identities may contain any characters
/// without escaping.
#[derive(Debug, Clone)]
pub struct DirectorySampleStore {
    root: PathBuf,
}

impl DirectorySampleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name used for `measurement`
    pub fn file_name(measurement: &Measurement) -> String {
        let mut hasher = Sha256::new();
        hasher.update(measurement.method.as_bytes());
        hasher.update([0u8]);
        hasher.update(measurement.generator.as_bytes());
        hasher.update([0u8]);
        hasher.update(measurement.machine.as_bytes());
        format!("{}.samples", hex::encode(hasher.finalize()))
    }

    pub fn path_for(&self, measurement: &Measurement) -> PathBuf {
        self.root.join(Self::file_name(measurement))
    }

    /// Encode and store samples for `measurement`
    pub fn write_sample(
        &self,
        measurement: &Measurement,
        identification: &str,
        properties: &SampleProperties,
        samples: &[f64],
    ) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(measurement);
        let mut out = BufWriter::new(File::create(&path)?);
        SampleFileWriter::write(&mut out, identification, properties, samples)?;
        Ok(path)
    }

    /// Copy an existing sample file into the store
    pub fn import_file(&self, measurement: &Measurement, source: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(measurement);
        fs::copy(source, &path)?;
        Ok(path)
    }
}

impl SampleStore for DirectorySampleStore {
    fn contains(&self, measurement: &Measurement) -> bool {
        self.path_for(measurement).is_file()
    }

    fn open(&self, measurement: &Measurement) -> io::Result<Box<dyn BufRead + Send>> {
        let file = File::open(self.path_for(measurement))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
