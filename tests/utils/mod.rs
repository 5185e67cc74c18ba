// Shared fixtures for integration tests
//
// Sample directories live in a TempDir that must outlive the store.
#![allow(dead_code)]

use perflogic::formula::{Annotation, Comparison, Formula, FormulaDeclaration, Measurement, Sign};
use perflogic::sample::DirectorySampleStore;
use perflogic::sample_file::SampleProperties;
use perflogic::sink::SinkEvent;
use std::sync::Arc;
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<DirectorySampleStore>,
}

impl Fixture {
    pub fn new(samples: &[(&str, Vec<f64>)]) -> Self {
        let dir = TempDir::new().unwrap();
        let store = DirectorySampleStore::new(dir.path());
        for (method, values) in samples {
            let properties = SampleProperties {
                date: Some("2024-03-01".to_string()),
                sample_count: values.len() as i64,
                warmup_count: 5,
                ..Default::default()
            };
            store
                .write_sample(&measurement(method), method, &properties, values)
                .unwrap();
        }
        Self {
            dir,
            store: Arc::new(store),
        }
    }

    /// Write a raw file for `method`, bypassing the encoder
    pub fn write_raw(&self, method: &str, content: &str) {
        std::fs::write(self.store.path_for(&measurement(method)), content).unwrap();
    }
}

pub fn measurement(method: &str) -> Measurement {
    Measurement::new(method, "random-1k", "lab-01")
}

pub fn compare(left: &str, sign: Sign, right: &str) -> Formula {
    Formula::comparison(Comparison::new(measurement(left), sign, measurement(right)))
}

pub fn declare(text: &str, formula: Formula) -> FormulaDeclaration {
    FormulaDeclaration {
        text: text.to_string(),
        formula,
    }
}

pub fn annotation(location: &str, formulas: Vec<FormulaDeclaration>) -> Annotation {
    Annotation {
        location: location.to_string(),
        formulas,
    }
}

/// Ten values spread tightly around `center`
pub fn around(center: f64) -> Vec<f64> {
    [-0.2, -0.1, 0.0, 0.1, 0.2, -0.15, 0.15, 0.05, -0.05, 0.0]
        .iter()
        .map(|d| center + d)
        .collect()
}

/// Compact description of recorded sink events
pub fn describe(events: &[SinkEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event {
            SinkEvent::Sample(s) => format!("sample {}", s.measurement().method),
            SinkEvent::Comparison(c) => format!("comparison {}", c.comparison.left.method),
            SinkEvent::Formula(f) => format!("formula {}", f.declaration.text),
            SinkEvent::Annotation(a) => format!("annotation {}", a.location),
            SinkEvent::Done => "done".to_string(),
        })
        .collect()
}
