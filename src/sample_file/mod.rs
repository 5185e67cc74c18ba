//! On-disk sample file format
//!
//! ```text
//! # <identification>
//! # date=2020-01-01
//! # samples=1000
//! # warmup=50
//! BEGIN-SAMPLES
//! 1.25
//! 1.31
//! ...
//! END-SAMPLES
//! ```
//!
//! All properties are optional. Counts that are missing or not integers decode
//! to [`UNKNOWN`] instead of failing the read. A sample line that is not a
//! number is a hard read error.

mod reader;
mod writer;

pub use reader::SampleFileReader;
pub use writer::SampleFileWriter;

use std::collections::BTreeMap;

/// Sentinel for a count the file does not declare
pub const UNKNOWN: i64 = -1;

/// Marker line opening the sample block
pub const BEGIN_SAMPLES: &str = "BEGIN-SAMPLES";

/// Marker line closing the sample block
pub const END_SAMPLES: &str = "END-SAMPLES";

pub(crate) const KEY_DATE: &str = "date";
pub(crate) const KEY_SAMPLES: &str = "samples";
pub(crate) const KEY_WARMUP: &str = "warmup";

/// Header properties of a sample file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleProperties {
    /// Measurement date as written by the producer
    pub date: Option<String>,
    /// Declared number of samples, or [`UNKNOWN`]
    pub sample_count: i64,
    /// Declared number of warm-up iterations, or [`UNKNOWN`]
    pub warmup_count: i64,
    /// Unrecognized `key=value` pairs, preserved for round-trips
    pub extra: BTreeMap<String, String>,
}

impl Default for SampleProperties {
    fn default() -> Self {
        Self {
            date: None,
            sample_count: UNKNOWN,
            warmup_count: UNKNOWN,
            extra: BTreeMap::new(),
        }
    }
}

impl SampleProperties {
    pub(crate) fn set(&mut self, key: &str, value: &str) {
        match key {
            KEY_DATE => self.date = Some(value.to_string()),
            KEY_SAMPLES => self.sample_count = parse_count(value),
            KEY_WARMUP => self.warmup_count = parse_count(value),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }
}

fn parse_count(value: &str) -> i64 {
    value.trim().parse::<i64>().unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_count_is_unknown() {
        let mut props = SampleProperties::default();
        props.set(KEY_SAMPLES, "many");
        props.set(KEY_WARMUP, "12");

        assert_eq!(props.sample_count, UNKNOWN);
        assert_eq!(props.warmup_count, 12);
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let mut props = SampleProperties::default();
        props.set("jvm", "17");
        assert_eq!(props.extra.get("jvm").map(String::as_str), Some("17"));
    }
}
