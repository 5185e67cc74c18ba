// Sample file encoder
//
// Floats use Rust's shortest round-trip formatting, so decoding an encoded
// file reproduces every sample bit for bit.

use super::{
    SampleProperties, BEGIN_SAMPLES, END_SAMPLES, KEY_DATE, KEY_SAMPLES, KEY_WARMUP, UNKNOWN,
};
use std::io::{self, Write};

/// Writes sample files readable by [`super::SampleFileReader`]
pub struct SampleFileWriter;

impl SampleFileWriter {
    /// Encode one complete sample file
    ///
    /// Counts equal to [`UNKNOWN`] and an absent date are omitted.
    pub fn write<W: Write>(
        out: &mut W,
        identification: &str,
        properties: &SampleProperties,
        samples: &[f64],
    ) -> io::Result<()> {
        writeln!(out, "# {}", identification)?;
        if let Some(date) = &properties.date {
            writeln!(out, "# {}={}", KEY_DATE, date)?;
        }
        if properties.sample_count != UNKNOWN {
            writeln!(out, "# {}={}", KEY_SAMPLES, properties.sample_count)?;
        }
        if properties.warmup_count != UNKNOWN {
            writeln!(out, "# {}={}", KEY_WARMUP, properties.warmup_count)?;
        }
        for (key, value) in &properties.extra {
            writeln!(out, "# {}={}", key, value)?;
        }

        writeln!(out, "{}", BEGIN_SAMPLES)?;
        for sample in samples {
            writeln!(out, "{}", sample)?;
        }
        writeln!(out, "{}", END_SAMPLES)?;
        out.flush()
    }

    /// Encode into an in-memory string
    pub fn encode_to_string(
        identification: &str,
        properties: &SampleProperties,
        samples: &[f64],
    ) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = Self::write(&mut buf, identification, properties, samples);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_file::SampleFileReader;

    #[test]
    fn test_write_layout() {
        let props = SampleProperties {
            date: Some("2020-01-01".to_string()),
            sample_count: 2,
            ..Default::default()
        };

        let text = SampleFileWriter::encode_to_string("test-id", &props, &[1.5, 2.0]);

        assert_eq!(
            text,
            "# test-id\n# date=2020-01-01\n# samples=2\nBEGIN-SAMPLES\n1.5\n2\nEND-SAMPLES\n"
        );
    }

    #[test]
    fn test_round_trip_awkward_floats() {
        let samples = vec![0.1 + 0.2, 1e-300, 123456789.123456789, -0.0, 5e21];
        let mut props = SampleProperties {
            warmup_count: 7,
            ..Default::default()
        };
        props.extra.insert("jvm".to_string(), "17".to_string());

        let text = SampleFileWriter::encode_to_string("id", &props, &samples);
        let mut reader = SampleFileReader::new(text.as_bytes()).unwrap();

        assert_eq!(reader.properties(), &props);
        let decoded = reader.read_all(1.0).unwrap();
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in decoded.iter().zip(&samples) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
