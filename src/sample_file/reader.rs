// Forward-only sample file decoder
//
// The header is parsed eagerly by `new`; samples are pulled one line at a time
// so large files never need to be held in memory twice.

use super::{SampleProperties, BEGIN_SAMPLES, END_SAMPLES};
use crate::cancel::CancellationToken;
use crate::error::SampleFileError;
use std::io::BufRead;

type Result<T> = std::result::Result<T, SampleFileError>;

/// Upper bound on the capacity reserved from a declared sample count
const MAX_RESERVED_SAMPLES: usize = 1 << 16;

/// Streaming reader over one sample file
///
/// # Example
/// ```
/// use perflogic::sample_file::SampleFileReader;
///
/// let data = "# test-id\n# date=2020-01-01\nBEGIN-SAMPLES\n1.0\n2.0\n3.0\nEND-SAMPLES\n";
/// let mut reader = SampleFileReader::new(data.as_bytes()).unwrap();
///
/// assert_eq!(reader.identification(), "test-id");
/// assert_eq!(reader.read_all(2.0).unwrap(), vec![2.0, 4.0, 6.0]);
/// ```
pub struct SampleFileReader<R> {
    input: R,
    identification: String,
    properties: SampleProperties,
    line_number: usize,
    buffer: String,
    /// Next decoded sample, filled by `has_next`
    pending: Option<Result<f64>>,
    finished: bool,
    cancel: Option<CancellationToken>,
}

impl<R: BufRead> SampleFileReader<R> {
    /// Parse the identification and property lines
    ///
    /// Stops after the begin marker. A stream that ends inside the header
    /// yields a reader with no samples.
    pub fn new(input: R) -> Result<Self> {
        let mut reader = Self {
            input,
            identification: String::new(),
            properties: SampleProperties::default(),
            line_number: 0,
            buffer: String::new(),
            pending: None,
            finished: false,
            cancel: None,
        };
        reader.read_header()?;
        Ok(reader)
    }

    /// Poll `token` before every line read; a cancelled token ends the read
    /// with `SampleFileError::Aborted`
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn identification(&self) -> &str {
        &self.identification
    }

    pub fn properties(&self) -> &SampleProperties {
        &self.properties
    }

    /// Read one raw line into the buffer; false at end of stream
    fn read_line(&mut self) -> Result<bool> {
        if let Some(token) = &self.cancel {
            if token.is_cancelled() {
                return Err(SampleFileError::Aborted);
            }
        }
        self.buffer.clear();
        let n = self.input.read_line(&mut self.buffer)?;
        if n == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn read_header(&mut self) -> Result<()> {
        if !self.read_line()? {
            return Err(SampleFileError::MissingIdentification);
        }
        let first = self.buffer.trim();
        let Some(identification) = first.strip_prefix('#') else {
            return Err(SampleFileError::MissingIdentification);
        };
        self.identification = identification.trim().to_string();

        loop {
            if !self.read_line()? {
                self.finished = true;
                return Ok(());
            }
            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }
            if line == BEGIN_SAMPLES {
                return Ok(());
            }
            if line == END_SAMPLES {
                self.finished = true;
                return Ok(());
            }

            let Some(body) = line.strip_prefix('#') else {
                // Data before the begin marker
                return Err(SampleFileError::MalformedSample {
                    line: self.line_number,
                    content: line.to_string(),
                });
            };
            if let Some((key, value)) = body.split_once('=') {
                let (key, value) = (key.trim().to_string(), value.trim().to_string());
                self.properties.set(&key, &value);
            }
        }
    }

    /// Decode the next sample line into `pending`
    fn advance(&mut self) {
        while !self.finished {
            match self.read_line() {
                Err(e) => {
                    self.finished = true;
                    self.pending = Some(Err(e));
                    return;
                }
                Ok(false) => {
                    self.finished = true;
                    return;
                }
                Ok(true) => {}
            }

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }
            if line == END_SAMPLES {
                self.finished = true;
                return;
            }

            self.pending = Some(match line.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(SampleFileError::MalformedSample {
                    line: self.line_number,
                    content: line.to_string(),
                }),
            });
            return;
        }
    }

    /// True if another sample (or a read error for it) is available
    pub fn has_next(&mut self) -> bool {
        if self.pending.is_none() {
            self.advance();
        }
        self.pending.is_some()
    }

    /// Next sample; reading past the end is an `UnexpectedEof` IO error
    pub fn next_sample(&mut self) -> Result<f64> {
        if self.pending.is_none() {
            self.advance();
        }
        self.pending.take().unwrap_or_else(|| {
            Err(SampleFileError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no more samples",
            )))
        })
    }

    /// Read every remaining sample, multiplying each by `scale`
    pub fn read_all(&mut self, scale: f64) -> Result<Vec<f64>> {
        // The declared count comes from the file and is only a hint
        let declared = usize::try_from(self.properties.sample_count).unwrap_or(0);
        let mut samples = Vec::with_capacity(declared.min(MAX_RESERVED_SAMPLES));
        while self.has_next() {
            samples.push(self.next_sample()? * scale);
        }
        Ok(samples)
    }
}

impl<R: BufRead> Iterator for SampleFileReader<R> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            self.pending.take()
        } else {
            None
        }
    }
}
