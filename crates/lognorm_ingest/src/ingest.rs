use std::io::BufRead;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{CaptureRaw, IngestConfig};
use crate::error::{LineRecord, LineRecordError};
use crate::normalizer::LineNormalizer;
use crate::reader::{BoundedLine, BoundedLineReader};

/// Running counters for a [`LineIngestor`].
///
/// Every line read is counted in `lines` and in exactly one of the others.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct IngestSummary {
    pub lines: usize,
    pub normalized: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Feeds a line-oriented reader through a [`LineNormalizer`].
///
/// Yields one record per normalized or failed line; blank lines and lines
/// the normalizer maps to `None` are skipped. A read error is reported once
/// and ends iteration.
pub struct LineIngestor<R: BufRead, N: LineNormalizer> {
    reader: BoundedLineReader<R>,
    normalizer: N,
    config: IngestConfig,
    summary: IngestSummary,
}

impl<R: BufRead, N: LineNormalizer> LineIngestor<R, N> {
    pub fn new(reader: R, normalizer: N, config: IngestConfig) -> Self {
        Self {
            reader: BoundedLineReader::new(reader, config.limits.max_line_bytes),
            normalizer,
            config,
            summary: IngestSummary::default(),
        }
    }

    pub fn summary(&self) -> IngestSummary {
        self.summary
    }

    pub fn into_normalizer(self) -> N {
        self.normalizer
    }

    fn record_error<T>(&mut self, line_number: usize, err: LineRecordError) -> LineRecord<T> {
        self.summary.failed += 1;
        LineRecord {
            line_number,
            raw: None,
            outcome: Err(err),
        }
    }

    fn trim_line(line: &str) -> &str {
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn line_is_blank(line: &str) -> bool {
        line.chars().all(|ch| ch.is_whitespace())
    }
}

impl<R: BufRead, N: LineNormalizer> Iterator for LineIngestor<R, N> {
    type Item = LineRecord<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.reader.next()?;
            self.summary.lines += 1;
            match next {
                BoundedLine::IoError { line_number } => {
                    warn!(line_number, "read error, stopping ingestion");
                    return Some(self.record_error(line_number, LineRecordError::Io));
                }
                BoundedLine::LineTooLong {
                    line_number,
                    observed_bytes,
                    max_line_bytes,
                } => {
                    warn!(line_number, observed_bytes, max_line_bytes, "line too long, discarded");
                    return Some(self.record_error(
                        line_number,
                        LineRecordError::LineTooLong {
                            observed_bytes,
                            max_line_bytes,
                        },
                    ));
                }
                BoundedLine::Line { line_number, bytes } => {
                    let Ok(raw_line) = String::from_utf8(bytes) else {
                        return Some(self.record_error(line_number, LineRecordError::InvalidUtf8));
                    };
                    let line = Self::trim_line(&raw_line);
                    if Self::line_is_blank(line) {
                        self.summary.skipped += 1;
                        continue;
                    }

                    match self.normalizer.normalize_line(line, self.config.strip) {
                        Ok(None) => {
                            self.summary.skipped += 1;
                            continue;
                        }
                        Ok(Some(fields)) => {
                            self.summary.normalized += 1;
                            let raw = (self.config.capture_raw == CaptureRaw::Line)
                                .then(|| line.to_string());
                            return Some(LineRecord {
                                line_number,
                                raw,
                                outcome: Ok(fields),
                            });
                        }
                        Err(err) => {
                            debug!(line_number, kind = ?err.kind(), error = %err, "line failed to normalize");
                            let raw = (self.config.capture_raw == CaptureRaw::Line)
                                .then(|| line.to_string());
                            let mut record = self.record_error(line_number, err.into());
                            record.raw = raw;
                            return Some(record);
                        }
                    }
                }
            }
        }
    }
}
