#![forbid(unsafe_code)]
//! Line-oriented normalization of log streams.
//!
//! [`LineIngestor`] reads a stream with bounded memory per line, hands each
//! non-blank line to a [`LineNormalizer`] (any [`lognorm::Context`]), and
//! yields one [`LineRecord`] per normalized or failed line. Failures are
//! reported per line and never end the stream, except for read errors.
//!
//! ```rust,ignore
//! let context = lognorm::Lognorm::builder().rulebase("rules.rb").build()?;
//! let input = std::io::BufReader::new(std::fs::File::open("app.log")?);
//! let mut ingestor = lognorm_ingest::LineIngestor::new(input, context, Default::default());
//! for record in &mut ingestor {
//!     println!("{}: {:?}", record.line_number, record.outcome);
//! }
//! println!("{:?}", ingestor.summary());
//! ```

mod config;
mod error;
mod ingest;
mod normalizer;
mod reader;

pub use config::{CaptureRaw, IngestConfig, IngestLimits};
pub use error::{LineRecord, LineRecordError};
pub use ingest::{IngestSummary, LineIngestor};
pub use normalizer::LineNormalizer;
pub use reader::{BoundedLine, BoundedLineReader};
