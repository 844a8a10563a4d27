use std::io::{BufRead, ErrorKind};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BoundedLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    LineTooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    IoError {
        line_number: usize,
    },
}

/// Splits a byte stream on `\n` without ever buffering more than
/// `max_line_bytes` of a single line.
///
/// Oversized lines are consumed and reported as [`BoundedLine::LineTooLong`];
/// iteration continues with the next line. A read error ends the stream.
pub struct BoundedLineReader<R: BufRead> {
    reader: R,
    max_line_bytes: usize,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> BoundedLineReader<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            max_line_bytes,
            line_number: 0,
            done: false,
        }
    }

    fn next_line_number(&mut self) -> usize {
        self.line_number += 1;
        self.line_number
    }
}

impl<R: BufRead> Iterator for BoundedLineReader<R> {
    type Item = BoundedLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut bytes = Vec::new();
        let mut observed_bytes = 0usize;
        let mut too_long = false;
        let mut started = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(_) => {
                    self.done = true;
                    let line_number = self.next_line_number();
                    return Some(BoundedLine::IoError { line_number });
                }
            };

            if available.is_empty() {
                self.done = true;
                if !started {
                    return None;
                }
                break;
            }
            started = true;

            let newline = available.iter().position(|b| *b == b'\n');
            let segment_len = newline.unwrap_or(available.len());
            observed_bytes = observed_bytes.saturating_add(segment_len);
            if observed_bytes > self.max_line_bytes {
                if !too_long {
                    too_long = true;
                    bytes = Vec::new();
                }
            } else {
                bytes.extend_from_slice(&available[..segment_len]);
            }

            let consumed = segment_len + usize::from(newline.is_some());
            self.reader.consume(consumed);
            if newline.is_some() {
                break;
            }
        }

        let line_number = self.next_line_number();
        if too_long {
            Some(BoundedLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes: self.max_line_bytes,
            })
        } else {
            Some(BoundedLine::Line { line_number, bytes })
        }
    }
}
