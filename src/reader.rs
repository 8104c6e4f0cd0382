//! Chunked line reader for route-metrics logs.
//!
//! The reader pulls raw byte chunks from any [`AsyncRead`] source and yields
//! complete lines, carrying unterminated fragments across chunk boundaries.
//! The sequence ends with an explicit [`ReadEvent::End`] marker so callers can
//! tell the end of the stream apart from an empty line.
use std::collections::VecDeque;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ProcessError;

/// Default number of bytes requested from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
/// Record separator.
const LINE_SEPARATOR: u8 = b'\n';
/// Stripped from the end of a line so CRLF logs read like LF logs.
const CARRIAGE_RETURN: u8 = b'\r';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    Line(String),
    End,
}

pub struct LineReader<R> {
    source: R,
    chunk: Vec<u8>,
    carry: Vec<u8>,
    pending: VecDeque<String>,
    bytes_read: u64,
    finished: bool,
}

impl LineReader<tokio::fs::File> {
    /// Opens a log file for line-by-line reading.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub async fn open(path: &Path) -> Result<Self, ProcessError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| ProcessError::Open {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self::new(file))
    }
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    /// Creates a reader that requests at most `chunk_size` bytes per read.
    /// A zero chunk size is treated as one byte.
    #[must_use]
    pub fn with_chunk_size(source: R, chunk_size: usize) -> Self {
        Self {
            source,
            chunk: vec![0; chunk_size.max(1)],
            carry: Vec::new(),
            pending: VecDeque::new(),
            bytes_read: 0,
            finished: false,
        }
    }

    /// Total bytes consumed from the source so far. Final once
    /// [`ReadEvent::End`] has been returned.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished && self.pending.is_empty()
    }

    /// Returns the next line, or [`ReadEvent::End`] once the source is
    /// exhausted. Calls after the end keep returning [`ReadEvent::End`].
    ///
    /// # Errors
    ///
    /// Returns an error when reading from the source fails.
    pub async fn next_event(&mut self) -> Result<ReadEvent, ProcessError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(ReadEvent::Line(line));
            }
            if self.finished {
                return Ok(ReadEvent::End);
            }

            let read = self
                .source
                .read(&mut self.chunk)
                .await
                .map_err(|err| ProcessError::Io {
                    context: "read log chunk",
                    source: err,
                })?;
            if read == 0 {
                self.finished = true;
                if !self.carry.is_empty() {
                    let tail = std::mem::take(&mut self.carry);
                    self.pending.push_back(decode_line(tail));
                }
                continue;
            }

            self.bytes_read = self
                .bytes_read
                .saturating_add(u64::try_from(read).unwrap_or(u64::MAX));
            let chunk = self.chunk.get(..read).unwrap_or_default();
            split_chunk(chunk, &mut self.carry, &mut self.pending);
        }
    }
}

/// Emits every separator-terminated line in `chunk`, prefixing the first
/// with the carried fragment, and leaves the unterminated tail in `carry`.
fn split_chunk(chunk: &[u8], carry: &mut Vec<u8>, pending: &mut VecDeque<String>) {
    let mut start = 0usize;
    for (idx, _) in chunk
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == LINE_SEPARATOR)
    {
        let segment = chunk.get(start..idx).unwrap_or_default();
        let line = if carry.is_empty() {
            segment.to_vec()
        } else {
            carry.extend_from_slice(segment);
            std::mem::take(carry)
        };
        pending.push_back(decode_line(line));
        start = idx.saturating_add(1);
    }
    carry.extend_from_slice(chunk.get(start..).unwrap_or_default());
}

fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&CARRIAGE_RETURN) {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
