use std::collections::VecDeque;
use std::io::{self, Read};

/// A reader that can rewind to a marked position.
///
/// Bytes read after [`mark`](MarkReader::mark) are recorded up to the
/// limit; [`reset`](MarkReader::reset) replays them. Reading past the limit
/// drops the mark.
#[derive(Debug)]
pub struct MarkReader<R> {
    inner: R,
    replay: VecDeque<u8>,
    recording: Option<Vec<u8>>,
    limit: usize,
}

impl<R: Read> MarkReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            replay: VecDeque::new(),
            recording: None,
            limit: 0,
        }
    }

    pub fn mark(&mut self, limit: usize) {
        self.recording = Some(Vec::new());
        self.limit = limit;
    }

    /// Rewind to the mark. Returns `false` if there is no valid mark.
    pub fn reset(&mut self) -> bool {
        match self.recording.take() {
            Some(recorded) => {
                for byte in recorded.into_iter().rev() {
                    self.replay.push_front(byte);
                }
                true
            }
            None => false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn record(&mut self, bytes: &[u8]) {
        if let Some(recorded) = &mut self.recording {
            if recorded.len() + bytes.len() > self.limit {
                self.recording = None;
            } else {
                recorded.extend_from_slice(bytes);
            }
        }
    }
}

impl<R: Read> Read for MarkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let n = if self.replay.is_empty() {
            self.inner.read(buf)?
        } else {
            let mut n = 0;
            while n < buf.len() {
                match self.replay.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            n
        };
        self.record(&buf[..n]);
        Ok(n)
    }
}
