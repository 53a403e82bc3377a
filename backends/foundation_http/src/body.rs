//! Rewindable request body.

use crate::errors::{ServerRequestError, ServerRequestResult};
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

/// In-memory copy of a read-once input stream.
///
/// The source is drained completely before the value exists, so callers
/// never observe a partially read body. Reads start at offset 0 and the
/// body can be rewound or seeked freely afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferedBody {
    cursor: Cursor<Vec<u8>>,
}

impl BufferedBody {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self {
            cursor: Cursor::new(bytes.into()),
        }
    }

    /// Copies all of `input` into memory and positions the copy at offset 0.
    ///
    /// # Errors
    ///
    /// Returns `BodyReadFailed` if reading fails and `BodyTooLarge` if more
    /// than `limit` bytes arrive.
    pub fn drain<R: Read>(input: R, limit: Option<usize>) -> ServerRequestResult<Self> {
        let mut buffer = Vec::new();

        match limit {
            Some(limit) => {
                let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
                input.take(cap).read_to_end(&mut buffer)?;
                if buffer.len() > limit {
                    error!("request body exceeds limit of {} bytes", limit);
                    return Err(ServerRequestError::BodyTooLarge(limit));
                }
            }
            None => {
                let mut input = input;
                input.read_to_end(&mut buffer)?;
            }
        }

        debug!("drained {} body bytes", buffer.len());
        Ok(Self::from_bytes(buffer))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// The whole body, independent of the read position.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn rewind(&mut self) {
        self.cursor.set_position(0);
    }
}

impl Read for BufferedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl BufRead for BufferedBody {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.cursor.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.cursor.consume(amt);
    }
}

impl Seek for BufferedBody {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}
