//! Large object (LOB) types
//!
//! This module provides the client-side handles for CLOB, NCLOB and BLOB
//! values. The engine hands LOB content to the client fully materialised, so
//! every handle owns its data; positions follow SQL convention and start at 1.

use std::io::Cursor;
use std::ops::{Deref, DerefMut};

use bytes::Bytes;

use crate::error::{Error, Result};

fn freed() -> Error {
    Error::InvalidArgument("LOB has been freed".to_string())
}

/// Validate a 1-based position against a LOB of `len` units.
///
/// A position one past the end is allowed for writes that append.
fn check_position(pos: u64, len: u64) -> Result<usize> {
    if pos < 1 || pos > len + 1 {
        return Err(Error::InvalidArgument(format!(
            "LOB position out of range: {} (length {})",
            pos, len
        )));
    }
    Ok((pos - 1) as usize)
}

/// Character large object
///
/// Lengths and positions are counted in characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clob {
    data: String,
    freed: bool,
}

impl Clob {
    /// Create a CLOB holding `data`
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            freed: false,
        }
    }

    fn data(&self) -> Result<&str> {
        if self.freed {
            return Err(freed());
        }
        Ok(&self.data)
    }

    /// Number of characters in the CLOB
    pub fn length(&self) -> Result<u64> {
        Ok(self.data()?.chars().count() as u64)
    }

    /// Read up to `length` characters starting at 1-based `pos`
    pub fn sub_string(&self, pos: u64, length: usize) -> Result<String> {
        let data = self.data()?;
        let start = check_position(pos, data.chars().count() as u64)?;
        Ok(data.chars().skip(start).take(length).collect())
    }

    /// Find `pattern` at or after 1-based `start`; returns its 1-based position
    pub fn position(&self, pattern: &str, start: u64) -> Result<Option<u64>> {
        let data = self.data()?;
        let skip = check_position(start, data.chars().count() as u64)?;
        let byte_start = match data.char_indices().nth(skip) {
            Some((i, _)) => i,
            None => return Ok(None),
        };
        Ok(data[byte_start..]
            .find(pattern)
            .map(|i| (skip + data[byte_start..byte_start + i].chars().count() + 1) as u64))
    }

    /// Find another CLOB's content at or after 1-based `start`
    pub fn position_of(&self, pattern: &Clob, start: u64) -> Result<Option<u64>> {
        self.position(pattern.data()?, start)
    }

    /// Overwrite characters starting at 1-based `pos`, extending the CLOB as needed.
    ///
    /// Returns the number of characters written.
    pub fn set_string(&mut self, pos: u64, value: &str) -> Result<usize> {
        let current = self.data()?;
        let start = check_position(pos, current.chars().count() as u64)?;
        let written = value.chars().count();

        let mut result: String = current.chars().take(start).collect();
        result.push_str(value);
        result.extend(current.chars().skip(start + written));
        self.data = result;
        Ok(written)
    }

    /// Cut the CLOB down to `length` characters
    pub fn truncate(&mut self, length: u64) -> Result<()> {
        let current = self.data()?;
        let count = current.chars().count() as u64;
        if length > count {
            return Err(Error::InvalidArgument(format!(
                "truncate length {} exceeds CLOB length {}",
                length, count
            )));
        }
        self.data = current.chars().take(length as usize).collect();
        Ok(())
    }

    /// Stream over the UTF-8 encoding of the content
    pub fn character_stream(&self) -> Result<Cursor<Bytes>> {
        Ok(Cursor::new(Bytes::copy_from_slice(self.data()?.as_bytes())))
    }

    /// Stream over `length` characters starting at 1-based `pos`
    pub fn character_stream_at(&self, pos: u64, length: usize) -> Result<Cursor<Bytes>> {
        Ok(Cursor::new(Bytes::from(self.sub_string(pos, length)?)))
    }

    /// Whole content as a string slice
    pub fn as_str(&self) -> Result<&str> {
        self.data()
    }

    /// Release the content; every later call fails
    pub fn free(&mut self) {
        self.data = String::new();
        self.freed = true;
    }

    /// Check if [`free`](Self::free) was called
    pub fn is_freed(&self) -> bool {
        self.freed
    }
}

impl From<String> for Clob {
    fn from(data: String) -> Self {
        Clob::new(data)
    }
}

impl From<&str> for Clob {
    fn from(data: &str) -> Self {
        Clob::new(data)
    }
}

/// National character large object
///
/// The engine stores all character data in Unicode, so an NCLOB behaves
/// exactly like a [`Clob`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NClob(Clob);

impl NClob {
    /// Create an NCLOB holding `data`
    pub fn new(data: impl Into<String>) -> Self {
        NClob(Clob::new(data))
    }

    /// Unwrap into the underlying CLOB
    pub fn into_clob(self) -> Clob {
        self.0
    }
}

impl Deref for NClob {
    type Target = Clob;

    fn deref(&self) -> &Clob {
        &self.0
    }
}

impl DerefMut for NClob {
    fn deref_mut(&mut self) -> &mut Clob {
        &mut self.0
    }
}

impl From<Clob> for NClob {
    fn from(clob: Clob) -> Self {
        NClob(clob)
    }
}

impl From<NClob> for Clob {
    fn from(nclob: NClob) -> Self {
        nclob.0
    }
}

/// Binary large object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blob {
    data: Vec<u8>,
    freed: bool,
}

impl Blob {
    /// Create a BLOB holding `data`
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            freed: false,
        }
    }

    fn data(&self) -> Result<&[u8]> {
        if self.freed {
            return Err(freed());
        }
        Ok(&self.data)
    }

    /// Number of bytes in the BLOB
    pub fn length(&self) -> Result<u64> {
        Ok(self.data()?.len() as u64)
    }

    /// Read up to `length` bytes starting at 1-based `pos`
    pub fn get_bytes(&self, pos: u64, length: usize) -> Result<Vec<u8>> {
        let data = self.data()?;
        let start = check_position(pos, data.len() as u64)?;
        let end = start.saturating_add(length).min(data.len());
        Ok(data[start..end].to_vec())
    }

    /// Find `pattern` at or after 1-based `start`; returns its 1-based position
    pub fn position(&self, pattern: &[u8], start: u64) -> Result<Option<u64>> {
        let data = self.data()?;
        let skip = check_position(start, data.len() as u64)?;
        if pattern.is_empty() {
            return Ok(Some(start));
        }
        Ok(data[skip..]
            .windows(pattern.len())
            .position(|w| w == pattern)
            .map(|i| (skip + i + 1) as u64))
    }

    /// Find another BLOB's content at or after 1-based `start`
    pub fn position_of(&self, pattern: &Blob, start: u64) -> Result<Option<u64>> {
        self.position(pattern.data()?, start)
    }

    /// Overwrite bytes starting at 1-based `pos`, extending the BLOB as needed.
    ///
    /// Returns the number of bytes written.
    pub fn set_bytes(&mut self, pos: u64, value: &[u8]) -> Result<usize> {
        let start = check_position(pos, self.data()?.len() as u64)?;
        let end = start + value.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(value);
        Ok(value.len())
    }

    /// Cut the BLOB down to `length` bytes
    pub fn truncate(&mut self, length: u64) -> Result<()> {
        let count = self.data()?.len() as u64;
        if length > count {
            return Err(Error::InvalidArgument(format!(
                "truncate length {} exceeds BLOB length {}",
                length, count
            )));
        }
        self.data.truncate(length as usize);
        Ok(())
    }

    /// Stream over the content
    pub fn binary_stream(&self) -> Result<Cursor<Bytes>> {
        Ok(Cursor::new(Bytes::copy_from_slice(self.data()?)))
    }

    /// Stream over `length` bytes starting at 1-based `pos`
    pub fn binary_stream_at(&self, pos: u64, length: usize) -> Result<Cursor<Bytes>> {
        Ok(Cursor::new(Bytes::from(self.get_bytes(pos, length)?)))
    }

    /// Whole content as a byte slice
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.data()
    }

    /// Release the content; every later call fails
    pub fn free(&mut self) {
        self.data = Vec::new();
        self.freed = true;
    }

    /// Check if [`free`](Self::free) was called
    pub fn is_freed(&self) -> bool {
        self.freed
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Blob::new(data)
    }
}

impl From<&[u8]> for Blob {
    fn from(data: &[u8]) -> Self {
        Blob::new(data)
    }
}
