//! Fixed-size chunking for large record lists
//!
//! Profiles can carry thousands of permission entries. Parsers hand them out
//! in bounded chunks so callers can stream or report per batch; consumers
//! that need the whole list call [`Chunked::flatten`].

use crate::error::{Result, SfmetaError};
use serde::{Deserialize, Serialize};

/// Default number of items per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// A list split into consecutive chunks of at most `chunk_size` items.
///
/// Every chunk except the last holds exactly `chunk_size` items, and the
/// concatenation of all chunks equals the original list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunked<T> {
    chunk_size: usize,
    chunks: Vec<Vec<T>>,
}

impl<T> Chunked<T> {
    /// Split `items` into chunks of `chunk_size`
    pub fn new(items: Vec<T>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SfmetaError::InvalidChunkSize(chunk_size));
        }

        let mut chunks = Vec::with_capacity(items.len().div_ceil(chunk_size));
        let mut current = Vec::with_capacity(chunk_size.min(items.len()));

        for item in items {
            current.push(item);
            if current.len() == chunk_size {
                chunks.push(std::mem::replace(&mut current, Vec::with_capacity(chunk_size)));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        Ok(Self { chunk_size, chunks })
    }

    /// An empty list with the default chunk size
    pub fn empty() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunks: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks(&self) -> &[Vec<T>] {
        &self.chunks
    }

    /// Total number of items across all chunks
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over every item in original order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.chunks.iter().flatten()
    }

    /// Concatenate all chunks back into one list
    pub fn flatten(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn into_flat(self) -> Vec<T> {
        self.chunks.into_iter().flatten().collect()
    }
}

impl<T> Default for Chunked<T> {
    fn default() -> Self {
        Self::empty()
    }
}
