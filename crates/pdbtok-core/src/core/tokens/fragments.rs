use crate::core::models::residue::Residue;
use std::iter::FusedIterator;
use thiserror::Error;

/// Shortest fragment that still yields one residue pair.
pub const MIN_USABLE_LEN: usize = 2;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BoundsError {
    #[error("min_len: {min_len} must be smaller than max_len: {max_len}")]
    NotIncreasing { min_len: usize, max_len: usize },
    #[error("min_len: {min_len} must be at least {} to form a residue pair", MIN_USABLE_LEN)]
    TooShort { min_len: usize },
}

/// Fragment sizes to generate: `min_len` inclusive, `max_len` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowBounds {
    min_len: usize,
    max_len: usize,
}

impl WindowBounds {
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, BoundsError> {
        if min_len >= max_len {
            return Err(BoundsError::NotIncreasing { min_len, max_len });
        }
        if min_len < MIN_USABLE_LEN {
            return Err(BoundsError::TooShort { min_len });
        }
        Ok(Self { min_len, max_len })
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// `"<min_len>_<max_len>"`, the prefix shared by every file of this configuration.
    pub fn file_prefix(&self) -> String {
        format!("{}_{}", self.min_len, self.max_len)
    }

    /// Number of fragments generated from a sequence of `n_residues`.
    pub fn expected_count(&self, n_residues: usize) -> usize {
        (self.min_len..self.max_len)
            .map(|size| (n_residues + 1).saturating_sub(size))
            .sum()
    }
}

/// Produces contiguous residue windows for a fixed set of window bounds.
#[derive(Debug, Clone, Copy)]
pub struct FragmentGenerator {
    bounds: WindowBounds,
}

impl FragmentGenerator {
    pub fn new(bounds: WindowBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> WindowBounds {
        self.bounds
    }

    /// Every window of every size in the bounds, smallest size first, then by start.
    pub fn fragments<'a>(&self, residues: &'a [Residue]) -> Fragments<'a> {
        Fragments {
            residues,
            size: self.bounds.min_len,
            start: 0,
            max_len: self.bounds.max_len,
        }
    }

    /// The whole sequence as a single fragment, regardless of bounds.
    pub fn whole<'a>(&self, residues: &'a [Residue]) -> std::iter::Once<&'a [Residue]> {
        std::iter::once(residues)
    }
}

/// Lazy iterator over the windows of a residue sequence.
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    residues: &'a [Residue],
    size: usize,
    start: usize,
    max_len: usize,
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a [Residue];

    fn next(&mut self) -> Option<Self::Item> {
        while self.size < self.max_len && self.size <= self.residues.len() {
            let end = self.start + self.size;
            if end <= self.residues.len() {
                let window = &self.residues[self.start..end];
                self.start += 1;
                return Some(window);
            }
            self.size += 1;
            self.start = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.residues.len();
        if self.size >= self.max_len || self.size > n {
            return (0, Some(0));
        }
        let current = (n + 1 - self.size).saturating_sub(self.start);
        let larger: usize = (self.size + 1..self.max_len)
            .map(|size| (n + 1).saturating_sub(size))
            .sum();
        let remaining = current + larger;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fragments<'_> {}

impl FusedIterator for Fragments<'_> {}
