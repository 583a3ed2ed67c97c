use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RotationError {
    #[error("rotation list must contain at least one entry")]
    Empty,

    #[error("display interval ({display:?}) must be longer than the fade ({fade:?})")]
    FadeTooLong { display: Duration, fade: Duration },

    #[error("entry {index} is out of range for a list of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Headline and supporting line, as used by the hero banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPair {
    pub headline: String,
    pub subline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
    pub company: String,
}

/// Ordered, non-empty, immutable sequence of display entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationList<T> {
    entries: Vec<T>,
}

impl<T> RotationList<T> {
    pub fn new(entries: Vec<T>) -> Result<Self, RotationError> {
        if entries.is_empty() {
            return Err(RotationError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Entry at `index`, wrapping past the end. Never fails on a non-empty list.
    pub fn entry(&self, index: usize) -> &T {
        &self.entries[index % self.entries.len()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

/// How long each entry stays up, and how long the fade between entries takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationTiming {
    display: Duration,
    fade: Duration,
}

impl Default for RotationTiming {
    fn default() -> Self {
        Self {
            display: Duration::from_secs(5),
            fade: Duration::from_millis(500),
        }
    }
}

impl RotationTiming {
    pub fn new(display: Duration, fade: Duration) -> Result<Self, RotationError> {
        if display <= fade {
            return Err(RotationError::FadeTooLong { display, fade });
        }
        Ok(Self { display, fade })
    }

    pub fn display(&self) -> Duration {
        self.display
    }

    pub fn fade(&self) -> Duration {
        self.fade
    }
}
