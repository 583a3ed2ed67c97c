use super::list::{RotationError, RotationList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Showing,
    /// Current entry is fading out; `next` is swapped in when the fade ends.
    FadingOut { next: usize },
}

/// Cursor over a rotation list of fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotator {
    len: usize,
    cursor: usize,
    phase: Phase,
}

impl Rotator {
    pub fn new(len: usize) -> Result<Self, RotationError> {
        if len == 0 {
            return Err(RotationError::Empty);
        }
        Ok(Self {
            len,
            cursor: 0,
            phase: Phase::Showing,
        })
    }

    pub fn for_list<T>(list: &RotationList<T>) -> Self {
        Self {
            len: list.len(),
            cursor: 0,
            phase: Phase::Showing,
        }
    }

    pub fn current(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Showing
    }

    /// Starts fading out toward the following entry (wrapping). Returns it.
    /// A fade already in flight keeps its target.
    pub fn begin_fade(&mut self) -> usize {
        match self.phase {
            Phase::FadingOut { next } => next,
            Phase::Showing => {
                let next = (self.cursor + 1) % self.len;
                self.phase = Phase::FadingOut { next };
                next
            }
        }
    }

    /// Swaps in the fade target and shows it. No-op when not fading.
    pub fn finish_fade(&mut self) {
        if let Phase::FadingOut { next } = self.phase {
            self.cursor = next;
            self.phase = Phase::Showing;
        }
    }

    /// One full tick: fade out, swap, show.
    pub fn advance(&mut self) -> usize {
        self.begin_fade();
        self.finish_fade();
        self.cursor
    }

    /// Jumps straight to `index`, cancelling any in-flight fade.
    pub fn select(&mut self, index: usize) -> Result<(), RotationError> {
        if index >= self.len {
            return Err(RotationError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.cursor = index;
        self.phase = Phase::Showing;
        Ok(())
    }
}
