//! Session codes.
//!
//! A session code packs a course id, the parallel section number and the twin parity
//! into one integer: `100 * subject + 10 * class_number + parity`. The empty cell of a
//! chromosome is `0` and never decodes to a code.

use std::fmt;

/// A decoded, non-zero session code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionCode(u32);

impl SessionCode {
    /// Packs a subject id, a 1-based class number (1..=9) and a parity (1 or 2).
    pub fn new(subject: u32, class_number: u32, parity: u32) -> Self {
        debug_assert!((1..=9).contains(&class_number));
        debug_assert!(parity == 1 || parity == 2);
        Self(100 * subject + 10 * class_number + parity)
    }

    /// Interprets a raw grid cell. Returns `None` for the empty cell.
    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn subject(self) -> u32 {
        self.0 / 100
    }

    pub fn class_number(self) -> u32 {
        (self.0 % 100) / 10
    }

    pub fn parity(self) -> u32 {
        self.0 % 10
    }

    /// The paired weekly occurrence of the same section (parity flipped).
    ///
    /// Whether the twin actually exists depends on the course credits; callers
    /// look it up in the grid.
    pub fn twin(self) -> Self {
        if self.parity() == 1 {
            Self(self.0 + 1)
        } else {
            Self(self.0 - 1)
        }
    }

    /// Whether both codes belong to the same section of the same course.
    pub fn same_section(self, other: SessionCode) -> bool {
        self.0 / 10 == other.0 / 10
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
