//! Per-axis index selectors.
//!
//! A [`Selector`] selects elements along a single axis of an array.
//! A tuple of selectors (one per axis) describes a selection of an N-dimensional array.

use std::fmt::Display;
use std::ops::{Range, RangeFull};

use thiserror::Error;

/// An invalid selector error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector references indices outside of the axis.
    #[error("selector {selector} is out-of-bounds of an axis with length {axis_len}")]
    OutOfBounds {
        /// The offending selector.
        selector: Selector,
        /// The length of the axis.
        axis_len: u64,
    },
    /// A boolean mask does not have the length of the axis.
    #[error("boolean mask has length {got}, expected {expected}")]
    InvalidMaskLength {
        /// The mask length.
        got: u64,
        /// The axis length.
        expected: u64,
    },
    /// A range with an end before its start.
    #[error("invalid range {0:?}: the end is before the start")]
    InvalidRange(Range<u64>),
}

/// An index selector for one axis of an array.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A single integer index. The axis is eliminated by the selection.
    Index(u64),
    /// A contiguous half-open range of indices.
    Range(Range<u64>),
    /// An explicit list of indices, in output order.
    Indices(Vec<u64>),
    /// A boolean mask with one entry per element of the axis.
    Mask(Vec<bool>),
    /// All indices of the axis (a colon).
    All,
}

impl Selector {
    /// Returns true if the selector eliminates its axis (a single integer index).
    #[must_use]
    pub fn eliminates_axis(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Returns the number of selected elements along an axis of length `axis_len`.
    ///
    /// Returns [`None`] if the selector eliminates the axis.
    #[must_use]
    pub fn output_len(&self, axis_len: u64) -> Option<u64> {
        match self {
            Self::Index(_) => None,
            Self::Range(range) => Some(range.end.saturating_sub(range.start)),
            Self::Indices(indices) => Some(indices.len() as u64),
            Self::Mask(mask) => Some(mask.iter().filter(|m| **m).count() as u64),
            Self::All => Some(axis_len),
        }
    }

    /// Validate the selector against an axis of length `axis_len`.
    ///
    /// # Errors
    /// Returns [`SelectorError`] if the selector references out-of-bounds indices, a range is reversed, or a mask has the wrong length.
    pub fn validate(&self, axis_len: u64) -> Result<(), SelectorError> {
        let oob = || SelectorError::OutOfBounds {
            selector: self.clone(),
            axis_len,
        };
        match self {
            Self::Index(index) => (*index < axis_len).then_some(()).ok_or_else(oob),
            Self::Range(range) => {
                if range.end < range.start {
                    Err(SelectorError::InvalidRange(range.clone()))
                } else if range.end > axis_len {
                    Err(oob())
                } else {
                    Ok(())
                }
            }
            Self::Indices(indices) => {
                if indices.iter().all(|index| *index < axis_len) {
                    Ok(())
                } else {
                    Err(oob())
                }
            }
            Self::Mask(mask) => {
                if mask.len() as u64 == axis_len {
                    Ok(())
                } else {
                    Err(SelectorError::InvalidMaskLength {
                        got: mask.len() as u64,
                        expected: axis_len,
                    })
                }
            }
            Self::All => Ok(()),
        }
    }

    /// Returns the selected indices along an axis of length `axis_len`, in output order.
    ///
    /// The selector is not validated, see [`Selector::validate`].
    #[must_use]
    pub fn to_indices(&self, axis_len: u64) -> Vec<u64> {
        match self {
            Self::Index(index) => vec![*index],
            Self::Range(range) => range.clone().collect(),
            Self::Indices(indices) => indices.clone(),
            Self::Mask(mask) => mask
                .iter()
                .enumerate()
                .filter_map(|(i, m)| m.then_some(i as u64))
                .collect(),
            Self::All => (0..axis_len).collect(),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Range(range) => write!(f, "{}..{}", range.start, range.end),
            Self::Indices(indices) => write!(f, "{indices:?}"),
            Self::Mask(mask) => write!(
                f,
                "mask({}/{})",
                mask.iter().filter(|m| **m).count(),
                mask.len()
            ),
            Self::All => write!(f, ".."),
        }
    }
}

impl From<u64> for Selector {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Self::Index(index as u64)
    }
}

impl From<Range<u64>> for Selector {
    fn from(range: Range<u64>) -> Self {
        Self::Range(range)
    }
}

impl From<Range<usize>> for Selector {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range.start as u64..range.end as u64)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

impl From<Vec<u64>> for Selector {
    fn from(indices: Vec<u64>) -> Self {
        Self::Indices(indices)
    }
}

impl From<Vec<usize>> for Selector {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices.into_iter().map(|i| i as u64).collect())
    }
}

impl From<Vec<bool>> for Selector {
    fn from(mask: Vec<bool>) -> Self {
        Self::Mask(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_output_len() {
        assert_eq!(Selector::Index(3).output_len(10), None);
        assert_eq!(Selector::from(2..6u64).output_len(10), Some(4));
        assert_eq!(Selector::from(vec![1u64, 1, 4]).output_len(10), Some(3));
        assert_eq!(
            Selector::from(vec![true, false, true, true]).output_len(4),
            Some(3)
        );
        assert_eq!(Selector::from(..).output_len(10), Some(10));
    }

    #[test]
    fn selector_validate() {
        assert!(Selector::Index(9).validate(10).is_ok());
        assert_eq!(
            Selector::Index(10).validate(10),
            Err(SelectorError::OutOfBounds {
                selector: Selector::Index(10),
                axis_len: 10
            })
        );
        assert!(Selector::from(0..10u64).validate(10).is_ok());
        assert!(Selector::from(0..11u64).validate(10).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = Selector::Range(5..2);
        assert_eq!(
            reversed.validate(10),
            Err(SelectorError::InvalidRange(5..2))
        );
        assert!(Selector::from(vec![0u64, 9]).validate(10).is_ok());
        assert!(Selector::from(vec![0u64, 10]).validate(10).is_err());
        assert_eq!(
            Selector::from(vec![true, false]).validate(3),
            Err(SelectorError::InvalidMaskLength {
                got: 2,
                expected: 3
            })
        );
        assert!(Selector::All.validate(0).is_ok());
    }

    #[test]
    fn selector_to_indices() {
        assert_eq!(Selector::Index(3).to_indices(10), vec![3]);
        assert_eq!(Selector::from(2..5u64).to_indices(10), vec![2, 3, 4]);
        assert_eq!(
            Selector::from(vec![false, true, false, true]).to_indices(4),
            vec![1, 3]
        );
        assert_eq!(Selector::All.to_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn selector_kinds() {
        assert!(Selector::Index(0).eliminates_axis());
        assert!(!Selector::All.eliminates_axis());
        assert_eq!(Selector::from(1..3u64).to_string(), "1..3");
        assert_eq!(Selector::All.to_string(), "..");
    }
}
