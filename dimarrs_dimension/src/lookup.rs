//! Coordinate lookups.

use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Selector, SelectorError};

/// A coordinate value of a [`Dimension`](crate::Dimension).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    /// A positional index.
    Index(u64),
    /// A floating point coordinate.
    Float(f64),
    /// A categorical label.
    Label(String),
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Label(label) => write!(f, "{label}"),
        }
    }
}

/// The coordinate lookup of a [`Dimension`](crate::Dimension).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// No coordinate values, coordinates are the positional indices `0..len`.
    NoLookup {
        /// The number of elements.
        len: u64,
    },
    /// Evenly spaced coordinates `start + step * i`.
    Regular {
        /// The first coordinate.
        start: f64,
        /// The coordinate spacing.
        step: f64,
        /// The number of elements.
        len: u64,
    },
    /// Explicit floating point coordinates.
    Points(Vec<f64>),
    /// Explicit categorical labels.
    Categorical(Vec<String>),
    /// Explicit positional indices, the coordinates of a selection of a [`Lookup::NoLookup`].
    Indices(Vec<u64>),
}

impl Lookup {
    /// Returns the number of coordinates.
    #[must_use]
    pub fn len(&self) -> u64 {
        match self {
            Self::NoLookup { len } | Self::Regular { len, .. } => *len,
            Self::Points(points) => points.len() as u64,
            Self::Categorical(labels) => labels.len() as u64,
            Self::Indices(indices) => indices.len() as u64,
        }
    }

    /// Returns true if the lookup has no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the coordinate at `index`, or [`None`] if `index` is out-of-bounds.
    #[must_use]
    pub fn coordinate(&self, index: u64) -> Option<Coordinate> {
        if index >= self.len() {
            return None;
        }
        match self {
            Self::NoLookup { .. } => Some(Coordinate::Index(index)),
            #[allow(clippy::cast_precision_loss)]
            Self::Regular { start, step, .. } => {
                Some(Coordinate::Float(start + step * index as f64))
            }
            Self::Points(points) => {
                let index = usize::try_from(index).ok()?;
                points.get(index).copied().map(Coordinate::Float)
            }
            Self::Categorical(labels) => {
                let index = usize::try_from(index).ok()?;
                labels.get(index).cloned().map(Coordinate::Label)
            }
            Self::Indices(indices) => {
                let index = usize::try_from(index).ok()?;
                indices.get(index).copied().map(Coordinate::Index)
            }
        }
    }

    /// Restrict the lookup to the elements chosen by a non-eliminating `selector`.
    ///
    /// A [`Lookup::NoLookup`] stays positional if the selection is `0..n`, otherwise it becomes [`Lookup::Indices`] holding the selected positions.
    /// A [`Lookup::Regular`] stays regular for contiguous selectors and becomes [`Lookup::Points`] otherwise.
    ///
    /// An eliminating selector ([`Selector::Index`]) is treated as a one element range.
    ///
    /// # Errors
    /// Returns [`SelectorError`] if `selector` is invalid for this lookup.
    pub fn select(&self, selector: &Selector) -> Result<Self, SelectorError> {
        let len = self.len();
        selector.validate(len)?;
        let selector = match selector {
            Selector::Index(index) => Selector::Range(*index..*index + 1),
            selector => selector.clone(),
        };
        let output_len = selector.output_len(len).unwrap_or(1);
        let lookup = match (self, &selector) {
            (Self::NoLookup { .. }, _) => {
                let indices = selector.to_indices(len);
                if indices.iter().copied().eq(0..output_len) {
                    Self::NoLookup { len: output_len }
                } else {
                    Self::Indices(indices)
                }
            }
            (Self::Regular { start, step, .. }, Selector::All) => Self::Regular {
                start: *start,
                step: *step,
                len: output_len,
            },
            #[allow(clippy::cast_precision_loss)]
            (Self::Regular { start, step, .. }, Selector::Range(range)) => Self::Regular {
                start: start + step * range.start as f64,
                step: *step,
                len: output_len,
            },
            #[allow(clippy::cast_precision_loss)]
            (Self::Regular { start, step, .. }, _) => Self::Points(
                selector
                    .to_indices(len)
                    .into_iter()
                    .map(|i| start + step * i as f64)
                    .collect(),
            ),
            (Self::Points(points), _) => Self::Points(
                selector
                    .to_indices(len)
                    .into_iter()
                    .filter_map(|i| usize::try_from(i).ok().and_then(|i| points.get(i)))
                    .copied()
                    .collect(),
            ),
            (Self::Categorical(labels), _) => Self::Categorical(
                selector
                    .to_indices(len)
                    .into_iter()
                    .filter_map(|i| usize::try_from(i).ok().and_then(|i| labels.get(i)))
                    .cloned()
                    .collect(),
            ),
            (Self::Indices(indices), _) => Self::Indices(
                selector
                    .to_indices(len)
                    .into_iter()
                    .filter_map(|i| usize::try_from(i).ok().and_then(|i| indices.get(i)))
                    .copied()
                    .collect(),
            ),
        };
        Ok(lookup)
    }
}

impl Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLookup { len } => write!(f, "NoLookup({len})"),
            Self::Regular { start, step, len } => write!(f, "Regular({start}, {step}; {len})"),
            Self::Points(points) => write!(f, "Points([{}])", points.iter().join(", ")),
            Self::Categorical(labels) => write!(f, "Categorical([{}])", labels.iter().join(", ")),
            Self::Indices(indices) => write!(f, "Indices([{}])", indices.iter().join(", ")),
        }
    }
}
