use std::fmt::Display;

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

use crate::{Coordinate, Lookup, Selector, SelectorError};

/// The name (kind) of a dimension, e.g. `X` or `time`.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deref,
    derive_more::Display,
    From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DimensionName(String);

impl DimensionName {
    /// Create a new dimension name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DimensionName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl PartialEq<str> for DimensionName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DimensionName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A named, ordered axis descriptor.
///
/// A dimension has a [`DimensionName`] and a [`Lookup`] holding its coordinate values.
/// Its length is the number of coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    name: DimensionName,
    lookup: Lookup,
}

impl Dimension {
    /// Create a new dimension.
    #[must_use]
    pub fn new(name: impl Into<DimensionName>, lookup: Lookup) -> Self {
        Self {
            name: name.into(),
            lookup,
        }
    }

    /// Create a new dimension of length `len` without coordinate values.
    #[must_use]
    pub fn with_len(name: impl Into<DimensionName>, len: u64) -> Self {
        Self::new(name, Lookup::NoLookup { len })
    }

    /// Create a new dimension with regularly spaced coordinates `start + step * i` for `i` in `0..len`.
    #[must_use]
    pub fn regular(name: impl Into<DimensionName>, start: f64, step: f64, len: u64) -> Self {
        Self::new(name, Lookup::Regular { start, step, len })
    }

    /// Create a new dimension with explicit coordinates.
    #[must_use]
    pub fn points(name: impl Into<DimensionName>, points: Vec<f64>) -> Self {
        Self::new(name, Lookup::Points(points))
    }

    /// Create a new dimension with categorical labels.
    #[must_use]
    pub fn categorical<L: Into<String>>(
        name: impl Into<DimensionName>,
        labels: impl IntoIterator<Item = L>,
    ) -> Self {
        Self::new(
            name,
            Lookup::Categorical(labels.into_iter().map(Into::into).collect()),
        )
    }

    /// Create an `X` dimension of length `len`.
    #[must_use]
    pub fn x(len: u64) -> Self {
        Self::with_len("X", len)
    }

    /// Create a `Y` dimension of length `len`.
    #[must_use]
    pub fn y(len: u64) -> Self {
        Self::with_len("Y", len)
    }

    /// Create a `Z` dimension of length `len`.
    #[must_use]
    pub fn z(len: u64) -> Self {
        Self::with_len("Z", len)
    }

    /// Create a `Ti` (time) dimension of length `len`.
    #[must_use]
    pub fn ti(len: u64) -> Self {
        Self::with_len("Ti", len)
    }

    /// Returns the dimension name.
    #[must_use]
    pub fn name(&self) -> &DimensionName {
        &self.name
    }

    /// Returns the coordinate lookup.
    #[must_use]
    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Returns the length of the dimension.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.lookup.len()
    }

    /// Returns true if the dimension has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Returns the coordinate at `index`, or [`None`] if `index` is out-of-bounds.
    #[must_use]
    pub fn coordinate(&self, index: u64) -> Option<Coordinate> {
        self.lookup.coordinate(index)
    }

    /// Returns an iterator over the coordinates in order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.len()).filter_map(|index| self.lookup.coordinate(index))
    }

    /// Derive the sub-dimension selected by `selector`.
    ///
    /// Returns [`None`] if the selector eliminates the dimension ([`Selector::Index`]).
    /// Otherwise returns a dimension with the same name whose coordinates are restricted to the selection.
    ///
    /// # Errors
    /// Returns [`SelectorError`] if `selector` is invalid for this dimension.
    pub fn subdimension(&self, selector: &Selector) -> Result<Option<Self>, SelectorError> {
        selector.validate(self.len())?;
        if selector.eliminates_axis() {
            Ok(None)
        } else {
            Ok(Some(Self {
                name: self.name.clone(),
                lookup: self.lookup.select(selector)?,
            }))
        }
    }

    /// Derive the length one dimension at `index`, recording which coordinate an eliminated axis was indexed at.
    ///
    /// # Errors
    /// Returns [`SelectorError`] if `index` is out-of-bounds.
    pub fn reference(&self, index: u64) -> Result<Self, SelectorError> {
        Ok(Self {
            name: self.name.clone(),
            lookup: self.lookup.select(&Selector::Index(index))?,
        })
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.len())
    }
}

/// Conversion into an ordered sequence of dimensions.
///
/// A single [`Dimension`] is normalised to a one element sequence.
pub trait IntoDimensions {
    /// Convert into a vector of dimensions.
    fn into_dimensions(self) -> Vec<Dimension>;
}

impl IntoDimensions for Dimension {
    fn into_dimensions(self) -> Vec<Dimension> {
        vec![self]
    }
}

impl IntoDimensions for Vec<Dimension> {
    fn into_dimensions(self) -> Vec<Dimension> {
        self
    }
}

impl IntoDimensions for &[Dimension] {
    fn into_dimensions(self) -> Vec<Dimension> {
        self.to_vec()
    }
}

impl<const N: usize> IntoDimensions for [Dimension; N] {
    fn into_dimensions(self) -> Vec<Dimension> {
        self.into()
    }
}

impl IntoDimensions for () {
    fn into_dimensions(self) -> Vec<Dimension> {
        Vec::new()
    }
}

/// Returns the lengths of `dims`.
#[must_use]
pub fn dimension_lengths(dims: &[Dimension]) -> Vec<u64> {
    dims.iter().map(Dimension::len).collect()
}

/// Returns the position of the dimension named `name` in `dims`.
#[must_use]
pub fn dimension_index(dims: &[Dimension], name: &str) -> Option<usize> {
    dims.iter().position(|dim| dim.name() == name)
}
