//! The dimension and selector API for the [`dimarrs`](https://docs.rs/dimarrs/latest/dimarrs/index.html) crate.
//!
//! A [`Dimension`] is a named, ordered axis descriptor with a [`Lookup`] of coordinate values.
//! A [`Selector`] selects elements along one axis, and [`Dimension::subdimension`] derives the dimension that remains after a selection.
//!
//! ## Licence
//! `dimarrs_dimension` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod dimension;
pub use dimension::{dimension_index, dimension_lengths, Dimension, DimensionName, IntoDimensions};

mod lookup;
pub use lookup::{Coordinate, Lookup};

mod selector;
pub use selector::{Selector, SelectorError};

/// An incompatible dimensionality error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("incompatible dimensionality {0}, expected {1}")]
pub struct IncompatibleDimensionalityError(usize, usize);

impl IncompatibleDimensionalityError {
    /// Create a new incompatible dimensionality error.
    #[must_use]
    pub const fn new(got: usize, expected: usize) -> Self {
        Self(got, expected)
    }

    /// Returns the dimensionality that was supplied.
    #[must_use]
    pub const fn got(&self) -> usize {
        self.0
    }

    /// Returns the expected dimensionality.
    #[must_use]
    pub const fn expected(&self) -> usize {
        self.1
    }
}

/// Derive the dimensions remaining after selecting `selectors` from `dims`.
///
/// Returns the retained (sliced) dimensions in order, and the length one reference dimensions of eliminated axes in order.
///
/// # Errors
/// Returns [`SelectDimensionsError`] if the number of selectors does not match the number of dimensions or a selector is invalid.
pub fn select_dimensions(
    dims: &[Dimension],
    selectors: &[Selector],
) -> Result<(Vec<Dimension>, Vec<Dimension>), SelectDimensionsError> {
    if dims.len() != selectors.len() {
        return Err(IncompatibleDimensionalityError::new(selectors.len(), dims.len()).into());
    }
    let mut retained = Vec::with_capacity(dims.len());
    let mut eliminated = Vec::new();
    for (dim, selector) in std::iter::zip(dims, selectors) {
        if let Selector::Index(index) = selector {
            eliminated.push(dim.reference(*index)?);
        } else if let Some(subdimension) = dim.subdimension(selector)? {
            retained.push(subdimension);
        }
    }
    Ok((retained, eliminated))
}

/// A [`select_dimensions`] error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectDimensionsError {
    /// The number of selectors does not match the number of dimensions.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// An invalid selector.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_dimensions_eliminates_integer_axes() {
        let dims = [Dimension::x(10), Dimension::y(5)];
        let (retained, eliminated) =
            select_dimensions(&dims, &[Selector::Index(3), Selector::from(0..5u64)]).unwrap();
        assert_eq!(retained, vec![Dimension::y(5)]);
        assert_eq!(eliminated.len(), 1);
        assert_eq!(eliminated[0].name(), "X");
        assert_eq!(eliminated[0].len(), 1);

        let (retained, eliminated) =
            select_dimensions(&dims, &[Selector::from(0..5u64), Selector::from(0..3u64)]).unwrap();
        assert_eq!(retained, vec![Dimension::x(5), Dimension::y(3)]);
        assert!(eliminated.is_empty());
    }

    #[test]
    fn select_dimensions_errors() {
        let dims = [Dimension::x(10), Dimension::y(5)];
        assert_eq!(
            select_dimensions(&dims, &[Selector::All]),
            Err(SelectDimensionsError::IncompatibleDimensionality(
                IncompatibleDimensionalityError::new(1, 2)
            ))
        );
        assert!(matches!(
            select_dimensions(&dims, &[Selector::All, Selector::Index(5)]),
            Err(SelectDimensionsError::Selector(SelectorError::OutOfBounds { .. }))
        ));
    }
}
