use itertools::Itertools;
use thiserror::Error;

use dimarrs_dimension::{
    Dimension, IncompatibleDimensionalityError, SelectDimensionsError, SelectorError,
};
use dimarrs_storage::StorageError;

/// A [`DimArray`](crate::array::DimArray) error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum DimArrayError {
    /// The lengths of the dimensions do not match the storage shape axis-by-axis.
    #[error("dimensions [{}] do not match storage shape {shape:?}", .dims.iter().join(", "))]
    DimensionMismatch {
        /// The supplied dimensions.
        dims: Vec<Dimension>,
        /// The storage shape.
        shape: Vec<usize>,
    },
    /// No operand of a broadcast carries dimensions.
    #[error("dimensional array not found: a broadcast requires at least one operand with dimensions")]
    DimArrayNotFound,
    /// No dimension with the requested name.
    #[error("dimension `{0}` not found")]
    DimensionNotFound(String),
    /// The shapes of a copy source and destination differ.
    #[error("shape mismatch: got {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// The source shape.
        got: Vec<usize>,
        /// The destination shape.
        expected: Vec<usize>,
    },
    /// Broadcast operand shapes cannot be broadcast together.
    #[error("operands with shapes {0:?} and {1:?} cannot be broadcast together")]
    BroadcastIncompatible(Vec<usize>, Vec<usize>),
    /// An integer index exceeds the address space of the platform.
    #[error("index {0} exceeds the addressable range")]
    IndexOverflow(u64),
    /// The number of selectors is neither one (linear indexing) nor the dimensionality.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// An invalid selector.
    #[error(transparent)]
    Selector(#[from] SelectorError),
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SelectDimensionsError> for DimArrayError {
    fn from(err: SelectDimensionsError) -> Self {
        match err {
            SelectDimensionsError::IncompatibleDimensionality(err) => err.into(),
            SelectDimensionsError::Selector(err) => err.into(),
        }
    }
}
