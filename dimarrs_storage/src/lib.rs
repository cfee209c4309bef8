//! The storage API for the [`dimarrs`](https://docs.rs/dimarrs/latest/dimarrs/index.html) crate.
//!
//! Storage is anything that behaves like a conventional N-dimensional array: it has a shape, supports random access reads (and optionally writes), and can be sliced.
//! The storage API is deliberately narrow so that lazy or disk backed arrays can participate by implementing [`ReadableStorageTraits`].
//!
//! This crate implements the storage traits for [`ndarray`] arrays with dynamic dimensionality (e.g. [`ndarray::ArrayD`] and [`ndarray::ArrayViewD`]) and provides:
//!  - [`StorageView`] and [`StorageViewMut`]: views of a selection of any storage that share its memory, and
//!  - [`storage_adapter`]s that can be layered on storage.
//!
//! ## Licence
//! `dimarrs_storage` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod selection;
pub mod storage_adapter;
mod storage_traits;
pub mod store;
mod view;

use thiserror::Error;

use dimarrs_dimension::{IncompatibleDimensionalityError, SelectorError};

pub use self::selection::SelectionIndexer;
pub use self::storage_traits::{
    AllocateStorageTraits, ReadableStorageTraits, WritableStorageTraits,
};
pub use self::view::{StorageView, StorageViewMut};

/// The shape of storage.
pub type StorageShape = Vec<usize>;

/// A storage error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Indices reference an element outside of the storage.
    #[error("indices {indices:?} are out-of-bounds of storage with shape {shape:?}")]
    OutOfBounds {
        /// The indices.
        indices: Vec<usize>,
        /// The storage shape.
        shape: StorageShape,
    },
    /// A linear index references an element outside of the storage.
    #[error("linear index {index} is out-of-bounds of storage with {len} elements")]
    LinearOutOfBounds {
        /// The linear index.
        index: usize,
        /// The number of elements in the storage.
        len: usize,
    },
    /// The number of indices or selectors does not match the storage dimensionality.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// An invalid selector.
    #[error(transparent)]
    Selector(#[from] SelectorError),
    /// The number of supplied elements does not match the number of selected elements.
    #[error("got {got} elements, expected {expected}")]
    IncompatibleLength {
        /// The number of supplied elements.
        got: usize,
        /// The number of selected elements.
        expected: usize,
    },
    /// An [`ndarray`] shape error.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// The element type of storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{name}")]
pub struct ElementType {
    name: &'static str,
    size: usize,
}

impl ElementType {
    /// Return the element type of `T`.
    #[must_use]
    pub fn of<T>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the size of the element in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// Ravel ND indices to a linearised (row-major) index.
///
/// Returns [`None`] if any index is out-of-bounds of `shape` or the dimensionality differs.
#[must_use]
pub fn ravel_indices(indices: &[usize], shape: &[usize]) -> Option<usize> {
    if indices.len() != shape.len() {
        return None;
    }
    let mut index: usize = 0;
    let mut count = 1;
    for (i, s) in std::iter::zip(indices, shape).rev() {
        if i >= s {
            return None;
        }
        index += i * count;
        count *= s;
    }
    Some(index)
}

/// Unravel a linearised (row-major) index to ND indices.
///
/// Returns [`None`] if `index` is out-of-bounds of `shape`.
#[must_use]
pub fn unravel_index(mut index: usize, shape: &[usize]) -> Option<Vec<usize>> {
    let total_size = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?;
    if index >= total_size {
        return None;
    }
    let mut indices = vec![0; shape.len()];
    for (indices_i, &dim) in std::iter::zip(indices.iter_mut().rev(), shape.iter().rev()) {
        *indices_i = index % dim;
        index /= dim;
    }
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ravel_unravel() {
        assert_eq!(ravel_indices(&[1, 2], &[3, 4]), Some(6));
        assert_eq!(ravel_indices(&[3, 0], &[3, 4]), None);
        assert_eq!(ravel_indices(&[1], &[3, 4]), None);
        assert_eq!(ravel_indices(&[], &[]), Some(0));
        assert_eq!(unravel_index(6, &[3, 4]), Some(vec![1, 2]));
        assert_eq!(unravel_index(12, &[3, 4]), None);
        assert_eq!(unravel_index(0, &[]), Some(vec![]));
        assert_eq!(unravel_index(0, &[0, 4]), None);
    }

    #[test]
    fn element_type() {
        let element_type = ElementType::of::<f32>();
        assert_eq!(element_type.name(), "f32");
        assert_eq!(element_type.size(), 4);
        assert_eq!(element_type.to_string(), "f32");
    }
}
