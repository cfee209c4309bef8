use ndarray::{ArrayD, IxDyn};

use dimarrs_dimension::{IncompatibleDimensionalityError, Selector};

use crate::{
    ravel_indices, unravel_index, ElementType, SelectionIndexer, StorageError, StorageShape,
};

/// Readable storage traits.
///
/// Storage is an N-dimensional array of elements with a fixed shape.
/// Implementors must provide [`shape`](ReadableStorageTraits::shape) and [`get`](ReadableStorageTraits::get), every other method has a default implementation in terms of those two.
pub trait ReadableStorageTraits {
    /// The element type.
    type Element: Clone;

    /// Returns the shape of the storage.
    fn shape(&self) -> StorageShape;

    /// Retrieve the element at `indices`.
    ///
    /// # Errors
    /// Returns [`StorageError::IncompatibleDimensionality`] if the number of indices does not match the dimensionality or [`StorageError::OutOfBounds`] if any index is out-of-bounds.
    fn get(&self, indices: &[usize]) -> Result<Self::Element, StorageError>;

    /// Returns the dimensionality of the storage.
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Returns the number of elements in the storage.
    fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Returns true if the storage has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element type of the storage.
    fn element_type(&self) -> ElementType {
        ElementType::of::<Self::Element>()
    }

    /// Retrieve the element at the linearised (row-major) `index`.
    ///
    /// # Errors
    /// Returns [`StorageError::LinearOutOfBounds`] if `index` is out-of-bounds.
    fn get_linear(&self, index: usize) -> Result<Self::Element, StorageError> {
        let shape = self.shape();
        let indices = unravel_index(index, &shape).ok_or(StorageError::LinearOutOfBounds {
            index,
            len: self.len(),
        })?;
        self.get(&indices)
    }

    /// Copy the elements selected by `selectors` (one per axis) into an owned array.
    ///
    /// Axes selected by [`Selector::Index`] are eliminated from the output.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the selectors are incompatible with the storage.
    fn slice(&self, selectors: &[Selector]) -> Result<ArrayD<Self::Element>, StorageError> {
        let indexer = SelectionIndexer::new(&self.shape(), selectors)?;
        let elements = indexer
            .iter_indices()
            .map(|indices| self.get(&indices))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArrayD::from_shape_vec(
            IxDyn(indexer.output_shape()),
            elements,
        )?)
    }

    /// Copy the elements selected by `selector` over the storage viewed as 1-D in logical (row-major) order.
    ///
    /// The output is 0-D for [`Selector::Index`] and 1-D otherwise.
    ///
    /// # Errors
    /// Returns [`StorageError`] if `selector` is invalid for the number of elements in the storage.
    fn slice_linear(&self, selector: &Selector) -> Result<ArrayD<Self::Element>, StorageError> {
        let indexer = SelectionIndexer::new(&[self.len()], std::slice::from_ref(selector))?;
        let elements = indexer
            .iter_indices()
            .map(|indices| self.get_linear(indices[0]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArrayD::from_shape_vec(
            IxDyn(indexer.output_shape()),
            elements,
        )?)
    }

    /// Returns an iterator over all elements in logical (row-major) order.
    ///
    /// Each item is the result of reading one element, a failed read does not end the iteration.
    fn iter_elements(&self) -> Box<dyn Iterator<Item = Result<Self::Element, StorageError>> + '_> {
        Box::new((0..self.len()).map(|index| self.get_linear(index)))
    }

    /// Copy the storage into an owned [`ndarray`] array.
    ///
    /// # Errors
    /// Returns the first [`StorageError`] encountered reading an element.
    fn to_owned_storage(&self) -> Result<ArrayD<Self::Element>, StorageError> {
        let elements = self.iter_elements().collect::<Result<Vec<_>, _>>()?;
        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape()), elements)?)
    }
}

/// Writable storage traits.
pub trait WritableStorageTraits: ReadableStorageTraits {
    /// Store `value` at `indices`.
    ///
    /// # Errors
    /// Returns [`StorageError::IncompatibleDimensionality`] if the number of indices does not match the dimensionality or [`StorageError::OutOfBounds`] if any index is out-of-bounds.
    fn set(&mut self, indices: &[usize], value: Self::Element) -> Result<(), StorageError>;

    /// Store `value` at the linearised (row-major) `index`.
    ///
    /// # Errors
    /// Returns [`StorageError::LinearOutOfBounds`] if `index` is out-of-bounds.
    fn set_linear(&mut self, index: usize, value: Self::Element) -> Result<(), StorageError> {
        let shape = self.shape();
        let indices = unravel_index(index, &shape).ok_or(StorageError::LinearOutOfBounds {
            index,
            len: self.len(),
        })?;
        self.set(&indices, value)
    }

    /// Store `value` at every element selected by `selectors`.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the selectors are incompatible with the storage.
    fn set_selection(
        &mut self,
        selectors: &[Selector],
        value: Self::Element,
    ) -> Result<(), StorageError> {
        let indexer = SelectionIndexer::new(&self.shape(), selectors)?;
        for indices in indexer.iter_indices() {
            self.set(&indices, value.clone())?;
        }
        Ok(())
    }

    /// Store `elements` (in row-major output order) at the elements selected by `selectors`.
    ///
    /// # Errors
    /// Returns [`StorageError::IncompatibleLength`] if the number of elements does not match the number of selected elements, or another [`StorageError`] if the selectors are incompatible with the storage.
    fn assign_selection(
        &mut self,
        selectors: &[Selector],
        elements: &[Self::Element],
    ) -> Result<(), StorageError> {
        let indexer = SelectionIndexer::new(&self.shape(), selectors)?;
        if indexer.len() != elements.len() {
            return Err(StorageError::IncompatibleLength {
                got: elements.len(),
                expected: indexer.len(),
            });
        }
        for (indices, element) in std::iter::zip(indexer.iter_indices(), elements) {
            self.set(&indices, element.clone())?;
        }
        Ok(())
    }
}

/// Storage allocation traits.
///
/// Blanket implemented for all [`ReadableStorageTraits`].
pub trait AllocateStorageTraits: ReadableStorageTraits {
    /// Allocate new owned storage of `shape` with default element values.
    fn allocate_similar<U: Clone + Default>(&self, shape: &[usize]) -> ArrayD<U> {
        ArrayD::default(IxDyn(shape))
    }

    /// Allocate new owned storage with the shape of this storage and default element values.
    fn allocate_same_shape<U: Clone + Default>(&self) -> ArrayD<U> {
        self.allocate_similar(&self.shape())
    }
}

impl<T: ReadableStorageTraits + ?Sized> AllocateStorageTraits for T {}

/// Check that `indices` are within `shape`, returning the linearised index.
///
/// # Errors
/// Returns [`StorageError`] if the dimensionality differs or an index is out-of-bounds.
pub(crate) fn check_indices(indices: &[usize], shape: &[usize]) -> Result<usize, StorageError> {
    if indices.len() != shape.len() {
        return Err(IncompatibleDimensionalityError::new(indices.len(), shape.len()).into());
    }
    ravel_indices(indices, shape).ok_or_else(|| StorageError::OutOfBounds {
        indices: indices.to_vec(),
        shape: shape.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage of `0..len` with a failing read at `fail_at`.
    struct FailingStorage {
        shape: Vec<usize>,
        fail_at: Vec<usize>,
    }

    impl ReadableStorageTraits for FailingStorage {
        type Element = usize;

        fn shape(&self) -> StorageShape {
            self.shape.clone()
        }

        fn get(&self, indices: &[usize]) -> Result<usize, StorageError> {
            let index = check_indices(indices, &self.shape)?;
            if indices == self.fail_at.as_slice() {
                Err(StorageError::Other("read failure".to_string()))
            } else {
                Ok(index)
            }
        }
    }

    #[test]
    fn storage_read_errors_propagate() {
        let storage = FailingStorage {
            shape: vec![2, 3],
            fail_at: vec![0, 1],
        };
        let elements = storage.iter_elements().collect::<Vec<_>>();
        assert_eq!(elements.len(), 6);
        assert!(matches!(elements[0], Ok(0)));
        assert!(matches!(&elements[1], Err(StorageError::Other(message)) if message == "read failure"));
        assert!(matches!(elements[5], Ok(5)));
        assert!(matches!(
            storage.to_owned_storage(),
            Err(StorageError::Other(message)) if message == "read failure"
        ));
        assert!(matches!(
            storage.slice(&[Selector::All, Selector::Index(1)]),
            Err(StorageError::Other(_))
        ));
        assert_eq!(
            storage
                .slice(&[Selector::All, Selector::Index(2)])
                .unwrap()
                .into_raw_vec_and_offset()
                .0,
            vec![2, 5]
        );
    }
}
