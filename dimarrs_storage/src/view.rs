use dimarrs_dimension::{IncompatibleDimensionalityError, Selector};

use crate::{
    ReadableStorageTraits, SelectionIndexer, StorageError, StorageShape, WritableStorageTraits,
};

/// How a view maps its indices to the underlying storage.
#[derive(Clone, Debug)]
enum ViewIndexing {
    /// One selector per axis.
    Selection(SelectionIndexer),
    /// A single selector over the storage viewed as 1-D in row-major order.
    Linear(SelectionIndexer),
}

enum ParentIndex {
    Indices(Vec<usize>),
    Linear(usize),
}

impl ViewIndexing {
    fn new(shape: &[usize], selectors: &[Selector]) -> Result<Self, StorageError> {
        Ok(Self::Selection(SelectionIndexer::new(shape, selectors)?))
    }

    fn new_linear(len: usize, selector: &Selector) -> Result<Self, StorageError> {
        Ok(Self::Linear(SelectionIndexer::new(
            &[len],
            std::slice::from_ref(selector),
        )?))
    }

    fn indexer(&self) -> &SelectionIndexer {
        match self {
            Self::Selection(indexer) | Self::Linear(indexer) => indexer,
        }
    }

    fn parent_index(&self, indices: &[usize]) -> Result<ParentIndex, StorageError> {
        let shape = self.indexer().output_shape();
        if indices.len() != shape.len() {
            return Err(IncompatibleDimensionalityError::new(indices.len(), shape.len()).into());
        }
        let parent = self
            .indexer()
            .storage_indices(indices)
            .ok_or_else(|| StorageError::OutOfBounds {
                indices: indices.to_vec(),
                shape: shape.to_vec(),
            })?;
        match (self, parent.as_slice()) {
            (Self::Linear(_), [index]) => Ok(ParentIndex::Linear(*index)),
            _ => Ok(ParentIndex::Indices(parent)),
        }
    }
}

/// A read-only view of a selection of storage.
///
/// The view borrows the storage: elements are read from the parent on access and never copied.
#[derive(Debug)]
pub struct StorageView<'a, S: ?Sized> {
    storage: &'a S,
    indexing: ViewIndexing,
}

impl<'a, S: ReadableStorageTraits + ?Sized> StorageView<'a, S> {
    /// Create a view of the elements of `storage` selected by `selectors` (one per axis).
    ///
    /// # Errors
    /// Returns [`StorageError`] if the selectors are incompatible with the storage.
    pub fn new(storage: &'a S, selectors: &[Selector]) -> Result<Self, StorageError> {
        let indexing = ViewIndexing::new(&storage.shape(), selectors)?;
        Ok(Self { storage, indexing })
    }

    /// Create a view of the elements of `storage` selected by `selector` over the storage viewed as 1-D in row-major order.
    ///
    /// # Errors
    /// Returns [`StorageError`] if `selector` is invalid for the number of elements in the storage.
    pub fn new_linear(storage: &'a S, selector: &Selector) -> Result<Self, StorageError> {
        let indexing = ViewIndexing::new_linear(storage.len(), selector)?;
        Ok(Self { storage, indexing })
    }

    /// Returns the parent storage.
    #[must_use]
    pub fn parent(&self) -> &'a S {
        self.storage
    }
}

impl<S: ReadableStorageTraits + ?Sized> ReadableStorageTraits for StorageView<'_, S> {
    type Element = S::Element;

    fn shape(&self) -> StorageShape {
        self.indexing.indexer().output_shape().to_vec()
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        match self.indexing.parent_index(indices)? {
            ParentIndex::Indices(indices) => self.storage.get(&indices),
            ParentIndex::Linear(index) => self.storage.get_linear(index),
        }
    }
}

/// A mutable view of a selection of storage.
///
/// Writes through the view are applied to the parent storage.
#[derive(Debug)]
pub struct StorageViewMut<'a, S: ?Sized> {
    storage: &'a mut S,
    indexing: ViewIndexing,
}

impl<'a, S: WritableStorageTraits + ?Sized> StorageViewMut<'a, S> {
    /// Create a mutable view of the elements of `storage` selected by `selectors` (one per axis).
    ///
    /// # Errors
    /// Returns [`StorageError`] if the selectors are incompatible with the storage.
    pub fn new(storage: &'a mut S, selectors: &[Selector]) -> Result<Self, StorageError> {
        let indexing = ViewIndexing::new(&storage.shape(), selectors)?;
        Ok(Self { storage, indexing })
    }

    /// Create a mutable view of the elements of `storage` selected by `selector` over the storage viewed as 1-D in row-major order.
    ///
    /// # Errors
    /// Returns [`StorageError`] if `selector` is invalid for the number of elements in the storage.
    pub fn new_linear(storage: &'a mut S, selector: &Selector) -> Result<Self, StorageError> {
        let indexing = ViewIndexing::new_linear(storage.len(), selector)?;
        Ok(Self { storage, indexing })
    }
}

impl<S: ReadableStorageTraits + ?Sized> ReadableStorageTraits for StorageViewMut<'_, S> {
    type Element = S::Element;

    fn shape(&self) -> StorageShape {
        self.indexing.indexer().output_shape().to_vec()
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        match self.indexing.parent_index(indices)? {
            ParentIndex::Indices(indices) => self.storage.get(&indices),
            ParentIndex::Linear(index) => self.storage.get_linear(index),
        }
    }
}

impl<S: WritableStorageTraits + ?Sized> WritableStorageTraits for StorageViewMut<'_, S> {
    fn set(&mut self, indices: &[usize], value: S::Element) -> Result<(), StorageError> {
        match self.indexing.parent_index(indices)? {
            ParentIndex::Indices(indices) => self.storage.set(&indices, value),
            ParentIndex::Linear(index) => self.storage.set_linear(index, value),
        }
    }
}
