use ndarray::ArrayD;

use dimarrs_dimension::Selector;
use dimarrs_storage::{
    AllocateStorageTraits, ReadableStorageTraits, SelectionIndexer, WritableStorageTraits,
};

use super::{DimArray, DimArrayError};

/// Copy the elements of `source` into `destination` in row-major order.
fn copy_elements<S1, S2>(source: &S1, destination: &mut S2) -> Result<(), DimArrayError>
where
    S1: ReadableStorageTraits + ?Sized,
    S2: WritableStorageTraits<Element = S1::Element> + ?Sized,
{
    let (got, expected) = (source.shape(), destination.shape());
    if got != expected {
        return Err(DimArrayError::ShapeMismatch { got, expected });
    }
    for (index, element) in source.iter_elements().enumerate() {
        destination.set_linear(index, element?)?;
    }
    Ok(())
}

impl<S: ReadableStorageTraits> DimArray<S> {
    /// Create an array with the same shape, dimensions and reference dimensions as this array, default element values and an empty name.
    #[must_use]
    pub fn similar(&self) -> DimArray<ArrayD<S::Element>>
    where
        S::Element: Default,
    {
        self.similar_typed()
    }

    /// Create an array with the same shape, dimensions and reference dimensions as this array, an element type of `U` with default values and an empty name.
    #[must_use]
    pub fn similar_typed<U: Clone + Default>(&self) -> DimArray<ArrayD<U>> {
        DimArray::new_unchecked(
            self.storage.allocate_same_shape(),
            self.dims.clone(),
            self.refdims.clone(),
            String::new(),
        )
    }

    /// Allocate raw storage of `shape` with an element type of `U` and default values.
    ///
    /// The result has no dimensions, as a plain shape does not identify which dimensions apply.
    #[must_use]
    pub fn similar_shape<U: Clone + Default>(&self, shape: &[usize]) -> ArrayD<U> {
        self.storage.allocate_similar(shape)
    }

    /// Create an array sized by `selectors` (one per axis) with an element type of `U`, default values and an empty name.
    ///
    /// The dimensions are derived from the dimensions of this array by the selectors, see [`DimArray::rebuild_sliced`].
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the selectors are incompatible with this array.
    pub fn similar_axes<U: Clone + Default>(
        &self,
        selectors: &[Selector],
    ) -> Result<DimArray<ArrayD<U>>, DimArrayError> {
        let indexer = SelectionIndexer::new(&self.shape(), selectors)?;
        let storage = self.storage.allocate_similar(indexer.output_shape());
        self.template()
            .with_name("")
            .rebuild_sliced(storage, selectors)
    }

    /// Copy the array into a new array with owned storage and the same dimensions, reference dimensions and name.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if the storage cannot be read.
    pub fn copy(&self) -> Result<DimArray<ArrayD<S::Element>>, DimArrayError> {
        Ok(DimArray::new_unchecked(
            self.storage.to_owned_storage()?,
            self.dims.clone(),
            self.refdims.clone(),
            self.name.clone(),
        ))
    }

    /// Copy the elements of this array into `destination`.
    ///
    /// The dimensions of `destination` are unchanged.
    ///
    /// # Errors
    /// Returns [`DimArrayError::ShapeMismatch`] if the shapes of the arrays differ.
    pub fn copy_into<S2>(&self, destination: &mut DimArray<S2>) -> Result<(), DimArrayError>
    where
        S2: WritableStorageTraits<Element = S::Element>,
    {
        copy_elements(&self.storage, &mut destination.storage)
    }

    /// Copy the elements of this array into raw `destination` storage.
    ///
    /// # Errors
    /// Returns [`DimArrayError::ShapeMismatch`] if the shape of `destination` differs from this array.
    pub fn copy_into_raw<S2>(&self, destination: &mut S2) -> Result<(), DimArrayError>
    where
        S2: WritableStorageTraits<Element = S::Element> + ?Sized,
    {
        copy_elements(&self.storage, destination)
    }

    /// Copy the array into raw owned storage, discarding the dimensions.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if the storage cannot be read.
    pub fn to_raw(&self) -> Result<ArrayD<S::Element>, DimArrayError> {
        Ok(self.storage.to_owned_storage()?)
    }
}

impl<S: WritableStorageTraits> DimArray<S> {
    /// Copy the elements of raw `source` storage into this array.
    ///
    /// # Errors
    /// Returns [`DimArrayError::ShapeMismatch`] if the shape of `source` differs from this array.
    pub fn copy_from_raw<S2>(&mut self, source: &S2) -> Result<(), DimArrayError>
    where
        S2: ReadableStorageTraits<Element = S::Element> + ?Sized,
    {
        copy_elements(source, &mut self.storage)
    }
}
