use ndarray::ArrayD;

use dimarrs_dimension::{IncompatibleDimensionalityError, Selector};
use dimarrs_storage::{
    ReadableStorageTraits, StorageView, StorageViewMut, WritableStorageTraits,
};

use super::{DimArray, DimArrayError, DimTemplate};

/// The kind of an index: a classification of a tuple of [`Selector`]s against the dimensionality of an array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// One [`Selector::Index`] per axis, holding the indices.
    ScalarAll(Vec<u64>),
    /// One selector per axis, at least one of which is not an integer.
    MixedStandard,
    /// A single (linear) selector on an array with a dimensionality other than one.
    LinearOnNd,
    /// A single non-integer selector on a one-dimensional array.
    LinearOn1d,
}

impl IndexKind {
    /// Classify `selectors` against an array with dimensionality `ndim`.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the number of selectors is neither one nor `ndim`.
    pub fn classify(
        selectors: &[Selector],
        ndim: usize,
    ) -> Result<Self, IncompatibleDimensionalityError> {
        let indices = selectors
            .iter()
            .map(|selector| match selector {
                Selector::Index(index) => Some(*index),
                _ => None,
            })
            .collect::<Option<Vec<_>>>();
        if selectors.len() == ndim {
            if let Some(indices) = indices {
                return Ok(Self::ScalarAll(indices));
            }
        }
        if selectors.len() == 1 && ndim == 1 {
            Ok(Self::LinearOn1d)
        } else if selectors.len() == 1 {
            Ok(Self::LinearOnNd)
        } else if selectors.len() == ndim {
            Ok(Self::MixedStandard)
        } else {
            Err(IncompatibleDimensionalityError::new(selectors.len(), ndim))
        }
    }
}

/// The result of indexing a [`DimArray`].
#[derive(Clone, Debug, PartialEq)]
pub enum Indexed<T, S> {
    /// A single element.
    Element(T),
    /// Raw storage without dimensions, the result of linear indexing of an array that is not one-dimensional.
    Raw(S),
    /// A dimensional array.
    Array(DimArray<S>),
}

impl<T, S> Indexed<T, S> {
    /// Returns the element, or [`None`] if this is not an element.
    #[must_use]
    pub fn into_element(self) -> Option<T> {
        if let Self::Element(element) = self {
            Some(element)
        } else {
            None
        }
    }

    /// Returns the raw storage, or [`None`] if this is not raw storage.
    #[must_use]
    pub fn into_raw(self) -> Option<S> {
        if let Self::Raw(storage) = self {
            Some(storage)
        } else {
            None
        }
    }

    /// Returns the dimensional array, or [`None`] if this is not a dimensional array.
    #[must_use]
    pub fn into_array(self) -> Option<DimArray<S>> {
        if let Self::Array(array) = self {
            Some(array)
        } else {
            None
        }
    }
}

fn to_indices(indices: &[u64]) -> Result<Vec<usize>, DimArrayError> {
    indices.iter().map(|&index| to_index(index)).collect()
}

fn to_index(index: u64) -> Result<usize, DimArrayError> {
    usize::try_from(index).map_err(|_| DimArrayError::IndexOverflow(index))
}

impl<S: ReadableStorageTraits> DimArray<S> {
    /// Index the array with `selectors`, copying the selected elements.
    ///
    /// The result depends on the [`IndexKind`] of `selectors`:
    ///  - [`IndexKind::ScalarAll`]: the element, dimensions are bypassed.
    ///  - [`IndexKind::MixedStandard`]: a dimensional array, see [`DimArray::rebuild_sliced`].
    ///  - [`IndexKind::LinearOnNd`]: the element for an integer selector, otherwise raw one-dimensional storage without dimensions.
    ///  - [`IndexKind::LinearOn1d`]: a dimensional array, as for [`IndexKind::MixedStandard`].
    ///
    /// # Errors
    /// Returns [`DimArrayError::IncompatibleDimensionality`] if the number of selectors is neither one nor the dimensionality of the array.
    /// Errors from storage (e.g. out-of-bounds) are returned unchanged as [`DimArrayError::Storage`].
    pub fn get(
        &self,
        selectors: &[Selector],
    ) -> Result<Indexed<S::Element, ArrayD<S::Element>>, DimArrayError> {
        match IndexKind::classify(selectors, self.ndim())? {
            IndexKind::ScalarAll(indices) => Ok(Indexed::Element(
                self.storage.get(&to_indices(&indices)?)?,
            )),
            IndexKind::MixedStandard | IndexKind::LinearOn1d => {
                let storage = self.storage.slice(selectors)?;
                Ok(Indexed::Array(self.rebuild_sliced(storage, selectors)?))
            }
            IndexKind::LinearOnNd => match &selectors[0] {
                Selector::Index(index) => Ok(Indexed::Element(
                    self.storage.get_linear(to_index(*index)?)?,
                )),
                selector => Ok(Indexed::Raw(self.storage.slice_linear(selector)?)),
            },
        }
    }

    /// Return the element at `indices`.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if `indices` are incompatible with the storage.
    pub fn element(&self, indices: &[usize]) -> Result<S::Element, DimArrayError> {
        Ok(self.storage.get(indices)?)
    }

    /// Select a subset of the array with one selector per axis, always returning a dimensional array.
    ///
    /// Unlike [`DimArray::get`], a full-arity integer selection returns a zero-dimensional array.
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the selectors are incompatible with the array.
    pub fn select(
        &self,
        selectors: &[Selector],
    ) -> Result<DimArray<ArrayD<S::Element>>, DimArrayError> {
        if selectors.len() != self.ndim() {
            return Err(IncompatibleDimensionalityError::new(selectors.len(), self.ndim()).into());
        }
        let storage = self.storage.slice(selectors)?;
        self.rebuild_sliced(storage, selectors)
    }

    /// Select a subset of the array by dimension name.
    ///
    /// Dimensions that are not named are selected entirely.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionNotFound`] if the array has no dimension with a given name, or another [`DimArrayError`] if a selector is invalid.
    pub fn select_by_name(
        &self,
        selectors: &[(&str, Selector)],
    ) -> Result<DimArray<ArrayD<S::Element>>, DimArrayError> {
        let mut axis_selectors = vec![Selector::All; self.ndim()];
        for (name, selector) in selectors {
            let axis = self
                .dim_index(name)
                .ok_or_else(|| DimArrayError::DimensionNotFound((*name).to_string()))?;
            axis_selectors[axis] = selector.clone();
        }
        self.select(&axis_selectors)
    }

    /// Index the array with `selectors`, returning a view that borrows the storage instead of a copy.
    ///
    /// The result follows the same rules as [`DimArray::get`].
    ///
    /// # Errors
    /// See [`DimArray::get`].
    pub fn view(
        &self,
        selectors: &[Selector],
    ) -> Result<Indexed<S::Element, StorageView<'_, S>>, DimArrayError> {
        match IndexKind::classify(selectors, self.ndim())? {
            IndexKind::ScalarAll(indices) => Ok(Indexed::Element(
                self.storage.get(&to_indices(&indices)?)?,
            )),
            IndexKind::MixedStandard | IndexKind::LinearOn1d => {
                let view = StorageView::new(&self.storage, selectors)?;
                Ok(Indexed::Array(self.rebuild_sliced(view, selectors)?))
            }
            IndexKind::LinearOnNd => match &selectors[0] {
                Selector::Index(index) => Ok(Indexed::Element(
                    self.storage.get_linear(to_index(*index)?)?,
                )),
                selector => Ok(Indexed::Raw(StorageView::new_linear(
                    &self.storage,
                    selector,
                )?)),
            },
        }
    }
}

impl<S: WritableStorageTraits> DimArray<S> {
    fn template_and_storage_mut(&mut self) -> (DimTemplate<'_>, &mut S) {
        (
            DimTemplate::new(&self.dims, &self.refdims, &self.name),
            &mut self.storage,
        )
    }

    /// Index the array with `selectors`, returning a mutable view that borrows the storage.
    ///
    /// The result follows the same rules as [`DimArray::get`].
    /// Writes through the view are applied to this array.
    ///
    /// # Errors
    /// See [`DimArray::get`].
    pub fn view_mut(
        &mut self,
        selectors: &[Selector],
    ) -> Result<Indexed<S::Element, StorageViewMut<'_, S>>, DimArrayError> {
        let ndim = self.ndim();
        let (template, storage) = self.template_and_storage_mut();
        match IndexKind::classify(selectors, ndim)? {
            IndexKind::ScalarAll(indices) => Ok(Indexed::Element(
                storage.get(&to_indices(&indices)?)?,
            )),
            IndexKind::MixedStandard | IndexKind::LinearOn1d => {
                let view = StorageViewMut::new(storage, selectors)?;
                Ok(Indexed::Array(template.rebuild_sliced(view, selectors)?))
            }
            IndexKind::LinearOnNd => match &selectors[0] {
                Selector::Index(index) => Ok(Indexed::Element(
                    storage.get_linear(to_index(*index)?)?,
                )),
                selector => Ok(Indexed::Raw(StorageViewMut::new_linear(storage, selector)?)),
            },
        }
    }

    /// Store `value` at `indices`.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if `indices` are incompatible with the storage.
    pub fn set(&mut self, indices: &[usize], value: S::Element) -> Result<(), DimArrayError> {
        Ok(self.storage.set(indices, value)?)
    }

    /// Store `value` at the linearised (row-major) `index`.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if `index` is out-of-bounds.
    pub fn set_linear(&mut self, index: usize, value: S::Element) -> Result<(), DimArrayError> {
        Ok(self.storage.set_linear(index, value)?)
    }

    /// Store `value` at every element selected by `selectors`.
    ///
    /// `selectors` may be one selector per axis or a single linear selector.
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the selectors are incompatible with the array.
    pub fn set_selection(
        &mut self,
        selectors: &[Selector],
        value: S::Element,
    ) -> Result<(), DimArrayError> {
        match IndexKind::classify(selectors, self.ndim())? {
            IndexKind::ScalarAll(indices) => self.storage.set(&to_indices(&indices)?, value)?,
            IndexKind::MixedStandard | IndexKind::LinearOn1d => {
                self.storage.set_selection(selectors, value)?;
            }
            IndexKind::LinearOnNd => {
                let mut view = StorageViewMut::new_linear(&mut self.storage, &selectors[0])?;
                let all = vec![Selector::All; view.ndim()];
                view.set_selection(&all, value)?;
            }
        }
        Ok(())
    }

    /// Store `elements` (in row-major order of the selection) at the elements selected by `selectors`.
    ///
    /// `selectors` may be one selector per axis or a single linear selector.
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the selectors are incompatible with the array or the number of elements does not match the selection.
    pub fn assign_selection(
        &mut self,
        selectors: &[Selector],
        elements: &[S::Element],
    ) -> Result<(), DimArrayError> {
        match IndexKind::classify(selectors, self.ndim())? {
            IndexKind::ScalarAll(_) | IndexKind::MixedStandard | IndexKind::LinearOn1d => {
                self.storage.assign_selection(selectors, elements)?;
            }
            IndexKind::LinearOnNd => {
                let mut view = StorageViewMut::new_linear(&mut self.storage, &selectors[0])?;
                let all = vec![Selector::All; view.ndim()];
                view.assign_selection(&all, elements)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_kind_classify() {
        use IndexKind::{LinearOn1d, LinearOnNd, MixedStandard, ScalarAll};
        let index = Selector::Index(0);
        let range = Selector::from(0..2u64);
        assert_eq!(
            IndexKind::classify(&[Selector::Index(4), Selector::Index(1)], 2),
            Ok(ScalarAll(vec![4, 1]))
        );
        assert_eq!(
            IndexKind::classify(&[index.clone(), range.clone()], 2),
            Ok(MixedStandard)
        );
        assert_eq!(IndexKind::classify(&[range.clone()], 2), Ok(LinearOnNd));
        assert_eq!(IndexKind::classify(&[range.clone()], 0), Ok(LinearOnNd));
        assert_eq!(IndexKind::classify(&[range.clone()], 1), Ok(LinearOn1d));
        assert_eq!(IndexKind::classify(&[index.clone()], 1), Ok(ScalarAll(vec![0])));
        assert_eq!(IndexKind::classify(&[index.clone()], 2), Ok(LinearOnNd));
        assert_eq!(IndexKind::classify(&[], 0), Ok(ScalarAll(vec![])));
        assert_eq!(
            IndexKind::classify(&[index.clone(), index.clone()], 3),
            Err(IncompatibleDimensionalityError::new(2, 3))
        );
        assert_eq!(
            IndexKind::classify(&[], 2),
            Err(IncompatibleDimensionalityError::new(0, 2))
        );
    }

    #[test]
    fn index_conversion() {
        assert_eq!(to_indices(&[3, 0, 7]).unwrap(), vec![3, 0, 7]);
        assert!(to_indices(&[]).unwrap().is_empty());
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn index_conversion_overflow() {
        assert!(matches!(
            to_indices(&[0, u64::MAX]),
            Err(DimArrayError::IndexOverflow(u64::MAX))
        ));
    }

    #[test]
    fn indexed_accessors() {
        let element: Indexed<u8, ArrayD<u8>> = Indexed::Element(3);
        assert_eq!(element.clone().into_element(), Some(3));
        assert_eq!(element.clone().into_raw(), None);
        assert!(element.into_array().is_none());
    }
}
