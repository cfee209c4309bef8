//! Storage trait implementations for [`ndarray`] arrays.
//!
//! [`ReadableStorageTraits`] is implemented for any [`ndarray::ArrayBase`] with dynamic dimensionality (e.g. [`ArrayD`], [`ndarray::ArrayViewD`], [`ndarray::ArcArray`]).
//! [`WritableStorageTraits`] is implemented where the data is mutable (e.g. [`ArrayD`], [`ndarray::ArrayViewMutD`]).

use ndarray::{
    ArrayBase, ArrayD, ArrayRef, Axis, CowArray, Data, DataMut, IxDyn, LayoutRef, Slice,
    SliceInfoElem,
};

use dimarrs_dimension::{IncompatibleDimensionalityError, Selector};

use crate::{
    storage_traits::check_indices, ReadableStorageTraits, SelectionIndexer, StorageError,
    StorageShape, WritableStorageTraits,
};

impl<A, Sr> ReadableStorageTraits for ArrayBase<Sr, IxDyn>
where
    A: Clone,
    Sr: Data<Elem = A>,
{
    type Element = A;

    fn shape(&self) -> StorageShape {
        LayoutRef::shape(self).to_vec()
    }

    fn get(&self, indices: &[usize]) -> Result<A, StorageError> {
        check_indices(indices, LayoutRef::shape(self))?;
        ArrayRef::get(self, indices)
            .cloned()
            .ok_or_else(|| StorageError::OutOfBounds {
                indices: indices.to_vec(),
                shape: LayoutRef::shape(self).to_vec(),
            })
    }

    fn ndim(&self) -> usize {
        LayoutRef::ndim(self)
    }

    fn len(&self) -> usize {
        LayoutRef::len(self)
    }

    fn slice(&self, selectors: &[Selector]) -> Result<ArrayD<A>, StorageError> {
        if selectors.len() != LayoutRef::ndim(self) {
            return Err(
                IncompatibleDimensionalityError::new(selectors.len(), LayoutRef::ndim(self))
                    .into(),
            );
        }

        // Gather array-like selections first, then slice the remaining axes in place
        let mut array = CowArray::from(self.view());
        let mut slice_info = Vec::with_capacity(selectors.len());
        for (axis, (selector, &len)) in
            std::iter::zip(selectors, LayoutRef::shape(self)).enumerate()
        {
            selector.validate(len as u64)?;
            match selector {
                Selector::Index(index) => {
                    slice_info.push(SliceInfoElem::Index(isize::try_from(*index).map_err(
                        |_| StorageError::Other(format!("index {index} exceeds isize::MAX")),
                    )?));
                }
                Selector::Range(range) => {
                    slice_info.push(SliceInfoElem::from(Slice::from(
                        usize::try_from(range.start).unwrap_or(usize::MAX)
                            ..usize::try_from(range.end).unwrap_or(usize::MAX),
                    )));
                }
                Selector::All => slice_info.push(SliceInfoElem::from(Slice::from(..))),
                Selector::Indices(_) | Selector::Mask(_) => {
                    #[allow(clippy::cast_possible_truncation)]
                    let indices = selector
                        .to_indices(len as u64)
                        .into_iter()
                        .map(|index| index as usize)
                        .collect::<Vec<_>>();
                    array = CowArray::from(array.select(Axis(axis), &indices));
                    slice_info.push(SliceInfoElem::from(Slice::from(..)));
                }
            }
        }
        Ok(ArrayRef::slice(&array, slice_info.as_slice()).to_owned())
    }

    fn iter_elements(&self) -> Box<dyn Iterator<Item = Result<A, StorageError>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }

    fn to_owned_storage(&self) -> Result<ArrayD<A>, StorageError> {
        Ok(self.to_owned())
    }
}

impl<A, Sr> WritableStorageTraits for ArrayBase<Sr, IxDyn>
where
    A: Clone,
    Sr: DataMut<Elem = A>,
{
    fn set(&mut self, indices: &[usize], value: A) -> Result<(), StorageError> {
        check_indices(indices, LayoutRef::shape(self))?;
        let shape = LayoutRef::shape(self).to_vec();
        let element = self
            .get_mut(indices)
            .ok_or_else(|| StorageError::OutOfBounds {
                indices: indices.to_vec(),
                shape,
            })?;
        *element = value;
        Ok(())
    }

    fn set_selection(&mut self, selectors: &[Selector], value: A) -> Result<(), StorageError> {
        let indexer = SelectionIndexer::new(LayoutRef::shape(self), selectors)?;
        for indices in indexer.iter_indices() {
            if let Some(element) = self.get_mut(indices.as_slice()) {
                *element = value.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, ArrayViewD};

    use super::*;

    fn array_4x5() -> ArrayD<i32> {
        ArrayD::from_shape_vec(IxDyn(&[4, 5]), (0..20).collect()).unwrap()
    }

    #[test]
    fn ndarray_read() {
        let array = array_4x5();
        assert_eq!(ReadableStorageTraits::shape(&array), vec![4, 5]);
        assert_eq!(ReadableStorageTraits::get(&array, &[1, 2]).unwrap(), 7);
        assert_eq!(array.get_linear(19).unwrap(), 19);
        assert!(matches!(
            ReadableStorageTraits::get(&array, &[4, 0]),
            Err(StorageError::OutOfBounds { .. })
        ));
        assert!(matches!(
            ReadableStorageTraits::get(&array, &[1]),
            Err(StorageError::IncompatibleDimensionality(_))
        ));
        assert!(matches!(
            array.get_linear(20),
            Err(StorageError::LinearOutOfBounds { index: 20, len: 20 })
        ));
        assert_eq!(array.element_type().name(), "i32");
    }

    #[test]
    fn ndarray_slice() {
        let array = array_4x5();
        let sliced = ReadableStorageTraits::slice(
            &array,
            &[Selector::Index(3), Selector::from(1..5u64)],
        )
        .unwrap();
        assert_eq!(sliced, array![16, 17, 18, 19].into_dyn());

        let sliced = ReadableStorageTraits::slice(
            &array,
            &[Selector::from(vec![2u64, 0]), Selector::from(vec![false, true, false, true, false])],
        )
        .unwrap();
        assert_eq!(sliced, array![[11, 13], [1, 3]].into_dyn());

        let sliced =
            ReadableStorageTraits::slice(&array, &[Selector::Index(0), Selector::Index(4)])
                .unwrap();
        assert_eq!(sliced.ndim(), 0);
        assert_eq!(sliced.first(), Some(&4));

        assert!(matches!(
            ReadableStorageTraits::slice(&array, &[Selector::All, Selector::from(0..6u64)]),
            Err(StorageError::Selector(_))
        ));
    }

    #[test]
    fn ndarray_slice_matches_default_gather() {
        struct Gather<'a>(ArrayViewD<'a, i32>);
        impl ReadableStorageTraits for Gather<'_> {
            type Element = i32;
            fn shape(&self) -> StorageShape {
                self.0.shape().to_vec()
            }
            fn get(&self, indices: &[usize]) -> Result<i32, StorageError> {
                ReadableStorageTraits::get(&self.0, indices)
            }
        }

        let array = array_4x5();
        let gather = Gather(array.view());
        let selectors = [Selector::from(vec![3u64, 1, 1]), Selector::from(2..4u64)];
        assert_eq!(
            ReadableStorageTraits::slice(&array, &selectors).unwrap(),
            gather.slice(&selectors).unwrap()
        );
        assert_eq!(
            array.slice_linear(&Selector::from(5..8u64)).unwrap(),
            array![5, 6, 7].into_dyn()
        );
        assert_eq!(gather.to_owned_storage().unwrap(), array);
    }

    #[test]
    fn ndarray_write() {
        let mut array = array_4x5();
        WritableStorageTraits::set(&mut array, &[0, 0], -1).unwrap();
        array.set_linear(19, -19).unwrap();
        assert_eq!(array[[0, 0]], -1);
        assert_eq!(array[[3, 4]], -19);

        array
            .set_selection(&[Selector::Index(1), Selector::from(0..2u64)], 100)
            .unwrap();
        assert_eq!(array[[1, 0]], 100);
        assert_eq!(array[[1, 1]], 100);
        assert_eq!(array[[1, 2]], 7);

        array
            .assign_selection(&[Selector::All, Selector::Index(2)], &[1, 2, 3, 4])
            .unwrap();
        assert_eq!(
            array.index_axis(Axis(1), 2).iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(matches!(
            array.assign_selection(&[Selector::All, Selector::Index(2)], &[1, 2]),
            Err(StorageError::IncompatibleLength {
                got: 2,
                expected: 4
            })
        ));
    }
}
