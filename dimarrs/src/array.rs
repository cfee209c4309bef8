//! Dimension-aware arrays.
//!
//! A [`DimArray`] couples N-dimensional storage with an ordered sequence of [`Dimension`]s, one per storage axis.
//! The length of each dimension always equals the storage length along its axis.
//!
//! A [`DimArray`] is immutable in shape and dimensions.
//! Every shape changing operation (indexing, slicing, copying, [similar](DimArray::similar) allocation and [broadcasting](crate::broadcast)) produces a new array through the [rebuild protocol](DimArray::rebuilder).
//! Element assignment ([`DimArray::set`] and friends) is delegated straight to storage and never touches dimensions.
//!
//! Axes eliminated by integer indexing are recorded as reference dimensions ([`DimArray::refdims`]) for provenance.

mod array_builder;
mod array_errors;
mod indexing;
mod rebuild;
mod similar;

use std::fmt::Display;

use itertools::Itertools;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

pub use self::{
    array_builder::DimArrayBuilder,
    array_errors::DimArrayError,
    indexing::{IndexKind, Indexed},
    rebuild::{DimTemplate, Rebuild},
};

use crate::config::global_config;
use dimarrs_dimension::{dimension_index, Coordinate, Dimension, IntoDimensions};
use dimarrs_storage::{ReadableStorageTraits, StorageError};

/// A dimension-aware array.
///
/// See the [module documentation](self) for the invariants of a [`DimArray`].
///
/// ### Example
/// ```rust
/// # use dimarrs::array::{DimArray, Indexed};
/// # use dimarrs::dimension::{Dimension, Selector};
/// let storage = ndarray::ArrayD::<f32>::zeros(vec![10, 5]);
/// let array = DimArray::new(storage, [Dimension::x(10), Dimension::y(5)])?;
///
/// // Integer indexing eliminates the X axis and records it in the refdims
/// let Indexed::Array(row) = array.get(&[Selector::Index(3), Selector::from(0..5u64)])? else {
///     unreachable!()
/// };
/// assert_eq!(row.dims(), &[Dimension::y(5)]);
/// assert_eq!(row.refdims()[0].name(), "X");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DimArray<S> {
    storage: S,
    dims: Vec<Dimension>,
    refdims: Vec<Dimension>,
    name: String,
}

/// A [`DimArray`] with owned [`ndarray`] storage.
pub type DimArrayD<T> = DimArray<ArrayD<T>>;

/// Check that the lengths of `dims` match `shape` axis-by-axis.
fn check_dimensions(dims: &[Dimension], shape: &[usize]) -> Result<(), DimArrayError> {
    if dims.len() == shape.len()
        && std::iter::zip(dims, shape).all(|(dim, &len)| dim.len() == len as u64)
    {
        Ok(())
    } else {
        Err(DimArrayError::DimensionMismatch {
            dims: dims.to_vec(),
            shape: shape.to_vec(),
        })
    }
}

impl<S: ReadableStorageTraits> DimArray<S> {
    /// Create a new dimensional array with empty reference dimensions and an empty name.
    ///
    /// `dims` can be a single [`Dimension`] or a sequence of dimensions.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the dimension lengths do not match the storage shape.
    pub fn new(storage: S, dims: impl IntoDimensions) -> Result<Self, DimArrayError> {
        Self::new_with(storage, dims, (), String::new())
    }

    /// Create a new dimensional array with reference dimensions and a name.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the dimension lengths do not match the storage shape.
    pub fn new_with(
        storage: S,
        dims: impl IntoDimensions,
        refdims: impl IntoDimensions,
        name: impl Into<String>,
    ) -> Result<Self, DimArrayError> {
        let dims = dims.into_dimensions();
        check_dimensions(&dims, &storage.shape())?;
        Ok(Self {
            storage,
            dims,
            refdims: refdims.into_dimensions(),
            name: name.into(),
        })
    }

    /// Create a dimensional array from parts that are known to satisfy the shape invariant.
    pub(crate) fn new_unchecked(
        storage: S,
        dims: Vec<Dimension>,
        refdims: Vec<Dimension>,
        name: String,
    ) -> Self {
        debug_assert!(check_dimensions(&dims, &storage.shape()).is_ok());
        Self {
            storage,
            dims,
            refdims,
            name,
        }
    }

    /// Returns the dimensions.
    #[must_use]
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Returns the reference dimensions.
    #[must_use]
    pub fn refdims(&self) -> &[Dimension] {
        &self.refdims
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the storage.
    #[must_use]
    pub fn data(&self) -> &S {
        &self.storage
    }

    /// Unwrap the array, returning the storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Returns the shape of the array.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.storage.shape()
    }

    /// Returns the dimensionality of the array.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Returns the number of elements in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns an iterator over the elements in logical (row-major) order.
    ///
    /// Each item is the result of reading one element from storage.
    pub fn iter(&self) -> impl Iterator<Item = Result<S::Element, StorageError>> + '_ {
        self.storage.iter_elements()
    }

    /// Copy the elements in logical (row-major) order into a vector.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] with the first error encountered reading an element.
    pub fn to_vec(&self) -> Result<Vec<S::Element>, DimArrayError> {
        Ok(self.iter().collect::<Result<Vec<_>, _>>()?)
    }

    /// Returns the axis of the dimension named `name`.
    #[must_use]
    pub fn dim_index(&self, name: &str) -> Option<usize> {
        dimension_index(&self.dims, name)
    }

    /// Returns true if the array has a dimension named `name`.
    #[must_use]
    pub fn has_dim(&self, name: &str) -> bool {
        self.dim_index(name).is_some()
    }

    /// Returns the dimension named `name`.
    #[must_use]
    pub fn dim(&self, name: &str) -> Option<&Dimension> {
        self.dims.iter().find(|dim| dim.name() == name)
    }

    /// Returns a builder initialised with the dimensions, reference dimensions and name of this array.
    #[must_use]
    pub fn builder(&self) -> DimArrayBuilder {
        let mut builder = DimArrayBuilder::new(self.dims.clone());
        builder
            .refdims(self.refdims.clone())
            .name(self.name.clone());
        builder
    }

    /// Returns the metadata of the array.
    #[must_use]
    pub fn metadata(&self) -> DimArrayMetadata {
        DimArrayMetadata {
            name: self.name.clone(),
            dims: self.dims.clone(),
            refdims: self.refdims.clone(),
            shape: self.shape(),
            element_type: self.storage.element_type().name().to_string(),
        }
    }
}

impl<T: Clone> DimArray<ArrayD<T>> {
    /// Create a one-dimensional array by evaluating `f` over every coordinate of `dim` in order.
    ///
    /// The array is named `"<name>(<dimension name>)"`, where `name` is the name of the function.
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the number of values produced does not fit the dimension.
    pub fn from_fn<F>(name: &str, mut f: F, dim: Dimension) -> Result<Self, DimArrayError>
    where
        F: FnMut(&Coordinate) -> T,
    {
        let values = dim.coordinates().map(|coordinate| f(&coordinate)).collect_vec();
        let storage =
            ArrayD::from_shape_vec(IxDyn(&[values.len()]), values).map_err(StorageError::from)?;
        let name = format!("{name}({})", dim.name());
        Self::new_with(storage, dim, (), name)
    }
}

/// The metadata of a [`DimArray`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimArrayMetadata {
    /// The array name.
    pub name: String,
    /// The dimensions.
    pub dims: Vec<Dimension>,
    /// The reference dimensions.
    pub refdims: Vec<Dimension>,
    /// The array shape.
    pub shape: Vec<usize>,
    /// The element type name.
    pub element_type: String,
}

impl Display for DimArrayMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string(self).map_err(|_| std::fmt::Error)?
        )
    }
}

impl<S> Display for DimArray<S>
where
    S: ReadableStorageTraits,
    S::Element: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max_elements = global_config().display_max_elements();
        if self.name.is_empty() {
            write!(f, "DimArray")?;
        } else {
            write!(f, "DimArray {:?}", self.name)?;
        }
        write!(
            f,
            " <{}> [{}]",
            self.storage.element_type(),
            self.dims.iter().join(" × ")
        )?;
        if !self.refdims.is_empty() {
            write!(f, " refdims [{}]", self.refdims.iter().join(", "))?;
        }
        let elements = self
            .storage
            .iter_elements()
            .take(max_elements)
            .map(|element| match element {
                Ok(element) => element.to_string(),
                Err(err) => format!("<{err}>"),
            });
        write!(f, "\n  [{}", elements.format(", "))?;
        if self.len() > max_elements {
            write!(f, ", …")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use dimarrs_dimension::Lookup;

    use super::*;

    #[test]
    fn dim_array_new() {
        let storage = ArrayD::<u8>::zeros(vec![10, 5]);
        let array = DimArray::new(storage.clone(), vec![Dimension::x(10), Dimension::y(5)]).unwrap();
        assert_eq!(array.shape(), vec![10, 5]);
        assert_eq!(array.ndim(), 2);
        assert!(array.refdims().is_empty());
        assert!(array.name().is_empty());

        for dims in [
            vec![Dimension::x(9), Dimension::y(5)],
            vec![Dimension::x(10), Dimension::y(4)],
            vec![Dimension::x(10)],
        ] {
            assert!(matches!(
                DimArray::new(storage.clone(), dims),
                Err(DimArrayError::DimensionMismatch { .. })
            ));
        }
    }

    #[test]
    fn dim_array_single_dimension() {
        let storage = ArrayD::<f64>::zeros(vec![3]);
        let array = DimArray::new(storage, Dimension::ti(3)).unwrap();
        assert_eq!(array.dims(), &[Dimension::ti(3)]);
        assert!(array.has_dim("Ti"));
        assert!(!array.has_dim("X"));
        assert_eq!(array.dim_index("Ti"), Some(0));
        assert_eq!(array.dim("Ti").map(Dimension::len), Some(3));
    }

    #[test]
    fn dim_array_from_fn() {
        let dim = Dimension::regular("X", 0.0, 0.5, 4);
        let array = DimArray::from_fn(
            "double",
            |coordinate| match coordinate {
                Coordinate::Float(value) => value * 2.0,
                _ => f64::NAN,
            },
            dim.clone(),
        )
        .unwrap();
        assert_eq!(array.name(), "double(X)");
        assert_eq!(array.dims(), &[dim]);
        assert_eq!(array.to_vec().unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn dim_array_metadata() {
        let storage = ArrayD::<i16>::zeros(vec![2]);
        let array =
            DimArray::new_with(storage, Dimension::x(2), Dimension::with_len("band", 1), "a")
                .unwrap();
        let metadata = array.metadata();
        assert_eq!(metadata.shape, vec![2]);
        assert_eq!(metadata.element_type, "i16");
        assert_eq!(metadata.refdims[0].lookup(), &Lookup::NoLookup { len: 1 });
        let json: serde_json::Value = serde_json::from_str(&metadata.to_string()).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["dims"][0]["name"], "X");
    }
}
