use dimarrs_dimension::{Dimension, IntoDimensions};
use dimarrs_storage::ReadableStorageTraits;

use super::{DimArray, DimArrayError};

/// A [`DimArray`] builder.
///
/// The builder is initialised with the dimensions of the array.
/// The reference dimensions and name are optional and default to empty.
///
/// [`DimArray::builder`] returns a builder initialised from an existing array.
///
/// ### Example
/// ```rust
/// # use dimarrs::array::DimArrayBuilder;
/// # use dimarrs::dimension::Dimension;
/// let mut builder = DimArrayBuilder::new([
///     Dimension::regular("lat", -90.0, 1.0, 181),
///     Dimension::regular("lon", -180.0, 1.0, 360),
/// ]);
/// builder.name("elevation");
/// let array = builder.build(ndarray::ArrayD::<i16>::zeros(vec![181, 360]))?;
/// assert_eq!(array.name(), "elevation");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DimArrayBuilder {
    dims: Vec<Dimension>,
    refdims: Vec<Dimension>,
    name: String,
}

impl DimArrayBuilder {
    /// Create a new builder with `dims`.
    #[must_use]
    pub fn new(dims: impl IntoDimensions) -> Self {
        Self {
            dims: dims.into_dimensions(),
            refdims: Vec::new(),
            name: String::new(),
        }
    }

    /// Set the dimensions.
    pub fn dims(&mut self, dims: impl IntoDimensions) -> &mut Self {
        self.dims = dims.into_dimensions();
        self
    }

    /// Set the reference dimensions.
    pub fn refdims(&mut self, refdims: impl IntoDimensions) -> &mut Self {
        self.refdims = refdims.into_dimensions();
        self
    }

    /// Set the name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Build into a [`DimArray`].
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the dimensions do not match the shape of `storage`.
    pub fn build<S: ReadableStorageTraits>(&self, storage: S) -> Result<DimArray<S>, DimArrayError> {
        DimArray::new_with(
            storage,
            self.dims.clone(),
            self.refdims.clone(),
            self.name.clone(),
        )
    }
}
