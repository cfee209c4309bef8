use itertools::Itertools;

use dimarrs_dimension::{dimension_lengths, select_dimensions, Dimension, IntoDimensions, Selector};
use dimarrs_storage::ReadableStorageTraits;

use super::{DimArray, DimArrayError};
use crate::config::global_config;

/// The dimensions, reference dimensions and name a derived array is rebuilt from.
///
/// A template borrows these from an existing [`DimArray`], see [`DimArray::template`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DimTemplate<'a> {
    dims: &'a [Dimension],
    refdims: &'a [Dimension],
    name: &'a str,
}

impl<'a> DimTemplate<'a> {
    /// Create a new template.
    #[must_use]
    pub fn new(dims: &'a [Dimension], refdims: &'a [Dimension], name: &'a str) -> Self {
        Self {
            dims,
            refdims,
            name,
        }
    }

    /// Returns the template dimensions.
    #[must_use]
    pub fn dims(&self) -> &'a [Dimension] {
        self.dims
    }

    /// Returns the template reference dimensions.
    #[must_use]
    pub fn refdims(&self) -> &'a [Dimension] {
        self.refdims
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the template with a different name.
    #[must_use]
    pub fn with_name(self, name: &'a str) -> Self {
        Self { name, ..self }
    }

    /// Returns the lengths of the template dimensions.
    #[must_use]
    pub fn shape(&self) -> Vec<u64> {
        dimension_lengths(self.dims)
    }

    /// Rebuild an array from `storage` with the template dimensions, reference dimensions and name.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the template dimensions do not match the storage shape.
    pub fn rebuild<S: ReadableStorageTraits>(
        &self,
        storage: S,
    ) -> Result<DimArray<S>, DimArrayError> {
        DimArray::new_with(storage, self.dims, self.refdims, self.name)
    }

    /// Rebuild an array from `storage` that was sliced from an array with the template dimensions by `selectors`.
    ///
    /// The dimension of each axis is derived by [`Dimension::subdimension`].
    /// Axes eliminated by [`Selector::Index`] are dropped from the dimensions and appended to the reference dimensions, unless refdims tracking is disabled in the [global config](crate::config::global_config).
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if
    ///  - the number of selectors does not match the number of template dimensions,
    ///  - a selector is invalid for its dimension, or
    ///  - the derived dimensions do not match the shape of `storage`.
    pub fn rebuild_sliced<S: ReadableStorageTraits>(
        &self,
        storage: S,
        selectors: &[Selector],
    ) -> Result<DimArray<S>, DimArrayError> {
        let (dims, eliminated) = select_dimensions(self.dims, selectors)?;
        let mut refdims = self.refdims.to_vec();
        if !eliminated.is_empty() {
            let track_refdims = global_config().track_refdims();
            if track_refdims {
                log::debug!(
                    "Moving eliminated dimensions [{}] to refdims",
                    eliminated.iter().join(", ")
                );
                refdims.extend(eliminated);
            } else {
                log::warn!(
                    "Discarding eliminated dimensions [{}], refdims tracking is disabled",
                    eliminated.iter().join(", ")
                );
            }
        }
        DimArray::new_with(storage, dims, refdims, self.name)
    }
}

/// A builder for rebuilding an array from a [`DimTemplate`] with optional overrides.
///
/// Any of the dimensions, reference dimensions or name that is not overridden is taken from the template.
/// Use [`DimArray::rebuilder`] to create a rebuilder.
///
/// ### Example
/// ```rust
/// # use dimarrs::array::DimArray;
/// # use dimarrs::dimension::Dimension;
/// let array = DimArray::new(ndarray::ArrayD::<u8>::zeros(vec![4]), Dimension::x(4))?;
/// let renamed = array
///     .rebuilder()
///     .dims(Dimension::with_len("lon", 4))
///     .name("elevation")
///     .build(array.data().clone())?;
/// assert!(renamed.has_dim("lon"));
/// assert_eq!(renamed.name(), "elevation");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Rebuild<'a> {
    template: DimTemplate<'a>,
    dims: Option<Vec<Dimension>>,
    refdims: Option<Vec<Dimension>>,
    name: Option<String>,
}

impl<'a> Rebuild<'a> {
    /// Create a new rebuilder from `template`.
    #[must_use]
    pub fn new(template: DimTemplate<'a>) -> Self {
        Self {
            template,
            dims: None,
            refdims: None,
            name: None,
        }
    }

    /// Override the dimensions.
    pub fn dims(&mut self, dims: impl IntoDimensions) -> &mut Self {
        self.dims = Some(dims.into_dimensions());
        self
    }

    /// Override the reference dimensions.
    pub fn refdims(&mut self, refdims: impl IntoDimensions) -> &mut Self {
        self.refdims = Some(refdims.into_dimensions());
        self
    }

    /// Override the name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Build a new array from `storage`.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the dimensions do not match the storage shape.
    pub fn build<S: ReadableStorageTraits>(&self, storage: S) -> Result<DimArray<S>, DimArrayError> {
        let dims = self
            .dims
            .clone()
            .unwrap_or_else(|| self.template.dims.to_vec());
        let refdims = self
            .refdims
            .clone()
            .unwrap_or_else(|| self.template.refdims.to_vec());
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.template.name.to_string());
        DimArray::new_with(storage, dims, refdims, name)
    }
}

impl<S: ReadableStorageTraits> DimArray<S> {
    /// Returns the template of this array for rebuilding derived arrays.
    #[must_use]
    pub fn template(&self) -> DimTemplate<'_> {
        DimTemplate::new(&self.dims, &self.refdims, &self.name)
    }

    /// Rebuild an array from `storage` with the dimensions, reference dimensions and name of this array.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimensionMismatch`] if the dimensions do not match the shape of `storage`.
    pub fn rebuild<S2: ReadableStorageTraits>(
        &self,
        storage: S2,
    ) -> Result<DimArray<S2>, DimArrayError> {
        self.template().rebuild(storage)
    }

    /// Returns a [`Rebuild`] builder with this array as the template.
    #[must_use]
    pub fn rebuilder(&self) -> Rebuild<'_> {
        Rebuild::new(self.template())
    }

    /// Rebuild this array with a new name.
    ///
    /// The storage and dimensions are unchanged and are not revalidated.
    #[must_use]
    pub fn rebuild_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Rebuild an array from `storage` that was sliced from this array by `selectors`.
    ///
    /// See [`DimTemplate::rebuild_sliced`].
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if the selectors are incompatible with the dimensions of this array or the derived dimensions do not match the shape of `storage`.
    pub fn rebuild_sliced<S2: ReadableStorageTraits>(
        &self,
        storage: S2,
        selectors: &[Selector],
    ) -> Result<DimArray<S2>, DimArrayError> {
        self.template().rebuild_sliced(storage, selectors)
    }
}
