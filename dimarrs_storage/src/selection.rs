use dimarrs_dimension::{IncompatibleDimensionalityError, Selector};

use crate::{unravel_index, StorageError};

/// The per-axis indices selected by a tuple of [`Selector`]s.
///
/// Maps indices of the selection output to indices of the selected storage.
/// Axes selected with [`Selector::Index`] do not appear in the output shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionIndexer {
    axes: Vec<Vec<usize>>,
    eliminated: Vec<bool>,
    output_shape: Vec<usize>,
}

impl SelectionIndexer {
    /// Create a new selection indexer for storage with `shape`.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the number of selectors does not match the dimensionality of `shape` or a selector is invalid.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(shape: &[usize], selectors: &[Selector]) -> Result<Self, StorageError> {
        if shape.len() != selectors.len() {
            return Err(IncompatibleDimensionalityError::new(selectors.len(), shape.len()).into());
        }
        let mut axes = Vec::with_capacity(shape.len());
        let mut eliminated = Vec::with_capacity(shape.len());
        let mut output_shape = Vec::with_capacity(shape.len());
        for (selector, &len) in std::iter::zip(selectors, shape) {
            selector.validate(len as u64)?;
            // validated against a usize length
            axes.push(
                selector
                    .to_indices(len as u64)
                    .into_iter()
                    .map(|index| index as usize)
                    .collect::<Vec<_>>(),
            );
            eliminated.push(selector.eliminates_axis());
            if let Some(output_len) = selector.output_len(len as u64) {
                output_shape.push(output_len as usize);
            }
        }
        Ok(Self {
            axes,
            eliminated,
            output_shape,
        })
    }

    /// Returns the shape of the selection output.
    #[must_use]
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    /// Returns the number of selected elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.axes.iter().map(Vec::len).product()
    }

    /// Returns true if no elements are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map indices of the selection output to indices of the selected storage.
    ///
    /// Returns [`None`] if `output_indices` are out-of-bounds of the output shape.
    #[must_use]
    pub fn storage_indices(&self, output_indices: &[usize]) -> Option<Vec<usize>> {
        if output_indices.len() != self.output_shape.len() {
            return None;
        }
        let mut output_indices = output_indices.iter();
        std::iter::zip(&self.axes, &self.eliminated)
            .map(|(axis, eliminated)| {
                if *eliminated {
                    axis.first().copied()
                } else {
                    axis.get(*output_indices.next()?).copied()
                }
            })
            .collect()
    }

    /// Returns an iterator over the storage indices of the selected elements in output (row-major) order.
    pub fn iter_indices(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let axis_lens = self.axes.iter().map(Vec::len).collect::<Vec<_>>();
        (0..self.len()).filter_map(move |index| {
            let axis_indices = unravel_index(index, &axis_lens)?;
            std::iter::zip(&self.axes, axis_indices)
                .map(|(axis, i)| axis.get(i).copied())
                .collect()
        })
    }
}
