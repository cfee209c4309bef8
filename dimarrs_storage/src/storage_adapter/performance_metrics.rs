//! A storage adapter which records performance metrics.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::ArrayD;

use dimarrs_dimension::Selector;

use crate::{ReadableStorageTraits, StorageError, StorageShape, WritableStorageTraits};

/// The performance metrics storage adapter. Accumulates metrics, such as elements read and written.
///
/// It is intended to aid in testing by allowing the application to validate that metrics (e.g., elements read/written, slice operations) match expected values for specific operations.
///
/// ### Example
/// ```rust
/// # use dimarrs_storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
/// # use dimarrs_storage::ReadableStorageTraits;
/// let storage = ndarray::ArrayD::<f32>::zeros(vec![4, 4]);
/// let storage = PerformanceMetricsStorageAdapter::new(storage);
/// storage.get(&[1, 2]).unwrap();
/// assert_eq!(storage.reads(), 1);
/// assert_eq!(storage.elements_read(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PerformanceMetricsStorageAdapter<S> {
    storage: S,
    elements_read: AtomicUsize,
    elements_written: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    slices: AtomicUsize,
}

impl<S> PerformanceMetricsStorageAdapter<S> {
    /// Create a new performance metrics storage adapter.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            elements_read: AtomicUsize::default(),
            elements_written: AtomicUsize::default(),
            reads: AtomicUsize::default(),
            writes: AtomicUsize::default(),
            slices: AtomicUsize::default(),
        }
    }

    /// Reset the performance metrics.
    pub fn reset(&self) {
        self.elements_read.store(0, Ordering::Relaxed);
        self.elements_written.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.slices.store(0, Ordering::Relaxed);
    }

    /// Returns the number of elements read.
    pub fn elements_read(&self) -> usize {
        self.elements_read.load(Ordering::Relaxed)
    }

    /// Returns the number of elements written.
    pub fn elements_written(&self) -> usize {
        self.elements_written.load(Ordering::Relaxed)
    }

    /// Returns the number of read requests.
    ///
    /// A slice counts as a single read.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of write requests.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of slice requests.
    pub fn slices(&self) -> usize {
        self.slices.load(Ordering::Relaxed)
    }

    /// Returns the wrapped storage.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Unwrap the adapter, returning the wrapped storage.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn record_read(&self, elements: usize) {
        self.elements_read.fetch_add(elements, Ordering::Relaxed);
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn record_write(&self, elements: usize) {
        self.elements_written.fetch_add(elements, Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl<S: ReadableStorageTraits> ReadableStorageTraits for PerformanceMetricsStorageAdapter<S> {
    type Element = S::Element;

    fn shape(&self) -> StorageShape {
        self.storage.shape()
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        let value = self.storage.get(indices)?;
        self.record_read(1);
        Ok(value)
    }

    fn get_linear(&self, index: usize) -> Result<S::Element, StorageError> {
        let value = self.storage.get_linear(index)?;
        self.record_read(1);
        Ok(value)
    }

    fn slice(&self, selectors: &[Selector]) -> Result<ArrayD<S::Element>, StorageError> {
        let values = self.storage.slice(selectors)?;
        self.record_read(values.len());
        self.slices.fetch_add(1, Ordering::Relaxed);
        Ok(values)
    }

    fn slice_linear(&self, selector: &Selector) -> Result<ArrayD<S::Element>, StorageError> {
        let values = self.storage.slice_linear(selector)?;
        self.record_read(values.len());
        self.slices.fetch_add(1, Ordering::Relaxed);
        Ok(values)
    }

    fn iter_elements(&self) -> Box<dyn Iterator<Item = Result<S::Element, StorageError>> + '_> {
        self.record_read(self.storage.len());
        self.storage.iter_elements()
    }

    fn to_owned_storage(&self) -> Result<ArrayD<S::Element>, StorageError> {
        let values = self.storage.to_owned_storage()?;
        self.record_read(values.len());
        Ok(values)
    }
}

impl<S: WritableStorageTraits> WritableStorageTraits for PerformanceMetricsStorageAdapter<S> {
    fn set(&mut self, indices: &[usize], value: S::Element) -> Result<(), StorageError> {
        self.record_write(1);
        self.storage.set(indices, value)
    }

    fn set_linear(&mut self, index: usize, value: S::Element) -> Result<(), StorageError> {
        self.record_write(1);
        self.storage.set_linear(index, value)
    }

    fn set_selection(
        &mut self,
        selectors: &[Selector],
        value: S::Element,
    ) -> Result<(), StorageError> {
        let indexer = crate::SelectionIndexer::new(&self.storage.shape(), selectors)?;
        self.record_write(indexer.len());
        self.storage.set_selection(selectors, value)
    }

    fn assign_selection(
        &mut self,
        selectors: &[Selector],
        elements: &[S::Element],
    ) -> Result<(), StorageError> {
        self.record_write(elements.len());
        self.storage.assign_selection(selectors, elements)
    }
}
