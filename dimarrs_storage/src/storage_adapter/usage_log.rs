//! A storage adapter which logs storage method calls.

use std::{io::Write, sync::Arc};

use itertools::Itertools;
use ndarray::ArrayD;
use parking_lot::Mutex;

use dimarrs_dimension::Selector;

use crate::{ReadableStorageTraits, StorageError, StorageShape, WritableStorageTraits};

/// The usage log storage adapter. Logs storage method calls.
///
/// It is intended to aid in debugging and optimising the storage access of higher level operations.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use dimarrs_storage::storage_adapter::usage_log::UsageLogStorageAdapter;
/// # use dimarrs_storage::ReadableStorageTraits;
/// let log_writer = Arc::new(parking_lot::Mutex::new(std::io::stdout()));
/// let storage = ndarray::ArrayD::<u8>::zeros(vec![2, 3]);
/// let storage = UsageLogStorageAdapter::new(storage, log_writer, || "[usage] ".to_string());
/// storage.get(&[1, 1]).unwrap(); // logs "[usage] get([1, 1]) -> Ok"
/// ```
pub struct UsageLogStorageAdapter<S> {
    storage: S,
    handle: Arc<Mutex<dyn Write + Send>>,
    prefix_func: fn() -> String,
}

impl<S> UsageLogStorageAdapter<S> {
    /// Create a new usage log storage adapter.
    ///
    /// Each logged line starts with the output of `prefix_func`.
    pub fn new(storage: S, handle: Arc<Mutex<dyn Write + Send>>, prefix_func: fn() -> String) -> Self {
        Self {
            storage,
            handle,
            prefix_func,
        }
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

    fn log<T>(&self, call: std::fmt::Arguments, result: &Result<T, StorageError>) {
        let outcome = match result {
            Ok(_) => "Ok".to_string(),
            Err(err) => format!("Err({err})"),
        };
        // a failed log write must not fail the storage operation
        let _ = writeln!(
            self.handle.lock(),
            "{}{call} -> {outcome}",
            (self.prefix_func)()
        );
    }
}

impl<S> std::fmt::Debug for UsageLogStorageAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLogStorageAdapter").finish_non_exhaustive()
    }
}

fn format_selectors(selectors: &[Selector]) -> String {
    selectors.iter().join(", ")
}

impl<S: ReadableStorageTraits> ReadableStorageTraits for UsageLogStorageAdapter<S> {
    type Element = S::Element;

    fn shape(&self) -> StorageShape {
        self.storage.shape()
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        let result = self.storage.get(indices);
        self.log(format_args!("get({indices:?})"), &result);
        result
    }

    fn get_linear(&self, index: usize) -> Result<S::Element, StorageError> {
        let result = self.storage.get_linear(index);
        self.log(format_args!("get_linear({index})"), &result);
        result
    }

    fn slice(&self, selectors: &[Selector]) -> Result<ArrayD<S::Element>, StorageError> {
        let result = self.storage.slice(selectors);
        self.log(
            format_args!("slice([{}])", format_selectors(selectors)),
            &result,
        );
        result
    }

    fn slice_linear(&self, selector: &Selector) -> Result<ArrayD<S::Element>, StorageError> {
        let result = self.storage.slice_linear(selector);
        self.log(format_args!("slice_linear({selector})"), &result);
        result
    }

    fn iter_elements(&self) -> Box<dyn Iterator<Item = Result<S::Element, StorageError>> + '_> {
        self.log::<()>(format_args!("iter_elements()"), &Ok(()));
        self.storage.iter_elements()
    }

    fn to_owned_storage(&self) -> Result<ArrayD<S::Element>, StorageError> {
        let result = self.storage.to_owned_storage();
        self.log(format_args!("to_owned_storage()"), &result);
        result
    }
}

impl<S: WritableStorageTraits> WritableStorageTraits for UsageLogStorageAdapter<S> {
    fn set(&mut self, indices: &[usize], value: S::Element) -> Result<(), StorageError> {
        let result = self.storage.set(indices, value);
        self.log(format_args!("set({indices:?})"), &result);
        result
    }

    fn set_linear(&mut self, index: usize, value: S::Element) -> Result<(), StorageError> {
        let result = self.storage.set_linear(index, value);
        self.log(format_args!("set_linear({index})"), &result);
        result
    }

    fn set_selection(
        &mut self,
        selectors: &[Selector],
        value: S::Element,
    ) -> Result<(), StorageError> {
        let result = self.storage.set_selection(selectors, value);
        self.log(
            format_args!("set_selection([{}])", format_selectors(selectors)),
            &result,
        );
        result
    }

    fn assign_selection(
        &mut self,
        selectors: &[Selector],
        elements: &[S::Element],
    ) -> Result<(), StorageError> {
        let result = self.storage.assign_selection(selectors, elements);
        self.log(
            format_args!(
                "assign_selection([{}], {} elements)",
                format_selectors(selectors),
                elements.len()
            ),
            &result,
        );
        result
    }
}
