//! Broadcasting of element functions over dimensional arrays, raw arrays and scalars.
//!
//! A [`Broadcasted`] is a lazy expression tree: an element function applied to [`BroadcastArg`]s, which may themselves be nested expressions.
//! Operand shapes are aligned on their trailing axes, and axes of length one are repeated to the output length (as in [`ndarray`] and `NumPy`).
//!
//! Materialising an expression requires at least one operand that carries dimensions.
//! The first such operand in depth-first order is the template for the dimensions and name of the result.
//!
//! The output shape must equal the shape of the template.
//! A broadcast that expands the template (e.g. a length one axis to length N) is rejected with [`DimArrayError::DimensionMismatch`], as the coordinates of the expanded axis are undefined.
//!
//! ### Example
//! ```rust
//! # use dimarrs::array::DimArray;
//! # use dimarrs::broadcast::{BroadcastArg, Broadcasted};
//! # use dimarrs::dimension::Dimension;
//! let a = DimArray::new(ndarray::ArrayD::<f64>::ones(vec![3, 2]), [Dimension::x(3), Dimension::y(2)])?;
//! let b = ndarray::ArrayD::<f64>::from_elem(vec![2], 2.0);
//! let sum = Broadcasted::new(
//!     |args: &[f64]| args.iter().sum(),
//!     vec![BroadcastArg::Operand(&a), BroadcastArg::Operand(&b), BroadcastArg::Scalar(0.5)],
//! )
//! .materialize()?;
//! assert_eq!(sum.dims(), a.dims());
//! assert!(sum.to_vec()?.iter().all(|&element| element == 3.5));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use itertools::Itertools;
use ndarray::{ArrayBase, ArrayD, Data, IxDyn};

use dimarrs_dimension::Selector;
use dimarrs_storage::{
    unravel_index, ReadableStorageTraits, StorageError, StorageView, StorageViewMut,
};

use crate::array::{DimArray, DimArrayError, DimTemplate};

/// An operand of a broadcast.
pub trait BroadcastOperand<T> {
    /// Returns the shape of the operand.
    fn shape(&self) -> Vec<usize>;

    /// Retrieve the element at `indices`.
    ///
    /// # Errors
    /// Returns [`StorageError`] if `indices` are incompatible with the operand.
    fn get(&self, indices: &[usize]) -> Result<T, StorageError>;

    /// Returns the dimensions, reference dimensions and name of the operand, or [`None`] if the operand has no dimensions.
    fn template(&self) -> Option<DimTemplate<'_>>;
}

impl<S: ReadableStorageTraits> BroadcastOperand<S::Element> for DimArray<S> {
    fn shape(&self) -> Vec<usize> {
        DimArray::shape(self)
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        self.data().get(indices)
    }

    fn template(&self) -> Option<DimTemplate<'_>> {
        Some(DimArray::template(self))
    }
}

impl<A: Clone, Sr: Data<Elem = A>> BroadcastOperand<A> for ArrayBase<Sr, IxDyn> {
    fn shape(&self) -> Vec<usize> {
        ReadableStorageTraits::shape(self)
    }

    fn get(&self, indices: &[usize]) -> Result<A, StorageError> {
        ReadableStorageTraits::get(self, indices)
    }

    fn template(&self) -> Option<DimTemplate<'_>> {
        None
    }
}

impl<S: ReadableStorageTraits + ?Sized> BroadcastOperand<S::Element> for StorageView<'_, S> {
    fn shape(&self) -> Vec<usize> {
        ReadableStorageTraits::shape(self)
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        ReadableStorageTraits::get(self, indices)
    }

    fn template(&self) -> Option<DimTemplate<'_>> {
        None
    }
}

impl<S: ReadableStorageTraits + ?Sized> BroadcastOperand<S::Element> for StorageViewMut<'_, S> {
    fn shape(&self) -> Vec<usize> {
        ReadableStorageTraits::shape(self)
    }

    fn get(&self, indices: &[usize]) -> Result<S::Element, StorageError> {
        ReadableStorageTraits::get(self, indices)
    }

    fn template(&self) -> Option<DimTemplate<'_>> {
        None
    }
}

/// An argument of a [`Broadcasted`] expression.
pub enum BroadcastArg<'a, T> {
    /// An array operand.
    Operand(&'a dyn BroadcastOperand<T>),
    /// A scalar, broadcast to every element.
    Scalar(T),
    /// A nested (lazy) expression.
    Nested(Broadcasted<'a, T>),
}

impl<T> std::fmt::Debug for BroadcastArg<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "Operand({:?})", operand.shape()),
            Self::Scalar(_) => write!(f, "Scalar"),
            Self::Nested(broadcasted) => write!(f, "Nested({broadcasted:?})"),
        }
    }
}

/// Element function of a [`Broadcasted`] expression.
type ElementFn<'a, T> = Box<dyn Fn(&[T]) -> T + 'a>;

/// A lazy broadcast expression: an element function applied to broadcast arguments.
pub struct Broadcasted<'a, T> {
    f: ElementFn<'a, T>,
    args: Vec<BroadcastArg<'a, T>>,
}

impl<T> std::fmt::Debug for Broadcasted<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcasted")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Broadcast two shapes together, aligning their trailing axes.
///
/// # Errors
/// Returns [`DimArrayError::BroadcastIncompatible`] if an aligned pair of axes differ in length and neither has length one.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Vec<usize>, DimArrayError> {
    let ndim = a.len().max(b.len());
    let axis_len = |shape: &[usize], axis: usize| {
        (axis + shape.len())
            .checked_sub(ndim)
            .map_or(1, |axis| shape[axis])
    };
    (0..ndim)
        .map(|axis| match (axis_len(a, axis), axis_len(b, axis)) {
            (len_a, len_b) if len_a == len_b => Ok(len_a),
            (1, len) | (len, 1) => Ok(len),
            _ => Err(DimArrayError::BroadcastIncompatible(a.to_vec(), b.to_vec())),
        })
        .collect()
}

/// Map `indices` of the broadcast output to indices of an operand with `shape`.
fn operand_indices(indices: &[usize], shape: &[usize]) -> Vec<usize> {
    let offset = indices.len() - shape.len();
    std::iter::zip(&indices[offset..], shape)
        .map(|(&index, &len)| if len == 1 { 0 } else { index })
        .collect()
}

impl<'a, T: Clone> Broadcasted<'a, T> {
    /// Create a new broadcast expression applying `f` to the elements of `args`.
    ///
    /// `f` receives one element per argument, in argument order.
    pub fn new(f: impl Fn(&[T]) -> T + 'a, args: Vec<BroadcastArg<'a, T>>) -> Self {
        Self {
            f: Box::new(f),
            args,
        }
    }

    /// Returns the arguments of the expression.
    #[must_use]
    pub fn args(&self) -> &[BroadcastArg<'a, T>] {
        &self.args
    }

    /// Find the first operand with dimensions, searching the expression tree depth first.
    ///
    /// Nested expressions are searched in place, before the arguments that follow them.
    ///
    /// # Errors
    /// Returns [`DimArrayError::DimArrayNotFound`] if no operand has dimensions.
    pub fn find_dimarray(&self) -> Result<DimTemplate<'a>, DimArrayError> {
        let mut stack = self.args.iter().rev().collect_vec();
        while let Some(arg) = stack.pop() {
            match arg {
                BroadcastArg::Operand(operand) => {
                    let operand: &'a dyn BroadcastOperand<T> = *operand;
                    if let Some(template) = operand.template() {
                        return Ok(template);
                    }
                }
                BroadcastArg::Scalar(_) => {}
                BroadcastArg::Nested(broadcasted) => stack.extend(broadcasted.args.iter().rev()),
            }
        }
        Err(DimArrayError::DimArrayNotFound)
    }

    /// Returns the output shape of the expression.
    ///
    /// # Errors
    /// Returns [`DimArrayError::BroadcastIncompatible`] if the operand shapes cannot be broadcast together.
    pub fn shape(&self) -> Result<Vec<usize>, DimArrayError> {
        self.args.iter().try_fold(Vec::new(), |shape, arg| match arg {
            BroadcastArg::Operand(operand) => broadcast_shapes(&shape, &operand.shape()),
            BroadcastArg::Scalar(_) => Ok(shape),
            BroadcastArg::Nested(broadcasted) => broadcast_shapes(&shape, &broadcasted.shape()?),
        })
    }

    /// Evaluate the expression at `indices` of an output that the expression broadcasts to.
    fn evaluate(&self, indices: &[usize]) -> Result<T, DimArrayError> {
        let elements = self
            .args
            .iter()
            .map(|arg| match arg {
                BroadcastArg::Operand(operand) => Ok(operand
                    .get(&operand_indices(indices, &operand.shape()))?),
                BroadcastArg::Scalar(value) => Ok(value.clone()),
                BroadcastArg::Nested(broadcasted) => broadcasted.evaluate(indices),
            })
            .collect::<Result<Vec<_>, DimArrayError>>()?;
        Ok((self.f)(&elements))
    }

    /// Evaluate the expression into a new dimensional array.
    ///
    /// The dimensions, reference dimensions and name of the result are taken from the first operand with dimensions (see [`Broadcasted::find_dimarray`]).
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if
    ///  - no operand has dimensions ([`DimArrayError::DimArrayNotFound`]),
    ///  - the operand shapes cannot be broadcast together ([`DimArrayError::BroadcastIncompatible`]),
    ///  - the output shape differs from the shape of the template ([`DimArrayError::DimensionMismatch`]), or
    ///  - an operand cannot be read.
    pub fn materialize(&self) -> Result<DimArray<ArrayD<T>>, DimArrayError> {
        let template = self.find_dimarray()?;
        let shape = self.shape()?;
        log::debug!(
            "Broadcasting to shape {shape:?} with template [{}]",
            template.dims().iter().join(", ")
        );
        if template.shape() != shape.iter().map(|&len| len as u64).collect_vec() {
            return Err(DimArrayError::DimensionMismatch {
                dims: template.dims().to_vec(),
                shape,
            });
        }

        let len = shape.iter().product::<usize>();
        let elements = (0..len)
            .map(|index| {
                let indices = unravel_index(index, &shape).ok_or(StorageError::LinearOutOfBounds {
                    index,
                    len,
                })?;
                self.evaluate(&indices)
            })
            .collect::<Result<Vec<_>, DimArrayError>>()?;
        let storage = ArrayD::from_shape_vec(IxDyn(&shape), elements).map_err(StorageError::from)?;

        let selectors = shape
            .iter()
            .map(|&len| Selector::Range(0..len as u64))
            .collect_vec();
        template.rebuild_sliced(storage, &selectors)
    }
}

impl<S: ReadableStorageTraits> DimArray<S> {
    /// Apply `f` to every element, returning a new array with the dimensions, reference dimensions and name of this array.
    ///
    /// # Errors
    /// Returns [`DimArrayError::Storage`] if the storage cannot be read.
    pub fn map(
        &self,
        f: impl Fn(&S::Element) -> S::Element,
    ) -> Result<DimArray<ArrayD<S::Element>>, DimArrayError> {
        Broadcasted::new(
            move |args: &[S::Element]| f(&args[0]),
            vec![BroadcastArg::Operand(self)],
        )
        .materialize()
    }

    /// Apply `f` element-wise to this array and `other`, broadcasting `other` to the shape of this array.
    ///
    /// # Errors
    /// Returns a [`DimArrayError`] if `other` cannot be broadcast to the shape of this array.
    pub fn zip_with(
        &self,
        other: &dyn BroadcastOperand<S::Element>,
        f: impl Fn(&S::Element, &S::Element) -> S::Element,
    ) -> Result<DimArray<ArrayD<S::Element>>, DimArrayError> {
        Broadcasted::new(
            move |args: &[S::Element]| f(&args[0], &args[1]),
            vec![BroadcastArg::Operand(self), BroadcastArg::Operand(other)],
        )
        .materialize()
    }
}
