//! `dimarrs` is a Rust library for dimension-aware N-dimensional arrays.
//!
//! A [`DimArray`](crate::array::DimArray) attaches named, ordered axis metadata ([`Dimension`](crate::dimension::Dimension)s) to raw array storage, so that indexing, slicing and broadcasting carry meaningful axis labels (`X`, `Y`, `time`) rather than bare positional indices.
//!
//! The dimensions of an array always match its storage shape:
//! - integer indexing eliminates an axis and records its dimension in the reference dimensions,
//! - range, index array, boolean mask and colon selectors derive a sub-dimension with the selected coordinates,
//! - [`similar`](crate::array::DimArray::similar) allocation and [broadcasting](crate::broadcast) reuse the dimensions of a template array.
//!
//! Storage is anything implementing [`ReadableStorageTraits`](crate::storage::ReadableStorageTraits) (and optionally [`WritableStorageTraits`](crate::storage::WritableStorageTraits)).
//! [`ndarray`] arrays with dynamic dimensionality are supported out of the box.
//!
//! ## Example
//! ```rust
//! # use dimarrs::array::{DimArray, Indexed};
//! # use dimarrs::dimension::{dimension_lengths, Coordinate, Dimension, Selector};
//! let storage = ndarray::ArrayD::from_shape_vec(vec![10, 5], (0..50).collect())?;
//! let array = DimArray::new(storage, [Dimension::x(10), Dimension::y(5)])?;
//!
//! // A full integer index returns the element
//! assert_eq!(array.get(&[Selector::Index(3), Selector::Index(2)])?, Indexed::Element(17));
//!
//! // Ranges derive sub-dimensions holding the selected coordinates
//! let subset = array.select(&[Selector::from(1..6u64), Selector::from(1..4u64)])?;
//! assert_eq!(dimension_lengths(subset.dims()), vec![5, 3]);
//! assert_eq!(subset.dims()[0].coordinate(0), Some(Coordinate::Index(1)));
//!
//! // Labeled indexing
//! let column = array.select_by_name(&[("Y", Selector::Index(0))])?;
//! assert_eq!(column.dims(), &[Dimension::x(10)]);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//! - [`dimarrs_dimension`]: dimensions, coordinate lookups and selectors, re-exported as [`dimarrs::dimension`](crate::dimension).
//! - [`dimarrs_storage`]: the storage API, views and storage adapters, re-exported as [`dimarrs::storage`](crate::storage).
//!
//! ## Licence
//! `dimarrs` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

pub mod array;
pub mod broadcast;
pub mod config;

pub use dimarrs_dimension as dimension;
pub use dimarrs_storage as storage;
