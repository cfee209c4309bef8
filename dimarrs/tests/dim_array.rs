use dimarrs::array::{DimArray, DimArrayError, Indexed};
use dimarrs::dimension::{Coordinate, Dimension, Selector};
use ndarray::{ArrayD, IxDyn};

fn array_xy() -> DimArray<ArrayD<i64>> {
    let storage = ArrayD::from_shape_vec(IxDyn(&[10, 5]), (0..50).collect()).unwrap();
    DimArray::new_with(
        storage,
        [Dimension::x(10), Dimension::y(5)],
        (),
        "values",
    )
    .unwrap()
}

#[test]
fn dim_array_invariant() {
    let array = array_xy();
    for (dim, len) in std::iter::zip(array.dims(), array.shape()) {
        assert_eq!(dim.len(), len as u64);
    }
}

#[test]
fn dim_array_mismatch_any_axis() {
    let storage = ArrayD::<f32>::zeros(vec![2, 3, 4]);
    for axis in 0..3 {
        let mut dims = vec![Dimension::x(2), Dimension::y(3), Dimension::z(4)];
        let grown = Dimension::with_len(dims[axis].name().clone(), dims[axis].len() + 1);
        dims[axis] = grown;
        let err = DimArray::new(storage.clone(), dims).unwrap_err();
        let DimArrayError::DimensionMismatch { dims, shape } = err else {
            panic!("expected a dimension mismatch");
        };
        assert_eq!(dims.len(), 3);
        assert_eq!(shape, vec![2, 3, 4]);
    }
}

#[test]
fn dim_array_rebuild_identity() {
    let array = array_xy();
    let rebuilt = array.rebuild(array.data().clone()).unwrap();
    assert_eq!(rebuilt.dims(), array.dims());
    assert_eq!(rebuilt.refdims(), array.refdims());
    assert_eq!(rebuilt.name(), array.name());
}

#[test]
fn dim_array_slicing_reduces_dims() {
    let array = array_xy();

    let Indexed::Array(row) = array
        .get(&[Selector::Index(3), Selector::from(0..5u64)])
        .unwrap()
    else {
        panic!("expected an array");
    };
    assert_eq!(row.dims(), &[Dimension::y(5)]);
    assert_eq!(row.refdims().len(), 1);
    assert_eq!(row.refdims()[0].name(), "X");
    assert_eq!(row.refdims()[0].coordinate(0), Some(Coordinate::Index(3)));
    assert_eq!(row.to_vec().unwrap(), vec![15, 16, 17, 18, 19]);
    assert_eq!(row.name(), "values");

    let subset = array
        .get(&[Selector::from(0..5u64), Selector::from(0..3u64)])
        .unwrap()
        .into_array()
        .unwrap();
    assert_eq!(subset.dims(), &[Dimension::x(5), Dimension::y(3)]);
    assert!(subset.refdims().is_empty());

    let offset = array
        .get(&[Selector::from(2..5u64), Selector::from(vec![4u64, 1])])
        .unwrap()
        .into_array()
        .unwrap();
    assert_eq!(
        offset.dims()[0].coordinates().collect::<Vec<_>>(),
        vec![Coordinate::Index(2), Coordinate::Index(3), Coordinate::Index(4)]
    );
    assert_eq!(
        offset.dims()[1].coordinates().collect::<Vec<_>>(),
        vec![Coordinate::Index(4), Coordinate::Index(1)]
    );
    assert_eq!(offset.to_vec().unwrap(), vec![14, 11, 19, 16, 24, 21]);
}

#[test]
fn dim_array_scalar_index_unwrapped() {
    let array = array_xy();
    let element = array
        .get(&[Selector::Index(3), Selector::Index(2)])
        .unwrap();
    assert_eq!(element, Indexed::Element(17));
    assert_eq!(array.element(&[3, 2]).unwrap(), 17);
}

#[test]
fn dim_array_similar() {
    let array = array_xy();
    let mut similar = array.similar();
    assert_eq!(similar.dims(), array.dims());
    assert_eq!(similar.shape(), array.shape());
    similar.set(&[0, 0], 1).unwrap();
    assert_eq!(array.element(&[0, 0]).unwrap(), 0);
    assert_eq!(similar.element(&[0, 0]).unwrap(), 1);
}

#[test]
fn dim_array_copy_independence() {
    let array = array_xy();
    let mut copy = array.copy().unwrap();
    assert_eq!(copy.dims(), array.dims());
    assert_eq!(copy.refdims(), array.refdims());
    assert_eq!(copy.name(), array.name());
    assert_eq!(copy.data(), array.data());
    assert_ne!(copy.data().as_ptr(), array.data().as_ptr());

    copy.set(&[9, 4], -1).unwrap();
    assert_eq!(array.element(&[9, 4]).unwrap(), 49);
}

#[test]
fn dim_array_copy_into() {
    let array = array_xy();
    let mut destination = DimArray::new(
        ArrayD::<i64>::zeros(vec![10, 5]),
        [Dimension::regular("lon", 0.0, 1.0, 10), Dimension::y(5)],
    )
    .unwrap();
    array.copy_into(&mut destination).unwrap();
    assert_eq!(destination.data(), array.data());
    assert!(destination.has_dim("lon"));

    let mut small = DimArray::new(ArrayD::<i64>::zeros(vec![5]), Dimension::x(5)).unwrap();
    assert!(matches!(
        array.copy_into(&mut small),
        Err(DimArrayError::ShapeMismatch { .. })
    ));
}

#[test]
fn dim_array_display() {
    let array = DimArray::new_with(
        ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1u8, 2, 3, 4]).unwrap(),
        [Dimension::x(2), Dimension::y(2)],
        Dimension::ti(1),
        "a",
    )
    .unwrap();
    assert_eq!(
        array.to_string(),
        "DimArray \"a\" <u8> [X (2) × Y (2)] refdims [Ti (1)]\n  [1, 2, 3, 4]"
    );
}
