use dimarrs::array::{DimArray, DimArrayError};
use dimarrs::dimension::{Dimension, Selector};
use dimarrs::storage::{ReadableStorageTraits, StorageError, StorageShape};
use ndarray::ArrayD;

/// A 2x3 storage of `0..6` whose read of element `[0, 1]` fails.
#[derive(Clone, Debug, PartialEq)]
struct FailingStorage;

impl ReadableStorageTraits for FailingStorage {
    type Element = i32;

    fn shape(&self) -> StorageShape {
        vec![2, 3]
    }

    fn get(&self, indices: &[usize]) -> Result<i32, StorageError> {
        match indices {
            [0, 1] => Err(StorageError::Other("io failure".to_string())),
            &[row @ 0..=1, column @ 0..=2] => Ok(i32::try_from(row * 3 + column).unwrap()),
            _ => Err(StorageError::OutOfBounds {
                indices: indices.to_vec(),
                shape: self.shape(),
            }),
        }
    }
}

fn is_io_failure<T>(result: &Result<T, DimArrayError>) -> bool {
    matches!(
        result,
        Err(DimArrayError::Storage(StorageError::Other(message))) if message == "io failure"
    )
}

fn array() -> DimArray<FailingStorage> {
    DimArray::new(FailingStorage, [Dimension::x(2), Dimension::y(3)]).unwrap()
}

#[test]
fn storage_errors_copy() {
    let array = array();
    assert!(is_io_failure(&array.copy()));
    assert!(is_io_failure(&array.to_raw()));
    assert!(is_io_failure(&array.to_vec()));

    let mut raw = ArrayD::from_elem(vec![2, 3], -9);
    assert!(is_io_failure(&array.copy_into_raw(&mut raw)));
    assert_eq!(raw[[0, 0]], 0);
    assert_eq!(raw[[1, 2]], -9);

    let mut destination = DimArray::new(ArrayD::<i32>::zeros(vec![2, 3]), [Dimension::x(2), Dimension::y(3)])
        .unwrap();
    assert!(is_io_failure(&array.copy_into(&mut destination)));
    assert!(is_io_failure(&destination.copy_from_raw(&FailingStorage)));
}

#[test]
fn storage_errors_iter() {
    let array = array();
    let elements = array.iter().collect::<Vec<_>>();
    assert_eq!(elements.len(), 6);
    assert!(matches!(elements[0], Ok(0)));
    assert!(matches!(&elements[1], Err(StorageError::Other(message)) if message == "io failure"));
    assert!(matches!(elements[2], Ok(2)));
    assert!(matches!(elements[5], Ok(5)));
    assert!(array.to_string().ends_with("[0, <io failure>, 2, 3, 4, 5]"));
}

#[test]
fn storage_errors_indexing() {
    let array = array();
    assert!(is_io_failure(&array.get(&[Selector::Index(0), Selector::Index(1)])));
    assert!(is_io_failure(&array.get(&[Selector::Index(0), Selector::All])));
    assert!(is_io_failure(&array.get(&[Selector::from(0..3u64)])));
    assert_eq!(
        array
            .select(&[Selector::Index(1), Selector::All])
            .unwrap()
            .to_vec()
            .unwrap(),
        vec![3, 4, 5]
    );
}
