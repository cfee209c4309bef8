use dimarrs_dimension::Selector;
use dimarrs_storage::{
    ReadableStorageTraits, StorageError, StorageView, StorageViewMut, WritableStorageTraits,
};
use ndarray::{ArrayD, IxDyn};

fn storage() -> ArrayD<u16> {
    ArrayD::from_shape_vec(IxDyn(&[3, 4]), (0..12).collect()).unwrap()
}

#[test]
fn view_reads_parent() {
    let storage = storage();
    let view = StorageView::new(&storage, &[Selector::from(1..3u64), Selector::Index(2)]).unwrap();
    assert_eq!(view.shape(), vec![2]);
    assert_eq!(view.get(&[0]).unwrap(), 6);
    assert_eq!(view.get(&[1]).unwrap(), 10);
    assert!(matches!(
        view.get(&[2]),
        Err(StorageError::OutOfBounds { .. })
    ));
    assert!(matches!(
        view.get(&[0, 0]),
        Err(StorageError::IncompatibleDimensionality(_))
    ));
    assert_eq!(view.to_owned_storage().unwrap().into_raw_vec_and_offset().0, vec![6, 10]);
}

#[test]
fn view_of_view() {
    let storage = storage();
    let view = StorageView::new(&storage, &[Selector::All, Selector::from(vec![3u64, 0])]).unwrap();
    assert_eq!(view.shape(), vec![3, 2]);
    let inner = StorageView::new(&view, &[Selector::Index(2), Selector::All]).unwrap();
    assert_eq!(inner.iter_elements().collect::<Result<Vec<_>, _>>().unwrap(), vec![11, 8]);
}

#[test]
fn view_linear() {
    let storage = storage();
    let view = StorageView::new_linear(&storage, &Selector::from(vec![11u64, 0, 5])).unwrap();
    assert_eq!(view.shape(), vec![3]);
    assert_eq!(view.iter_elements().collect::<Result<Vec<_>, _>>().unwrap(), vec![11, 0, 5]);

    let view = StorageView::new_linear(&storage, &Selector::Index(7)).unwrap();
    assert!(view.shape().is_empty());
    assert_eq!(view.get(&[]).unwrap(), 7);

    assert!(matches!(
        StorageView::new_linear(&storage, &Selector::Index(12)),
        Err(StorageError::Selector(_))
    ));
}

#[test]
fn view_mut_writes_parent() {
    let mut storage = storage();
    {
        let mut view =
            StorageViewMut::new(&mut storage, &[Selector::Index(0), Selector::All]).unwrap();
        view.set(&[1], 100).unwrap();
        view.set_selection(&[Selector::from(2..4u64)], 200).unwrap();
    }
    assert_eq!(
        storage.iter().copied().take(4).collect::<Vec<_>>(),
        vec![0, 100, 200, 200]
    );

    {
        let mut view = StorageViewMut::new_linear(&mut storage, &Selector::All).unwrap();
        view.set_linear(11, 0).unwrap();
        view.set(&[4], 44).unwrap();
    }
    assert_eq!(storage[[2, 3]], 0);
    assert_eq!(storage[[1, 0]], 44);
}
