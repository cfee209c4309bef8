use std::sync::Arc;

use dimarrs_dimension::Selector;
use dimarrs_storage::{
    storage_adapter::{
        performance_metrics::PerformanceMetricsStorageAdapter, usage_log::UsageLogStorageAdapter,
    },
    ReadableStorageTraits, WritableStorageTraits,
};
use ndarray::{ArrayD, IxDyn};
use parking_lot::Mutex;

fn storage() -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap()
}

#[test]
fn performance_metrics() {
    let mut storage = PerformanceMetricsStorageAdapter::new(storage());
    assert_eq!(storage.get(&[1, 2]).unwrap(), 5.0);
    assert_eq!(storage.reads(), 1);
    assert_eq!(storage.elements_read(), 1);

    let sliced = storage
        .slice(&[Selector::All, Selector::from(1..3u64)])
        .unwrap();
    assert_eq!(sliced.len(), 4);
    assert_eq!(storage.reads(), 2);
    assert_eq!(storage.elements_read(), 5);
    assert_eq!(storage.slices(), 1);

    storage.set(&[0, 0], -1.0).unwrap();
    storage
        .set_selection(&[Selector::Index(1), Selector::All], 9.0)
        .unwrap();
    assert_eq!(storage.writes(), 2);
    assert_eq!(storage.elements_written(), 4);

    storage.reset();
    assert_eq!(storage.reads(), 0);
    assert_eq!(storage.writes(), 0);
    assert_eq!(
        storage.into_inner().into_raw_vec_and_offset().0,
        vec![-1.0, 1.0, 2.0, 9.0, 9.0, 9.0]
    );
}

#[test]
fn usage_log() {
    let log_writer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let mut storage =
        UsageLogStorageAdapter::new(storage(), log_writer.clone(), || "[test] ".to_string());
    storage.get(&[0, 1]).unwrap();
    storage.get(&[2, 0]).unwrap_err();
    storage
        .slice(&[Selector::Index(0), Selector::from(0..2u64)])
        .unwrap();
    storage.set_linear(5, 1.5).unwrap();
    assert_eq!(storage.inner()[[1, 2]], 1.5);

    let log = String::from_utf8(log_writer.lock().clone()).unwrap();
    let lines = log.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "[test] get([0, 1]) -> Ok");
    assert!(lines[1].starts_with("[test] get([2, 0]) -> Err("));
    assert_eq!(lines[2], "[test] slice([0, 0..2]) -> Ok");
    assert_eq!(lines[3], "[test] set_linear(5) -> Ok");
}
