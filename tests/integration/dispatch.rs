//! Integration tests for the dispatch fan-out

use gsc_keyword_exporter::dispatcher::{dispatch_all, TokenBucket};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn property_list(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("https://site{i}.example/")).collect()
}

#[tokio::test(start_paused = true)]
async fn test_every_property_dispatched_exactly_once_in_order() {
    let properties = property_list(12);
    let bucket = TokenBucket::new(Duration::from_millis(200));

    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&dispatched);

    let handles = dispatch_all(&bucket, &properties, move |index, property| {
        record.lock().unwrap().push((index, property));
        async {}
    })
    .await;

    assert_eq!(handles.len(), properties.len());
    for handle in handles {
        handle.await.unwrap();
    }

    let dispatched = dispatched.lock().unwrap();
    assert_eq!(dispatched.len(), properties.len());
    for (i, (index, property)) in dispatched.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(property, &properties[i]);
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_property_list_spawns_nothing() {
    let bucket = TokenBucket::new(Duration::from_millis(200));
    let handles = dispatch_all(&bucket, &[], |_, _| async {}).await;
    assert!(handles.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_task_results_are_collected_per_property() {
    let properties = property_list(5);
    let bucket = TokenBucket::new(Duration::from_millis(200));

    let handles = dispatch_all(&bucket, &properties, |index, _| async move { index * 2 }).await;

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert_eq!(results, vec![0, 2, 4, 6, 8]);
}

#[tokio::test(start_paused = true)]
async fn test_one_slow_task_does_not_block_later_dispatches() {
    let properties = property_list(3);
    let bucket = TokenBucket::new(Duration::from_millis(200));

    let dispatched = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&dispatched);

    let handles = dispatch_all(&bucket, &properties, move |index, _| {
        *counter.lock().unwrap() += 1;
        async move {
            if index == 0 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        }
    })
    .await;

    // dispatch_all returned before the slow first task finished, so all
    // three dispatches already happened.
    assert_eq!(*dispatched.lock().unwrap(), 3);

    for handle in handles {
        handle.await.unwrap();
    }
}
