use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use quillfeed_graphql::{
    ClientError, CursorPage, CursorPageInfo, CursorPager, paginate_cursor,
};

fn page(items: Vec<u32>, has_next_page: bool, end_cursor: Option<&str>) -> CursorPage<u32> {
    CursorPage {
        items,
        page_info: CursorPageInfo {
            has_next_page,
            end_cursor: end_cursor.map(ToString::to_string),
        },
    }
}

#[tokio::test]
async fn single_page_terminates_after_one_call() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let items = paginate_cursor(None, move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(page(vec![1, 2, 3], false, None))
        }
    })
    .await
    .expect("pagination should succeed");

    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cap_truncates_and_stops_fetching() {
    // Pages of 3 forever with hasNextPage: true; a cap of 5 must yield
    // exactly 5 items from exactly 2 fetches.
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let items = paginate_cursor(Some(5), move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            let step = counter.fetch_add(1, Ordering::SeqCst) as u32;
            let base = step * 3;
            Ok(page(
                vec![base, base + 1, base + 2],
                true,
                Some("cursor-next"),
            ))
        }
    })
    .await
    .expect("pagination should succeed");

    assert_eq!(items, vec![0, 1, 2, 3, 4]);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_page_is_a_hard_stop() {
    // The second page is empty but still claims hasNextPage: true; the
    // engine must treat that as exhaustion instead of looping.
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let items = paginate_cursor(None, move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            let step = counter.fetch_add(1, Ordering::SeqCst);
            if step == 0 {
                Ok(page(vec![1, 2], true, Some("cursor-1")))
            } else {
                Ok(page(vec![], true, Some("cursor-2")))
            }
        }
    })
    .await
    .expect("pagination should succeed");

    assert_eq!(items, vec![1, 2]);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cursor_advances_between_pages() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    let cursors = Arc::new(std::sync::Mutex::new(Vec::new()));
    let cursors_clone = cursors.clone();

    let items = paginate_cursor(None, move |cursor| {
        let counter = counter_clone.clone();
        let cursors = cursors_clone.clone();
        async move {
            if let Ok(mut seen) = cursors.lock() {
                seen.push(cursor);
            }
            let step = counter.fetch_add(1, Ordering::SeqCst);
            if step == 0 {
                Ok(page(vec![1, 2], true, Some("cursor-1")))
            } else {
                Ok(page(vec![3], false, None))
            }
        }
    })
    .await
    .expect("pagination should succeed");

    assert_eq!(items, vec![1, 2, 3]);
    let seen = cursors.lock().expect("cursor log");
    assert_eq!(*seen, vec![None, Some("cursor-1".to_string())]);
}

#[tokio::test]
async fn missing_continuation_cursor_terminates() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let items = paginate_cursor(None, move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            // hasNextPage without a cursor to continue from.
            Ok(page(vec![1, 2], true, None))
        }
    })
    .await
    .expect("pagination should succeed");

    assert_eq!(items, vec![1, 2]);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_cap_fetches_nothing() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let items = paginate_cursor(Some(0), move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(page(vec![1], true, Some("cursor-1")))
        }
    })
    .await
    .expect("pagination should succeed");

    assert!(items.is_empty());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batches_preserve_page_boundaries() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut pager = CursorPager::new(Some(3), move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            let step = counter.fetch_add(1, Ordering::SeqCst) as u32;
            let base = step * 2;
            Ok(page(vec![base, base + 1], true, Some("cursor-next")))
        }
    });

    let first = pager.next_batch().await.expect("first batch");
    assert_eq!(first, Some(vec![0, 1]));
    assert_eq!(pager.total_fetched(), 2);
    assert!(!pager.is_done());

    // The second batch is truncated to the remaining cap allowance.
    let second = pager.next_batch().await.expect("second batch");
    assert_eq!(second, Some(vec![2]));
    assert_eq!(pager.total_fetched(), 3);
    assert!(pager.is_done());

    let third = pager.next_batch().await.expect("exhausted");
    assert_eq!(third, None);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_error_propagates_and_ends_the_sequence() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut pager = CursorPager::new(None, move |_cursor| {
        let counter = counter_clone.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<CursorPage<u32>, _>(ClientError::Protocol {
                message: "no data returned".to_string(),
            })
        }
    });

    let err = pager.next_batch().await.expect_err("should propagate");
    assert!(matches!(err, ClientError::Protocol { .. }));
    assert!(pager.is_done());

    let after = pager.next_batch().await.expect("sequence is over");
    assert_eq!(after, None);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
