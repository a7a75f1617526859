//! Tests for the bounded log store

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pressurelog_core::datalog::{LogEntry, LogStore, DEFAULT_CAPACITY};
use pretty_assertions::assert_eq;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// Entry `i` is taken 10 minutes after entry `i - 1`
fn nth_entry(i: usize) -> LogEntry {
    LogEntry::new(
        start() + Duration::minutes(10 * i as i64),
        10.0 + i as f64 * 0.25,
    )
}

#[test]
fn test_default_capacity_is_two_weeks_of_ten_minute_samples() {
    assert_eq!(DEFAULT_CAPACITY, 14 * 24 * 6);
    assert_eq!(LogStore::default().capacity(), DEFAULT_CAPACITY);
}

#[test]
fn test_capacity_invariant() {
    let capacity = 5;
    for extra in [0usize, 1, 4, 5, 17] {
        let mut store = LogStore::new(capacity);
        let total = capacity + extra;
        for i in 0..total {
            store.append(nth_entry(i));
            assert!(store.len() <= capacity);
        }

        assert_eq!(store.len(), capacity);
        let expected: Vec<LogEntry> = (extra..total).map(nth_entry).collect();
        assert_eq!(store.snapshot(), expected);
    }
}

#[test]
fn test_partial_fill_keeps_everything() {
    let mut store = LogStore::new(10);
    for i in 0..4 {
        assert!(!store.append(nth_entry(i)));
    }

    assert_eq!(store.len(), 4);
    assert_eq!(store.oldest(), Some(&nth_entry(0)));
    assert_eq!(store.latest(), Some(&nth_entry(3)));
}

#[test]
fn test_eviction_drops_exactly_the_oldest() {
    let capacity = 4;
    let mut store = LogStore::new(capacity);
    for i in 0..capacity {
        store.append(nth_entry(i));
    }

    assert!(store.append(nth_entry(capacity)));

    let expected: Vec<LogEntry> = (1..=capacity).map(nth_entry).collect();
    assert_eq!(store.snapshot(), expected);
}

#[test]
fn test_store_keeps_insertion_order_not_time_order() {
    let mut store = LogStore::new(3);
    store.append(nth_entry(2));
    store.append(nth_entry(0));
    store.append(nth_entry(1));

    let order: Vec<LogEntry> = store.iter().copied().collect();
    assert_eq!(order, vec![nth_entry(2), nth_entry(0), nth_entry(1)]);
}

#[test]
fn test_iteration_is_restartable() {
    let mut store = LogStore::new(3);
    for i in 0..3 {
        store.append(nth_entry(i));
    }

    let first: Vec<&LogEntry> = store.iter().collect();
    let second: Vec<&LogEntry> = (&store).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_clear_then_append() {
    let mut store = LogStore::new(2);
    store.append(nth_entry(0));
    store.append(nth_entry(1));

    store.clear();
    assert_eq!(store.len(), 0);
    assert_eq!(store.capacity(), 2);

    store.append(nth_entry(5));
    assert_eq!(store.snapshot(), vec![nth_entry(5)]);
}

#[test]
fn test_scenario_capacity_three() {
    let at = |h: u32, m: u32| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    };

    let mut store = LogStore::new(3);
    store.append(LogEntry::new(at(10, 0), 12.30));
    store.append(LogEntry::new(at(10, 10), 12.50));
    store.append(LogEntry::new(at(10, 20), 12.70));
    store.append(LogEntry::new(at(10, 30), 12.90));

    assert_eq!(
        store.snapshot(),
        vec![
            LogEntry::new(at(10, 10), 12.50),
            LogEntry::new(at(10, 20), 12.70),
            LogEntry::new(at(10, 30), 12.90),
        ]
    );
}
