//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use exec_tracer::{OverflowPolicy, TraceSink, TraceStore, RECORD_LEN};

// =============================================================================
// Queue helpers
// =============================================================================

/// Put `value` until the buffer holds `CAPACITY` entries.
pub fn fill_entire_queue_with_value<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    value: u32,
) {
    for _ in 0..TraceStore::<N, P>::CAPACITY {
        store.put(value);
    }
}

/// Put `n` consecutive words starting at `first`.
pub fn write_n_entries<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    n: u32,
    first: u32,
) {
    for i in 0..n {
        store.put(first.wrapping_add(i));
    }
}

/// Get `n` words and return them in dequeue order.
pub fn remove_n_entries<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    n: u32,
) -> Vec<u32> {
    (0..n).map(|_| store.get()).collect()
}

/// Get until empty. Returns how many words were removed.
pub fn empty_queue<const N: usize, P: OverflowPolicy>(store: &mut TraceStore<N, P>) -> u32 {
    let mut removed = 0;
    while !store.is_empty() {
        store.get();
        removed += 1;
    }
    removed
}

/// Assert that the buffer is full of `value`, draining it.
pub fn verify_entire_queue<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    value: u32,
) {
    assert!(store.is_full());
    for i in 0..TraceStore::<N, P>::CAPACITY {
        assert_eq!(store.get(), value, "entry {} differs", i);
    }
    assert!(store.is_empty());
}

/// Assert that the next `n` words are `first`, `first + 1`, ...
pub fn verify_n_entries_in_queue<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    n: u32,
    first: u32,
) {
    for i in 0..n {
        assert_eq!(store.get(), first.wrapping_add(i), "entry {} differs", i);
    }
}

/// Drive `store` with a pseudo-random mix of puts and gets and check every
/// step against a `VecDeque` holding at most `CAPACITY` words.
pub fn run_against_model<const N: usize, P: OverflowPolicy>(
    store: &mut TraceStore<N, P>,
    steps: usize,
    mut seed: u32,
) {
    let capacity = TraceStore::<N, P>::CAPACITY as usize;
    let mut model: VecDeque<u32> = VecDeque::new();

    for step in 0..steps {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let roll = seed >> 24;

        // Bias toward puts so the buffer spends time both full and empty.
        if roll < 160 {
            let word = seed | 1;
            store.put(word);
            if model.len() == capacity {
                if P::OVERWRITE {
                    model.pop_front();
                    model.push_back(word);
                }
            } else {
                model.push_back(word);
            }
        } else {
            assert_eq!(store.get(), model.pop_front().unwrap_or(0), "step {}", step);
        }

        assert_eq!(store.num_entries() as usize, model.len(), "step {}", step);
        assert_eq!(store.is_full(), model.len() == capacity, "step {}", step);
        assert_eq!(store.is_empty(), model.is_empty(), "step {}", step);
        assert!(store.head() < N as u32 && store.tail() < N as u32);
    }

    assert!(store.entries().eq(model.iter().copied()));
}

// =============================================================================
// Recording sink and lock hooks
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Lock,
    Write,
    Unlock,
}

thread_local! {
    static EVENTS: RefCell<Vec<Event>> = RefCell::new(Vec::new());
}

fn record_event(event: Event) {
    EVENTS.with(|events| events.borrow_mut().push(event));
}

/// Events seen on this test thread since the last call.
pub fn take_events() -> Vec<Event> {
    EVENTS.with(|events| events.borrow_mut().drain(..).collect())
}

pub fn lock_hook() {
    record_event(Event::Lock);
}

pub fn unlock_hook() {
    record_event(Event::Unlock);
}

/// Sink keeping every record as a string.
#[derive(Debug, Default)]
pub struct Recorder {
    pub records: Vec<String>,
}

impl TraceSink for Recorder {
    fn write(&mut self, record: &[u8]) {
        assert_eq!(record.len(), RECORD_LEN);
        self.records
            .push(String::from_utf8(record.to_vec()).expect("records are ASCII"));
        record_event(Event::Write);
    }
}
