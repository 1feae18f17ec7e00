//! Triple-buffer swap channel
//!
//! Single-writer/single-reader exchange of the latest value across two threads
//! without blocking either side. The writer always has a free slot to fill and
//! publishes by swapping one atomic word; the reader always observes the most
//! recently completed value. Values that are overwritten before being consumed
//! are dropped - last write wins, no queue growth, no backpressure.
//!
//! Three slots rotate between the two sides: one owned by the writer, one by
//! the reader, one "in flight". The shared atomic packs the in-flight slot
//! index with a dirty bit; each `swap` transfers slot ownership, so a slot is
//! never accessed from both threads at once.

use std::cell::UnsafeCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

const INDEX_MASK: u8 = 0b011;
const DIRTY_BIT: u8 = 0b100;

struct Shared<T> {
    slots: [UnsafeCell<Option<T>>; 3],
    /// In-flight slot index (bits 0-1) plus the dirty bit (bit 2).
    back: AtomicU8,
}

// One side touches only its owned slot; ownership moves with the atomic swap.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

/// Producer half. Owned by the thread that publishes values.
pub struct TripleWriter<T> {
    shared: Arc<Shared<T>>,
    write_index: u8,
}

/// Consumer half. Owned by the thread that drains values.
pub struct TripleReader<T> {
    shared: Arc<Shared<T>>,
    read_index: u8,
}

/// Create a connected writer/reader pair.
pub fn triple_buffer<T>() -> (TripleWriter<T>, TripleReader<T>) {
    let shared = Arc::new(Shared {
        slots: [
            UnsafeCell::new(None),
            UnsafeCell::new(None),
            UnsafeCell::new(None),
        ],
        back: AtomicU8::new(1),
    });
    (
        TripleWriter {
            shared: Arc::clone(&shared),
            write_index: 0,
        },
        TripleReader {
            shared,
            read_index: 2,
        },
    )
}

impl<T> TripleWriter<T> {
    /// Publish a value, replacing any unconsumed previous one. Never blocks.
    pub fn publish(&mut self, value: T) {
        // The write slot is exclusively ours until the swap below.
        unsafe {
            *self.shared.slots[self.write_index as usize].get() = Some(value);
        }
        let previous = self
            .shared
            .back
            .swap(self.write_index | DIRTY_BIT, Ordering::AcqRel);
        self.write_index = previous & INDEX_MASK;
    }
}

impl<T> TripleReader<T> {
    /// Whether a value has been published since the last consume.
    pub fn is_dirty(&self) -> bool {
        self.shared.back.load(Ordering::Acquire) & DIRTY_BIT != 0
    }

    /// Consume the most recent value, or `None` if nothing new was published
    /// since the last call. Never blocks and never re-delivers.
    pub fn take(&mut self) -> Option<T> {
        if !self.is_dirty() {
            return None;
        }
        let previous = self.shared.back.swap(self.read_index, Ordering::AcqRel);
        self.read_index = previous & INDEX_MASK;
        // The slot we just acquired is exclusively ours until the next swap.
        unsafe { (*self.shared.slots[self.read_index as usize].get()).take() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_channel_yields_nothing() {
        let (_tx, mut rx) = triple_buffer::<u32>();
        assert!(!rx.is_dirty());
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_single_publish_consume() {
        let (mut tx, mut rx) = triple_buffer();
        tx.publish(42);
        assert!(rx.is_dirty());
        assert_eq!(rx.take(), Some(42));
        // No re-delivery.
        assert!(!rx.is_dirty());
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let (mut tx, mut rx) = triple_buffer();
        tx.publish(1);
        tx.publish(2);
        tx.publish(3);
        assert_eq!(rx.take(), Some(3));
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_interleaved_publish_consume() {
        let (mut tx, mut rx) = triple_buffer();
        for round in 0..100 {
            tx.publish(round);
            assert_eq!(rx.take(), Some(round));
        }
    }

    #[test]
    fn test_cross_thread_monotonic_reads() {
        let (mut tx, mut rx) = triple_buffer();
        let producer = std::thread::spawn(move || {
            for value in 0..10_000u64 {
                tx.publish(value);
            }
        });
        // Values must be observed in publish order, possibly with gaps.
        let mut last_seen = None;
        while !producer.is_finished() {
            if let Some(value) = rx.take() {
                if let Some(prev) = last_seen {
                    assert!(value > prev, "went backwards: {prev} -> {value}");
                }
                last_seen = Some(value);
            }
        }
        producer.join().unwrap();
        // After the producer is done the final value is the one in flight
        // (unless the very last take above already consumed it).
        match rx.take() {
            Some(value) => assert_eq!(value, 9_999),
            None => assert_eq!(last_seen, Some(9_999)),
        }
    }

    #[test]
    fn test_drop_discards_in_flight_value() {
        let (mut tx, rx) = triple_buffer();
        tx.publish(String::from("undelivered"));
        drop(rx);
        drop(tx);
        // No leak, no panic - in-flight data is simply discarded.
    }
}
