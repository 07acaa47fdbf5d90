//! Pooled storage for event records.
//!
//! Records migrate between the pending-event list, at most one facility
//! queue, and the free pool. Keeping them in an arena addressed by index
//! makes every link a plain `usize`, sidesteps shared ownership between the
//! lists, and makes recycling O(1). The pool only ever grows; in steady
//! state no record is allocated at all.

use std::ops::{Index, IndexMut};

/// Descriptor of a scheduled or queued event.
///
/// Which fields are meaningful depends on the list the record currently
/// belongs to: `trigger_time` while it is pending, `priority` and
/// `remaining_time` while it waits on a facility, none while it is free.
#[derive(Debug)]
pub(crate) struct EventRecord<T> {
    pub event_code: i32,
    /// `None` only while the record sits in the free pool, so the pool does
    /// not keep user tokens alive.
    pub token: Option<T>,
    /// Absolute simulation time at which the event fires.
    pub trigger_time: f64,
    /// Residual time to the event saved at preemption; zero for a request
    /// that never held a server.
    pub remaining_time: f64,
    pub priority: i32,
    /// Intrusive link for whichever list currently owns the record.
    pub next: Option<usize>,
}

/// Arena of event records with an intrusive free list.
#[derive(Debug, Default)]
pub(crate) struct Pool<T> {
    slots: Vec<EventRecord<T>>,
    free_head: Option<usize>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free_head: None,
        }
    }

    /// Takes a record off the free list, or allocates a fresh slot.
    pub fn acquire(&mut self) -> usize {
        match self.free_head {
            Some(idx) => {
                self.free_head = self.slots[idx].next;
                self.slots[idx].next = None;
                idx
            }
            None => {
                self.slots.push(EventRecord {
                    event_code: 0,
                    token: None,
                    trigger_time: 0.0,
                    remaining_time: 0.0,
                    priority: 0,
                    next: None,
                });
                self.slots.len() - 1
            }
        }
    }

    /// Clears the token and pushes the record back onto the free list.
    pub fn release(&mut self, idx: usize) {
        let rec = &mut self.slots[idx];
        rec.token = None;
        rec.next = self.free_head;
        self.free_head = Some(idx);
    }

    /// Drops every record, free or live.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
    }

    /// Number of slots ever allocated.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of records currently on the free list.
    #[cfg(test)]
    pub fn free_len(&self) -> usize {
        let mut n = 0;
        let mut cur = self.free_head;
        while let Some(idx) = cur {
            n += 1;
            cur = self.slots[idx].next;
        }
        n
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = EventRecord<T>;

    fn index(&self, idx: usize) -> &EventRecord<T> {
        &self.slots[idx]
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, idx: usize) -> &mut EventRecord<T> {
        &mut self.slots[idx]
    }
}
