//! The pending-event list.
//!
//! A singly linked list threaded through the record arena, kept sorted by
//! trigger time ascending. Insertion stops at the first record with a
//! strictly later trigger time, so events scheduled for the same instant
//! keep their insertion order and fire first-in first-out.

use crate::pool::{EventRecord, Pool};

#[derive(Debug, Default)]
pub(crate) struct EventList {
    head: Option<usize>,
}

impl EventList {
    pub fn new() -> Self {
        EventList { head: None }
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn clear(&mut self) {
        self.head = None;
    }

    /// Inserts a record before the first one with a strictly later trigger
    /// time.
    pub fn insert<T>(&mut self, pool: &mut Pool<T>, idx: usize) {
        let time = pool[idx].trigger_time;
        let mut pred = None;
        let mut succ = self.head;
        while let Some(s) = succ {
            if pool[s].trigger_time > time {
                break;
            }
            pred = succ;
            succ = pool[s].next;
        }

        pool[idx].next = succ;
        match pred {
            Some(p) => pool[p].next = Some(idx),
            None => self.head = Some(idx),
        }
    }

    /// Places a record ahead of every pending event, even those due at the
    /// same instant.
    pub fn push_front<T>(&mut self, pool: &mut Pool<T>, idx: usize) {
        pool[idx].next = self.head;
        self.head = Some(idx);
    }

    /// Detaches and returns the earliest record.
    pub fn pop_front<T>(&mut self, pool: &mut Pool<T>) -> Option<usize> {
        let idx = self.head?;
        self.head = pool[idx].next;
        pool[idx].next = None;
        Some(idx)
    }

    /// Unlinks and returns the first record satisfying the predicate,
    /// scanning from the earliest pending event.
    pub fn remove_first<T, F>(&mut self, pool: &mut Pool<T>, pred: F) -> Option<usize>
    where
        F: Fn(&EventRecord<T>) -> bool,
    {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            if pred(&pool[c]) {
                break;
            }
            prev = cur;
            cur = pool[c].next;
        }

        let c = cur?;
        match prev {
            Some(p) => pool[p].next = pool[c].next,
            None => self.head = pool[c].next,
        }
        pool[c].next = None;
        Some(c)
    }

    #[cfg(test)]
    pub fn len<T>(&self, pool: &Pool<T>) -> usize {
        let mut n = 0;
        let mut cur = self.head;
        while let Some(idx) = cur {
            n += 1;
            cur = pool[idx].next;
        }
        n
    }
}
