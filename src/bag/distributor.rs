//! Level distributor
//!
//! The distributor is the pseudo-random schedule a bag follows when
//! choosing which priority level to visit next. For a range `R` it holds a
//! sequence of length `R * (R + 1) / 2` in which level `k` appears exactly
//! `k + 1` times, spread quasi-uniformly, so higher levels are visited
//! proportionally more often while every level is reached eventually.

use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::Mutex;

/// A shared, immutable level schedule.
#[derive(Debug)]
pub struct Distributor {
    order: Vec<u16>,
}

const EMPTY: u16 = u16::MAX;

impl Distributor {
    /// The process-wide distributor for the given range.
    pub fn shared(range: usize) -> Arc<Distributor> {
        static CACHE: OnceLock<Mutex<HashMap<usize, Arc<Distributor>>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        cache
            .lock()
            .entry(range)
            .or_insert_with(|| Arc::new(Distributor::new(range)))
            .clone()
    }

    /// Build the schedule for `range` levels.
    pub fn new(range: usize) -> Self {
        let capacity = range * (range + 1) / 2;
        let mut order = vec![EMPTY; capacity];
        let mut index = 0usize;
        for rank in (0..range).rev() {
            let time = rank + 1;
            let step = capacity / time;
            for _ in 0..time {
                index = (index + step) % capacity;
                while order[index] != EMPTY {
                    index = (index + 1) % capacity;
                }
                order[index] = rank as u16;
            }
        }
        Distributor { order }
    }

    /// The level scheduled at `index`.
    pub fn pick(&self, index: usize) -> usize {
        self.order[index] as usize
    }

    /// The next schedule position after `index`.
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.order.len()
    }

    /// Length of the schedule.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert_eq!(Distributor::new(10).len(), 55);
        assert_eq!(Distributor::new(100).len(), 5050);
    }

    #[test]
    fn test_each_level_appears_rank_plus_one_times() {
        for range in [3usize, 10, 25] {
            let d = Distributor::new(range);
            for level in 0..range {
                let count = (0..d.len()).filter(|&i| d.pick(i) == level).count();
                assert_eq!(count, level + 1, "level {} in range {}", level, range);
            }
        }
    }

    #[test]
    fn test_all_slots_filled() {
        let d = Distributor::new(100);
        for i in 0..d.len() {
            assert!(d.pick(i) < 100);
        }
    }

    #[test]
    fn test_next_wraps() {
        let d = Distributor::new(4);
        assert_eq!(d.next(d.len() - 1), 0);
        assert_eq!(d.next(0), 1);
    }

    #[test]
    fn test_shared_is_cached() {
        let a = Distributor::shared(100);
        let b = Distributor::shared(100);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
