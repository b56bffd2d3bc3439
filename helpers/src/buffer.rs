use std::collections::VecDeque;

/// RingBuffer keeps the last `capacity` inserted values, older values are dropped.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    vals: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy + Into<f64>> RingBuffer<T> {
    pub fn new(capacity: usize) -> RingBuffer<T> {
        RingBuffer {
            vals: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, val: T) {
        if self.vals.len() == self.capacity {
            self.vals.pop_front();
        }
        self.vals.push_back(val);
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// get_avg returns the average of the buffered values, or None if the buffer is empty.
    pub fn get_avg(&self) -> Option<f64> {
        if self.vals.is_empty() {
            return None;
        }
        let sum: f64 = self.vals.iter().map(|&val| val.into()).sum();
        Some(sum / self.vals.len() as f64)
    }
}
