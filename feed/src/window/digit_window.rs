use std::collections::VecDeque;

/// Rolling window of the most recent tick last-digits.
///
/// Holds at most `capacity` entries; pushing into a full window drops the oldest one.
#[derive(Debug, Clone)]
pub struct DigitWindow {
    capacity: usize,
    digits: VecDeque<u8>,
}

impl DigitWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            digits: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, digit: u8) {
        debug_assert!(digit <= 9, "not a decimal digit: {}", digit);

        if self.digits.len() == self.capacity {
            self.digits.pop_front();
        }
        self.digits.push_back(digit);
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<u8> {
        self.digits.iter().copied().collect()
    }
}
