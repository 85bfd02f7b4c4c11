//! Batch size policy.

/// Number of issues processed per invocation unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Caps how many items a single invocation works on.
///
/// Items beyond the cap are deferred; the harness re-invokes the tool to pick
/// them up later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    max_items: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchPolicy {
    /// Creates a policy; `max_items` is clamped to at least `1`.
    #[must_use]
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items: max_items.max(1),
        }
    }

    /// Returns the cap.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Splits `items` into the batch to process now and the deferred rest.
    #[must_use]
    pub fn split<T>(&self, mut items: Vec<T>) -> (Vec<T>, Vec<T>) {
        let deferred = items.split_off(self.max_items.min(items.len()));
        (items, deferred)
    }
}
