//! Object pooling for per-frame records.
//!
//! Path samples and state snapshots are created every recording frame;
//! recycling them through an explicit pool keeps the tick path free of
//! allocator churn. Each owner of pooled records keeps its own pool.
//! There is no shared global pool.

/// A record that can live in a [`Pool`].
pub trait Poolable: Default {
    /// Restore the record to its freshly-constructed state. Called on
    /// every acquire so a recycled record never leaks stale fields.
    fn reinit(&mut self);
}

/// Free list of recycled records.
pub struct Pool<T: Poolable> {
    free: Vec<Box<T>>,
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Take a record from the pool, or allocate one if the pool is
    /// empty. The record is reinitialized either way.
    pub fn acquire(&mut self) -> Box<T> {
        let mut record = self
            .free
            .pop()
            .unwrap_or_else(|| Box::new(T::default()));
        record.reinit();
        record
    }

    /// Return a record to the pool for reuse.
    pub fn release(&mut self, record: Box<T>) {
        self.free.push(record);
    }

    /// Number of records currently waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    impl Poolable for Counter {
        fn reinit(&mut self) {
            self.value = 0;
        }
    }

    #[test]
    fn test_acquire_allocates_when_empty() {
        let mut pool: Pool<Counter> = Pool::new();
        let record = pool.acquire();
        assert_eq!(record.value, 0);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let mut pool: Pool<Counter> = Pool::new();
        let mut record = pool.acquire();
        record.value = 42;
        pool.release(record);
        assert_eq!(pool.free_count(), 1);

        let recycled = pool.acquire();
        assert_eq!(pool.free_count(), 0);
        assert_eq!(
            recycled.value, 0,
            "recycled record must be reinitialized, not carry stale fields"
        );
    }
}
