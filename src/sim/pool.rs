//! Bounded object pool
//!
//! Segments and gates are recycled rather than destroyed while the streaming
//! window slides. The pool hands out owned instances; the active lists own
//! them until release. `acquire` never blocks: it reuses an idle instance,
//! constructs a new one while under capacity, and otherwise reports
//! exhaustion so the caller can skip spawning this tick.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Capacity reached with nothing idle. Soft backpressure, not fatal.
    #[error("pool exhausted (capacity {capacity})")]
    Exhausted { capacity: usize },
    /// Released more instances than were live. Caller bug; call sites pair
    /// this with a `debug_assert!` so it is fatal in debug builds only.
    #[error("release without a matching acquire")]
    DoubleRelease,
}

/// Reset hook applied when an instance returns to the idle set.
pub trait Poolable {
    /// Restore the inactive baseline state.
    fn reset(&mut self);
}

#[derive(Debug)]
pub struct ResourcePool<T> {
    idle: Vec<T>,
    live: usize,
    created: usize,
    capacity: usize,
}

impl<T: Poolable + Default> ResourcePool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Vec::with_capacity(capacity),
            live: 0,
            created: 0,
            capacity,
        }
    }

    /// Take an instance out of the pool.
    pub fn acquire(&mut self) -> Result<T, PoolError> {
        if let Some(item) = self.idle.pop() {
            self.live += 1;
            return Ok(item);
        }
        if self.created < self.capacity {
            self.created += 1;
            self.live += 1;
            return Ok(T::default());
        }
        Err(PoolError::Exhausted {
            capacity: self.capacity,
        })
    }

    /// Return a live instance, resetting it to the inactive baseline.
    pub fn release(&mut self, mut item: T) -> Result<(), PoolError> {
        if self.live == 0 {
            return Err(PoolError::DoubleRelease);
        }
        self.live -= 1;
        item.reset();
        self.idle.push(item);
        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn total_created(&self) -> usize {
        self.created
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
