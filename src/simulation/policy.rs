//! Sequential or rayon-parallel bulk updates

use rayon::prelude::*;

/// How a bulk update runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Sequential,
    /// Spread across the rayon pool; each item must only touch its own state
    Parallel,
}

impl ExecutionPolicy {
    /// Parallel only above `threshold` items
    pub fn for_len(len: usize, threshold: usize) -> Self {
        if len > threshold {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }

    pub fn update_all<T, F>(self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&mut T) + Sync + Send,
    {
        match self {
            Self::Sequential => items.iter_mut().for_each(f),
            Self::Parallel => items.par_iter_mut().for_each(f),
        }
    }
}
