use std::ops::Range;

use crate::error::{Error, Result};

/* PartitionPlan */

/// Assigns every worker of a team a contiguous range of the input.
///
/// All workers get `block_size = len / workers` items, the last worker
/// additionally takes the remainder of the integer division. The ranges
/// cover `0..len` exactly once for any `len` and any `workers >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    len: usize,
    workers: usize,
    block_size: usize,
}

impl PartitionPlan {
    /// Create a plan for `len` items. Fails if `workers` is 0.
    pub fn new(len: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::invalid_argument(
                "workers",
                "at least one worker is required",
            ));
        }

        Ok(Self {
            len,
            workers,
            block_size: len / workers,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Range of items owned by `worker`.
    pub fn range(&self, worker: usize) -> Range<usize> {
        debug_assert!(worker < self.workers);

        let start = worker * self.block_size;
        let end = if worker == self.workers - 1 {
            self.len
        } else {
            (worker + 1) * self.block_size
        };

        start..end
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.workers).map(move |worker| self.range(worker))
    }
}

/* CombineRounds */

/// Strides of the combine tree for a team of `workers`: `1, 2, 4, ...`
/// while the stride is smaller than the team. In the round with stride
/// `s` the worker `i` with `i % 2s == 0` folds slot `i + s` into slot
/// `i`, if that slot exists.
pub fn combine_strides(workers: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), |stride| stride.checked_mul(2))
        .take_while(move |stride| *stride < workers)
}

/// Partner slot of `worker` in the round with `stride`, if the worker
/// is a receiver in that round. A stride of 0 is no round at all.
#[inline]
pub fn combine_partner(worker: usize, stride: usize, workers: usize) -> Option<usize> {
    let span = stride.checked_mul(2).filter(|span| *span > 0)?;
    let partner = worker.checked_add(stride)?;

    if worker % span == 0 && partner < workers {
        Some(partner)
    } else {
        None
    }
}
