use crate::error::Result;

use super::{Operation, Setup};

/// A strategy to reduce a slice.
///
/// All executors compute the same value for an associative operation
/// (up to floating point rounding); they differ in how the work is
/// split and scheduled.
pub trait Executor<'a, T>: Sized
where
    T: Clone + Send + Sync + 'a,
{
    /// Reduce `input` with `operation`. Every sequential piece of the
    /// input is folded starting from a fresh `identity()`.
    fn exec<S, O>(self, input: &'a [T], identity: S, operation: O) -> Result<T>
    where
        S: Fn() -> T + Sync,
        O: Operation<T>;

    /// Apply additional setup (worker count, minimum length) coming
    /// from the reduction job.
    fn with_setup(self, setup: Setup) -> Self {
        let _ = setup;

        self
    }
}
