mod reduce;
mod sum;

pub use reduce::{Reduce, TryReduce};
pub use sum::Sum;

use std::ops::Add;

/// Builds reduction jobs over a borrowed sequence. The job is run with
/// [`Driver::exec_with`](crate::Driver::exec_with) or
/// [`Driver::exec`](crate::Driver::exec).
///
/// ```
/// use tree_reduce::{Driver, ParallelReduce, ParallelReducer};
///
/// fn main() -> tree_reduce::Result<()> {
///     let data: Vec<f32> = (1..=1024).map(|i| i as f32).collect();
///
///     let total = data.reduce_with(|a, b| a + b).exec_with(ParallelReducer::new(4))?;
///     assert_eq!(524800.0, total);
///
///     Ok(())
/// }
/// ```
pub trait ParallelReduce<'a, T>: Sized
where
    T: Clone + Send + Sync + 'a,
{
    fn input(self) -> &'a [T];

    /// Reduce with `operation`, every sequential piece starting from
    /// `identity()`.
    fn reduce<S, O>(self, identity: S, operation: O) -> Reduce<'a, T, S, O>
    where
        S: Fn() -> T + Sync,
        O: Fn(T, T) -> T + Sync,
    {
        Reduce::new(self.input(), identity, operation)
    }

    /// Reduce with `operation`, starting from `T::default()` (`0.0` for
    /// floats).
    fn reduce_with<O>(self, operation: O) -> Reduce<'a, T, fn() -> T, O>
    where
        T: Default,
        O: Fn(T, T) -> T + Sync,
    {
        Reduce::new(self.input(), T::default as fn() -> T, operation)
    }

    /// Reduce with a fallible `operation`. The first error aborts the
    /// reduction.
    fn try_reduce<S, O, E>(self, identity: S, operation: O) -> TryReduce<'a, T, S, O>
    where
        S: Fn() -> T + Sync,
        O: Fn(T, T) -> Result<T, E> + Sync,
    {
        TryReduce::new(self.input(), identity, operation)
    }

    fn sum(self) -> Sum<'a, T>
    where
        T: Add<Output = T> + Default,
    {
        sum::sum(self.input())
    }
}

impl<'a, T> ParallelReduce<'a, T> for &'a [T]
where
    T: Clone + Send + Sync + 'a,
{
    fn input(self) -> &'a [T] {
        self
    }
}

impl<'a, T> ParallelReduce<'a, T> for &'a Vec<T>
where
    T: Clone + Send + Sync + 'a,
{
    fn input(self) -> &'a [T] {
        self
    }
}
