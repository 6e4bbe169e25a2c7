//! Reductions of a sequence under an associative operation.
//!
//! [`SerialReducer`] folds the sequence from left to right on the
//! calling thread. [`ParallelReducer`] partitions the sequence over a
//! team of worker threads, folds the partitions concurrently and
//! combines the partial results in a barrier synchronized tree of
//! `ceil(log2(workers))` rounds. With the `rayon-executor` feature the
//! same reduction is also available on the rayon thread pool.

mod core;
mod error;
mod executor;
mod iter;

pub use self::core::{
    Driver, Executor, Fallible, Folder, Infallible, Operation, ReduceFolder, Setup, WithSetup,
    MIN_LEN_ENV, WORKERS_ENV,
};
pub use self::error::{BoxError, Error, Result};
pub use self::executor::{
    combine_partner, combine_strides, DefaultExecutor, Parallel as ParallelReducer, PartitionPlan,
    Sequential as SerialReducer,
};
#[cfg(feature = "rayon-executor")]
pub use self::executor::Rayon as RayonReducer;
pub use self::iter::{ParallelReduce, Reduce, Sum, TryReduce};
