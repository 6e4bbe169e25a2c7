use rayon_core::{current_num_threads, join_context};
use tracing::debug;

use crate::core::{fold_slice, Executor, Infallible, Operation, Setup};
use crate::error::Result;

use super::misc::IndexedSplitter;

/// Executor splitting the input recursively in halves on the rayon
/// thread pool. Leaves are folded sequentially, neighbouring results
/// are combined on the way back up.
#[derive(Clone, Debug)]
pub struct Rayon {
    splits: usize,
    setup: Setup,
}

impl Rayon {
    pub fn new(splits: usize) -> Self {
        Self {
            splits,
            setup: Setup::default(),
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.setup = self.setup.with_min_len(min_len);

        self
    }

    /// Reduce `input` with `operation`, starting every leaf from
    /// `T::default()`.
    pub fn reduce<T, O>(&self, input: &[T], operation: O) -> Result<T>
    where
        T: Clone + Default + Send + Sync,
        O: Fn(T, T) -> T + Sync,
    {
        self.clone().exec(input, T::default, Infallible(operation))
    }
}

impl Default for Rayon {
    fn default() -> Self {
        Self::new(current_num_threads())
    }
}

impl<'a, T> Executor<'a, T> for Rayon
where
    T: Clone + Send + Sync + 'a,
{
    fn exec<S, O>(self, input: &'a [T], identity: S, operation: O) -> Result<T>
    where
        S: Fn() -> T + Sync,
        O: Operation<T>,
    {
        let setup = Setup::default().with_workers(self.splits).merge(self.setup);
        setup.validate()?;

        let splits = setup.workers.unwrap_or(self.splits);
        let splitter = IndexedSplitter::new(splits, setup.min_len);

        debug!(splits, len = input.len(), "splitting reduction input");

        exec(splitter, input, &identity, &operation)
    }

    fn with_setup(mut self, setup: Setup) -> Self {
        self.setup = self.setup.merge(setup);

        self
    }
}

fn exec<T, S, O>(mut splitter: IndexedSplitter, input: &[T], identity: &S, operation: &O) -> Result<T>
where
    T: Clone + Send + Sync,
    S: Fn() -> T + Sync,
    O: Operation<T>,
{
    let len = input.len();

    if splitter.try_split(len) {
        let (left, right) = input.split_at(len / 2);

        let (left_result, right_result) = join_context(
            |_| exec(splitter, left, identity, operation),
            |_| exec(splitter, right, identity, operation),
        );

        operation.apply(left_result?, right_result?)
    } else {
        fold_slice(input, identity(), operation)
    }
}
