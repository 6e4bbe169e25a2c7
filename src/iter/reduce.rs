use crate::core::{Driver, Executor, Fallible, Infallible, Setup, WithSetup};
use crate::error::{BoxError, Result};

/* Reduce */

pub struct Reduce<'a, T, S, O> {
    input: &'a [T],
    identity: S,
    operation: O,
    setup: Setup,
}

impl<'a, T, S, O> Reduce<'a, T, S, O> {
    pub fn new(input: &'a [T], identity: S, operation: O) -> Self {
        Self {
            input,
            identity,
            operation,
            setup: Setup::default(),
        }
    }

    /// Run this reduction with `workers` workers (or splits),
    /// regardless of the executor's own default.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.setup = self.setup.with_workers(workers);

        self
    }

    /// Give every worker at least `min_len` items.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.setup = self.setup.with_min_len(min_len);

        self
    }
}

impl<'a, T, S, O> WithSetup for Reduce<'a, T, S, O> {
    fn setup(&self) -> Setup {
        self.setup.clone()
    }
}

impl<'a, T, S, O> Driver<'a, T> for Reduce<'a, T, S, O>
where
    T: Clone + Send + Sync + 'a,
    S: Fn() -> T + Sync,
    O: Fn(T, T) -> T + Sync,
{
    fn exec_with<E>(self, executor: E) -> Result<T>
    where
        E: Executor<'a, T>,
    {
        let setup = self.setup();

        executor
            .with_setup(setup)
            .exec(self.input, self.identity, Infallible(self.operation))
    }
}

/* TryReduce */

pub struct TryReduce<'a, T, S, O> {
    inner: Reduce<'a, T, S, O>,
}

impl<'a, T, S, O> TryReduce<'a, T, S, O> {
    pub fn new(input: &'a [T], identity: S, operation: O) -> Self {
        Self {
            inner: Reduce::new(input, identity, operation),
        }
    }

    pub fn with_workers(self, workers: usize) -> Self {
        Self {
            inner: self.inner.with_workers(workers),
        }
    }

    pub fn with_min_len(self, min_len: usize) -> Self {
        Self {
            inner: self.inner.with_min_len(min_len),
        }
    }
}

impl<'a, T, S, O> WithSetup for TryReduce<'a, T, S, O> {
    fn setup(&self) -> Setup {
        self.inner.setup()
    }
}

impl<'a, T, S, O, E> Driver<'a, T> for TryReduce<'a, T, S, O>
where
    T: Clone + Send + Sync + 'a,
    S: Fn() -> T + Sync,
    O: Fn(T, T) -> std::result::Result<T, E> + Sync,
    E: Into<BoxError>,
{
    fn exec_with<X>(self, executor: X) -> Result<T>
    where
        X: Executor<'a, T>,
    {
        let setup = self.setup();
        let Reduce {
            input,
            identity,
            operation,
            ..
        } = self.inner;

        executor
            .with_setup(setup)
            .exec(input, identity, Fallible(operation))
    }
}
