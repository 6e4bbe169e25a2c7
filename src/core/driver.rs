use crate::error::Result;
use crate::DefaultExecutor;

use super::{Executor, WithSetup};

pub trait Driver<'a, T>: WithSetup + Sized
where
    T: Clone + Send + Sync + 'a,
{
    fn exec_with<E>(self, executor: E) -> Result<T>
    where
        E: Executor<'a, T>;

    /// Run with the [`DefaultExecutor`], configured from the environment.
    fn exec(self) -> Result<T> {
        let executor = DefaultExecutor::from_env()?;

        self.exec_with(executor)
    }
}
