use std::cmp::max;
use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable overriding the number of workers.
pub const WORKERS_ENV: &str = "TREE_REDUCE_NUM_WORKERS";

/// Environment variable overriding the minimum items per worker.
pub const MIN_LEN_ENV: &str = "TREE_REDUCE_MIN_LEN";

pub trait WithSetup {
    /// Setup to drive the reduction with.
    fn setup(&self) -> Setup {
        Setup::default()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Setup {
    /// Number of workers/splits the executor will use to proceed.
    /// Defaults to the executor's own choice, which is the available
    /// hardware concurrency for the thread based executors.
    pub workers: Option<usize>,

    /// The minimum number of items that one worker will process
    /// sequentially. Defaults to 1, which means that every item may
    /// be folded by a worker of its own. Raising it reduces the number
    /// of workers for short inputs.
    pub min_len: Option<usize>,
}

impl Setup {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);

        self
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);

        self
    }

    /// Read the setup from `TREE_REDUCE_NUM_WORKERS` and
    /// `TREE_REDUCE_MIN_LEN`. Unset or empty variables stay `None`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|var| env::var(var))
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, env::VarError>,
    {
        Ok(Self {
            workers: parse_var(&lookup, WORKERS_ENV, "workers")?,
            min_len: parse_var(&lookup, MIN_LEN_ENV, "min_len")?,
        })
    }

    /// Values set in `other` take precedence, except for `min_len`
    /// where the larger one wins.
    pub fn merge(mut self, other: Self) -> Self {
        self.workers = other.workers.or(self.workers);

        self.min_len = match (self.min_len, other.min_len) {
            (Some(a), Some(b)) => Some(max(a, b)),
            (a, b) => a.or(b),
        };

        self
    }

    /// Check the values that are set.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(Error::invalid_argument(
                "workers",
                "at least one worker is required",
            ));
        }

        if self.min_len == Some(0) {
            return Err(Error::invalid_argument(
                "min_len",
                "minimum length must be at least 1",
            ));
        }

        Ok(())
    }

    /// Number of workers that get a share of `len` items, given the
    /// `default` worker count. Never less than 1.
    pub fn effective_workers(&self, len: usize, default: usize) -> usize {
        let workers = self.workers.unwrap_or(default);
        let min_len = max(self.min_len.unwrap_or(1), 1);

        max(workers.min(len / min_len), 1)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, name: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| Error::invalid_argument(name, format!("{}={:?}: {}", var, value, err))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::invalid_argument(name, format!("{}: {}", var, err))),
    }
}
