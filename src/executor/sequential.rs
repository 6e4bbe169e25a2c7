use crate::core::{fold_slice, Executor, Operation};
use crate::error::Result;

/// Single threaded reference executor: folds the whole input from
/// left to right on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Sequential {
    /// Fold `input` with `operation`, starting from `T::default()`.
    pub fn reduce<T, O>(input: &[T], operation: O) -> T
    where
        T: Clone + Default,
        O: Fn(T, T) -> T,
    {
        input.iter().cloned().fold(T::default(), operation)
    }
}

impl<'a, T> Executor<'a, T> for Sequential
where
    T: Clone + Send + Sync + 'a,
{
    fn exec<S, O>(self, input: &'a [T], identity: S, operation: O) -> Result<T>
    where
        S: Fn() -> T + Sync,
        O: Operation<T>,
    {
        fold_slice(input, identity(), &operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fallible, Infallible};

    #[test]
    fn reduce_sums_in_order() {
        let data: Vec<f32> = (1..=1024).map(|i| i as f32).collect();

        assert_eq!(524800.0, Sequential::reduce(&data, |a, b| a + b));
    }

    #[test]
    fn reduce_empty_returns_zero() {
        let data: Vec<f32> = Vec::new();

        assert_eq!(0.0, Sequential::reduce(&data, |a, b| a + b));
    }

    #[test]
    fn exec_uses_identity() {
        let data = [2u64, 3, 4];

        let x = Sequential
            .exec(&data[..], || 1u64, Infallible(|a: u64, b: u64| a * b))
            .unwrap();

        assert_eq!(24, x);
    }

    #[test]
    fn exec_stops_at_first_error() {
        let data = [1i32, 2, -3, 4];

        let err = Sequential
            .exec(
                &data[..],
                || 0,
                Fallible(|a: i32, b: i32| {
                    if b < 0 {
                        Err(format!("negative item {}", b))
                    } else {
                        Ok(a + b)
                    }
                }),
            )
            .unwrap_err();

        assert_eq!("Operator failed: negative item -3", err.to_string());
    }
}
