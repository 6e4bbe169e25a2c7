use std::ops::Add;

use super::Reduce;

/// Reduction adding all items, starting from `T::default()`.
pub type Sum<'a, T> = Reduce<'a, T, fn() -> T, fn(T, T) -> T>;

pub fn sum<T>(input: &[T]) -> Sum<'_, T>
where
    T: Add<Output = T> + Default,
{
    Reduce::new(input, T::default as fn() -> T, add::<T> as fn(T, T) -> T)
}

fn add<T>(left: T, right: T) -> T
where
    T: Add<Output = T>,
{
    left + right
}
