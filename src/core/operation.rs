use crate::error::{BoxError, Error, Result};

/// The operation is the binary step of a reduction: it combines an
/// accumulated value with the next value (or two partial results of
/// neighbouring ranges) into one.
///
/// Executors only rely on the operation being **associative**. The
/// left operand always covers lower indices than the right one, so
/// non-commutative operations are reduced in sequence order.
///
/// The operation is shared by reference between all workers of a
/// parallel executor, hence the `Sync` bound.
pub trait Operation<T>: Sync {
    /// Combine `left` and `right` into one value.
    fn apply(&self, left: T, right: T) -> Result<T>;
}

impl<'o, T, O> Operation<T> for &'o O
where
    O: Operation<T> + ?Sized,
{
    #[inline]
    fn apply(&self, left: T, right: T) -> Result<T> {
        (**self).apply(left, right)
    }
}

/* Infallible */

/// Adapts a plain `Fn(T, T) -> T` closure.
#[derive(Clone, Copy, Debug)]
pub struct Infallible<O>(pub O);

impl<T, O> Operation<T> for Infallible<O>
where
    O: Fn(T, T) -> T + Sync,
{
    #[inline]
    fn apply(&self, left: T, right: T) -> Result<T> {
        Ok((self.0)(left, right))
    }
}

/* Fallible */

/// Adapts a `Fn(T, T) -> Result<T, E>` closure. Errors are reported as
/// [`Error::Operator`] with the closure's error as source.
#[derive(Clone, Copy, Debug)]
pub struct Fallible<O>(pub O);

impl<T, E, O> Operation<T> for Fallible<O>
where
    O: Fn(T, T) -> std::result::Result<T, E> + Sync,
    E: Into<BoxError>,
{
    #[inline]
    fn apply(&self, left: T, right: T) -> Result<T> {
        (self.0)(left, right).map_err(|err| Error::Operator(err.into()))
    }
}
