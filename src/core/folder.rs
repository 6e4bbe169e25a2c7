use crate::error::Result;

use super::Operation;

/// The `Folder` trait encapsulates [the standard fold
/// operation][fold]. It can be fed many items using the `consume`
/// method. At the end, once all items have been consumed, it can then
/// be converted (using `complete`) into a final value.
///
/// Every executor folds its sequential pieces with a folder, so the
/// serial and the parallel strategies share one left-to-right loop.
///
/// [fold]: https://doc.rust-lang.org/std/iter/trait.Iterator.html#method.fold
pub trait Folder<Item>: Sized {
    /// The type of result that will ultimately be produced by the folder.
    type Result;

    /// Consume next item and return new sequential state.
    fn consume(self, item: Item) -> Result<Self>;

    /// Consume all items of the iterator in order, and return new
    /// sequential state. Stops at the first failing item.
    fn consume_iter<I>(mut self, iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = Item>,
    {
        for item in iter {
            self = self.consume(item)?;
        }

        Ok(self)
    }

    /// Finish consuming items, produce final result.
    fn complete(self) -> Self::Result;
}

/* ReduceFolder */

/// Folds items into an accumulator that starts at the identity.
pub struct ReduceFolder<'o, O, T> {
    operation: &'o O,
    item: T,
}

impl<'o, O, T> ReduceFolder<'o, O, T> {
    pub fn new(operation: &'o O, identity: T) -> Self {
        Self {
            operation,
            item: identity,
        }
    }
}

impl<'o, O, T> Folder<T> for ReduceFolder<'o, O, T>
where
    O: Operation<T>,
{
    type Result = T;

    #[inline]
    fn consume(mut self, item: T) -> Result<Self> {
        self.item = self.operation.apply(self.item, item)?;

        Ok(self)
    }

    fn complete(self) -> Self::Result {
        self.item
    }
}

/// Fold `items` from `identity` with `operation`, left to right.
pub fn fold_slice<T, O>(items: &[T], identity: T, operation: &O) -> Result<T>
where
    T: Clone,
    O: Operation<T>,
{
    let folder = ReduceFolder::new(operation, identity);

    Ok(folder.consume_iter(items.iter().cloned())?.complete())
}
