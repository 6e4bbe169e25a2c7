use std::cell::UnsafeCell;

/// One result slot per worker of a team.
///
/// The slots are plain cells without any locking. Exclusive access is
/// given by the phase structure of the parallel executor, which
/// separates every phase by a barrier:
///
/// - local fold: worker `i` only writes slot `i`
/// - combine round with stride `s`: the receiving worker `i` takes
///   slots `i` and `i + s` and writes slot `i`; slot `i + s` is owned by
///   no other worker of that round and is never touched again
///
/// so no slot is accessed by two threads between two barriers.
pub struct PartialResults<T> {
    slots: Box<[UnsafeCell<Option<T>>]>,
}

// SAFETY: see the type level documentation. Values move between threads,
// so `T: Send` is required; no `&T` is ever shared.
unsafe impl<T: Send> Sync for PartialResults<T> {}

impl<T> PartialResults<T> {
    pub fn new(workers: usize) -> Self {
        Self {
            slots: (0..workers).map(|_| UnsafeCell::new(None)).collect(),
        }
    }

    /// Store the result of `slot`.
    ///
    /// # Safety
    ///
    /// The caller must be the only thread accessing `slot` in the
    /// current phase.
    #[inline]
    pub unsafe fn put(&self, slot: usize, value: T) {
        *self.slots[slot].get() = Some(value);
    }

    /// Move the result out of `slot`.
    ///
    /// # Safety
    ///
    /// The caller must be the only thread accessing `slot` in the
    /// current phase, and all writes to it from earlier phases must
    /// be visible (separated by a barrier).
    #[inline]
    pub unsafe fn take(&self, slot: usize) -> Option<T> {
        (*self.slots[slot].get()).take()
    }

    /// Final value in slot 0, once all workers have been joined.
    pub fn into_first(self) -> Option<T> {
        self.slots.into_vec().into_iter().next()?.into_inner()
    }
}
